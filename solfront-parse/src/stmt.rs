use crate::parser::{ParseResult, Parser};
use solfront_ast::{
    statement::{
        Block, ExprStmt, IfStmt, ReturnStmt, Statement, TupleSlot, TupleVariableDeclStmt,
        UncheckedBlock, VariableDeclStmt,
    },
    token::TokenKind,
};
use solfront_types::{Span, Spanned};

impl Parser<'_, '_> {
    pub fn parse_statement(&mut self) -> ParseResult<Statement> {
        match self.cur_kind() {
            TokenKind::LBrace => Ok(Statement::Block(self.parse_block()?)),
            TokenKind::Unchecked => self.parse_unchecked(),
            TokenKind::Return => self.parse_return(),
            TokenKind::If => self.parse_if(),
            TokenKind::LParen => {
                if self.at_tuple_variable_decl() {
                    self.parse_tuple_variable_decl()
                } else {
                    self.parse_expr_statement()
                }
            }
            TokenKind::Function => self.parse_variable_decl(),
            kind if kind.is_elementary_type() => {
                // `uint256 x ...` declares; `uint256(x)` is a cast.
                if self.peek_kind() == TokenKind::LParen {
                    self.parse_expr_statement()
                } else {
                    self.parse_variable_decl()
                }
            }
            TokenKind::Identifier => {
                // A user-defined type only declares when a name (or a data
                // location) follows it; anything else is an expression.
                if matches!(
                    self.peek_kind(),
                    TokenKind::Identifier
                        | TokenKind::Storage
                        | TokenKind::Memory
                        | TokenKind::Calldata
                ) {
                    self.parse_variable_decl()
                } else {
                    self.parse_expr_statement()
                }
            }
            _ => self.parse_expr_statement(),
        }
    }

    /// `{ statement* }`, resynchronizing after each failed statement so one
    /// bad statement costs one diagnostic, not the rest of the block.
    pub fn parse_block(&mut self) -> ParseResult<Block> {
        let lbrace = self.expect(TokenKind::LBrace)?;
        let mut statements = Vec::new();
        while !self.at(TokenKind::RBrace) && !self.at_end() {
            match self.parse_statement() {
                Ok(statement) => statements.push(statement),
                Err(_) => self.recover_to_boundary(),
            }
        }
        let rbrace = self.expect(TokenKind::RBrace)?;
        Ok(Block {
            statements,
            span: Span::join(lbrace.span, rbrace.span),
        })
    }

    fn parse_unchecked(&mut self) -> ParseResult<Statement> {
        let unchecked = self.bump();
        let block = self.parse_block()?;
        let span = Span::join(unchecked.span, block.span());
        Ok(Statement::Unchecked(UncheckedBlock { block, span }))
    }

    fn parse_return(&mut self) -> ParseResult<Statement> {
        let ret = self.bump();
        let expr = if self.at(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        let semicolon = self.expect(TokenKind::Semicolon)?;
        Ok(Statement::Return(ReturnStmt {
            expr,
            span: Span::join(ret.span, semicolon.span),
        }))
    }

    fn parse_if(&mut self) -> ParseResult<Statement> {
        let if_token = self.bump();
        self.expect(TokenKind::LParen)?;
        let condition = self.parse_expr()?;
        self.expect(TokenKind::RParen)?;
        let then_branch = Box::new(self.parse_statement()?);
        let mut span = Span::join(if_token.span, then_branch.span());
        let else_branch = if self.take(TokenKind::Else).is_some() {
            let else_branch = Box::new(self.parse_statement()?);
            span = Span::join(span, else_branch.span());
            Some(else_branch)
        } else {
            None
        };
        Ok(Statement::If(IfStmt {
            condition,
            then_branch,
            else_branch,
            span,
        }))
    }

    fn parse_expr_statement(&mut self) -> ParseResult<Statement> {
        let expr = self.parse_expr()?;
        let semicolon = self.expect(TokenKind::Semicolon)?;
        let span = Span::join(expr.span(), semicolon.span);
        Ok(Statement::Expr(ExprStmt { expr, span }))
    }

    /// `ty [location] name [= initializer];`
    fn parse_variable_decl(&mut self) -> ParseResult<Statement> {
        let ty = self.parse_ty()?;
        let location = self.take_data_location();
        let name = self.expect_ident()?;
        let initializer = if self.take(TokenKind::Assign).is_some() {
            Some(self.parse_expr()?)
        } else {
            None
        };
        let semicolon = self.expect(TokenKind::Semicolon)?;
        Ok(Statement::VariableDecl(VariableDeclStmt {
            span: Span::join(ty.span(), semicolon.span),
            ty,
            location,
            name,
            initializer,
        }))
    }

    /// Whether a leading `(` opens a tuple declaration rather than a
    /// parenthesized expression. A tuple is committed to only when the
    /// token after `(` is an omitted slot (`,` or `)`), a function type,
    /// or a type start followed by a slot name or data location.
    fn at_tuple_variable_decl(&self) -> bool {
        match self.peek_kind() {
            TokenKind::Comma | TokenKind::RParen | TokenKind::Function => true,
            kind if kind.is_elementary_type() || kind == TokenKind::Identifier => matches!(
                self.peek_nth_kind(2),
                TokenKind::Identifier
                    | TokenKind::Storage
                    | TokenKind::Memory
                    | TokenKind::Calldata
            ),
            _ => false,
        }
    }

    /// `(slot?, slot?, ...) = initializer;` where an empty position between
    /// commas is an omitted slot.
    fn parse_tuple_variable_decl(&mut self) -> ParseResult<Statement> {
        let lparen = self.bump();
        let mut slots = Vec::new();
        if !self.at(TokenKind::RParen) {
            loop {
                if matches!(self.cur_kind(), TokenKind::Comma | TokenKind::RParen) {
                    slots.push(None);
                } else {
                    slots.push(Some(self.parse_tuple_slot()?));
                }
                if self.take(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::Assign)?;
        let initializer = self.parse_expr()?;
        let semicolon = self.expect(TokenKind::Semicolon)?;
        Ok(Statement::TupleVariableDecl(TupleVariableDeclStmt {
            slots,
            initializer,
            span: Span::join(lparen.span, semicolon.span),
        }))
    }

    fn parse_tuple_slot(&mut self) -> ParseResult<TupleSlot> {
        let ty = self.parse_ty()?;
        let location = self.take_data_location();
        let name = self.expect_ident()?;
        Ok(TupleSlot { ty, location, name })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use assert_matches::assert_matches;
    use solfront_ast::ty::{DataLocation, Ty};
    use solfront_error::handler::Handler;
    use std::sync::Arc;

    fn parse_stmt(text: &str) -> Statement {
        let handler = Handler::default();
        let src: Arc<str> = text.into();
        let ts = lex(&handler, src, None).unwrap();
        let mut parser = Parser::new(&handler, &ts);
        let statement = parser.parse_statement().unwrap();
        assert!(!handler.has_errors(), "unexpected diagnostics for {text:?}");
        statement
    }

    #[test]
    fn variable_declarations() {
        let statement = parse_stmt("uint256 balance = 10 + 5;");
        assert_matches!(&statement, Statement::VariableDecl(decl) => {
            assert_matches!(decl.ty, Ty::Elementary(_));
            assert_eq!(decl.name.as_str(), "balance");
            assert_eq!(decl.initializer.as_ref().unwrap().to_string(), "(10 + 5)");
        });

        let statement = parse_stmt("MyStruct memory s;");
        assert_matches!(&statement, Statement::VariableDecl(decl) => {
            assert_matches!(decl.ty, Ty::UserDefined(_));
            assert_eq!(decl.location, DataLocation::Memory);
            assert!(decl.initializer.is_none());
        });
    }

    #[test]
    fn cast_is_an_expression_not_a_declaration() {
        let statement = parse_stmt("uint256(x);");
        assert_matches!(&statement, Statement::Expr(stmt) => {
            assert_eq!(stmt.expr.to_string(), "uint256(x)");
        });
    }

    #[test]
    fn tuple_declaration_preserves_omitted_slots() {
        let statement = parse_stmt("(address owner,,, uint256 balance) = f();");
        assert_matches!(&statement, Statement::TupleVariableDecl(decl) => {
            assert_eq!(decl.slots.len(), 4);
            assert!(decl.slots[0].is_some());
            assert!(decl.slots[1].is_none());
            assert!(decl.slots[2].is_none());
            assert_eq!(decl.slots[3].as_ref().unwrap().name.as_str(), "balance");
            assert_eq!(decl.initializer.to_string(), "f()");
        });
    }

    #[test]
    fn parenthesized_expression_is_not_a_tuple() {
        let statement = parse_stmt("(x);");
        assert_matches!(&statement, Statement::Expr(stmt) => {
            assert_eq!(stmt.expr.to_string(), "x");
        });

        let statement = parse_stmt("(a + b) * c;");
        assert_matches!(&statement, Statement::Expr(stmt) => {
            assert_eq!(stmt.expr.to_string(), "((a + b) * c)");
        });

        let statement = parse_stmt("(uint256(x));");
        assert_matches!(&statement, Statement::Expr(stmt) => {
            assert_eq!(stmt.expr.to_string(), "uint256(x)");
        });
    }

    #[test]
    fn leading_omitted_slot_still_declares_a_tuple() {
        let statement = parse_stmt("(, uint256 b) = f();");
        assert_matches!(&statement, Statement::TupleVariableDecl(decl) => {
            assert!(decl.slots[0].is_none());
            assert_eq!(decl.slots[1].as_ref().unwrap().name.as_str(), "b");
        });
    }

    #[test]
    fn if_else_chain() {
        let statement = parse_stmt("if (a < b) { x = 1; } else if (c) y = 2; else { z = 3; }");
        assert_matches!(&statement, Statement::If(if_stmt) => {
            assert_eq!(if_stmt.condition.to_string(), "(a < b)");
            assert_matches!(if_stmt.then_branch.as_ref(), Statement::Block(_));
            assert_matches!(if_stmt.else_branch.as_deref(), Some(Statement::If(_)));
        });
    }

    #[test]
    fn unchecked_and_return() {
        let statement = parse_stmt("unchecked { counter += 1; }");
        assert_matches!(&statement, Statement::Unchecked(unchecked) => {
            assert_eq!(unchecked.block.statements.len(), 1);
        });

        assert_matches!(parse_stmt("return;"), Statement::Return(ret) => {
            assert!(ret.expr.is_none());
        });
        assert_matches!(parse_stmt("return a + b;"), Statement::Return(ret) => {
            assert_eq!(ret.expr.unwrap().to_string(), "(a + b)");
        });
    }

    #[test]
    fn block_recovers_per_statement() {
        let handler = Handler::default();
        let src: Arc<str> = "{ x = ; y = 2; z = ; w = 4; }".into();
        let ts = lex(&handler, src, None).unwrap();
        let mut parser = Parser::new(&handler, &ts);
        let block = parser.parse_block().unwrap();
        // Both bad statements are diagnosed; both good ones survive.
        assert_eq!(handler.error_count(), 2);
        assert_eq!(block.statements.len(), 2);
    }
}
