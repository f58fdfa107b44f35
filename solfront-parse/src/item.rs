use crate::{
    parser::{ParseResult, Parser},
    ty::{mutability_of, visibility_of},
};
use solfront_ast::{
    decl::{
        ContractBody, ContractDecl, Decl, EventDecl, EventParam, FunctionDecl, StateVariableDecl,
        UsingAlias, UsingForDirective, UsingItem, UsingTarget,
    },
    source_unit::SourceUnit,
    token::TokenKind,
};
use solfront_error::parser_error::ParseErrorKind;
use solfront_types::{Span, Spanned};

impl Parser<'_, '_> {
    /// Parses declarations until the end of input. Never fails: a bad
    /// declaration is diagnosed and skipped, and the rest still parse.
    pub fn parse_source_unit(&mut self) -> SourceUnit {
        let mut decls = Vec::new();
        while !self.at_end() {
            match self.parse_decl() {
                Ok(decl) => decls.push(decl),
                Err(_) => {
                    self.recover_to_boundary();
                    // A stray `}` has no enclosing block at the top level;
                    // skip it so the loop cannot stall.
                    self.take(TokenKind::RBrace);
                }
            }
        }
        let span = match (decls.first(), decls.last()) {
            (Some(first), Some(last)) => Span::join(first.span(), last.span()),
            _ => self.zero_span(),
        };
        SourceUnit { decls, span }
    }

    pub fn parse_decl(&mut self) -> ParseResult<Decl> {
        match self.cur_kind() {
            TokenKind::Contract => self.parse_contract(),
            TokenKind::Event => self.parse_event(),
            TokenKind::Using => self.parse_using_for(),
            TokenKind::Function => {
                // `function name(` declares a function; `function (` with no
                // name is a function-typed state variable.
                if self.peek_kind() == TokenKind::Identifier {
                    self.parse_function()
                } else {
                    self.parse_state_variable()
                }
            }
            kind if kind.is_elementary_type() => self.parse_state_variable(),
            TokenKind::Identifier => self.parse_state_variable(),
            _ => Err(self.emit_error(ParseErrorKind::ExpectedDeclaration)),
        }
    }

    /// `contract Name [is Parent, ...] { decl* }`
    fn parse_contract(&mut self) -> ParseResult<Decl> {
        let contract = self.bump();
        let name = self.expect_ident()?;
        let mut parents = Vec::new();
        if self.take(TokenKind::Is).is_some() {
            loop {
                parents.push(self.expect_ident()?);
                if self.take(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        let lbrace = self.expect(TokenKind::LBrace)?;
        let mut decls = Vec::new();
        while !self.at(TokenKind::RBrace) && !self.at_end() {
            match self.parse_decl() {
                Ok(decl) => decls.push(decl),
                Err(_) => self.recover_to_boundary(),
            }
        }
        let rbrace = self.expect(TokenKind::RBrace)?;
        let body = ContractBody {
            decls,
            span: Span::join(lbrace.span, rbrace.span.clone()),
        };
        Ok(Decl::Contract(ContractDecl {
            name,
            parents,
            body,
            span: Span::join(contract.span, rbrace.span),
        }))
    }

    /// `function name(params) modifier* [returns (results)] ({ body } | ;)`
    fn parse_function(&mut self) -> ParseResult<Decl> {
        let function = self.bump();
        let name = self.expect_ident()?;
        let params = self.parse_param_list()?;
        let mut visibility = None;
        let mut mutability = None;
        let mut is_virtual = false;
        loop {
            let kind = self.cur_kind();
            if let Some(v) = visibility_of(kind) {
                let token = self.bump();
                if visibility.replace(v).is_some() {
                    self.emit_error_with_span(
                        ParseErrorKind::DuplicateModifier {
                            modifier: token.kind.as_str(),
                        },
                        token.span,
                    );
                }
            } else if let Some(m) = mutability_of(kind) {
                let token = self.bump();
                if mutability.replace(m).is_some() {
                    self.emit_error_with_span(
                        ParseErrorKind::DuplicateModifier {
                            modifier: token.kind.as_str(),
                        },
                        token.span,
                    );
                }
            } else if kind == TokenKind::Virtual {
                let token = self.bump();
                if is_virtual {
                    self.emit_error_with_span(
                        ParseErrorKind::DuplicateModifier {
                            modifier: token.kind.as_str(),
                        },
                        token.span,
                    );
                }
                is_virtual = true;
            } else {
                break;
            }
        }
        let results = if self.take(TokenKind::Returns).is_some() {
            Some(self.parse_param_list()?)
        } else {
            None
        };
        let body = match self.cur_kind() {
            TokenKind::LBrace => Some(self.parse_block()?),
            TokenKind::Semicolon => {
                self.bump();
                None
            }
            _ => {
                return Err(self.emit_error(ParseErrorKind::ExpectedToken { expected: "{" }));
            }
        };
        Ok(Decl::Function(FunctionDecl {
            span: self.span_from(&function.span),
            name,
            params,
            visibility,
            mutability,
            is_virtual,
            results,
            body,
        }))
    }

    /// `ty modifier* [location] name [= initializer];`
    fn parse_state_variable(&mut self) -> ParseResult<Decl> {
        let ty = self.parse_ty()?;
        let mut visibility = None;
        let mut mutability = None;
        let mut location = Default::default();
        loop {
            let kind = self.cur_kind();
            if let Some(v) = visibility_of(kind) {
                let token = self.bump();
                if visibility.replace(v).is_some() {
                    self.emit_error_with_span(
                        ParseErrorKind::DuplicateModifier {
                            modifier: token.kind.as_str(),
                        },
                        token.span,
                    );
                }
            } else if let Some(m) = mutability_of(kind) {
                let token = self.bump();
                if mutability.replace(m).is_some() {
                    self.emit_error_with_span(
                        ParseErrorKind::DuplicateModifier {
                            modifier: token.kind.as_str(),
                        },
                        token.span,
                    );
                }
            } else if matches!(
                kind,
                TokenKind::Storage | TokenKind::Memory | TokenKind::Calldata
            ) {
                location = self.take_data_location();
            } else {
                break;
            }
        }
        let name = self.expect_ident()?;
        let initializer = if self.take(TokenKind::Assign).is_some() {
            Some(self.parse_expr()?)
        } else {
            None
        };
        let semicolon = self.expect(TokenKind::Semicolon)?;
        Ok(Decl::StateVariable(StateVariableDecl {
            span: Span::join(ty.span(), semicolon.span),
            ty,
            visibility,
            mutability,
            location,
            name,
            initializer,
        }))
    }

    /// `event Name(ty [indexed] [name], ...) [anonymous];`
    fn parse_event(&mut self) -> ParseResult<Decl> {
        let event = self.bump();
        let name = self.expect_ident()?;
        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.at(TokenKind::RParen) {
            loop {
                let ty = self.parse_ty()?;
                let is_indexed = self.take(TokenKind::Indexed).is_some();
                let param_name = if self.at(TokenKind::Identifier) {
                    Some(self.expect_ident()?)
                } else {
                    None
                };
                let mut span = ty.span();
                if let Some(param_name) = &param_name {
                    span = Span::join(span, param_name.span());
                }
                params.push(EventParam {
                    ty,
                    is_indexed,
                    name: param_name,
                    span,
                });
                if self.take(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;
        let is_anonymous = self.take(TokenKind::Anonymous).is_some();
        let semicolon = self.expect(TokenKind::Semicolon)?;
        Ok(Decl::Event(EventDecl {
            name,
            params,
            is_anonymous,
            span: Span::join(event.span, semicolon.span),
        }))
    }

    /// The three directive forms:
    ///
    /// - `using Library for SomeType;`
    /// - `using Library for *;`
    /// - `using {item [as alias], ...} for SomeType [global];`
    fn parse_using_for(&mut self) -> ParseResult<Decl> {
        let using = self.bump();
        let target = match self.cur_kind() {
            TokenKind::Identifier => UsingTarget::Library(self.expect_ident()?),
            TokenKind::LBrace => {
                self.bump();
                let mut items = Vec::new();
                loop {
                    items.push(self.parse_using_item()?);
                    if self.take(TokenKind::Comma).is_none() {
                        break;
                    }
                }
                self.expect(TokenKind::RBrace)?;
                UsingTarget::List(items)
            }
            _ => return Err(self.emit_error(ParseErrorKind::ExpectedUsingTarget)),
        };
        self.expect(TokenKind::For)?;
        let for_type = match self.cur_kind() {
            // The wildcard binds the target to every type.
            TokenKind::Mul => {
                self.bump();
                None
            }
            _ if self.can_start_ty() => Some(self.parse_ty()?),
            _ => return Err(self.emit_error(ParseErrorKind::ExpectedUsingForType)),
        };
        let is_global = self.take(TokenKind::Global).is_some();
        let semicolon = self.expect(TokenKind::Semicolon)?;
        Ok(Decl::UsingFor(UsingForDirective {
            target,
            for_type,
            is_global,
            span: Span::join(using.span, semicolon.span),
        }))
    }

    fn parse_using_item(&mut self) -> ParseResult<UsingItem> {
        let name = self.expect_ident()?;
        let alias = if self.take(TokenKind::As).is_some() {
            match self.cur_kind() {
                TokenKind::Identifier => Some(UsingAlias::Ident(self.expect_ident()?)),
                kind if is_definable_operator(kind) => Some(UsingAlias::Operator(self.bump())),
                _ => return Err(self.emit_error(ParseErrorKind::ExpectedOperatorAlias)),
            }
        } else {
            None
        };
        Ok(UsingItem { name, alias })
    }
}

/// The operator symbols a using-list item may alias to.
fn is_definable_operator(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Add
            | TokenKind::Sub
            | TokenKind::Mul
            | TokenKind::Div
            | TokenKind::Mod
            | TokenKind::BitAnd
            | TokenKind::BitOr
            | TokenKind::BitXor
            | TokenKind::BitNot
            | TokenKind::Eq
            | TokenKind::NotEq
            | TokenKind::Lt
            | TokenKind::Gt
            | TokenKind::LtEq
            | TokenKind::GtEq
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use assert_matches::assert_matches;
    use solfront_ast::ty::{Mutability, Visibility};
    use solfront_error::handler::Handler;
    use std::sync::Arc;

    fn parse_one(text: &str) -> Decl {
        let handler = Handler::default();
        let src: Arc<str> = text.into();
        let ts = lex(&handler, src, None).unwrap();
        let mut parser = Parser::new(&handler, &ts);
        let decl = parser.parse_decl().unwrap();
        assert!(!handler.has_errors(), "unexpected diagnostics for {text:?}");
        decl
    }

    #[test]
    fn contract_with_parents() {
        let decl = parse_one("contract Vault is Ownable, IERC20 { uint256 total; }");
        assert_matches!(&decl, Decl::Contract(contract) => {
            assert_eq!(contract.name.as_str(), "Vault");
            let parents: Vec<&str> = contract.parents.iter().map(|p| p.as_str()).collect();
            assert_eq!(parents, ["Ownable", "IERC20"]);
            assert_eq!(contract.body.decls.len(), 1);
        });
    }

    #[test]
    fn function_modifiers_and_results() {
        let decl = parse_one(
            "function withdraw(uint256 amount) public payable virtual returns (bool ok) { return true; }",
        );
        assert_matches!(&decl, Decl::Function(function) => {
            assert_eq!(function.name.as_str(), "withdraw");
            assert_eq!(function.visibility, Some(Visibility::Public));
            assert_eq!(function.mutability, Some(Mutability::Payable));
            assert!(function.is_virtual);
            assert_eq!(function.results.as_ref().unwrap().params.len(), 1);
            assert!(function.body.is_some());
        });
    }

    #[test]
    fn bodyless_function_declaration() {
        let decl = parse_one("function totalSupply() external view returns (uint256);");
        assert_matches!(&decl, Decl::Function(function) => {
            assert!(function.body.is_none());
        });
    }

    #[test]
    fn duplicate_modifier_is_diagnosed() {
        let handler = Handler::default();
        let src: Arc<str> = "function f() public public {}".into();
        let ts = lex(&handler, src, None).unwrap();
        let mut parser = Parser::new(&handler, &ts);
        let decl = parser.parse_decl().unwrap();
        assert_eq!(handler.error_count(), 1);
        assert_matches!(decl, Decl::Function(function) => {
            assert_eq!(function.visibility, Some(Visibility::Public));
        });
    }

    #[test]
    fn state_variables() {
        let decl = parse_one("uint256 public constant MAX = 10 ** 18;");
        assert_matches!(&decl, Decl::StateVariable(state_var) => {
            assert_eq!(state_var.name.as_str(), "MAX");
            assert_eq!(state_var.visibility, Some(Visibility::Public));
            assert_eq!(state_var.mutability, Some(Mutability::Constant));
            assert_eq!(state_var.initializer.as_ref().unwrap().to_string(), "(10 ** 18)");
        });

        // A function-typed state variable has no name after `function`.
        let decl = parse_one("function (uint256) internal returns (uint256) op;");
        assert_matches!(&decl, Decl::StateVariable(state_var) => {
            assert_eq!(state_var.name.as_str(), "op");
        });
    }

    #[test]
    fn events_with_indexed_and_anonymous() {
        let decl = parse_one("event Transfer(address indexed from, address indexed to, uint256 value);");
        assert_matches!(&decl, Decl::Event(event) => {
            assert_eq!(event.name.as_str(), "Transfer");
            assert_eq!(event.params.len(), 3);
            assert!(event.params[0].is_indexed);
            assert!(!event.params[2].is_indexed);
            assert!(!event.is_anonymous);
        });

        let decl = parse_one("event Ping(uint256) anonymous;");
        assert_matches!(&decl, Decl::Event(event) => {
            assert_eq!(event.params[0].name, None);
            assert!(event.is_anonymous);
        });
    }

    #[test]
    fn using_for_forms() {
        let decl = parse_one("using SafeMath for uint256;");
        assert_matches!(&decl, Decl::UsingFor(using_for) => {
            assert_matches!(&using_for.target, UsingTarget::Library(name) => {
                assert_eq!(name.as_str(), "SafeMath");
            });
            assert!(using_for.for_type.is_some());
            assert!(!using_for.is_global);
        });

        let decl = parse_one("using SafeMath for *;");
        assert_matches!(&decl, Decl::UsingFor(using_for) => {
            assert!(using_for.for_type.is_none());
        });

        let decl = parse_one("using {add as +, isEqual as ==, sub} for Fixed global;");
        assert_matches!(&decl, Decl::UsingFor(using_for) => {
            assert!(using_for.is_global);
            assert_matches!(&using_for.target, UsingTarget::List(items) => {
                assert_eq!(items.len(), 3);
                assert_matches!(&items[0].alias, Some(UsingAlias::Operator(op)) => {
                    assert_eq!(op.kind, TokenKind::Add);
                });
                assert_matches!(&items[1].alias, Some(UsingAlias::Operator(op)) => {
                    assert_eq!(op.kind, TokenKind::Eq);
                });
                assert_eq!(items[2].alias, None);
            });
        });
    }

    #[test]
    fn source_unit_collects_every_declaration() {
        let handler = Handler::default();
        let src: Arc<str> = "\
            contract A { }\n\
            event Moved(uint256 x);\n\
            uint256 counter;\n"
            .into();
        let ts = lex(&handler, src, None).unwrap();
        let mut parser = Parser::new(&handler, &ts);
        let source_unit = parser.parse_source_unit();
        assert!(!handler.has_errors());
        assert_eq!(source_unit.decls.len(), 3);
        assert_matches!(source_unit.decls[0], Decl::Contract(_));
        assert_matches!(source_unit.decls[1], Decl::Event(_));
        assert_matches!(source_unit.decls[2], Decl::StateVariable(_));
    }
}
