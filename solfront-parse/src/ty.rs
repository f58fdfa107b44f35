use crate::parser::{ParseResult, Parser};
use solfront_ast::{
    token::TokenKind,
    ty::{DataLocation, ElementaryTy, FunctionTy, Mutability, Param, ParamList, Ty, Visibility},
};
use solfront_error::parser_error::ParseErrorKind;
use solfront_types::{Span, Spanned};

pub(crate) fn visibility_of(kind: TokenKind) -> Option<Visibility> {
    match kind {
        TokenKind::Internal => Some(Visibility::Internal),
        TokenKind::External => Some(Visibility::External),
        TokenKind::Private => Some(Visibility::Private),
        TokenKind::Public => Some(Visibility::Public),
        _ => None,
    }
}

pub(crate) fn mutability_of(kind: TokenKind) -> Option<Mutability> {
    match kind {
        TokenKind::Pure => Some(Mutability::Pure),
        TokenKind::View => Some(Mutability::View),
        TokenKind::Payable => Some(Mutability::Payable),
        TokenKind::Constant => Some(Mutability::Constant),
        TokenKind::Immutable => Some(Mutability::Immutable),
        TokenKind::Transient => Some(Mutability::Transient),
        _ => None,
    }
}

impl Parser<'_, '_> {
    pub fn parse_ty(&mut self) -> ParseResult<Ty> {
        match self.cur_kind() {
            kind if kind.is_elementary_type() => {
                let token = self.bump();
                Ok(Ty::Elementary(ElementaryTy { token }))
            }
            TokenKind::Function => self.parse_function_ty().map(Ty::Function),
            TokenKind::Identifier => Ok(Ty::UserDefined(self.expect_ident()?)),
            _ => Err(self.emit_error(ParseErrorKind::ExpectedType)),
        }
    }

    /// `function (params) [visibility] [mutability] [returns (results)]`
    ///
    /// A function type carries no name of its own, which is how it is told
    /// apart from a function declaration.
    fn parse_function_ty(&mut self) -> ParseResult<FunctionTy> {
        let function = self.bump();
        let params = self.parse_param_list()?;
        let mut visibility = None;
        let mut mutability = None;
        loop {
            if visibility.is_none() {
                if let Some(v) = visibility_of(self.cur_kind()) {
                    self.bump();
                    visibility = Some(v);
                    continue;
                }
            }
            if mutability.is_none() {
                if let Some(m) = mutability_of(self.cur_kind()) {
                    self.bump();
                    mutability = Some(m);
                    continue;
                }
            }
            break;
        }
        let results = if self.take(TokenKind::Returns).is_some() {
            Some(self.parse_param_list()?)
        } else {
            None
        };
        let span = self.span_from(&function.span);
        Ok(FunctionTy {
            params,
            visibility,
            mutability,
            results,
            span,
        })
    }

    /// `(ty [location] [name], ...)`
    pub fn parse_param_list(&mut self) -> ParseResult<ParamList> {
        let lparen = self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.at(TokenKind::RParen) {
            loop {
                params.push(self.parse_param()?);
                if self.take(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        let rparen = self.expect(TokenKind::RParen)?;
        Ok(ParamList {
            params,
            span: Span::join(lparen.span, rparen.span),
        })
    }

    fn parse_param(&mut self) -> ParseResult<Param> {
        if !self.can_start_ty() {
            return Err(self.emit_error(ParseErrorKind::ExpectedParameter));
        }
        let ty = self.parse_ty()?;
        let location = self.take_data_location();
        let name = if self.at(TokenKind::Identifier) {
            Some(self.expect_ident()?)
        } else {
            None
        };
        let mut span = ty.span();
        if let Some(name) = &name {
            span = Span::join(span, name.span());
        }
        Ok(Param {
            ty,
            location,
            name,
            span,
        })
    }

    pub(crate) fn can_start_ty(&self) -> bool {
        self.cur_kind().is_elementary_type()
            || matches!(self.cur_kind(), TokenKind::Function | TokenKind::Identifier)
    }

    pub(crate) fn take_data_location(&mut self) -> DataLocation {
        let location = match self.cur_kind() {
            TokenKind::Storage => DataLocation::Storage,
            TokenKind::Memory => DataLocation::Memory,
            TokenKind::Calldata => DataLocation::Calldata,
            _ => return DataLocation::None,
        };
        self.bump();
        location
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use assert_matches::assert_matches;
    use solfront_error::handler::Handler;
    use std::sync::Arc;

    fn parse_one(text: &str) -> Ty {
        let handler = Handler::default();
        let src: Arc<str> = text.into();
        let ts = lex(&handler, src, None).unwrap();
        let mut parser = Parser::new(&handler, &ts);
        let ty = parser.parse_ty().unwrap();
        assert!(!handler.has_errors());
        ty
    }

    #[test]
    fn the_three_type_shapes() {
        assert_matches!(parse_one("uint128"), Ty::Elementary(_));
        assert_matches!(parse_one("MyStruct"), Ty::UserDefined(name) => {
            assert_eq!(name.as_str(), "MyStruct");
        });
        assert_matches!(
            parse_one("function (uint256) external view returns (bool)"),
            Ty::Function(function) => {
                assert_eq!(function.visibility, Some(Visibility::External));
                assert_eq!(function.mutability, Some(Mutability::View));
                assert_eq!(function.results.unwrap().params.len(), 1);
            }
        );
    }

    #[test]
    fn function_ty_renders_canonically() {
        let ty = parse_one("function (uint256 x) internal pure returns (uint256)");
        assert_eq!(
            ty.to_string(),
            "function(uint256 x) internal pure returns(uint256)",
        );
    }

    #[test]
    fn param_lists() {
        let handler = Handler::default();
        let src: Arc<str> = "(uint256 amount, address, MyStruct memory s)".into();
        let ts = lex(&handler, src, None).unwrap();
        let mut parser = Parser::new(&handler, &ts);
        let params = parser.parse_param_list().unwrap();
        assert_eq!(params.params.len(), 3);
        assert_eq!(params.params[0].name.as_ref().unwrap().as_str(), "amount");
        assert_eq!(params.params[1].name, None);
        assert_eq!(params.params[2].location, DataLocation::Memory);
    }
}
