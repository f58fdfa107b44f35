//! Scanner and parser for the contract-language front end.
//!
//! [`lex`] turns a source buffer into a flat token stream; [`Parser`] turns
//! that stream into a [`SourceUnit`]. Diagnostics accumulate on a
//! [`Handler`](solfront_error::handler::Handler) so a single parse can
//! report every problem it finds, with the tree still produced for whatever
//! did parse.

pub mod expr;
pub mod item;
pub mod lexer;
pub mod parser;
pub mod stmt;
pub mod ty;

pub use crate::{
    expr::Precedence,
    lexer::{lex, Lexer, TokenStream},
    parser::{ParseResult, Parser},
};

use solfront_ast::source_unit::SourceUnit;
use solfront_error::{
    error::CompileError,
    handler::{ErrorEmitted, Handler},
};
use std::{path::PathBuf, sync::Arc};

/// Scans and parses one source buffer, recording diagnostics on `handler`.
///
/// Returns `Err` only for lexical errors, which invalidate the whole token
/// stream. Parse errors are recoverable: the tree comes back `Ok` with the
/// failed declarations skipped and diagnosed.
pub fn parse_file(
    handler: &Handler,
    src: Arc<str>,
    path: Option<Arc<PathBuf>>,
) -> Result<SourceUnit, ErrorEmitted> {
    let token_stream = lexer::lex(handler, src, path)?;
    let mut parser = Parser::new(handler, &token_stream);
    Ok(parser.parse_source_unit())
}

/// Convenience entry point: parses `text` as the contents of `source_name`
/// and returns the tree together with every diagnostic.
pub fn parse(source_name: &str, text: &str) -> (SourceUnit, Vec<CompileError>) {
    let handler = Handler::default();
    let src: Arc<str> = text.into();
    let path = Some(Arc::new(PathBuf::from(source_name)));
    let source_unit = match parse_file(&handler, src.clone(), path.clone()) {
        Ok(source_unit) => source_unit,
        // No declarations, so the unit's span is the empty union: zero.
        Err(_) => SourceUnit {
            decls: Vec::new(),
            span: solfront_types::Span::new(src, 0, 0, path)
                .unwrap_or_else(solfront_types::Span::dummy),
        },
    };
    (source_unit, handler.consume())
}
