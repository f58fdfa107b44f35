//! Solfront's diagnostic model.
//!
//! All failure in the front end is representable as data: lexical and
//! syntactic errors are recorded on a [`handler::Handler`] and surfaced as
//! [`error::CompileError`] values for the caller to inspect and render.
//! Nothing in the core aborts the host process on malformed input.

pub mod error;
pub mod handler;
pub mod lex_error;
pub mod parser_error;
