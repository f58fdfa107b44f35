//! Core positional types shared by every solfront crate: byte-offset spans
//! over reference-counted source buffers, the line/column index used by
//! diagnostic rendering, and identifiers.

pub mod ident;
pub mod line_index;
pub mod span;

pub use ident::Ident;
pub use line_index::{LineCol, LineIndex};
pub use span::{Span, Spanned};
