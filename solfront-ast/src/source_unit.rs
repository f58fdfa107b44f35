use crate::decl::Decl;
use serde::{Deserialize, Serialize};
use solfront_types::{Span, Spanned};

/// The root node of one parsed source buffer.
///
/// Its span is the union of its declarations' spans; an empty file has a
/// zero span.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceUnit {
    pub decls: Vec<Decl>,
    pub span: Span,
}

impl Spanned for SourceUnit {
    fn span(&self) -> Span {
        self.span.clone()
    }
}
