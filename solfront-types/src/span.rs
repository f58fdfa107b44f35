use serde::{Deserialize, Serialize};
use std::{fmt, path::PathBuf, sync::Arc};

/// A byte range into a shared source buffer.
///
/// Spans are cheap to clone: the source text is reference-counted and the
/// literal text of any span is a zero-copy slice of it.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Span {
    src: Arc<str>,
    start: usize,
    end: usize,
    path: Option<Arc<PathBuf>>,
}

impl Span {
    pub fn new(src: Arc<str>, start: usize, end: usize, path: Option<Arc<PathBuf>>) -> Option<Span> {
        src.get(start..end)?;
        Some(Span {
            src,
            start,
            end,
            path,
        })
    }

    /// A span covering the whole of `src`.
    pub fn from_source(src: Arc<str>, path: Option<Arc<PathBuf>>) -> Span {
        let end = src.len();
        Span {
            src,
            start: 0,
            end,
            path,
        }
    }

    pub fn dummy() -> Span {
        Span {
            src: "".into(),
            start: 0,
            end: 0,
            path: None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.src[self.start..self.end]
    }

    pub fn src(&self) -> &Arc<str> {
        &self.src
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn path(&self) -> Option<&Arc<PathBuf>> {
        self.path.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Joins two spans over the same source buffer into one covering both.
    pub fn join(lhs: Span, rhs: Span) -> Span {
        assert!(Arc::ptr_eq(&lhs.src, &rhs.src));
        assert_eq!(lhs.path, rhs.path);
        Span {
            src: lhs.src,
            start: lhs.start.min(rhs.start),
            end: lhs.end.max(rhs.end),
            path: lhs.path,
        }
    }

    /// Shrinks the span so it no longer covers leading or trailing whitespace.
    pub fn trim(self) -> Span {
        let start_delta = self.as_str().len() - self.as_str().trim_start().len();
        let end_delta = self.as_str().len() - self.as_str().trim_end().len();
        Span {
            src: self.src,
            start: self.start + start_delta,
            end: self.end - end_delta,
            path: self.path,
        }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Span")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("as_str", &self.as_str())
            .finish()
    }
}

/// Anything with a definite location in some source buffer.
pub trait Spanned {
    fn span(&self) -> Span;
}

impl<T: Spanned> Spanned for Box<T> {
    fn span(&self) -> Span {
        (**self).span()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_out_of_bounds() {
        let src: Arc<str> = "abc".into();
        assert!(Span::new(src.clone(), 0, 4, None).is_none());
        assert!(Span::new(src.clone(), 2, 1, None).is_none());
        assert!(Span::new(src, 1, 3, None).is_some());
    }

    #[test]
    fn join_covers_both() {
        let src: Arc<str> = "hello world".into();
        let lhs = Span::new(src.clone(), 0, 5, None).unwrap();
        let rhs = Span::new(src, 6, 11, None).unwrap();
        let joined = Span::join(lhs, rhs);
        assert_eq!(joined.as_str(), "hello world");
    }

    #[test]
    fn trim_strips_whitespace() {
        let src: Arc<str> = "  name  ".into();
        let span = Span::from_source(src, None).trim();
        assert_eq!(span.as_str(), "name");
        assert_eq!(span.start(), 2);
        assert_eq!(span.end(), 6);
    }
}
