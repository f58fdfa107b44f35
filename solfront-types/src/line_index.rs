use serde::{Deserialize, Serialize};

/// A 1-based line/column pair, the editor-facing rendition of a byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LineCol {
    pub line: usize,
    pub col: usize,
}

/// Precomputed line-start offsets for one source buffer.
///
/// Built once per buffer; `line_col` and `offset` are exact inverses for
/// every valid byte offset, including the offset one past the end of the
/// buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(text: &str) -> LineIndex {
        let mut line_starts = vec![0];
        for (i, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(i + 1);
            }
        }
        LineIndex {
            line_starts,
            len: text.len(),
        }
    }

    /// Number of lines in the buffer. An empty buffer has one (empty) line.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Converts a byte offset into a 1-based line/column pair.
    ///
    /// Columns count bytes from the line start. Offsets past the end of the
    /// buffer are clamped to the end.
    pub fn line_col(&self, offset: usize) -> LineCol {
        let offset = offset.min(self.len);
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        LineCol {
            line: line + 1,
            col: offset - self.line_starts[line] + 1,
        }
    }

    /// Converts a 1-based line/column pair back into a byte offset.
    ///
    /// Returns `None` when the line does not exist or the column points past
    /// the end of that line.
    pub fn offset(&self, line_col: LineCol) -> Option<usize> {
        if line_col.line == 0 || line_col.col == 0 {
            return None;
        }
        let start = *self.line_starts.get(line_col.line - 1)?;
        let line_end = self
            .line_starts
            .get(line_col.line)
            .map(|&next| next - 1)
            .unwrap_or(self.len);
        let offset = start + line_col.col - 1;
        (offset <= line_end).then_some(offset)
    }
}
