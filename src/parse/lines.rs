//! Byte-offset line index for column and line-text lookups.
//!
//! Tree-sitter reports rows and byte columns; normalizers additionally need
//! the byte offset where a row starts and the raw text of a row to compute
//! minimal whitespace replacements.

/// Precomputed line-start offsets for one source string.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset of the first character of each row.
    starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut starts = vec![0];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                starts.push(i + 1);
            }
        }
        Self {
            starts,
            len: source.len(),
        }
    }

    /// Number of rows, counting a trailing unterminated row.
    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    /// Byte offset of the first character of `row`.
    pub fn line_start(&self, row: usize) -> Option<usize> {
        self.starts.get(row).copied()
    }

    /// Byte offset just past the last character of `row` (excluding the
    /// newline itself).
    pub fn line_end(&self, row: usize) -> Option<usize> {
        self.line_start(row)?;
        match self.starts.get(row + 1) {
            Some(next) => Some(next - 1),
            None => Some(self.len),
        }
    }

    /// The raw text of `row`, without its newline.
    pub fn line_text<'a>(&self, source: &'a str, row: usize) -> Option<&'a str> {
        let start = self.line_start(row)?;
        let end = self.line_end(row)?;
        source.get(start..end)
    }

    /// The row containing `offset`.
    pub fn row_at(&self, offset: usize) -> usize {
        match self.starts.binary_search(&offset) {
            Ok(row) => row,
            Err(insert) => insert - 1,
        }
    }

    /// Leading whitespace of `row`, as a source slice.
    pub fn indent_text<'a>(&self, source: &'a str, row: usize) -> &'a str {
        let line = self.line_text(source, row).unwrap_or("");
        let end = line
            .char_indices()
            .find(|(_, c)| *c != ' ' && *c != '\t')
            .map(|(i, _)| i)
            .unwrap_or(line.len());
        &line[..end]
    }

    /// True if `row` contains only whitespace.
    pub fn is_blank(&self, source: &str, row: usize) -> bool {
        self.line_text(source, row)
            .map(|l| l.trim().is_empty())
            .unwrap_or(true)
    }
}
