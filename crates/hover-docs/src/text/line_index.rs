use super::Span;

/// Pre-computed line start byte offsets for a piece of text.
#[derive(Debug, Clone)]
pub struct LineIndex {
    starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut starts = vec![0usize];
        for (i, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                starts.push(i + 1);
            }
        }
        Self {
            starts,
            len: text.len(),
        }
    }

    /// Number of lines; a trailing newline opens one more (empty) line.
    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    /// 0-based row containing `offset`.
    pub fn row_of(
        &self,
        offset: usize,
    ) -> usize {
        let offset = offset.min(self.len);
        match self.starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(ins) => ins.saturating_sub(1),
        }
    }

    /// Span of the 0-based `row`, newline excluded.
    pub fn line_span(
        &self,
        row: usize,
    ) -> Option<Span> {
        let start = *self.starts.get(row)?;
        let end = self.starts.get(row + 1).map(|next| next - 1).unwrap_or(self.len);
        Some(Span::new(start, end.max(start)))
    }

    /// Span of the line containing `offset`.
    pub fn line_span_at(
        &self,
        offset: usize,
    ) -> Span {
        self.line_span(self.row_of(offset)).unwrap_or_default()
    }

    /// Byte offset of a 1-based `row` and 1-based character `column`.
    ///
    /// The column may point one past the last character of the line (the
    /// position of the newline). Anything beyond that is out of range.
    pub fn offset_of(
        &self,
        text: &str,
        row: usize,
        column: usize,
    ) -> Option<usize> {
        if row == 0 || column == 0 {
            return None;
        }
        let line = self.line_span(row - 1)?;
        let line_text = text.get(line.start..line.end)?;
        let mut chars = line_text.char_indices().map(|(i, _)| i).chain(std::iter::once(line_text.len()));
        chars.nth(column - 1).map(|byte| line.start + byte)
    }
}

#[cfg(test)]
#[path = "../../tests/src/text/line_index_tests.rs"]
mod tests;
