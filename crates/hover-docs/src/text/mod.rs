//! Tagged text buffers.
//!
//! A [`TaggedText`] is a string plus a tag table: sorted, contiguous runs that
//! partition `[0, len)` and carry the scope labels a syntax engine assigned to
//! each byte. [`TaggedText::splice`] edits the string and remaps every run
//! boundary in the same step, so the two never drift apart.

pub(crate) mod line_index;

use serde::{Deserialize, Serialize};

pub use line_index::LineIndex;

/// Half-open byte range `[start, end)`. An empty span means "not found".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub const fn new(
        start: usize,
        end: usize,
    ) -> Self {
        Self {
            start,
            end,
        }
    }

    pub const fn empty() -> Self {
        Self::new(0, 0)
    }

    pub const fn at(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn contains(
        &self,
        offset: usize,
    ) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Smallest span covering both. An empty operand is ignored.
    pub fn cover(
        self,
        other: Span,
    ) -> Span {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}

/// Ordered scope labels attached to a run, outermost first
/// (`source.python`, `meta.function.parameters.python`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Tags(Vec<String>);

impl Tags {
    pub fn new(tags: Vec<String>) -> Self {
        let mut deduped: Vec<String> = Vec::with_capacity(tags.len());
        for tag in tags {
            if !tag.is_empty() && !deduped.contains(&tag) {
                deduped.push(tag);
            }
        }
        Self(deduped)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// `true` if any tag contains `marker` as a substring.
    pub fn has_marker(
        &self,
        marker: &str,
    ) -> bool {
        self.iter().any(|tag| tag.contains(marker))
    }

    /// `true` if any tag starts with any of `prefixes`.
    pub fn matches_any_prefix(
        &self,
        prefixes: &[String],
    ) -> bool {
        self.iter().any(|tag| prefixes.iter().any(|prefix| tag.starts_with(prefix.as_str())))
    }
}

impl<S: Into<String>> FromIterator<S> for Tags {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Tags::new(iter.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRun {
    pub span: Span,
    pub tags: Tags,
}

impl TagRun {
    pub fn new(
        start: usize,
        end: usize,
        tags: Tags,
    ) -> Self {
        Self {
            span: Span::new(start, end),
            tags,
        }
    }

    pub fn len(&self) -> usize {
        self.span.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaggedText {
    text: String,
    runs: Vec<TagRun>,
}

impl TaggedText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text covered by a single run with no tags.
    pub fn untagged(text: impl Into<String>) -> Self {
        let text = text.into();
        let runs = if text.is_empty() {
            Vec::new()
        } else {
            vec![TagRun::new(0, text.len(), Tags::default())]
        };
        Self {
            text,
            runs,
        }
    }

    /// Builds a buffer from a syntax engine's tag table. Runs are sorted,
    /// clipped to the text, and any gap is filled with an untagged run so the
    /// table always partitions the whole text.
    pub fn with_runs(
        text: impl Into<String>,
        runs: Vec<TagRun>,
    ) -> Self {
        let mut buffer = Self::new();
        buffer.assign(text.into(), runs);
        buffer
    }

    /// Replaces the contents in place, reusing the allocations.
    pub fn assign(
        &mut self,
        text: String,
        mut runs: Vec<TagRun>,
    ) {
        self.text = text;
        self.runs.clear();
        runs.sort_by_key(|run| run.span.start);
        let len = self.text.len();
        let mut cursor = 0usize;
        for run in runs {
            let start = run.span.start.max(cursor);
            let end = run.span.end.min(len);
            if start >= end {
                continue;
            }
            if start > cursor {
                self.runs.push(TagRun::new(cursor, start, Tags::default()));
            }
            self.runs.push(TagRun::new(start, end, run.tags));
            cursor = end;
        }
        if cursor < len {
            self.runs.push(TagRun::new(cursor, len, Tags::default()));
        }
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.runs.clear();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn runs(&self) -> &[TagRun] {
        &self.runs
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Text covered by `span`, clipped to the buffer and to char boundaries.
    pub fn substr(
        &self,
        span: Span,
    ) -> &str {
        let span = self.clip(span);
        self.text.get(span.start..span.end).unwrap_or("")
    }

    fn clip(
        &self,
        span: Span,
    ) -> Span {
        let end = floor_char_boundary(&self.text, span.end.min(self.text.len()));
        let start = floor_char_boundary(&self.text, span.start.min(end));
        Span::new(start, end)
    }

    fn run_index_at(
        &self,
        offset: usize,
    ) -> Option<usize> {
        if offset >= self.text.len() {
            return None;
        }
        let idx = self.runs.partition_point(|run| run.span.end <= offset);
        (idx < self.runs.len()).then_some(idx)
    }

    /// Tags at `offset`, or `None` past the end of the buffer.
    pub fn tags_at(
        &self,
        offset: usize,
    ) -> Option<&Tags> {
        self.run_index_at(offset).map(|idx| &self.runs[idx].tags)
    }

    /// Maximal runs of identical tags intersecting `span`, rebased to start at 0.
    pub fn runs_in(
        &self,
        span: Span,
    ) -> Vec<TagRun> {
        let span = self.clip(span);
        let mut out: Vec<TagRun> = Vec::new();
        if span.is_empty() {
            return out;
        }
        let first = self.runs.partition_point(|run| run.span.end <= span.start);
        for run in self.runs.iter().skip(first) {
            if run.span.start >= span.end {
                break;
            }
            let start = run.span.start.max(span.start) - span.start;
            let end = run.span.end.min(span.end) - span.start;
            match out.last_mut() {
                Some(last) if last.tags == run.tags && last.span.end == start => last.span.end = end,
                _ => out.push(TagRun::new(start, end, run.tags.clone())),
            }
        }
        out
    }

    /// An owned copy of `span` with its runs rebased.
    pub fn slice(
        &self,
        span: Span,
    ) -> TaggedText {
        let span = self.clip(span);
        TaggedText {
            text: self.substr(span).to_string(),
            runs: self.runs_in(span),
        }
    }

    /// Extent of the contiguous region around `offset` whose runs all carry `tag`.
    pub fn scope_extent(
        &self,
        offset: usize,
        tag: &str,
    ) -> Option<Span> {
        let idx = self.run_index_at(offset)?;
        let carries = |run: &TagRun| run.tags.iter().any(|t| t == tag);
        if !carries(&self.runs[idx]) {
            return None;
        }
        let mut first = idx;
        while first > 0 && carries(&self.runs[first - 1]) {
            first -= 1;
        }
        let mut last = idx;
        while last + 1 < self.runs.len() && carries(&self.runs[last + 1]) {
            last += 1;
        }
        Some(Span::new(self.runs[first].span.start, self.runs[last].span.end))
    }

    /// Replaces `range` with `replacement` and remaps the tag table.
    ///
    /// Boundaries before the range stay put, boundaries inside it collapse to
    /// `range.start`, boundaries after it shift by the length delta. Runs that
    /// collapse to zero width are dropped. Inserted text joins the run that
    /// starts at (or spans) `range.start`.
    pub fn splice(
        &mut self,
        range: Span,
        replacement: &str,
    ) {
        let range = self.clip(range);
        let (start, end) = (range.start, floor_char_boundary(&self.text, range.end));
        if start == end && replacement.is_empty() {
            return;
        }
        let old_len = self.text.len();
        self.text.replace_range(start..end, replacement);
        let removed = end - start;
        let added = replacement.len();
        let map = |boundary: usize| {
            if boundary <= start {
                boundary
            } else if boundary < end {
                start
            } else {
                boundary - removed + added
            }
        };

        for run in &mut self.runs {
            run.span = Span::new(map(run.span.start), map(run.span.end));
        }
        self.runs.retain(|run| !run.span.is_empty());

        if start == old_len && added > 0 {
            match self.runs.last_mut() {
                Some(last) => last.span.end = self.text.len(),
                None => self.runs.push(TagRun::new(0, self.text.len(), Tags::default())),
            }
        }
    }

    /// Deletes `len` bytes at `pos`.
    pub fn remove(
        &mut self,
        pos: usize,
        len: usize,
    ) {
        self.splice(Span::new(pos, pos.saturating_add(len)), "");
    }

    /// Sum of run widths; equals `len()` whenever the table is consistent.
    pub fn covered_len(&self) -> usize {
        self.runs.iter().map(TagRun::len).sum()
    }
}

fn floor_char_boundary(
    text: &str,
    mut offset: usize,
) -> usize {
    offset = offset.min(text.len());
    while offset > 0 && !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

#[cfg(test)]
#[path = "../../tests/src/text/tagged_text_tests.rs"]
mod tests;
