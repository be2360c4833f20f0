//! Reduces a raw comment to its text: comment syntax removed, indentation and
//! blank padding trimmed.
//!
//! Every step edits the comment through [`TaggedText::splice`], so the tag
//! table stays aligned with the shrinking string and the result can be
//! re-styled. Normalizing an already normalized comment changes nothing.

use tracing::trace;

use crate::config::DocstringDelimiters;
use crate::syntax::{SyntaxEngine, SyntaxId};
use crate::text::{LineIndex, Span, TaggedText};

pub struct Normalizer<'a> {
    engine: &'a dyn SyntaxEngine,
    syntax: &'a SyntaxId,
    tab_width: usize,
    docstrings: &'a [DocstringDelimiters],
}

impl<'a> Normalizer<'a> {
    pub fn new(
        engine: &'a dyn SyntaxEngine,
        syntax: &'a SyntaxId,
        tab_width: usize,
        docstrings: &'a [DocstringDelimiters],
    ) -> Self {
        Self {
            engine,
            syntax,
            tab_width: tab_width.max(1),
            docstrings,
        }
    }

    pub fn normalize(
        &self,
        comment: &mut TaggedText,
    ) {
        strip_carriage_returns(comment);
        expand_tabs(comment, self.tab_width);
        trim_blank_lines(comment);
        dedent(comment);
        if strip_docstring(comment, self.docstrings) {
            trace!(syntax = %self.syntax.name, "stripped block doc comment");
        } else {
            strip_line_comments(comment, self.engine, self.syntax);
        }
        trim_blank_lines(comment);
        dedent(comment);
    }
}

/// Owned-value form of [`Normalizer::normalize`].
pub fn normalize(
    mut comment: TaggedText,
    engine: &dyn SyntaxEngine,
    syntax: &SyntaxId,
    tab_width: usize,
    docstrings: &[DocstringDelimiters],
) -> TaggedText {
    Normalizer::new(engine, syntax, tab_width, docstrings).normalize(&mut comment);
    comment
}

/// Turns CRLF line breaks into plain newlines.
pub(crate) fn strip_carriage_returns(comment: &mut TaggedText) {
    let mut from = 0usize;
    while let Some(found) = comment.text().get(from..).and_then(|rest| rest.find("\r\n")) {
        let at = from + found;
        comment.remove(at, 1);
        from = at + 1;
    }
}

/// Replaces every tab with `tab_width` spaces.
pub(crate) fn expand_tabs(
    comment: &mut TaggedText,
    tab_width: usize,
) {
    let spaces = " ".repeat(tab_width);
    let mut from = 0usize;
    while let Some(found) = comment.text().get(from..).and_then(|rest| rest.find('\t')) {
        let at = from + found;
        comment.splice(Span::new(at, at + 1), &spaces);
        from = at + spaces.len();
    }
}

/// Drops blank leading lines and all trailing whitespace.
pub(crate) fn trim_blank_lines(comment: &mut TaggedText) {
    let kept = comment.text().trim_end().len();
    comment.remove(kept, comment.len() - kept);

    let Some(first) = comment.text().find(|c: char| !c.is_whitespace()) else {
        comment.clear();
        return;
    };
    let line_start = comment.text()[..first].rfind('\n').map_or(0, |nl| nl + 1);
    comment.remove(0, line_start);
}

/// Strips the indentation shared by all non-blank lines.
pub(crate) fn dedent(comment: &mut TaggedText) {
    let lines = LineIndex::new(comment.text());
    let spans: Vec<Span> = (0..lines.line_count()).filter_map(|row| lines.line_span(row)).collect();
    let common = spans
        .iter()
        .map(|span| comment.substr(*span))
        .filter(|line| !line.trim().is_empty())
        .map(indent_width)
        .min()
        .unwrap_or(0);
    if common == 0 {
        return;
    }
    for span in spans.iter().rev() {
        let strip = indent_width(comment.substr(*span)).min(common);
        comment.remove(span.start, strip);
    }
}

fn indent_width(line: &str) -> usize {
    line.len() - line.trim_start_matches([' ', '\t']).len()
}

/// Removes the delimiters of the first matching block doc-comment form.
/// Returns `false` (leaving the comment untouched) when no form matches.
pub(crate) fn strip_docstring(
    comment: &mut TaggedText,
    forms: &[DocstringDelimiters],
) -> bool {
    let text = comment.text();
    let Some(form) = forms
        .iter()
        .find(|f| text.len() >= f.start.len() + f.end.len() && text.starts_with(&f.start) && text.ends_with(&f.end))
    else {
        return false;
    };

    let mut end_at = comment.len() - form.end.len();
    if end_at > form.start.len() && comment.text()[..end_at].ends_with([' ', '\t']) {
        end_at -= 1;
    }
    comment.remove(end_at, comment.len() - end_at);

    if let Some(mid) = form.mid.as_deref() {
        let lines = LineIndex::new(comment.text());
        for row in (1..lines.line_count()).rev() {
            let Some(span) = lines.line_span(row) else { continue };
            let line = comment.substr(span);
            let body = line.trim_start_matches([' ', '\t']);
            if let Some(after) = body.strip_prefix(mid) {
                let cut = line.len() - body.len() + mid.len() + usize::from(after.starts_with([' ', '\t']));
                comment.remove(span.start, cut);
            }
        }
    }

    let after_start = comment.text().get(form.start.len()..).unwrap_or("");
    let cut = form.start.len() + usize::from(after_start.starts_with([' ', '\t']));
    comment.remove(0, cut);
    true
}

/// Toggles the line comment marker off each line. A line the toggle would
/// comment out instead is left as it was.
pub(crate) fn strip_line_comments(
    comment: &mut TaggedText,
    engine: &dyn SyntaxEngine,
    syntax: &SyntaxId,
) {
    let lines = LineIndex::new(comment.text());
    for row in (0..lines.line_count()).rev() {
        let Some(span) = lines.line_span(row) else { continue };
        let line = comment.substr(span);
        let toggled = engine.toggle_line_comment(syntax, line);
        if toggled.len() >= line.len() {
            continue;
        }
        let (front, back) = common_affixes(line, &toggled);
        let removed = Span::new(span.start + front, span.end - back);
        let replacement = toggled[front..toggled.len() - back].to_string();
        comment.splice(removed, &replacement);
    }
}

/// Byte lengths of the longest common prefix and (non-overlapping) suffix.
fn common_affixes(
    a: &str,
    b: &str,
) -> (usize, usize) {
    let front: usize = a.chars().zip(b.chars()).take_while(|(x, y)| x == y).map(|(x, _)| x.len_utf8()).sum();
    let back: usize = a[front..]
        .chars()
        .rev()
        .zip(b[front..].chars().rev())
        .take_while(|(x, y)| x == y)
        .map(|(x, _)| x.len_utf8())
        .sum();
    (front, back)
}

#[cfg(test)]
#[path = "../tests/src/normalize_tests.rs"]
mod tests;
