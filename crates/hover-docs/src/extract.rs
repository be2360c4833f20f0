//! Finds the definition text and its comment inside a loaded window.

use tracing::trace;

use crate::syntax::{COMMENT_MARKER, PARAMETERS_MARKER, SyntaxEngine};
use crate::text::{LineIndex, Span, TaggedText};
use crate::window::LoadedWindow;

/// Spans into the window buffer. Either may be empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Extraction {
    pub definition: Span,
    pub comment: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Own,
    Before,
    After,
}

pub fn extract(
    engine: &dyn SyntaxEngine,
    window: &LoadedWindow<'_>,
    merge_adjacent_line_comments: bool,
) -> Extraction {
    let buffer = window.buffer;
    let definition = definition_span(buffer, window.symbol);

    let mut comment = Span::empty();
    let scan = [(Side::Own, window.symbol_line), (Side::Before, window.line_before), (Side::After, window.line_after)];
    for (side, line) in scan {
        comment = comment_on_line(engine, buffer, line);
        if comment.is_empty() {
            continue;
        }
        trace!(?side, start = comment.start, end = comment.end, "comment found");
        if merge_adjacent_line_comments && side != Side::Own {
            comment = merge_adjacent(engine, buffer, comment, side);
        }
        comment = absorb_indentation(buffer, comment);
        break;
    }

    Extraction {
        definition,
        comment,
    }
}

/// The symbol plus the parameter list that directly follows it.
pub fn definition_span(
    buffer: &TaggedText,
    symbol: Span,
) -> Span {
    let Some(tags) = buffer.tags_at(symbol.end) else {
        return symbol;
    };
    let prefixes: Vec<String> = tags
        .iter()
        .filter_map(|tag| tag.find(PARAMETERS_MARKER).map(|at| tag[..at + PARAMETERS_MARKER.len()].to_string()))
        .collect();
    if prefixes.is_empty() {
        return symbol;
    }
    let expanded = expand_to_prefixes(buffer, symbol.end, &prefixes);
    Span::new(symbol.start, symbol.end.max(expanded.end))
}

/// Region around `point` whose tags start with one of `prefixes`, found by
/// walking left from `point - 1` and right from `point`.
pub fn expand_to_prefixes(
    buffer: &TaggedText,
    point: usize,
    prefixes: &[String],
) -> Span {
    let matches = |offset: usize| buffer.tags_at(offset).is_some_and(|tags| tags.matches_any_prefix(prefixes));

    let mut start = point;
    while start > 0 && matches(start - 1) {
        start -= 1;
    }
    let mut end = point;
    while end < buffer.len() && matches(end) {
        end += 1;
    }
    Span::new(start, end)
}

/// Union of the scope regions of every comment run on `line`.
fn comment_on_line(
    engine: &dyn SyntaxEngine,
    buffer: &TaggedText,
    line: Span,
) -> Span {
    let mut found = Span::empty();
    if line.is_empty() {
        return found;
    }
    for run in buffer.runs_in(line) {
        if !run.tags.has_marker(COMMENT_MARKER) {
            continue;
        }
        let first = line.start + run.span.start;
        let last = line.start + run.span.end - 1;
        let region = [first, last]
            .into_iter()
            .filter_map(|offset| engine.extract_scope(buffer, offset))
            .fold(Span::new(first, last + 1), Span::cover);
        found = found.cover(region);
    }
    found
}

/// Grows a comment found above (below) the symbol line across the run of full
/// comment lines of the same kind directly above (below) it.
fn merge_adjacent(
    engine: &dyn SyntaxEngine,
    buffer: &TaggedText,
    comment: Span,
    side: Side,
) -> Span {
    let lines = LineIndex::new(buffer.text());
    let kind = buffer.tags_at(comment.end.saturating_sub(1));
    let same_kind = |region: Span| buffer.tags_at(region.end.saturating_sub(1)) == kind;
    let mut merged = comment;
    match side {
        Side::Before => {
            let mut row = lines.row_of(merged.start);
            while row > 0 {
                let Some(line) = lines.line_span(row - 1) else { break };
                match full_line_comment(engine, buffer, line) {
                    Some(region) if same_kind(region) => merged = merged.cover(region),
                    _ => break,
                }
                row -= 1;
            }
        },
        Side::After => {
            let mut row = lines.row_of(merged.end.saturating_sub(1));
            while let Some(line) = lines.line_span(row + 1) {
                match full_line_comment(engine, buffer, line) {
                    Some(region) if same_kind(region) => merged = merged.cover(region),
                    _ => break,
                }
                row += 1;
            }
        },
        Side::Own => {},
    }
    merged
}

/// The comment region of `line` when the line holds nothing but a comment.
fn full_line_comment(
    engine: &dyn SyntaxEngine,
    buffer: &TaggedText,
    line: Span,
) -> Option<Span> {
    let text = buffer.substr(line);
    let indent = text.len() - text.trim_start().len();
    if indent == text.len() {
        return None;
    }
    let region = comment_on_line(engine, buffer, line);
    let code_start = line.start + indent;
    let code_end = line.start + text.trim_end().len();
    (region.start <= code_start && region.end >= code_end).then_some(region)
}

/// Moves the start back to the line start when only whitespace precedes it.
fn absorb_indentation(
    buffer: &TaggedText,
    comment: Span,
) -> Span {
    let text = buffer.text();
    let head = text.get(..comment.start).unwrap_or("");
    let line_start = head.rfind('\n').map_or(0, |nl| nl + 1);
    let before = buffer.substr(Span::new(line_start, comment.start));
    if before.chars().all(|c| c == ' ' || c == '\t') {
        Span::new(line_start, comment.end)
    } else {
        comment
    }
}

#[cfg(test)]
#[path = "../tests/src/extract_tests.rs"]
mod tests;
