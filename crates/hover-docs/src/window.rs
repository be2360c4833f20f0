//! Materializes the text around a definition site together with its tags.
//!
//! An open buffer is read in place. Anything else is read from the workspace
//! (whole when small, a window of lines around the target otherwise) and
//! tokenized into the caller's scratch buffer.

use std::path::Path;

use tracing::debug;

use crate::config::ExtractionSettings;
use crate::error::DocError;
use crate::host::{ReadExtent, Workspace};
use crate::location::SourceLocation;
use crate::syntax::{SyntaxEngine, SyntaxId};
use crate::text::{LineIndex, Span, TaggedText};

/// A loaded definition site. Spans index into `buffer`.
#[derive(Debug)]
pub struct LoadedWindow<'a> {
    pub buffer: &'a TaggedText,
    pub syntax: SyntaxId,
    pub symbol: Span,
    pub symbol_line: Span,
    /// Empty when the symbol is on the first loaded line.
    pub line_before: Span,
    /// Empty when the symbol is on the last loaded line.
    pub line_after: Span,
    /// Whether `buffer` is the caller's scratch buffer.
    pub materialized: bool,
}

pub fn load<'a, W>(
    workspace: &'a W,
    engine: &dyn SyntaxEngine,
    scratch: &'a mut TaggedText,
    location: &SourceLocation,
    symbol: &str,
    settings: &ExtractionSettings,
) -> Result<LoadedWindow<'a>, DocError>
where
    W: Workspace + ?Sized,
{
    let path = location.path.as_path();

    if let Some(open) = workspace.snapshot(path) {
        let syntax = engine.detect(path).or_else(|| root_syntax(open)).ok_or_else(|| DocError::NoSyntax {
            path: path.to_path_buf(),
        })?;
        debug!(path = %path.display(), syntax = %syntax.name, "reading open buffer");
        return locate(open, syntax, location.line, location, symbol, false);
    }

    let syntax = engine.detect(path).ok_or_else(|| DocError::NoSyntax {
        path: path.to_path_buf(),
    })?;
    let extent = read_extent(workspace, path, location, settings)?;
    let file = workspace.read_text(path, extent).map_err(|source| DocError::io(path, source))?;
    debug!(
        path = %path.display(),
        syntax = %syntax.name,
        first_row = file.first_row,
        bytes = file.text.len(),
        "materialized window"
    );

    let runs = engine.tokenize(&syntax, &file.text);
    scratch.assign(file.text, runs);
    let row = location.line.checked_sub(file.first_row).filter(|row| *row > 0).ok_or(DocError::OutOfRange {
        row: location.line,
        column: location.column,
    })?;
    locate(scratch, syntax, row, location, symbol, true)
}

fn read_extent<W>(
    workspace: &W,
    path: &Path,
    location: &SourceLocation,
    settings: &ExtractionSettings,
) -> Result<ReadExtent, DocError>
where
    W: Workspace + ?Sized,
{
    let len = workspace.file_len(path).map_err(|source| DocError::io(path, source))?;
    if len < settings.full_load_threshold_bytes() {
        return Ok(ReadExtent::All);
    }
    Ok(ReadExtent::Around {
        row: location.line.saturating_sub(1),
        radius: settings.window_radius,
    })
}

/// Computes the symbol and neighbouring line spans for the 1-based `row` of
/// `buffer`.
fn locate<'a>(
    buffer: &'a TaggedText,
    syntax: SyntaxId,
    row: usize,
    location: &SourceLocation,
    symbol: &str,
    materialized: bool,
) -> Result<LoadedWindow<'a>, DocError> {
    let out_of_range = || DocError::OutOfRange {
        row: location.line,
        column: location.column,
    };
    let lines = LineIndex::new(buffer.text());
    let start = lines.offset_of(buffer.text(), row, location.column).ok_or_else(out_of_range)?;
    let symbol_line = lines.line_span(row - 1).ok_or_else(out_of_range)?;
    let end = (start + symbol.len()).min(buffer.len());
    let line_before = row.checked_sub(2).and_then(|prev| lines.line_span(prev)).unwrap_or_default();
    let line_after = lines.line_span(row).unwrap_or_default();

    Ok(LoadedWindow {
        buffer,
        syntax,
        symbol: Span::new(start, end),
        symbol_line,
        line_before,
        line_after,
        materialized,
    })
}

/// Syntax named by the root tag of an already-tagged buffer (`source.python`).
fn root_syntax(buffer: &TaggedText) -> Option<SyntaxId> {
    let root = buffer.runs().first()?.tags.first()?;
    let name = root.strip_prefix("source.")?;
    (!name.is_empty()).then(|| SyntaxId::new(name))
}

#[cfg(test)]
#[path = "../tests/src/window_tests.rs"]
mod tests;
