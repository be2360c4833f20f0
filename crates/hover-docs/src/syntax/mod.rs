//! Syntax capability consumed by the doc pipeline.
//!
//! Tags follow the dotted scope naming used by TextMate/Sublime grammars. The
//! pipeline only relies on the substrings below, so any engine whose scope
//! names contain them can be plugged in.

mod builtin;
mod lexer;

use std::path::Path;

pub use builtin::BuiltinSyntax;

use crate::text::{Span, TagRun, TaggedText};

/// Present in every tag of a comment region.
pub const COMMENT_MARKER: &str = "comment";
/// Present in every tag covering a definition's parameter list.
pub const PARAMETERS_MARKER: &str = "parameters";
/// Present in the tag of a symbol's defining name.
pub const DEFINITION_NAME_MARKER: &str = "entity.name";
/// Wrapper scopes that group other scopes without being a region of their own.
const META_PREFIX: &str = "meta.";

/// A resolved syntax: `name` keys the per-syntax settings (`python`, `rust`),
/// `scope` is the root tag of every run (`source.python`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SyntaxId {
    pub name: String,
    pub scope: String,
}

impl SyntaxId {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let scope = format!("source.{name}");
        Self {
            name,
            scope,
        }
    }
}

pub trait SyntaxEngine {
    /// Pick a syntax for `path`, `None` when no tokenizer applies.
    fn detect(
        &self,
        path: &Path,
    ) -> Option<SyntaxId>;

    /// Tag table for `text`. Runs need not be merged but must be sorted.
    fn tokenize(
        &self,
        syntax: &SyntaxId,
        text: &str,
    ) -> Vec<TagRun>;

    /// Toggle the single-line comment marker of one line (no newline).
    fn toggle_line_comment(
        &self,
        syntax: &SyntaxId,
        line: &str,
    ) -> String;

    /// Full contiguous scope region containing `offset`.
    ///
    /// The region is the extent of the outermost tag below the syntax root,
    /// skipping `meta.*` wrappers such as a parameter list around a comment.
    fn extract_scope(
        &self,
        buffer: &TaggedText,
        offset: usize,
    ) -> Option<Span> {
        let tags = buffer.tags_at(offset)?;
        let tag = tags
            .iter()
            .skip(1)
            .find(|tag| !tag.starts_with(META_PREFIX))
            .or_else(|| tags.iter().nth(1))
            .or_else(|| tags.first())?;
        buffer.scope_extent(offset, tag)
    }
}

/// Spans of every defining name in `buffer`, for hosts that have no symbol
/// regions of their own.
pub fn definition_regions(buffer: &TaggedText) -> Vec<Span> {
    buffer
        .runs()
        .iter()
        .filter(|run| run.tags.has_marker(DEFINITION_NAME_MARKER))
        .map(|run| run.span)
        .collect()
}

#[cfg(test)]
#[path = "../../tests/src/syntax/builtin_tests.rs"]
mod tests;
