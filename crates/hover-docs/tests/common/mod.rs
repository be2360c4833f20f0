#![allow(dead_code)]

use std::path::Path;

use hover_docs::{
    BuiltinSyntax, Candidate, JsonSymbolIndex, MemoryWorkspace, SourceLocation, SyntaxEngine, TaggedText, View,
};

/// In-memory project: every file is readable, none is open.
pub fn project(files: &[(&str, &str)]) -> MemoryWorkspace {
    let mut workspace = MemoryWorkspace::new();
    for (path, text) in files {
        workspace.add_file(*path, *text);
    }
    workspace
}

/// Definition-kind index entries `(name, path, line, column)`.
pub fn definitions(entries: &[(&str, &str, usize, usize)]) -> JsonSymbolIndex {
    let index = JsonSymbolIndex::new();
    for (name, path, line, column) in entries {
        index.insert(*name, Candidate::definition(SourceLocation::new(*path, *line, *column)));
    }
    index
}

pub fn tagged(
    path: &str,
    text: &str,
) -> TaggedText {
    let engine = BuiltinSyntax::new();
    let syntax = engine.detect(Path::new(path)).expect("fixture path has a known extension");
    TaggedText::with_runs(text, engine.tokenize(&syntax, text))
}

pub fn view(
    path: &str,
    text: &str,
) -> View {
    View::new(path, tagged(path, text))
}

/// 1-based line and column of the first `needle`.
pub fn position_of(
    source: &str,
    needle: &str,
) -> (usize, usize) {
    position_of_nth(source, needle, 0)
}

pub fn position_of_nth(
    source: &str,
    needle: &str,
    nth: usize,
) -> (usize, usize) {
    let absolute = offset_of_nth(source, needle, nth);
    let before = &source[..absolute];
    let line = before.bytes().filter(|&b| b == b'\n').count() + 1;
    let column = before.rsplit_once('\n').map(|(_, tail)| tail.chars().count()).unwrap_or_else(|| before.chars().count()) + 1;
    (line, column)
}

pub fn offset_of(
    source: &str,
    needle: &str,
) -> usize {
    offset_of_nth(source, needle, 0)
}

pub fn offset_of_nth(
    source: &str,
    needle: &str,
    nth: usize,
) -> usize {
    assert!(!needle.is_empty(), "needle must not be empty");
    let mut from = 0usize;
    let mut current = 0usize;
    loop {
        let Some(idx) = source[from..].find(needle) else {
            panic!("needle not found: {needle}");
        };
        let absolute = from + idx;
        if current == nth {
            return absolute;
        }
        current += 1;
        from = absolute + needle.len();
    }
}
