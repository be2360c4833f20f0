use super::*;
use crate::config::ExtractionSettings;
use crate::host::MemoryWorkspace;
use crate::location::SourceLocation;
use crate::syntax::{BuiltinSyntax, SyntaxId};
use crate::text::{TagRun, Tags};
use crate::window::load;

fn extract_from(
    path: &str,
    source: &str,
    line: usize,
    column: usize,
    symbol: &str,
    merge: bool,
) -> (String, String) {
    let mut workspace = MemoryWorkspace::new();
    workspace.add_file(path, source);
    let engine = BuiltinSyntax::new();
    let mut scratch = TaggedText::new();
    let location = SourceLocation::new(path, line, column);
    let window =
        load(&workspace, &engine, &mut scratch, &location, symbol, &ExtractionSettings::default()).expect("window loads");
    let found = extract(&engine, &window, merge);
    (window.buffer.substr(found.definition).to_string(), window.buffer.substr(found.comment).to_string())
}

#[test]
fn python_definition_with_docstring_below() {
    let source = "def add(a, b):\n    \"\"\"Adds.\"\"\"\n    return a + b\n";
    let (definition, comment) = extract_from("/p/m.py", source, 1, 5, "add", true);
    assert_eq!(definition, "add(a, b)");
    assert_eq!(comment, "    \"\"\"Adds.\"\"\"");
}

#[test]
fn preceding_comment_wins_over_following_one() {
    let source = "    # above\n    def f(x):\n    # below\n";
    let (_, comment) = extract_from("/p/m.py", source, 2, 9, "f", true);
    assert_eq!(comment, "    # above\n");
}

#[test]
fn own_line_comment_is_not_indentation_absorbed() {
    let source = "int limit = 4; // upper bound\n";
    let (definition, comment) = extract_from("/p/m.c", source, 1, 5, "limit", true);
    assert_eq!(definition, "limit");
    assert_eq!(comment, "// upper bound\n");
}

#[test]
fn block_comment_above_c_function() {
    let source = "/**\n * Adds two ints.\n */\nint add(int a, int b) {\n    return a + b;\n}\n";
    let (definition, comment) = extract_from("/p/m.c", source, 4, 5, "add", true);
    assert_eq!(definition, "add(int a, int b)");
    assert_eq!(comment, "/**\n * Adds two ints.\n */");
}

#[test]
fn comment_inside_parameter_list_is_only_the_comment() {
    let source = "def f(a,  # the a\n      b):\n    pass\n";
    let (definition, comment) = extract_from("/p/m.py", source, 1, 5, "f", true);
    assert_eq!(definition, "f(a,  # the a\n      b)");
    assert_eq!(comment, "# the a\n");

    let source = "def f(\n    a,  # the a\n    b,\n):\n";
    let (_, comment) = extract_from("/p/m.py", source, 1, 5, "f", true);
    assert_eq!(comment, "# the a\n");
}

#[test]
fn merges_indented_line_comments_of_one_block() {
    let source = "class A:\n    # first\n    # second\n    def m(self):\n        pass\n";
    let (_, merged) = extract_from("/p/m.py", source, 4, 9, "m", true);
    assert_eq!(merged, "    # first\n    # second\n");
    let (_, single) = extract_from("/p/m.py", source, 4, 9, "m", false);
    assert_eq!(single, "    # second\n");
}

#[test]
fn merge_stops_at_code_and_other_comment_kinds() {
    let source = "x = 1  # trailing\n/* block */\n// one\n// two\nvoid g(void);\n";
    let (_, comment) = extract_from("/p/m.c", source, 5, 6, "g", true);
    assert_eq!(comment, "// one\n// two\n");
}

#[test]
fn no_comment_gives_empty_span() {
    let source = "\ndef lonely():\n\n";
    let mut workspace = MemoryWorkspace::new();
    workspace.add_file("/p/m.py", source);
    let engine = BuiltinSyntax::new();
    let mut scratch = TaggedText::new();
    let location = SourceLocation::new("/p/m.py", 2, 5);
    let window =
        load(&workspace, &engine, &mut scratch, &location, "lonely", &ExtractionSettings::default()).expect("loads");
    let found = extract(&engine, &window, true);
    assert_eq!(found.comment, Span::empty());
    assert_eq!(window.buffer.substr(found.definition), "lonely()");
}

#[test]
fn following_line_is_not_consulted_when_previous_has_comment() {
    let source = "// about f\nvoid f(int x);\n// about g\n";
    let (_, comment) = extract_from("/p/m.c", source, 2, 6, "f", true);
    assert_eq!(comment, "// about f\n");
}

#[test]
fn parameter_expansion_reaches_end_of_parameter_scope() {
    let syntax = SyntaxId::new("demo");
    let root = Tags::new(vec![syntax.scope.clone()]);
    let params = Tags::new(vec![syntax.scope.clone(), "meta.function.parameters.demo".to_string()]);
    let text = "name(123456789a) rest";
    let buffer = TaggedText::with_runs(text, vec![
        TagRun::new(0, 4, root.clone()),
        TagRun::new(4, 16, params),
        TagRun::new(16, text.len(), root),
    ]);
    let span = definition_span(&buffer, Span::new(0, 4));
    assert!(span.end >= 4 + 12);
    assert_eq!(buffer.substr(span), "name(123456789a)");
}

#[test]
fn expansion_without_parameter_tags_keeps_symbol() {
    let buffer = TaggedText::untagged("value = 3");
    assert_eq!(definition_span(&buffer, Span::new(0, 5)), Span::new(0, 5));
}
