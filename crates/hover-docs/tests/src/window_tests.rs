use super::*;
use crate::host::MemoryWorkspace;
use crate::syntax::BuiltinSyntax;

const SOURCE: &str = "import os\n\n# Adds numbers.\ndef add(a, b):\n    return a + b\n";

fn workspace() -> MemoryWorkspace {
    let mut workspace = MemoryWorkspace::new();
    workspace.add_file("/proj/math.py", SOURCE);
    workspace
}

#[test]
fn loads_small_file_whole() {
    let workspace = workspace();
    let mut scratch = TaggedText::new();
    let location = SourceLocation::new("/proj/math.py", 4, 5);
    let window = load(&workspace, &BuiltinSyntax::new(), &mut scratch, &location, "add", &ExtractionSettings::default())
        .expect("window loads");

    assert!(window.materialized);
    assert_eq!(window.syntax.name, "python");
    assert_eq!(window.buffer.text(), SOURCE);
    assert_eq!(window.buffer.substr(window.symbol), "add");
    assert_eq!(window.buffer.substr(window.symbol_line), "def add(a, b):");
    assert_eq!(window.buffer.substr(window.line_before), "# Adds numbers.");
    assert_eq!(window.buffer.substr(window.line_after), "    return a + b");
}

#[test]
fn loads_window_of_large_file() {
    let mut source = String::new();
    for i in 0..400 {
        source.push_str(&format!("x{i} = {i}\n"));
    }
    source.push_str("def target():\n    pass\n");
    let mut workspace = MemoryWorkspace::new();
    workspace.add_file("/proj/big.py", source);

    let settings = ExtractionSettings {
        full_load_threshold_kb: 1,
        window_radius: 3,
        ..ExtractionSettings::default()
    };
    let mut scratch = TaggedText::new();
    let location = SourceLocation::new("/proj/big.py", 401, 5);
    let window =
        load(&workspace, &BuiltinSyntax::new(), &mut scratch, &location, "target", &settings).expect("window loads");

    assert_eq!(window.buffer.text().lines().count(), 5);
    assert!(window.buffer.text().starts_with("x397 = 397\n"));
    assert_eq!(window.buffer.substr(window.symbol), "target");
    assert_eq!(window.buffer.substr(window.line_before), "x399 = 399");
}

#[test]
fn reads_open_buffer_without_touching_scratch() {
    let engine = BuiltinSyntax::new();
    let mut workspace = workspace();
    let syntax = SyntaxId::new("python");
    let open = TaggedText::with_runs(SOURCE, engine.tokenize(&syntax, SOURCE));
    workspace.open_buffer("/proj/math.py", open);

    let mut scratch = TaggedText::new();
    let location = SourceLocation::new("/proj/math.py", 4, 5);
    let window =
        load(&workspace, &engine, &mut scratch, &location, "add", &ExtractionSettings::default()).expect("window loads");
    assert!(!window.materialized);
    assert_eq!(window.buffer.substr(window.symbol), "add");
    drop(window);
    assert!(scratch.is_empty());
}

#[test]
fn first_line_has_no_line_before() {
    let mut workspace = MemoryWorkspace::new();
    workspace.add_file("/proj/one.py", "def only():\n    pass");
    let mut scratch = TaggedText::new();
    let location = SourceLocation::new("/proj/one.py", 1, 5);
    let window = load(&workspace, &BuiltinSyntax::new(), &mut scratch, &location, "only", &ExtractionSettings::default())
        .expect("window loads");
    assert!(window.line_before.is_empty());
    assert_eq!(window.buffer.substr(window.line_after), "    pass");
}

#[test]
fn unknown_extension_is_no_syntax() {
    let mut workspace = MemoryWorkspace::new();
    workspace.add_file("/proj/data.bin", "foo");
    let mut scratch = TaggedText::new();
    let location = SourceLocation::new("/proj/data.bin", 1, 1);
    let err = load(&workspace, &BuiltinSyntax::new(), &mut scratch, &location, "foo", &ExtractionSettings::default())
        .expect_err("no syntax");
    assert!(matches!(err, DocError::NoSyntax { .. }));
}

#[test]
fn row_past_end_is_out_of_range() {
    let workspace = workspace();
    let mut scratch = TaggedText::new();
    let location = SourceLocation::new("/proj/math.py", 40, 1);
    let err = load(&workspace, &BuiltinSyntax::new(), &mut scratch, &location, "add", &ExtractionSettings::default())
        .expect_err("out of range");
    assert!(matches!(err, DocError::OutOfRange { row: 40, column: 1 }));
}

#[test]
fn missing_file_is_io_error() {
    let workspace = MemoryWorkspace::new();
    let mut scratch = TaggedText::new();
    let location = SourceLocation::new("/proj/gone.py", 1, 1);
    let err = load(&workspace, &BuiltinSyntax::new(), &mut scratch, &location, "x", &ExtractionSettings::default())
        .expect_err("io error");
    assert!(matches!(err, DocError::Io { .. }));
    assert!(!err.is_expected());
}
