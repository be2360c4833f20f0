use std::path::Path;

use super::*;
use crate::location::{SourceLocation, SymbolKind};

#[test]
fn json_index_lookup() {
    let json = r#"{
        "foo": [
            {"path": "/proj/a.py", "line": 10, "column": 5, "kind": "definition"},
            {"path": "/proj/b.py", "line": 3, "column": 1, "kind": "reference"}
        ],
        "bar": [{"path": "/proj/c.py", "line": 1, "column": 5}]
    }"#;
    let index = JsonSymbolIndex::from_json_str(json).expect("valid index json");
    assert_eq!(index.len(), 2);

    let foo = index.lookup("foo");
    assert_eq!(foo.len(), 2);
    assert_eq!(foo[0].location, SourceLocation::new("/proj/a.py", 10, 5));
    assert_eq!(foo[1].kind, SymbolKind::Reference);

    let bar = index.lookup("bar");
    assert_eq!(bar[0].kind, SymbolKind::Definition);
    assert!(index.lookup("missing").is_empty());
}

#[test]
fn json_index_rejects_malformed_input() {
    assert!(JsonSymbolIndex::from_json_str("[1, 2]").is_err());
}

#[test]
fn memory_workspace_reads_windows() {
    let mut workspace = MemoryWorkspace::new();
    workspace.add_file("/w/f.txt", "l0\nl1\nl2\nl3\nl4\n");

    let all = workspace.read_text(Path::new("/w/f.txt"), ReadExtent::All).expect("file exists");
    assert_eq!(all.first_row, 0);
    assert_eq!(all.text.lines().count(), 5);

    let window = workspace
        .read_text(Path::new("/w/f.txt"), ReadExtent::Around {
            row: 2,
            radius: 1,
        })
        .expect("file exists");
    assert_eq!(window.first_row, 1);
    assert_eq!(window.text, "l1\nl2\nl3\n");

    let head = workspace
        .read_text(Path::new("/w/f.txt"), ReadExtent::Around {
            row: 0,
            radius: 1,
        })
        .expect("file exists");
    assert_eq!(head.first_row, 0);
    assert_eq!(head.text, "l0\nl1\n");
}

#[test]
fn memory_workspace_missing_file_is_not_found() {
    let workspace = MemoryWorkspace::new();
    let err = workspace.file_len(Path::new("/nope")).expect_err("missing file");
    assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
}

#[test]
fn open_buffers_are_snapshots() {
    let mut workspace = MemoryWorkspace::new();
    assert!(!workspace.is_open(Path::new("/w/a.py")));
    workspace.open_buffer("/w/a.py", TaggedText::untagged("x = 1\n"));
    assert!(workspace.is_open(Path::new("/w/a.py")));
    assert_eq!(workspace.snapshot(Path::new("/w/a.py")).map(TaggedText::text), Some("x = 1\n"));
}

#[test]
fn fs_workspace_forgets_closed_buffers() {
    let mut workspace = FsWorkspace::new();
    let path = Path::new("/w/open.rs");
    workspace.open_buffer(path, TaggedText::untagged("fn a() {}\n"));
    assert!(workspace.is_open(path));
    assert_eq!(workspace.snapshot(path).map(TaggedText::text), Some("fn a() {}\n"));

    workspace.close_buffer(path);
    assert!(!workspace.is_open(path));
    assert!(workspace.snapshot(path).is_none());
}

#[test]
fn fs_workspace_reads_window_from_disk() {
    let dir = std::env::temp_dir().join(format!("hover-docs-host-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join("lines.txt");
    let body: String = (0..50).map(|i| format!("line {i}\n")).collect();
    std::fs::write(&path, &body).expect("write fixture");

    let workspace = FsWorkspace::new();
    assert_eq!(workspace.file_len(&path).expect("metadata"), body.len() as u64);
    let window = workspace
        .read_text(&path, ReadExtent::Around {
            row: 20,
            radius: 2,
        })
        .expect("read window");
    assert_eq!(window.first_row, 18);
    assert_eq!(window.text, "line 18\nline 19\nline 20\nline 21\nline 22\n");

    let _ = std::fs::remove_dir_all(&dir);
}
