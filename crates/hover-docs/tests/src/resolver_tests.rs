use std::path::Path;

use super::*;

fn def(path: &str) -> Candidate {
    Candidate::definition(SourceLocation::new(path, 1, 1))
}

fn nothing_open(_: &Path) -> bool {
    false
}

#[test]
fn references_only_is_not_found() {
    let candidates = vec![Candidate::reference(SourceLocation::new("/p/a.py", 1, 1))];
    let err = resolve("foo", &candidates, Path::new("/p/b.py"), nothing_open).expect_err("no definitions");
    assert!(matches!(err, DocError::NotFound { symbol } if symbol == "foo"));
}

#[test]
fn empty_candidates_is_not_found() {
    assert!(resolve("foo", &[], Path::new("/p/b.py"), nothing_open).is_err());
}

#[test]
fn same_file_beats_everything() {
    let candidates = vec![def("/p/x/a.py"), def("/p/b.py"), def("/p/c.py")];
    let chosen = resolve("foo", &candidates, Path::new("/p/b.py"), |p| p == Path::new("/p/c.py")).expect("resolved");
    assert_eq!(chosen.path, Path::new("/p/b.py"));
}

#[test]
fn open_files_beat_closer_paths() {
    let candidates = vec![def("/p/near.py"), def("/far/away/open.py")];
    let chosen =
        resolve("foo", &candidates, Path::new("/p/b.py"), |p| p == Path::new("/far/away/open.py")).expect("resolved");
    assert_eq!(chosen.path, Path::new("/far/away/open.py"));
}

#[test]
fn same_extension_beats_closer_paths() {
    let candidates = vec![def("/p/near.h"), def("/q/r/far.c")];
    let chosen = resolve("foo", &candidates, Path::new("/p/main.c"), nothing_open).expect("resolved");
    assert_eq!(chosen.path, Path::new("/q/r/far.c"));
}

#[test]
fn filter_that_removes_everything_is_skipped() {
    let candidates = vec![def("/p/a/one.h"), def("/p/two.h")];
    let chosen = resolve("foo", &candidates, Path::new("/p/main.c"), nothing_open).expect("resolved");
    assert_eq!(chosen.path, Path::new("/p/two.h"));
}

#[test]
fn symmetric_distance_prefers_sibling_over_deep_cousin() {
    let origin = Path::new("/a/b/x/f.py");
    let candidates = vec![def("/a/c/d/e/g.py"), def("/a/b/y/g.py")];
    let chosen = resolve("foo", &candidates, origin, nothing_open).expect("resolved");
    assert_eq!(chosen.path, Path::new("/a/b/y/g.py"));
}

#[test]
fn distance_ties_keep_index_order() {
    let origin = Path::new("/a/b/f.py");
    let candidates = vec![def("/a/c/first.py"), def("/a/d/second.py")];
    let chosen = resolve("foo", &candidates, origin, nothing_open).expect("resolved");
    assert_eq!(chosen.path, Path::new("/a/c/first.py"));
}

#[test]
fn same_file_wins_regardless_of_order() {
    let origin = Path::new("/p/b.py");
    let base = vec![def("/p/a.py"), def("/p/b.py"), def("/q/c.py"), def("/p/d/e.py")];
    for rotation in 0..base.len() {
        let mut candidates = base.clone();
        candidates.rotate_left(rotation);
        let chosen = resolve("foo", &candidates, origin, nothing_open).expect("resolved");
        assert_eq!(chosen.path, origin);
    }
}

#[test]
fn resolution_is_deterministic() {
    let origin = Path::new("/w/src/main.rs");
    let candidates = vec![def("/w/lib/a.rs"), def("/w/src/util/b.rs"), def("/w/src/c.rs")];
    let first = resolve("foo", &candidates, origin, nothing_open).expect("resolved");
    for _ in 0..10 {
        assert_eq!(resolve("foo", &candidates, origin, nothing_open).expect("resolved"), first);
    }
    assert_eq!(first.path, Path::new("/w/src/c.rs"));
}

#[test]
fn path_distance_counts_both_sides() {
    let dirs = |p: &'static str| directories(Path::new(p));
    assert_eq!(path_distance(&dirs("/a/b/x/f.py"), &dirs("/a/b/y/g.py")), 2);
    assert_eq!(path_distance(&dirs("/a/b/x/f.py"), &dirs("/a/g.py")), 2);
    assert_eq!(path_distance(&dirs("/a/b/x/f.py"), &dirs("/c/g.py")), 4);
    assert_eq!(path_distance(&dirs("/a/b/f.py"), &dirs("/a/b/g.py")), 0);
}
