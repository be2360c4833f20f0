//! Picks one definition out of the index's candidates for a symbol.
//!
//! Filters run in a fixed order and each one only narrows the set if at least
//! one candidate survives it:
//!
//! 1. definition-kind entries only (none left is `NotFound`)
//! 2. entries in the origin file
//! 3. entries in files the host has open
//! 4. entries sharing the origin file's extension
//! 5. ascending path distance, stable on ties
//!
//! Path distance is symmetric: the number of directory steps from the origin
//! file's directory up to the common ancestor plus the steps down to the
//! candidate's directory. `/a/b/x/f.py` to `/a/b/y/g.py` is 2, to `/a/g.py` is 2,
//! to `/c/g.py` is 4.

use std::path::{Component, Path};

use tracing::debug;

use crate::error::DocError;
use crate::location::{Candidate, SourceLocation};

pub fn resolve(
    symbol: &str,
    candidates: &[Candidate],
    origin: &Path,
    is_open: impl Fn(&Path) -> bool,
) -> Result<SourceLocation, DocError> {
    let mut survivors: Vec<&Candidate> = candidates.iter().filter(|c| c.is_definition()).collect();
    if survivors.is_empty() {
        debug!(symbol, total = candidates.len(), "no definition-kind candidates");
        return Err(DocError::NotFound {
            symbol: symbol.to_string(),
        });
    }

    narrow(&mut survivors, |c| c.location.is_in(origin));
    narrow(&mut survivors, |c| is_open(&c.location.path));
    if let Some(ext) = origin.extension() {
        narrow(&mut survivors, |c| c.location.path.extension() == Some(ext));
    }

    let origin_dirs = directories(origin);
    survivors.sort_by_key(|c| path_distance(&origin_dirs, &directories(&c.location.path)));

    let chosen = survivors[0].location.clone();
    debug!(symbol, remaining = survivors.len(), path = %chosen.path.display(), line = chosen.line, "resolved definition");
    Ok(chosen)
}

/// Keeps only the candidates matching `keep`, unless none do.
fn narrow(
    candidates: &mut Vec<&Candidate>,
    keep: impl Fn(&Candidate) -> bool,
) {
    if candidates.iter().any(|c| keep(c)) {
        candidates.retain(|c| keep(c));
    }
}

/// Directory components of `path`, root first, file name excluded.
fn directories(path: &Path) -> Vec<Component<'_>> {
    path.parent().map(|dir| dir.components().collect()).unwrap_or_default()
}

fn path_distance(
    origin: &[Component<'_>],
    candidate: &[Component<'_>],
) -> usize {
    let shared = origin.iter().zip(candidate).take_while(|(a, b)| a == b).count();
    (origin.len() - shared) + (candidate.len() - shared)
}

#[cfg(test)]
#[path = "../tests/src/resolver_tests.rs"]
mod tests;
