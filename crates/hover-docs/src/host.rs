//! Capabilities the doc pipeline borrows from its host: the symbol index,
//! file access and open-buffer snapshots, and style lookup.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use dashmap::DashMap;

use crate::location::{Candidate, CandidateSet};
use crate::text::TaggedText;

/// Name to candidate-location lookup, supplied externally.
pub trait SymbolIndex {
    fn lookup(
        &self,
        name: &str,
    ) -> CandidateSet;
}

/// How much of a file to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadExtent {
    All,
    /// `radius` lines either side of the 0-based `row`.
    Around { row: usize, radius: usize },
}

/// Text read from a file. `first_row` is the 0-based file row of the first
/// line in `text`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileText {
    pub text: String,
    pub first_row: usize,
}

pub trait Workspace {
    /// `true` if the host has `path` open in an editor buffer.
    fn is_open(
        &self,
        path: &Path,
    ) -> bool;

    /// Content and tag table of an open buffer. Read-only: the pipeline never
    /// edits a buffer it did not create.
    fn snapshot(
        &self,
        path: &Path,
    ) -> Option<&TaggedText>;

    fn file_len(
        &self,
        path: &Path,
    ) -> io::Result<u64>;

    fn read_text(
        &self,
        path: &Path,
        extent: ReadExtent,
    ) -> io::Result<FileText>;
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Style {
    pub foreground: String,
    pub background: Option<String>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl Style {
    pub fn foreground(color: impl Into<String>) -> Self {
        Self {
            foreground: color.into(),
            ..Self::default()
        }
    }
}

pub trait StyleLookup {
    fn style_for(
        &self,
        tag: &str,
    ) -> Style;

    fn default_style(&self) -> Style;
}

/// Symbol index loaded from JSON of the form
/// `{"name": [{"path": "...", "line": 1, "column": 1, "kind": "definition"}]}`.
#[derive(Debug, Default)]
pub struct JsonSymbolIndex {
    map: DashMap<String, Vec<Candidate>>,
}

impl JsonSymbolIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &self,
        name: impl Into<String>,
        candidate: Candidate,
    ) {
        self.map.entry(name.into()).or_default().push(candidate);
    }

    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        let entries: HashMap<String, Vec<Candidate>> = serde_json::from_str(json)?;
        let index = Self::new();
        for (name, candidates) in entries {
            index.map.insert(name, candidates);
        }
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl SymbolIndex for JsonSymbolIndex {
    fn lookup(
        &self,
        name: &str,
    ) -> CandidateSet {
        self.map.get(name).map(|v| v.clone()).unwrap_or_default()
    }
}

/// Files on disk plus whatever buffers the host registered as open.
#[derive(Debug, Default)]
pub struct FsWorkspace {
    open: HashMap<PathBuf, TaggedText>,
}

impl FsWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_buffer(
        &mut self,
        path: impl Into<PathBuf>,
        buffer: TaggedText,
    ) {
        self.open.insert(path.into(), buffer);
    }

    pub fn close_buffer(
        &mut self,
        path: &Path,
    ) {
        self.open.remove(path);
    }
}

impl Workspace for FsWorkspace {
    fn is_open(
        &self,
        path: &Path,
    ) -> bool {
        self.open.contains_key(path)
    }

    fn snapshot(
        &self,
        path: &Path,
    ) -> Option<&TaggedText> {
        self.open.get(path)
    }

    fn file_len(
        &self,
        path: &Path,
    ) -> io::Result<u64> {
        Ok(std::fs::metadata(path)?.len())
    }

    fn read_text(
        &self,
        path: &Path,
        extent: ReadExtent,
    ) -> io::Result<FileText> {
        match extent {
            ReadExtent::All => Ok(FileText {
                text: std::fs::read_to_string(path)?,
                first_row: 0,
            }),
            ReadExtent::Around {
                row,
                radius,
            } => {
                let (first, last) = window_rows(row, radius);
                let mut reader = BufReader::new(File::open(path)?);
                let mut text = String::new();
                let mut line = String::new();
                let mut current = 0usize;
                while current <= last {
                    line.clear();
                    if reader.read_line(&mut line)? == 0 {
                        break;
                    }
                    if current >= first {
                        text.push_str(&line);
                    }
                    current += 1;
                }
                Ok(FileText {
                    text,
                    first_row: first,
                })
            },
        }
    }
}

/// In-memory files and open buffers, for embedding hosts and tests.
#[derive(Debug, Default)]
pub struct MemoryWorkspace {
    files: HashMap<PathBuf, String>,
    open: HashMap<PathBuf, TaggedText>,
}

impl MemoryWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(
        &mut self,
        path: impl Into<PathBuf>,
        text: impl Into<String>,
    ) {
        self.files.insert(path.into(), text.into());
    }

    pub fn open_buffer(
        &mut self,
        path: impl Into<PathBuf>,
        buffer: TaggedText,
    ) {
        self.open.insert(path.into(), buffer);
    }

    fn file(
        &self,
        path: &Path,
    ) -> io::Result<&str> {
        self.files
            .get(path)
            .map(String::as_str)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{} not found", path.display())))
    }
}

impl Workspace for MemoryWorkspace {
    fn is_open(
        &self,
        path: &Path,
    ) -> bool {
        self.open.contains_key(path)
    }

    fn snapshot(
        &self,
        path: &Path,
    ) -> Option<&TaggedText> {
        self.open.get(path)
    }

    fn file_len(
        &self,
        path: &Path,
    ) -> io::Result<u64> {
        self.file(path).map(|text| text.len() as u64)
    }

    fn read_text(
        &self,
        path: &Path,
        extent: ReadExtent,
    ) -> io::Result<FileText> {
        let text = self.file(path)?;
        match extent {
            ReadExtent::All => Ok(FileText {
                text: text.to_string(),
                first_row: 0,
            }),
            ReadExtent::Around {
                row,
                radius,
            } => {
                let (first, last) = window_rows(row, radius);
                let count = last.saturating_sub(first).saturating_add(1);
                let text = text.split_inclusive('\n').skip(first).take(count).collect();
                Ok(FileText {
                    text,
                    first_row: first,
                })
            },
        }
    }
}

/// Inclusive 0-based row range of a window.
fn window_rows(
    row: usize,
    radius: usize,
) -> (usize, usize) {
    (row.saturating_sub(radius), row.saturating_add(radius))
}

#[cfg(test)]
#[path = "../tests/src/host_tests.rs"]
mod tests;
