use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A symbol occurrence somewhere in the project. `line` and `column` are 1-based,
/// `column` counts characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub path: PathBuf,
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(
        path: impl Into<PathBuf>,
        line: usize,
        column: usize,
    ) -> Self {
        Self {
            path: path.into(),
            line,
            column,
        }
    }

    /// Base name of the file, used for hyperlink labels.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// `path:line:column`, the form editors accept for "open at position".
    pub fn encoded(&self) -> String {
        format!("{}:{}:{}", self.path.display(), self.line, self.column)
    }

    pub fn is_in(
        &self,
        path: &Path,
    ) -> bool {
        self.path == path
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    #[default]
    Definition,
    Reference,
}

/// One entry returned by the symbol index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(flatten)]
    pub location: SourceLocation,
    #[serde(default)]
    pub kind: SymbolKind,
}

impl Candidate {
    pub fn definition(location: SourceLocation) -> Self {
        Self {
            location,
            kind: SymbolKind::Definition,
        }
    }

    pub fn reference(location: SourceLocation) -> Self {
        Self {
            location,
            kind: SymbolKind::Reference,
        }
    }

    pub fn is_definition(&self) -> bool {
        self.kind == SymbolKind::Definition
    }
}

/// Ordered candidates for one symbol name. Order is significant: ties are
/// broken in favour of earlier entries.
pub type CandidateSet = Vec<Candidate>;
