use std::path::PathBuf;

use thiserror::Error;

/// Outcome of a doc lookup that did not produce a [`crate::DocResult`].
///
/// The first three variants are ordinary negative results (the cursor is
/// somewhere uninteresting, or the index has nothing to offer). The last two
/// are faults: they should not happen with consistent input.
#[derive(Debug, Error)]
pub enum DocError {
    #[error("not on a symbol reference")]
    NotApplicable,
    #[error("no definition found for `{symbol}`")]
    NotFound { symbol: String },
    #[error("no syntax available for {}", path.display())]
    NoSyntax { path: PathBuf },
    #[error("position {row}:{column} is outside the loaded text")]
    OutOfRange { row: usize, column: usize },
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DocError {
    pub fn io(
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// `true` for outcomes that are part of normal operation.
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::NotApplicable | Self::NotFound { .. } | Self::NoSyntax { .. })
    }

    /// The single status line shown to the user for this outcome.
    pub fn status_message(&self) -> String {
        if self.is_expected() {
            "no definition found".to_string()
        } else {
            format!("hover-docs: {self}")
        }
    }
}
