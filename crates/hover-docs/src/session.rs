//! Per-editor event handling: which docs are visible on which surface, and
//! what a click on one of their hyperlinks should do.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::config::{DisplaySettings, DisplayStyle};
use crate::doc::{DocProvider, DocRequest, DocResult, View};
use crate::error::DocError;
use crate::host::{SymbolIndex, Workspace};
use crate::text::{LineIndex, Span};

/// Where docs are shown. Each surface comes and goes independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    Hover,
    DoubleClick,
    Keybinding,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub anchor: Span,
    pub html: String,
}

/// What the host UI should do after an event. `status` is the one-line
/// message for the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    /// `status` is set when some cursors of a batch hit a fault.
    Show {
        surface: Surface,
        style: DisplayStyle,
        placements: Vec<Placement>,
        status: Option<String>,
    },
    Hide {
        surface: Surface,
        status: String,
    },
    /// Nothing to show; the surface keeps what it had.
    Status(String),
    /// The surface is switched off.
    Nothing,
}

/// Result of following a doc hyperlink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// The definition is in the active file.
    MoveCursor { line: usize, column: usize },
    /// `encoded` is `path:line:column`.
    OpenFile { encoded: String, transient: bool },
}

#[derive(Debug, Default)]
pub struct DocSession {
    /// 0-based row of the last hover, reset on file switch.
    hover_line: Option<usize>,
    active_file: Option<PathBuf>,
    visible: HashMap<Surface, Vec<DocResult>>,
}

impl DocSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hover_line(&self) -> Option<usize> {
        self.hover_line
    }

    pub fn active_file(&self) -> Option<&Path> {
        self.active_file.as_deref()
    }

    pub fn visible(
        &self,
        surface: Surface,
    ) -> &[DocResult] {
        self.visible.get(&surface).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn switch_file(
        &mut self,
        path: impl Into<PathBuf>,
    ) {
        let path = path.into();
        debug!(path = %path.display(), "active file changed");
        self.active_file = Some(path);
        self.hover_line = None;
    }

    pub fn on_hover<I, W>(
        &mut self,
        provider: &mut DocProvider<I, W>,
        view: &View,
        point: usize,
    ) -> UiAction
    where
        I: SymbolIndex,
        W: Workspace,
    {
        let display = provider.settings().display.clone();
        if !display.show_on_hover {
            return UiAction::Nothing;
        }
        self.track_file(&view.path);

        let row = LineIndex::new(view.buffer.text()).row_of(point);
        let moved = self.hover_line != Some(row);
        self.hover_line = Some(row);

        match provider.build_doc(view, point, DocRequest::default()) {
            Ok(doc) => self.show(Surface::Hover, &display, vec![doc], None),
            Err(err) if moved && display.hover_auto_hide => self.hide(Surface::Hover, err.status_message()),
            Err(err) => UiAction::Status(err.status_message()),
        }
    }

    pub fn on_double_click<I, W>(
        &mut self,
        provider: &mut DocProvider<I, W>,
        view: &View,
        point: usize,
    ) -> UiAction
    where
        I: SymbolIndex,
        W: Workspace,
    {
        let display = provider.settings().display.clone();
        if !display.show_on_double_click {
            return UiAction::Nothing;
        }
        self.track_file(&view.path);

        match provider.build_doc(view, point, DocRequest::default()) {
            Ok(doc) => self.show(Surface::DoubleClick, &display, vec![doc], None),
            Err(err) if display.double_click_auto_hide => self.hide(Surface::DoubleClick, err.status_message()),
            Err(err) => UiAction::Status(err.status_message()),
        }
    }

    /// The explicit command, one doc per cursor.
    pub fn on_command<I, W>(
        &mut self,
        provider: &mut DocProvider<I, W>,
        view: &View,
        cursors: &[usize],
        request: DocRequest,
    ) -> UiAction
    where
        I: SymbolIndex,
        W: Workspace,
    {
        let display = provider.settings().display.clone();
        self.track_file(&view.path);

        let mut docs = Vec::new();
        let mut misses = Vec::new();
        for outcome in provider.build_docs(view, cursors, request) {
            match outcome {
                Ok(doc) => docs.push(doc),
                Err(err) => misses.push(err),
            }
        }

        let fault = misses.iter().find(|err| !err.is_expected());
        if !docs.is_empty() {
            let status = fault.map(DocError::status_message);
            return self.show(Surface::Keybinding, &display, docs, status);
        }
        let status = fault
            .or(misses.first())
            .map_or_else(|| DocError::NotApplicable.status_message(), DocError::status_message);
        if display.keybinding_auto_hide {
            self.hide(Surface::Keybinding, status)
        } else {
            UiAction::Status(status)
        }
    }

    /// Plans the jump for a hyperlink clicked on `surface`. `href` is the
    /// link's index among the docs shown there.
    pub fn on_navigate(
        &self,
        surface: Surface,
        href: &str,
        modifier: bool,
        display: &DisplaySettings,
    ) -> Option<Navigation> {
        let index: usize = href.trim().parse().ok()?;
        let doc = self.visible.get(&surface)?.get(index)?;
        let location = &doc.location;
        let same_file = self.active_file.as_deref().is_some_and(|path| location.is_in(path));
        let plan = if same_file && !modifier {
            Navigation::MoveCursor {
                line: location.line,
                column: location.column,
            }
        } else {
            Navigation::OpenFile {
                encoded: location.encoded(),
                transient: display.open_hyperlink_as_transient,
            }
        };
        trace!(?surface, href, ?plan, "navigation planned");
        Some(plan)
    }

    fn track_file(
        &mut self,
        path: &Path,
    ) {
        if self.active_file.as_deref() != Some(path) {
            self.switch_file(path);
        }
    }

    fn show(
        &mut self,
        surface: Surface,
        display: &DisplaySettings,
        docs: Vec<DocResult>,
        status: Option<String>,
    ) -> UiAction {
        let placements = docs
            .iter()
            .map(|doc| Placement {
                anchor: doc.anchor_span,
                html: doc.html.clone(),
            })
            .collect();
        self.visible.insert(surface, docs);
        UiAction::Show {
            surface,
            style: display.display_style,
            placements,
            status,
        }
    }

    fn hide(
        &mut self,
        surface: Surface,
        status: String,
    ) -> UiAction {
        self.visible.remove(&surface);
        UiAction::Hide {
            surface,
            status,
        }
    }
}

#[cfg(test)]
#[path = "../tests/src/session_tests.rs"]
mod tests;
