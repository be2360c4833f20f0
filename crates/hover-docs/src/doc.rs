//! The doc lookup: symbol under the cursor in, rendered definition and
//! comment out.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::DocSettings;
use crate::error::DocError;
use crate::extract::extract;
use crate::host::{StyleLookup, SymbolIndex, Workspace};
use crate::location::SourceLocation;
use crate::normalize::normalize;
use crate::render::{BasicTheme, html_escape, render, render_all};
use crate::resolver::resolve;
use crate::syntax::{self, BuiltinSyntax, COMMENT_MARKER, SyntaxEngine};
use crate::text::{LineIndex, Span, TaggedText};
use crate::window;

/// The buffer the cursor is in.
#[derive(Debug, Clone)]
pub struct View {
    pub path: PathBuf,
    pub buffer: TaggedText,
    /// Spans of names being defined in this buffer. The cursor on one of
    /// these is not a reference.
    pub definition_regions: Vec<Span>,
}

impl View {
    /// A view whose definition regions come from the buffer's own tags.
    pub fn new(
        path: impl Into<PathBuf>,
        buffer: TaggedText,
    ) -> Self {
        let definition_regions = syntax::definition_regions(&buffer);
        Self {
            path: path.into(),
            buffer,
            definition_regions,
        }
    }

    pub fn with_definition_regions(
        path: impl Into<PathBuf>,
        buffer: TaggedText,
        definition_regions: Vec<Span>,
    ) -> Self {
        Self {
            path: path.into(),
            buffer,
            definition_regions,
        }
    }

    /// Byte offset of a 1-based line and character column.
    pub fn offset_of(
        &self,
        line: usize,
        column: usize,
    ) -> Option<usize> {
        let text = self.buffer.text();
        LineIndex::new(text).offset_of(text, line, column)
    }
}

/// Per-request overrides of the display settings. `None` keeps the setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DocRequest {
    pub docstring: Option<bool>,
    pub interface: Option<bool>,
    pub hyperlink: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocResult {
    pub html: String,
    pub symbol: String,
    /// Where the definition lives; hyperlinks in `html` navigate here.
    pub location: SourceLocation,
    /// The symbol token in the origin buffer.
    pub anchor_span: Span,
}

/// Owns the host capabilities and runs lookups against them.
///
/// Windows of files that are not open are tokenized into a scratch buffer the
/// provider keeps between lookups. It is emptied before every lookup returns.
pub struct DocProvider<I, W> {
    index: I,
    workspace: W,
    engine: Box<dyn SyntaxEngine>,
    styles: Box<dyn StyleLookup>,
    settings: DocSettings,
    scratch: TaggedText,
}

impl<I, W> DocProvider<I, W>
where
    I: SymbolIndex,
    W: Workspace,
{
    pub fn new(
        index: I,
        workspace: W,
    ) -> Self {
        Self {
            index,
            workspace,
            engine: Box::new(BuiltinSyntax::new()),
            styles: Box::new(BasicTheme::new()),
            settings: DocSettings::default(),
            scratch: TaggedText::new(),
        }
    }

    pub fn with_engine(
        mut self,
        engine: impl SyntaxEngine + 'static,
    ) -> Self {
        self.engine = Box::new(engine);
        self
    }

    pub fn with_styles(
        mut self,
        styles: impl StyleLookup + 'static,
    ) -> Self {
        self.styles = Box::new(styles);
        self
    }

    pub fn with_settings(
        mut self,
        settings: DocSettings,
    ) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &DocSettings {
        &self.settings
    }

    pub fn set_settings(
        &mut self,
        settings: DocSettings,
    ) {
        self.settings = settings;
    }

    pub fn engine(&self) -> &dyn SyntaxEngine {
        self.engine.as_ref()
    }

    pub fn workspace(&self) -> &W {
        &self.workspace
    }

    pub fn workspace_mut(&mut self) -> &mut W {
        &mut self.workspace
    }

    /// Doc for the symbol at `point`, trying `point - 1` when `point` itself
    /// yields nothing (the cursor just past the end of a word).
    pub fn build_doc(
        &mut self,
        view: &View,
        point: usize,
        request: DocRequest,
    ) -> Result<DocResult, DocError> {
        self.build_linked(view, point, request, 0)
    }

    /// One outcome per point, for multiple cursors. Hyperlink targets count
    /// only the successful docs, so they index the docs a host shows.
    pub fn build_docs(
        &mut self,
        view: &View,
        points: &[usize],
        request: DocRequest,
    ) -> Vec<Result<DocResult, DocError>> {
        let mut outcomes = Vec::with_capacity(points.len());
        let mut built = 0;
        for &point in points {
            let outcome = self.build_linked(view, point, request, built);
            built += usize::from(outcome.is_ok());
            outcomes.push(outcome);
        }
        outcomes
    }

    fn build_linked(
        &mut self,
        view: &View,
        point: usize,
        request: DocRequest,
        link: usize,
    ) -> Result<DocResult, DocError> {
        let mut outcome = Err(DocError::NotApplicable);
        for at in [Some(point), point.checked_sub(1)].into_iter().flatten() {
            match self.build_at(view, at, request, link) {
                Ok(doc) => {
                    outcome = Ok(doc);
                    break;
                },
                Err(DocError::NotApplicable) => {},
                Err(err) if err.is_expected() => {
                    if matches!(outcome, Err(DocError::NotApplicable)) {
                        outcome = Err(err);
                    }
                },
                Err(err) => {
                    outcome = Err(err);
                    break;
                },
            }
        }

        match &outcome {
            Ok(doc) => debug!(symbol = %doc.symbol, location = %doc.location.encoded(), "doc built"),
            Err(err) if err.is_expected() => debug!(point, "{err}"),
            Err(err) => warn!(path = %view.path.display(), point, "doc lookup failed: {err}"),
        }
        outcome
    }

    fn build_at(
        &mut self,
        view: &View,
        point: usize,
        request: DocRequest,
        link: usize,
    ) -> Result<DocResult, DocError> {
        let anchor = reference_at(view, point).ok_or(DocError::NotApplicable)?;
        let symbol = view.buffer.substr(anchor).to_string();

        let candidates = self.index.lookup(&symbol);
        let workspace = &self.workspace;
        let location = resolve(&symbol, &candidates, &view.path, |path| workspace.is_open(path))?;

        let html = self.assemble(&location, &symbol, request, link);
        self.scratch.clear();

        Ok(DocResult {
            html: html?,
            symbol,
            location,
            anchor_span: anchor,
        })
    }

    fn assemble(
        &mut self,
        location: &SourceLocation,
        symbol: &str,
        request: DocRequest,
        link: usize,
    ) -> Result<String, DocError> {
        let display = &self.settings.display;
        let extraction_settings = &self.settings.extraction;
        let show_interface = request.interface.unwrap_or(display.display_interface);
        let show_docstring = request.docstring.unwrap_or(display.display_docstring);
        let show_hyperlink = request.hyperlink.unwrap_or(display.display_file_hyperlink);

        let engine = self.engine.as_ref();
        let styles = self.styles.as_ref();
        let window = window::load(&self.workspace, engine, &mut self.scratch, location, symbol, extraction_settings)?;
        let found = extract(engine, &window, extraction_settings.merge_adjacent_line_comments);

        let mut parts = Vec::new();
        if show_interface && !found.definition.is_empty() {
            parts.push(render(window.buffer, found.definition, styles));
        }
        if show_docstring && !found.comment.is_empty() {
            let comment = normalize(
                window.buffer.slice(found.comment),
                engine,
                &window.syntax,
                extraction_settings.tab_width,
                extraction_settings.docstrings_for(&window.syntax.name),
            );
            if !comment.is_empty() {
                parts.push(render_all(&comment, styles));
            }
        }
        if show_hyperlink {
            parts.push(format!("<a href='{link}'>{}:{}</a>", html_escape(&location.file_name()), location.line));
        }
        Ok(parts.join("<br>"))
    }
}

/// The identifier under `point` when it is a reference worth looking up.
fn reference_at(
    view: &View,
    point: usize,
) -> Option<Span> {
    let buffer = &view.buffer;
    let tags = buffer.tags_at(point)?;
    if tags.is_empty() || tags.has_marker(COMMENT_MARKER) {
        return None;
    }
    if view.definition_regions.iter().any(|region| region.contains(point)) {
        return None;
    }
    word_at(buffer, point)
}

fn is_word_char(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

/// Maximal identifier around `point`, kept inside the run containing it.
pub(crate) fn word_at(
    buffer: &TaggedText,
    point: usize,
) -> Option<Span> {
    let runs = buffer.runs();
    let run = runs.get(runs.partition_point(|run| run.span.end <= point))?;
    let text = buffer.text();
    let head = text.get(run.span.start..point)?;
    let tail = text.get(point..run.span.end)?;
    if !tail.chars().next().is_some_and(is_word_char) {
        return None;
    }
    let before: usize = head.chars().rev().take_while(|c| is_word_char(*c)).map(char::len_utf8).sum();
    let after: usize = tail.chars().take_while(|c| is_word_char(*c)).map(char::len_utf8).sum();
    Some(Span::new(point - before, point + after))
}

#[cfg(test)]
#[path = "../tests/src/doc_tests.rs"]
mod tests;
