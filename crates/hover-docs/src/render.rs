//! Turns tagged text into inline-styled HTML.

use std::fmt::Write as _;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::host::{Style, StyleLookup};
use crate::text::{Span, Tags, TaggedText};

/// Two or more spaces.
static SPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").expect("space run regex is valid"));

/// Renders `span` of `buffer`, one styled container per run of identical tags.
pub fn render(
    buffer: &TaggedText,
    span: Span,
    styles: &dyn StyleLookup,
) -> String {
    let default = styles.default_style();
    let mut out = String::new();
    for run in buffer.runs_in(span) {
        let text = buffer.substr(Span::new(span.start + run.span.start, span.start + run.span.end));
        let style = style_for_tags(&run.tags, styles, &default);
        push_styled(&mut out, &style, &markup_text(text));
    }
    out
}

/// Renders a whole buffer.
pub fn render_all(
    buffer: &TaggedText,
    styles: &dyn StyleLookup,
) -> String {
    render(buffer, Span::new(0, buffer.len()), styles)
}

/// Style of the most specific tag: the last tag whose foreground differs
/// from the default one, or the first tag when none does.
pub fn style_for_tags(
    tags: &Tags,
    styles: &dyn StyleLookup,
    default: &Style,
) -> Style {
    let mut iter = tags.iter();
    let Some(first) = iter.next() else {
        return default.clone();
    };
    let mut style = styles.style_for(first);
    for tag in iter {
        let candidate = styles.style_for(tag);
        if candidate.foreground != default.foreground {
            style = candidate;
        }
    }
    style
}

/// Escaped text with runs of spaces made non-breaking (the first one stays
/// breakable) and line breaks, LF or CRLF, turned into `<br>`.
pub fn markup_text(text: &str) -> String {
    let escaped = html_escape(text);
    let spaced = SPACE_RUN.replace_all(&escaped, |caps: &regex::Captures<'_>| {
        let len = caps[0].len();
        format!(" {}", "&nbsp;".repeat(len - 1))
    });
    spaced.replace("\r\n", "\n").replace('\n', "<br>")
}

fn push_styled(
    out: &mut String,
    style: &Style,
    body: &str,
) {
    let _ = write!(out, "<div style='display:inline; color:{};", style.foreground);
    if let Some(background) = &style.background {
        let _ = write!(out, " background-color:{background};");
    }
    if style.bold {
        out.push_str(" font-weight:bold;");
    }
    if style.italic {
        out.push_str(" font-style:italic;");
    }
    if style.underline {
        out.push_str(" text-decoration:underline;");
    }
    let _ = write!(out, "'>{body}</div>");
}

pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}

/// A small dark theme keyed by scope prefix. The longest matching prefix wins.
#[derive(Debug, Clone)]
pub struct BasicTheme {
    default: Style,
    rules: Vec<(String, Style)>,
}

impl Default for BasicTheme {
    fn default() -> Self {
        let italic = |color: &str| Style {
            italic: true,
            ..Style::foreground(color)
        };
        let rules = vec![
            ("comment", italic("#75715e")),
            ("string", Style::foreground("#e6db74")),
            ("constant.numeric", Style::foreground("#ae81ff")),
            ("keyword", Style::foreground("#f92672")),
            ("storage", Style::foreground("#f92672")),
            ("entity.name", Style::foreground("#a6e22e")),
            ("variable.function", Style::foreground("#66d9ef")),
            ("variable.parameter", italic("#fd971f")),
        ];
        Self {
            default: Style::foreground("#f8f8f2"),
            rules: rules.into_iter().map(|(prefix, style)| (prefix.to_string(), style)).collect(),
        }
    }
}

impl BasicTheme {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rule(
        mut self,
        prefix: impl Into<String>,
        style: Style,
    ) -> Self {
        self.rules.push((prefix.into(), style));
        self
    }
}

impl StyleLookup for BasicTheme {
    fn style_for(
        &self,
        tag: &str,
    ) -> Style {
        self.rules
            .iter()
            .filter(|(prefix, _)| tag.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, style)| style.clone())
            .unwrap_or_else(|| self.default.clone())
    }

    fn default_style(&self) -> Style {
        self.default.clone()
    }
}

#[cfg(test)]
#[path = "../tests/src/render_tests.rs"]
mod tests;
