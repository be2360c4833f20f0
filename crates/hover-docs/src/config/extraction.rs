use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;
use serde_json::Value;

pub const MIN_TAB_WIDTH: usize = 1;
pub const MAX_TAB_WIDTH: usize = 16;
pub const MIN_WINDOW_RADIUS: usize = 1;
pub const MAX_WINDOW_RADIUS: usize = 10_000;
pub const MIN_FULL_LOAD_THRESHOLD_KB: u64 = 1;
pub const MAX_FULL_LOAD_THRESHOLD_KB: u64 = 1024 * 64;

/// Delimiters of one block doc-comment form, e.g. `/**`, `*/` and the `*`
/// that starts each inner line.
///
/// Deserializes from `["/**", "*/", "*"]` (mid optional) or from an object
/// with `start`, `end` and `mid` keys.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "DelimiterShape")]
pub struct DocstringDelimiters {
    pub start: String,
    pub end: String,
    pub mid: Option<String>,
}

impl DocstringDelimiters {
    pub fn new(
        start: impl Into<String>,
        end: impl Into<String>,
        mid: Option<&str>,
    ) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            mid: mid.map(str::to_string),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DelimiterShape {
    List(Vec<String>),
    Fields {
        start: String,
        end: String,
        #[serde(default)]
        mid: Option<String>,
    },
}

impl TryFrom<DelimiterShape> for DocstringDelimiters {
    type Error = String;

    fn try_from(shape: DelimiterShape) -> Result<Self, Self::Error> {
        match shape {
            DelimiterShape::Fields {
                start,
                end,
                mid,
            } => Ok(Self {
                start,
                end,
                mid,
            }),
            DelimiterShape::List(parts) => {
                let mut parts = parts.into_iter();
                match (parts.next(), parts.next(), parts.next(), parts.next()) {
                    (Some(start), Some(end), mid, None) => Ok(Self {
                        start,
                        end,
                        mid,
                    }),
                    _ => Err("docstring delimiters take 2 or 3 strings".to_string()),
                }
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionSettings {
    /// Block doc-comment forms per syntax name, tried in order.
    pub multi_line_docstrings: BTreeMap<String, Vec<DocstringDelimiters>>,
    pub tab_width: usize,
    /// Lines either side of the definition loaded from large files.
    pub window_radius: usize,
    /// Files smaller than this are loaded whole.
    pub full_load_threshold_kb: u64,
    /// Extend a line comment found above (below) the definition across any
    /// directly adjacent full-line comments above (below) it.
    pub merge_adjacent_line_comments: bool,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            multi_line_docstrings: default_docstrings(),
            tab_width: 4,
            window_radius: 100,
            full_load_threshold_kb: 256,
            merge_adjacent_line_comments: true,
        }
    }
}

fn default_docstrings() -> BTreeMap<String, Vec<DocstringDelimiters>> {
    let mut table = BTreeMap::new();
    table.insert("python".to_string(), vec![
        DocstringDelimiters::new("\"\"\"", "\"\"\"", None),
        DocstringDelimiters::new("'''", "'''", None),
    ]);
    for syntax in ["c", "cpp", "java", "javascript", "typescript", "go", "rust", "csharp", "swift", "kotlin"] {
        table.insert(syntax.to_string(), vec![
            DocstringDelimiters::new("/**", "*/", Some("*")),
            DocstringDelimiters::new("/*", "*/", Some("*")),
        ]);
    }
    table
}

impl ExtractionSettings {
    pub(crate) fn apply_patch(
        &mut self,
        patch: ExtractionSettingsPatch,
    ) {
        if let Some(v) = patch.multi_line_docstrings {
            self.multi_line_docstrings.extend(v);
        }
        if let Some(v) = patch.tab_width {
            self.tab_width = v;
        }
        if let Some(v) = patch.window_radius {
            self.window_radius = v;
        }
        if let Some(v) = patch.full_load_threshold_kb {
            self.full_load_threshold_kb = v;
        }
        if let Some(v) = patch.merge_adjacent_line_comments {
            self.merge_adjacent_line_comments = v;
        }
    }

    pub(crate) fn normalize(&mut self) {
        self.tab_width = self.tab_width.clamp(MIN_TAB_WIDTH, MAX_TAB_WIDTH);
        self.window_radius = self.window_radius.clamp(MIN_WINDOW_RADIUS, MAX_WINDOW_RADIUS);
        self.full_load_threshold_kb =
            self.full_load_threshold_kb.clamp(MIN_FULL_LOAD_THRESHOLD_KB, MAX_FULL_LOAD_THRESHOLD_KB);
        for forms in self.multi_line_docstrings.values_mut() {
            forms.retain(|d| !d.start.is_empty() && !d.end.is_empty());
            for form in forms.iter_mut() {
                if form.mid.as_deref().is_some_and(str::is_empty) {
                    form.mid = None;
                }
            }
        }
    }

    /// Block doc-comment forms configured for `syntax`, empty if none.
    pub fn docstrings_for(
        &self,
        syntax: &str,
    ) -> &[DocstringDelimiters] {
        self.multi_line_docstrings.get(syntax).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn full_load_threshold_bytes(&self) -> u64 {
        self.full_load_threshold_kb.saturating_mul(1024)
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct ExtractionSettingsPatch {
    #[serde(alias = "multi_line_docstrings")]
    pub(crate) multi_line_docstrings: Option<BTreeMap<String, Vec<DocstringDelimiters>>>,
    #[serde(alias = "tab_width")]
    pub(crate) tab_width: Option<usize>,
    #[serde(alias = "window_radius")]
    pub(crate) window_radius: Option<usize>,
    #[serde(alias = "full_load_threshold_kb")]
    pub(crate) full_load_threshold_kb: Option<u64>,
    #[serde(alias = "merge_adjacent_line_comments")]
    pub(crate) merge_adjacent_line_comments: Option<bool>,
    #[serde(flatten)]
    pub(crate) _extra: HashMap<String, Value>,
}
