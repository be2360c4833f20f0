use std::path::Path;

use crate::text::{Span, TagRun, Tags};

use super::lexer::{Family, Lexeme, lex};
use super::{SyntaxEngine, SyntaxId};

struct Language {
    name: &'static str,
    extensions: &'static [&'static str],
    family: Family,
    /// Line comment markers, longest first. The last one is used when adding.
    line_markers: &'static [&'static str],
    /// Keywords whose next identifier names a function.
    function_keywords: &'static [&'static str],
    /// Keywords whose next identifier names a type.
    type_keywords: &'static [&'static str],
    keywords: &'static [&'static str],
}

const C_KEYWORDS: &[&str] = &[
    "auto", "bool", "break", "case", "char", "const", "continue", "default", "do", "double", "else", "extern",
    "float", "for", "goto", "if", "inline", "int", "long", "return", "short", "signed", "sizeof", "static",
    "switch", "typedef", "unsigned", "void", "volatile", "while", "namespace", "template", "typename", "public",
    "private", "protected", "virtual", "override", "new", "delete", "this", "true", "false", "nullptr",
];

const LANGUAGES: &[Language] = &[
    Language {
        name: "python",
        extensions: &["py", "pyi", "pyw"],
        family: Family::Hash,
        line_markers: &["#"],
        function_keywords: &["def"],
        type_keywords: &["class"],
        keywords: &[
            "and", "as", "assert", "async", "await", "break", "continue", "del", "elif", "else", "except", "finally",
            "for", "from", "global", "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise",
            "return", "try", "while", "with", "yield", "None", "True", "False", "self",
        ],
    },
    Language {
        name: "c",
        extensions: &["c", "h"],
        family: Family::CLike,
        line_markers: &["///", "//"],
        function_keywords: &[],
        type_keywords: &["struct", "union", "enum"],
        keywords: C_KEYWORDS,
    },
    Language {
        name: "cpp",
        extensions: &["cc", "cpp", "cxx", "hpp", "hh", "hxx", "metal"],
        family: Family::CLike,
        line_markers: &["///", "//"],
        function_keywords: &[],
        type_keywords: &["struct", "class", "union", "enum"],
        keywords: C_KEYWORDS,
    },
    Language {
        name: "rust",
        extensions: &["rs"],
        family: Family::Rust,
        line_markers: &["///", "//!", "//"],
        function_keywords: &["fn"],
        type_keywords: &["struct", "enum", "trait", "type", "union"],
        keywords: &[
            "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "extern", "false", "for",
            "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return", "self", "Self",
            "static", "super", "true", "unsafe", "use", "where", "while",
        ],
    },
    Language {
        name: "javascript",
        extensions: &["js", "mjs", "cjs", "jsx"],
        family: Family::CLike,
        line_markers: &["//"],
        function_keywords: &["function"],
        type_keywords: &["class"],
        keywords: &[
            "async", "await", "break", "case", "catch", "const", "continue", "default", "delete", "do", "else",
            "export", "extends", "false", "finally", "for", "if", "import", "in", "instanceof", "let", "new", "null",
            "return", "switch", "this", "throw", "true", "try", "typeof", "var", "void", "while", "yield",
        ],
    },
    Language {
        name: "typescript",
        extensions: &["ts", "tsx", "mts", "cts"],
        family: Family::CLike,
        line_markers: &["//"],
        function_keywords: &["function"],
        type_keywords: &["class", "interface", "type", "enum"],
        keywords: &[
            "async", "await", "break", "case", "catch", "const", "continue", "default", "delete", "do", "else",
            "export", "extends", "false", "finally", "for", "if", "implements", "import", "in", "let", "new", "null",
            "private", "public", "readonly", "return", "switch", "this", "throw", "true", "try", "typeof", "var",
            "while",
        ],
    },
    Language {
        name: "go",
        extensions: &["go"],
        family: Family::CLike,
        line_markers: &["//"],
        function_keywords: &["func"],
        type_keywords: &["type"],
        keywords: &[
            "break", "case", "chan", "const", "continue", "default", "defer", "else", "for", "go", "goto", "if",
            "import", "interface", "map", "package", "range", "return", "select", "struct", "switch", "var", "nil",
            "true", "false",
        ],
    },
    Language {
        name: "java",
        extensions: &["java"],
        family: Family::CLike,
        line_markers: &["//"],
        function_keywords: &[],
        type_keywords: &["class", "interface", "enum", "record"],
        keywords: &[
            "abstract", "boolean", "break", "byte", "case", "catch", "char", "continue", "default", "do", "double",
            "else", "extends", "final", "finally", "float", "for", "if", "implements", "import", "int", "long", "new",
            "package", "private", "protected", "public", "return", "short", "static", "super", "switch", "this",
            "throw", "throws", "try", "void", "while", "true", "false", "null",
        ],
    },
    Language {
        name: "csharp",
        extensions: &["cs"],
        family: Family::CLike,
        line_markers: &["///", "//"],
        function_keywords: &[],
        type_keywords: &["class", "struct", "interface", "enum", "record"],
        keywords: &[
            "abstract", "bool", "break", "case", "catch", "const", "continue", "default", "do", "double", "else",
            "false", "finally", "float", "for", "foreach", "if", "in", "int", "internal", "long", "namespace", "new",
            "null", "override", "private", "protected", "public", "return", "static", "string", "switch", "this",
            "throw", "true", "try", "using", "var", "virtual", "void", "while",
        ],
    },
    Language {
        name: "swift",
        extensions: &["swift"],
        family: Family::CLike,
        line_markers: &["///", "//"],
        function_keywords: &["func"],
        type_keywords: &["class", "struct", "enum", "protocol", "extension"],
        keywords: &[
            "break", "case", "continue", "default", "defer", "else", "false", "for", "guard", "if", "import", "in",
            "init", "let", "nil", "private", "public", "return", "self", "static", "switch", "true", "var", "while",
        ],
    },
    Language {
        name: "kotlin",
        extensions: &["kt", "kts"],
        family: Family::CLike,
        line_markers: &["//"],
        function_keywords: &["fun"],
        type_keywords: &["class", "interface", "object"],
        keywords: &[
            "break", "continue", "do", "else", "false", "for", "if", "import", "in", "is", "null", "override",
            "package", "private", "public", "return", "this", "true", "val", "var", "when", "while",
        ],
    },
];

/// Identifiers that can precede a call without making it a declaration.
const CONTROL_KEYWORDS: &[&str] = &[
    "if", "while", "for", "foreach", "switch", "return", "sizeof", "catch", "new", "else", "throw", "case", "delete",
    "typeof", "await", "yield", "in", "using",
];

/// Tokenizer backed by `logos` lexers for common languages.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinSyntax;

impl BuiltinSyntax {
    pub fn new() -> Self {
        Self
    }

    fn language(
        &self,
        syntax: &SyntaxId,
    ) -> Option<&'static Language> {
        LANGUAGES.iter().find(|lang| lang.name == syntax.name)
    }
}

impl SyntaxEngine for BuiltinSyntax {
    fn detect(
        &self,
        path: &Path,
    ) -> Option<SyntaxId> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        LANGUAGES.iter().find(|lang| lang.extensions.contains(&ext.as_str())).map(|lang| SyntaxId::new(lang.name))
    }

    fn tokenize(
        &self,
        syntax: &SyntaxId,
        text: &str,
    ) -> Vec<TagRun> {
        match self.language(syntax) {
            Some(language) => Tagger::new(language, syntax, text).run(),
            None => vec![TagRun::new(0, text.len(), Tags::new(vec![syntax.scope.clone()]))],
        }
    }

    fn toggle_line_comment(
        &self,
        syntax: &SyntaxId,
        line: &str,
    ) -> String {
        let Some(language) = self.language(syntax) else {
            return line.to_string();
        };
        let rest = line.trim_start();
        if rest.is_empty() {
            return line.to_string();
        }
        let indent = &line[..line.len() - rest.len()];
        for marker in language.line_markers {
            if let Some(after) = rest.strip_prefix(marker) {
                let after = after.strip_prefix(' ').unwrap_or(after);
                return format!("{indent}{after}");
            }
        }
        let marker = language.line_markers.last().copied().unwrap_or("//");
        format!("{indent}{marker} {rest}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Plain,
    Keyword,
    FunctionName,
    TypeName,
    Call,
    Parameter,
}

struct Tagger<'a> {
    language: &'static Language,
    root: &'a str,
    text: &'a str,
    lexemes: Vec<(Lexeme, Span)>,
}

impl<'a> Tagger<'a> {
    fn new(
        language: &'static Language,
        syntax: &'a SyntaxId,
        text: &'a str,
    ) -> Self {
        Self {
            language,
            root: &syntax.scope,
            text,
            lexemes: lex(language.family, text),
        }
    }

    fn slice(
        &self,
        idx: usize,
    ) -> &'a str {
        let span = self.lexemes[idx].1;
        &self.text[span.start..span.end]
    }

    fn is_trivia(lexeme: Lexeme) -> bool {
        matches!(
            lexeme,
            Lexeme::Whitespace | Lexeme::Newline | Lexeme::LineComment | Lexeme::BlockComment | Lexeme::DocComment
        )
    }

    fn next_significant(
        &self,
        from: usize,
    ) -> Option<usize> {
        (from..self.lexemes.len()).find(|&i| !Self::is_trivia(self.lexemes[i].0))
    }

    fn prev_significant(
        &self,
        before: usize,
    ) -> Option<usize> {
        (0..before).rev().find(|&i| !Self::is_trivia(self.lexemes[i].0))
    }

    /// Index of the `(` opening a parameter list after the name at `name`,
    /// skipping one balanced `<...>` generic list.
    fn parameter_open(
        &self,
        name: usize,
    ) -> Option<usize> {
        let mut next = self.next_significant(name + 1)?;
        if self.lexemes[next].0 == Lexeme::Punct && self.slice(next) == "<" {
            let mut depth = 0usize;
            let mut idx = next;
            loop {
                if self.lexemes[idx].0 == Lexeme::Punct {
                    match self.slice(idx) {
                        "<" => depth += 1,
                        ">" => depth = depth.saturating_sub(1),
                        _ => {},
                    }
                }
                if depth == 0 {
                    break;
                }
                idx += 1;
                if idx >= self.lexemes.len() {
                    return None;
                }
            }
            next = self.next_significant(idx + 1)?;
        }
        (self.lexemes[next].0 == Lexeme::OpenParen).then_some(next)
    }

    /// Index of the `)` matching the `(` at `open` (or the last lexeme).
    fn matching_close(
        &self,
        open: usize,
    ) -> usize {
        let mut depth = 0usize;
        for idx in open..self.lexemes.len() {
            match self.lexemes[idx].0 {
                Lexeme::OpenParen => depth += 1,
                Lexeme::CloseParen => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return idx;
                    }
                },
                _ => {},
            }
        }
        self.lexemes.len().saturating_sub(1)
    }

    /// A C-style definition: an identifier preceded by a type-ish token and
    /// followed by a parameter list. Only used by languages without a
    /// function keyword.
    fn is_c_style_definition(
        &self,
        idx: usize,
    ) -> bool {
        if self.language.family == Family::Hash || !self.language.function_keywords.is_empty() {
            return false;
        }
        let Some(prev) = self.prev_significant(idx) else {
            return false;
        };
        let prev_text = self.slice(prev);
        let type_like = match self.lexemes[prev].0 {
            Lexeme::Ident => !CONTROL_KEYWORDS.contains(&prev_text),
            Lexeme::Punct => matches!(prev_text, "*" | "&" | ">"),
            _ => false,
        };
        type_like && self.parameter_open(idx).is_some()
    }

    fn roles(&self) -> (Vec<Role>, Vec<Span>) {
        let mut roles = vec![Role::Plain; self.lexemes.len()];
        let mut parameter_spans = Vec::new();
        let mut pending: Option<Role> = None;
        let mut idx = 0usize;

        while idx < self.lexemes.len() {
            let (lexeme, _) = self.lexemes[idx];
            match lexeme {
                Lexeme::Ident => {
                    let word = self.slice(idx);
                    if let Some(role) = pending.take() {
                        roles[idx] = role;
                    } else if self.language.function_keywords.contains(&word) {
                        roles[idx] = Role::Keyword;
                        pending = Some(Role::FunctionName);
                    } else if self.language.type_keywords.contains(&word) {
                        roles[idx] = Role::Keyword;
                        pending = Some(Role::TypeName);
                    } else if self.language.keywords.contains(&word) {
                        roles[idx] = Role::Keyword;
                    } else if self.is_c_style_definition(idx) {
                        roles[idx] = Role::FunctionName;
                    } else if self.next_significant(idx + 1).is_some_and(|n| self.lexemes[n].0 == Lexeme::OpenParen) {
                        roles[idx] = Role::Call;
                    }

                    if roles[idx] == Role::FunctionName
                        && let Some(open) = self.parameter_open(idx)
                    {
                        let close = self.matching_close(open);
                        parameter_spans.push(Span::new(self.lexemes[open].1.start, self.lexemes[close].1.end));
                    }
                },
                // Go method receivers sit between `func` and the name.
                Lexeme::OpenParen if pending == Some(Role::FunctionName) && self.language.name == "go" => {
                    idx = self.matching_close(idx) + 1;
                    continue;
                },
                other if !Self::is_trivia(other) => pending = None,
                _ => {},
            }
            idx += 1;
        }

        for span in &parameter_spans {
            let first = self.lexemes.partition_point(|(_, s)| s.end <= span.start);
            for idx in first..self.lexemes.len() {
                let (lexeme, lex_span) = self.lexemes[idx];
                if lex_span.start >= span.end {
                    break;
                }
                if lexeme == Lexeme::Ident && roles[idx] == Role::Plain {
                    roles[idx] = Role::Parameter;
                }
            }
        }

        (roles, parameter_spans)
    }

    fn run(self) -> Vec<TagRun> {
        let (roles, parameter_spans) = self.roles();
        let lang = self.language.name;
        let comment_line = match self.language.family {
            Family::Hash => format!("comment.line.number-sign.{lang}"),
            Family::CLike | Family::Rust => format!("comment.line.double-slash.{lang}"),
        };
        let mut runs = Vec::with_capacity(self.lexemes.len());
        let mut line_has_code = false;
        let mut previous = Lexeme::Newline;

        for (idx, &(lexeme, span)) in self.lexemes.iter().enumerate() {
            let mut tags = vec![self.root.to_string()];
            if parameter_spans.iter().any(|p| p.start <= span.start && span.end <= p.end) {
                tags.push(format!("meta.function.parameters.{lang}"));
            }
            match lexeme {
                Lexeme::LineComment => {
                    tags.push(comment_line.clone());
                    let marker_len = self
                        .language
                        .line_markers
                        .iter()
                        .find(|m| self.slice(idx).starts_with(**m))
                        .map_or(0, |m| m.len());
                    let mut marker_tags = tags.clone();
                    marker_tags.push(format!("punctuation.definition.comment.{lang}"));
                    runs.push(TagRun::new(span.start, span.start + marker_len, Tags::new(marker_tags)));
                    runs.push(TagRun::new(span.start + marker_len, span.end, Tags::new(tags)));
                    previous = lexeme;
                    continue;
                },
                Lexeme::Newline if previous == Lexeme::LineComment => tags.push(comment_line.clone()),
                Lexeme::BlockComment => tags.push(format!("comment.block.{lang}")),
                Lexeme::DocComment => tags.push(format!("comment.block.documentation.{lang}")),
                Lexeme::TripleString if !line_has_code => tags.push(format!("comment.block.documentation.{lang}")),
                Lexeme::String | Lexeme::TripleString => tags.push(format!("string.quoted.{lang}")),
                Lexeme::Number => tags.push(format!("constant.numeric.{lang}")),
                Lexeme::Ident => match roles[idx] {
                    Role::Keyword => tags.push(format!("keyword.other.{lang}")),
                    Role::FunctionName => tags.push(format!("entity.name.function.{lang}")),
                    Role::TypeName => tags.push(format!("entity.name.type.{lang}")),
                    Role::Call => tags.push(format!("variable.function.{lang}")),
                    Role::Parameter => tags.push(format!("variable.parameter.{lang}")),
                    Role::Plain => {},
                },
                Lexeme::OpenParen | Lexeme::CloseParen => tags.push(format!("punctuation.section.parens.{lang}")),
                _ => {},
            }
            match lexeme {
                Lexeme::Newline => line_has_code = false,
                Lexeme::Whitespace | Lexeme::BlockComment | Lexeme::DocComment => {},
                _ => line_has_code = true,
            }
            previous = lexeme;
            runs.push(TagRun::new(span.start, span.end, Tags::new(tags)));
        }
        runs
    }
}
