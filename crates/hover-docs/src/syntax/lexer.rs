use logos::Logos;

use crate::text::Span;

/// Token classes shared by every built-in language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lexeme {
    Whitespace,
    Newline,
    LineComment,
    BlockComment,
    DocComment,
    String,
    TripleString,
    Number,
    Ident,
    OpenParen,
    CloseParen,
    Punct,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Family {
    /// `//` and `/* */` comments, `"`/`'`/`` ` `` quoting.
    CLike,
    /// Like `CLike`, but `'` only opens a one-character literal (lifetimes).
    Rust,
    /// `#` comments, triple-quoted strings.
    Hash,
}

#[derive(Logos, Debug, PartialEq, Clone, Copy)]
#[logos(error = ())]
enum CToken {
    #[regex(r"[ \t\r\f]+")]
    Whitespace,

    #[token("\n")]
    Newline,

    #[regex(r"//[^\n]*", allow_greedy = true)]
    LineComment,

    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    BlockComment,

    #[token("\"")]
    DoubleQuote,

    #[token("'")]
    SingleQuote,

    #[token("`")]
    Backtick,

    #[regex(r"[0-9][0-9A-Za-z_.]*")]
    Number,

    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*")]
    Ident,

    #[token("(")]
    OpenParen,

    #[token(")")]
    CloseParen,

    #[regex(r#"[^ \t\r\f\n()A-Za-z0-9_$"'`]"#)]
    Punct,
}

#[derive(Logos, Debug, PartialEq, Clone, Copy)]
#[logos(error = ())]
enum HashToken {
    #[regex(r"[ \t\r\f]+")]
    Whitespace,

    #[token("\n")]
    Newline,

    #[regex(r"#[^\n]*", allow_greedy = true)]
    Comment,

    #[token("\"\"\"")]
    #[token("'''")]
    TripleQuote,

    #[token("\"")]
    #[token("'")]
    Quote,

    #[regex(r"[0-9][0-9A-Za-z_.]*")]
    Number,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    #[token("(")]
    OpenParen,

    #[token(")")]
    CloseParen,

    #[regex(r#"[^ \t\r\f\n()A-Za-z0-9_#"']"#)]
    Punct,
}

/// Lex `text` into shared lexemes. Every byte of `text` belongs to exactly one
/// lexeme; unlexable input becomes [`Lexeme::Unknown`].
pub(crate) fn lex(
    family: Family,
    text: &str,
) -> Vec<(Lexeme, Span)> {
    match family {
        Family::CLike | Family::Rust => lex_c(text, family == Family::Rust),
        Family::Hash => lex_hash(text),
    }
}

fn lex_c(
    text: &str,
    rust: bool,
) -> Vec<(Lexeme, Span)> {
    let mut out = Vec::new();
    let mut lexer = CToken::lexer(text);
    while let Some(token) = lexer.next() {
        let start = lexer.span().start;
        let lexeme = match token {
            Ok(CToken::Whitespace) => Lexeme::Whitespace,
            Ok(CToken::Newline) => Lexeme::Newline,
            Ok(CToken::LineComment) => Lexeme::LineComment,
            Ok(CToken::BlockComment) if is_doc_comment(lexer.slice()) => Lexeme::DocComment,
            Ok(CToken::BlockComment) => Lexeme::BlockComment,
            Ok(CToken::DoubleQuote) => {
                lexer.bump(scan_quoted(text, lexer.span().end, "\"", false) - lexer.span().end);
                Lexeme::String
            },
            Ok(CToken::Backtick) => {
                lexer.bump(scan_quoted(text, lexer.span().end, "`", true) - lexer.span().end);
                Lexeme::String
            },
            Ok(CToken::SingleQuote) if rust => match char_literal_end(text, lexer.span().end) {
                Some(end) => {
                    lexer.bump(end - lexer.span().end);
                    Lexeme::String
                },
                None => Lexeme::Punct,
            },
            Ok(CToken::SingleQuote) => {
                lexer.bump(scan_quoted(text, lexer.span().end, "'", false) - lexer.span().end);
                Lexeme::String
            },
            Ok(CToken::Number) => Lexeme::Number,
            Ok(CToken::Ident) => Lexeme::Ident,
            Ok(CToken::OpenParen) => Lexeme::OpenParen,
            Ok(CToken::CloseParen) => Lexeme::CloseParen,
            Ok(CToken::Punct) => Lexeme::Punct,
            Err(()) => Lexeme::Unknown,
        };
        out.push((lexeme, Span::new(start, lexer.span().end)));
    }
    out
}

fn lex_hash(text: &str) -> Vec<(Lexeme, Span)> {
    let mut out = Vec::new();
    let mut lexer = HashToken::lexer(text);
    while let Some(token) = lexer.next() {
        let start = lexer.span().start;
        let lexeme = match token {
            Ok(HashToken::Whitespace) => Lexeme::Whitespace,
            Ok(HashToken::Newline) => Lexeme::Newline,
            Ok(HashToken::Comment) => Lexeme::LineComment,
            Ok(HashToken::TripleQuote) => {
                let quote = lexer.slice();
                lexer.bump(scan_quoted(text, lexer.span().end, quote, true) - lexer.span().end);
                Lexeme::TripleString
            },
            Ok(HashToken::Quote) => {
                let quote = lexer.slice();
                lexer.bump(scan_quoted(text, lexer.span().end, quote, false) - lexer.span().end);
                Lexeme::String
            },
            Ok(HashToken::Number) => Lexeme::Number,
            Ok(HashToken::Ident) => Lexeme::Ident,
            Ok(HashToken::OpenParen) => Lexeme::OpenParen,
            Ok(HashToken::CloseParen) => Lexeme::CloseParen,
            Ok(HashToken::Punct) => Lexeme::Punct,
            Err(()) => Lexeme::Unknown,
        };
        out.push((lexeme, Span::new(start, lexer.span().end)));
    }
    out
}

/// End offset (exclusive) of a quoted literal whose opening quote ends at
/// `from`. Backslash escapes are skipped. An unterminated literal runs to the
/// end of the line, or to the end of the text when `multiline` is set.
fn scan_quoted(
    text: &str,
    from: usize,
    quote: &str,
    multiline: bool,
) -> usize {
    let bytes = text.as_bytes();
    let mut pos = from;
    while pos < bytes.len() {
        if bytes[pos] == b'\\' {
            pos = (pos + 2).min(bytes.len());
            continue;
        }
        if !multiline && bytes[pos] == b'\n' {
            return pos;
        }
        if bytes[pos..].starts_with(quote.as_bytes()) {
            return pos + quote.len();
        }
        pos += 1;
    }
    bytes.len()
}

/// `/** ... */`, but not the empty `/**/`.
fn is_doc_comment(comment: &str) -> bool {
    comment.starts_with("/**") && comment != "/**/"
}

/// Closing offset of a Rust char literal (`'a'`, `'\n'`), or `None` for a lifetime.
fn char_literal_end(
    text: &str,
    from: usize,
) -> Option<usize> {
    let rest = text.get(from..)?;
    let mut chars = rest.char_indices();
    let (_, first) = chars.next()?;
    if first == '\\' {
        let close = rest.get(1..)?.find('\'')?;
        let literal = &rest[..close + 1];
        return (!literal.contains('\n')).then_some(from + close + 2);
    }
    let (idx, second) = chars.next()?;
    (second == '\'' && first != '\n').then_some(from + idx + 1)
}

#[cfg(test)]
#[path = "../../tests/src/syntax/lexer_tests.rs"]
mod tests;
