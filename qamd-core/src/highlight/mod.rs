//! Single-pass syntax highlighting for fenced code blocks
//!
//! Each supported language has a small left-to-right tokenizer. At every
//! position the scanner classifies the longest token it recognizes, with
//! comments, strings and docstrings checked before keywords, numbers and
//! identifiers. Tokens partition the raw input exactly, so highlighting can
//! escape each token as it is emitted and never touches markup it inserted.

mod markup;
mod python;
mod script;
mod stylesheet;

use crate::escape::push_escaped;
use std::fmt;

/// Languages with a dedicated tokenizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Script,
    Python,
    Markup,
    Stylesheet,
}

impl Language {
    /// Resolve a fence language tag (case-insensitive)
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "js" | "javascript" | "jsx" | "mjs" | "cjs" => Some(Language::Script),
            "py" | "python" | "python3" => Some(Language::Python),
            "html" | "htm" | "xml" | "svg" | "xhtml" => Some(Language::Markup),
            "css" => Some(Language::Stylesheet),
            _ => None,
        }
    }
}

/// Semantic category of a highlighted span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    Keyword,
    Function,
    Comment,
    String,
    Number,
    Tag,
    Attribute,
    Value,
    Selector,
    Property,
    Docstring,
}

impl TokenClass {
    fn as_str(&self) -> &'static str {
        match self {
            TokenClass::Keyword => "keyword",
            TokenClass::Function => "function",
            TokenClass::Comment => "comment",
            TokenClass::String => "string",
            TokenClass::Number => "number",
            TokenClass::Tag => "tag",
            TokenClass::Attribute => "attribute",
            TokenClass::Value => "value",
            TokenClass::Selector => "selector",
            TokenClass::Property => "property",
            TokenClass::Docstring => "docstring",
        }
    }

    /// CSS class attached to spans of this class
    pub fn css_class(&self) -> String {
        format!("hl-{}", self.as_str())
    }
}

impl fmt::Display for TokenClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A slice of the source text, optionally classified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub class: Option<TokenClass>,
    pub text: &'a str,
}

/// Split `code` into tokens for `language`.
///
/// Concatenating the token texts yields `code` unchanged.
pub fn tokenize(code: &str, language: Language) -> Vec<Token<'_>> {
    match language {
        Language::Script => script::tokenize(code),
        Language::Python => python::tokenize(code),
        Language::Markup => markup::tokenize(code),
        Language::Stylesheet => stylesheet::tokenize(code),
    }
}

/// Highlight raw `code` for the language named by `tag`.
///
/// The result is always HTML-escaped. Unknown languages are escaped only.
pub fn highlight(code: &str, tag: &str) -> String {
    match Language::from_tag(tag) {
        Some(language) => render_tokens(&tokenize(code, language)),
        None => crate::escape::escape_html(code),
    }
}

/// Emit escaped token text, wrapping classified tokens in spans
pub fn render_tokens(tokens: &[Token<'_>]) -> String {
    let mut out = String::new();
    for token in tokens {
        match token.class {
            Some(class) => {
                out.push_str("<span class=\"");
                out.push_str(&class.css_class());
                out.push_str("\">");
                push_escaped(&mut out, token.text);
                out.push_str("</span>");
            }
            None => push_escaped(&mut out, token.text),
        }
    }
    out
}

/// Left-to-right cursor shared by the language tokenizers.
///
/// Text skipped with [`Scanner::skip`] accumulates into a single plain token
/// that is flushed whenever a classified token is emitted.
pub(crate) struct Scanner<'a> {
    src: &'a str,
    pos: usize,
    plain_start: usize,
    tokens: Vec<Token<'a>>,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            plain_start: 0,
            tokens: Vec::new(),
        }
    }

    pub(crate) fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Leave `len` bytes unclassified
    pub(crate) fn skip(&mut self, len: usize) {
        self.pos = (self.pos + len).min(self.src.len());
    }

    /// Leave the next char unclassified
    pub(crate) fn skip_char(&mut self) {
        let len = self.peek().map_or(0, char::len_utf8);
        self.skip(len);
    }

    /// Classify the next `len` bytes
    pub(crate) fn emit(&mut self, class: TokenClass, len: usize) {
        if len == 0 {
            return;
        }
        self.flush_plain();
        let end = (self.pos + len).min(self.src.len());
        self.tokens.push(Token {
            class: Some(class),
            text: &self.src[self.pos..end],
        });
        self.pos = end;
        self.plain_start = end;
    }

    pub(crate) fn finish(mut self) -> Vec<Token<'a>> {
        self.flush_plain();
        self.tokens
    }

    fn flush_plain(&mut self) {
        if self.pos > self.plain_start {
            self.tokens.push(Token {
                class: None,
                text: &self.src[self.plain_start..self.pos],
            });
        }
        self.plain_start = self.pos;
    }
}

/// Length of the rest of the current line, excluding the newline
pub(crate) fn line_len(rest: &str) -> usize {
    rest.find('\n').unwrap_or(rest.len())
}

/// Length of a construct opened by `open_len` bytes and closed by `close`.
/// Unterminated constructs run to the end of the input.
pub(crate) fn delimited_len(rest: &str, open_len: usize, close: &str) -> usize {
    match rest[open_len..].find(close) {
        Some(idx) => open_len + idx + close.len(),
        None => rest.len(),
    }
}

/// Length of a quoted string starting at `rest`, honouring backslash escapes.
/// Single-line strings stop before an unescaped newline.
pub(crate) fn quoted_len(rest: &str, multiline: bool) -> usize {
    let mut chars = rest.char_indices();
    let quote = match chars.next() {
        Some((_, q)) => q,
        None => return 0,
    };

    while let Some((idx, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '\n' if !multiline => return idx,
            c if c == quote => return idx + c.len_utf8(),
            _ => {}
        }
    }

    rest.len()
}

/// Length of the identifier at the start of `rest` (0 if none)
pub(crate) fn ident_len(rest: &str, extra: fn(char) -> bool) -> usize {
    let mut chars = rest.char_indices();
    match chars.next() {
        Some((_, c)) if c.is_alphabetic() || c == '_' || extra(c) => {}
        _ => return 0,
    }
    chars
        .find(|&(_, c)| !(c.is_alphanumeric() || c == '_' || extra(c)))
        .map_or(rest.len(), |(idx, _)| idx)
}

/// Length of the numeric literal at the start of `rest` (0 if none)
pub(crate) fn number_len(rest: &str) -> usize {
    let bytes = rest.as_bytes();
    let starts_number = match bytes.first() {
        Some(b) if b.is_ascii_digit() => true,
        Some(b'.') => bytes.get(1).is_some_and(u8::is_ascii_digit),
        _ => false,
    };
    if !starts_number {
        return 0;
    }

    if bytes.len() > 2 && bytes[0] == b'0' && matches!(bytes[1], b'x' | b'X' | b'b' | b'B' | b'o' | b'O')
    {
        let digits = bytes[2..]
            .iter()
            .take_while(|b| b.is_ascii_hexdigit() || **b == b'_')
            .count();
        if digits > 0 {
            return 2 + digits;
        }
    }

    let digit_run = |from: usize| {
        bytes[from..]
            .iter()
            .take_while(|b| b.is_ascii_digit() || **b == b'_')
            .count()
    };

    let mut len = digit_run(0);
    if bytes.get(len) == Some(&b'.') && bytes.get(len + 1).is_some_and(u8::is_ascii_digit) {
        len += 1 + digit_run(len + 1);
    }
    if matches!(bytes.get(len), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(len + 1), Some(b'+' | b'-')));
        if bytes.get(len + 1 + sign).is_some_and(u8::is_ascii_digit) {
            len += 1 + sign + digit_run(len + 1 + sign);
        }
    }

    len
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::{Token, TokenClass};

    /// Texts of tokens carrying `class`
    pub fn texts_of<'a>(tokens: &[Token<'a>], class: TokenClass) -> Vec<&'a str> {
        tokens
            .iter()
            .filter(|t| t.class == Some(class))
            .map(|t| t.text)
            .collect()
    }

    pub fn joined(tokens: &[Token<'_>]) -> String {
        tokens.iter().map(|t| t.text).collect()
    }
}
