//! HTML/XML tokenizer

use super::{delimited_len, quoted_len, Scanner, Token, TokenClass};

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '-' | '_' | ':' | '.')
}

fn starts_tag(rest: &str) -> bool {
    let mut chars = rest.chars();
    chars.next() == Some('<')
        && chars
            .next()
            .is_some_and(|c| c.is_alphabetic() || matches!(c, '/' | '!' | '?'))
}

fn whitespace_len(rest: &str) -> usize {
    rest.find(|c: char| !c.is_whitespace()).unwrap_or(rest.len())
}

pub(super) fn tokenize(code: &str) -> Vec<Token<'_>> {
    let mut scanner = Scanner::new(code);

    while !scanner.rest().is_empty() {
        let rest = scanner.rest();

        if rest.starts_with("<!--") {
            scanner.emit(TokenClass::Comment, delimited_len(rest, 4, "-->"));
        } else if starts_tag(rest) {
            scan_tag(&mut scanner);
        } else {
            // Text content up to the next '<'
            let first = rest.chars().next().map_or(1, char::len_utf8);
            let len = rest[first..].find('<').map_or(rest.len(), |idx| idx + first);
            scanner.skip(len);
        }
    }

    scanner.finish()
}

/// Scan from `<` through the closing `>` of one tag
fn scan_tag(scanner: &mut Scanner<'_>) {
    let rest = scanner.rest();
    let marker = usize::from(rest[1..].starts_with(['/', '!', '?']));
    let name = rest[1 + marker..]
        .find(|c: char| !is_name_char(c))
        .unwrap_or(rest.len() - 1 - marker);
    scanner.emit(TokenClass::Tag, 1 + marker + name);

    loop {
        let rest = scanner.rest();
        let Some(c) = rest.chars().next() else {
            return;
        };

        if c.is_whitespace() {
            scanner.skip(whitespace_len(rest));
        } else if rest.starts_with("/>") || rest.starts_with("?>") {
            scanner.emit(TokenClass::Tag, 2);
            return;
        } else if c == '>' {
            scanner.emit(TokenClass::Tag, 1);
            return;
        } else if c == '<' {
            // Malformed: a new tag starts before this one closed
            return;
        } else if matches!(c, '"' | '\'') {
            scanner.emit(TokenClass::Value, quoted_len(rest, true));
        } else if c == '=' {
            scanner.skip(1);
            scan_attribute_value(scanner);
        } else {
            let len = rest
                .find(|c: char| c.is_whitespace() || matches!(c, '=' | '>' | '/' | '"' | '\'' | '<'))
                .unwrap_or(rest.len());
            if len == 0 {
                scanner.skip_char();
                continue;
            }
            let after = &rest[len..];
            if after[whitespace_len(after)..].starts_with('=') {
                scanner.emit(TokenClass::Attribute, len);
            } else {
                scanner.skip(len);
            }
        }
    }
}

fn scan_attribute_value(scanner: &mut Scanner<'_>) {
    let ws = whitespace_len(scanner.rest());
    scanner.skip(ws);

    let rest = scanner.rest();
    if rest.starts_with(['"', '\'']) {
        scanner.emit(TokenClass::Value, quoted_len(rest, true));
    } else {
        let len = rest
            .find(|c: char| c.is_whitespace() || c == '>' || c == '<')
            .unwrap_or(rest.len());
        let len = if rest[..len].ends_with('/') && rest[len..].starts_with('>') {
            len - 1
        } else {
            len
        };
        scanner.emit(TokenClass::Value, len);
    }
}
