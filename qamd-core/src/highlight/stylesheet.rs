//! CSS tokenizer

use super::{delimited_len, quoted_len, Scanner, Token, TokenClass};

/// End of the current selector or declaration: the first `{`, `}`, `;` or
/// comment start outside strings and parentheses
fn segment_end(rest: &str) -> usize {
    let mut idx = 0;
    let mut depth = 0usize;

    while let Some(c) = rest[idx..].chars().next() {
        match c {
            '"' | '\'' => {
                idx += quoted_len(&rest[idx..], true);
                continue;
            }
            '/' if rest[idx..].starts_with("/*") => return idx,
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            '{' | '}' => return idx,
            ';' if depth == 0 => return idx,
            _ => {}
        }
        idx += c.len_utf8();
    }

    rest.len()
}

fn trailing_ws(text: &str) -> usize {
    text.len() - text.trim_end().len()
}

fn leading_ws(text: &str) -> usize {
    text.len() - text.trim_start().len()
}

pub(super) fn tokenize(code: &str) -> Vec<Token<'_>> {
    let mut scanner = Scanner::new(code);

    while let Some(c) = scanner.peek() {
        let rest = scanner.rest();

        if rest.starts_with("/*") {
            scanner.emit(TokenClass::Comment, delimited_len(rest, 2, "*/"));
            continue;
        }
        if c.is_whitespace() || matches!(c, '{' | '}' | ';') {
            scanner.skip_char();
            continue;
        }

        let end = segment_end(rest);
        if end == 0 {
            scanner.skip_char();
            continue;
        }
        let segment = &rest[..end];

        if rest[end..].starts_with('{') {
            let ws = trailing_ws(segment);
            scanner.emit(TokenClass::Selector, end - ws);
            scanner.skip(ws);
        } else if let Some(colon) = segment.find(':') {
            let property = &segment[..colon];
            let prop_ws = trailing_ws(property);
            scanner.emit(TokenClass::Property, colon - prop_ws);
            scanner.skip(prop_ws + 1);

            let value = &segment[colon + 1..];
            let lead = leading_ws(value);
            let trail = trailing_ws(value);
            scanner.skip(lead);
            if value.len() > lead + trail {
                scanner.emit(TokenClass::Value, value.len() - lead - trail);
            }
            scanner.skip(trail);
        } else {
            scanner.skip(end);
        }
    }

    scanner.finish()
}
