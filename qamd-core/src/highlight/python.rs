//! Python tokenizer

use super::{delimited_len, ident_len, line_len, number_len, quoted_len, Scanner, Token, TokenClass};

const KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

fn no_extra(_: char) -> bool {
    false
}

/// String prefixes such as `r`, `b`, `f`, `rb`
fn is_string_prefix(word: &str) -> bool {
    word.len() <= 2 && word.chars().all(|c| matches!(c, 'r' | 'R' | 'b' | 'B' | 'f' | 'F' | 'u' | 'U'))
}

/// Length and class of a string literal starting at `rest` (quote first)
fn string_literal(rest: &str) -> Option<(usize, TokenClass)> {
    if rest.starts_with("\"\"\"") {
        Some((delimited_len(rest, 3, "\"\"\""), TokenClass::Docstring))
    } else if rest.starts_with("'''") {
        Some((delimited_len(rest, 3, "'''"), TokenClass::Docstring))
    } else if rest.starts_with(['"', '\'']) {
        Some((quoted_len(rest, false), TokenClass::String))
    } else {
        None
    }
}

pub(super) fn tokenize(code: &str) -> Vec<Token<'_>> {
    let mut scanner = Scanner::new(code);

    while let Some(c) = scanner.peek() {
        let rest = scanner.rest();

        if c == '#' {
            scanner.emit(TokenClass::Comment, line_len(rest));
        } else if let Some((len, class)) = string_literal(rest) {
            scanner.emit(class, len);
        } else if let len @ 1.. = number_len(rest) {
            scanner.emit(TokenClass::Number, len);
        } else if let len @ 1.. = ident_len(rest, no_extra) {
            let word = &rest[..len];
            if is_string_prefix(word) {
                if let Some((str_len, class)) = string_literal(&rest[len..]) {
                    scanner.emit(class, len + str_len);
                    continue;
                }
            }

            if KEYWORDS.contains(&word) {
                scanner.emit(TokenClass::Keyword, len);
            } else if rest[len..].starts_with('(') {
                scanner.emit(TokenClass::Function, len);
            } else {
                scanner.skip(len);
            }
        } else {
            scanner.skip_char();
        }
    }

    scanner.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::test_support::{joined, texts_of};

    #[test]
    fn test_function_definition() {
        let code = "def greet(name):\n    return f\"hi {name}\"  # say hi\n";
        let tokens = tokenize(code);
        assert_eq!(joined(&tokens), code);
        assert_eq!(texts_of(&tokens, TokenClass::Keyword), vec!["def", "return"]);
        assert_eq!(texts_of(&tokens, TokenClass::Function), vec!["greet"]);
        assert_eq!(texts_of(&tokens, TokenClass::String), vec!["f\"hi {name}\""]);
        assert_eq!(texts_of(&tokens, TokenClass::Comment), vec!["# say hi"]);
    }

    #[test]
    fn test_docstring_takes_priority() {
        let code = "def f():\n    \"\"\"Return None if x is True.\n    \"\"\"\n    pass";
        let tokens = tokenize(code);
        assert_eq!(
            texts_of(&tokens, TokenClass::Docstring),
            vec!["\"\"\"Return None if x is True.\n    \"\"\""]
        );
        assert_eq!(texts_of(&tokens, TokenClass::Keyword), vec!["def", "pass"]);
    }

    #[test]
    fn test_single_quoted_docstring() {
        let tokens = tokenize("'''doc'''");
        assert_eq!(texts_of(&tokens, TokenClass::Docstring), vec!["'''doc'''"]);
    }

    #[test]
    fn test_hash_inside_string_is_not_comment() {
        let tokens = tokenize("x = '#not comment'  # real");
        assert_eq!(texts_of(&tokens, TokenClass::String), vec!["'#not comment'"]);
        assert_eq!(texts_of(&tokens, TokenClass::Comment), vec!["# real"]);
    }

    #[test]
    fn test_prefix_letters_without_quote_are_identifiers() {
        let tokens = tokenize("rb = b + f(1)");
        assert!(texts_of(&tokens, TokenClass::String).is_empty());
        assert_eq!(texts_of(&tokens, TokenClass::Function), vec!["f"]);
        assert_eq!(texts_of(&tokens, TokenClass::Number), vec!["1"]);
    }

    #[test]
    fn test_keyword_constants() {
        let tokens = tokenize("ok = x is None or flag and not False");
        assert_eq!(
            texts_of(&tokens, TokenClass::Keyword),
            vec!["is", "None", "or", "and", "not", "False"]
        );
    }
}
