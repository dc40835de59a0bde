//! JavaScript tokenizer

use super::{delimited_len, ident_len, line_len, number_len, quoted_len, Scanner, Token, TokenClass};

const KEYWORDS: &[&str] = &[
    "async", "await", "break", "case", "catch", "class", "const", "continue", "default", "delete",
    "do", "else", "export", "extends", "false", "finally", "for", "from", "function", "if",
    "import", "in", "instanceof", "let", "new", "null", "of", "return", "static", "super",
    "switch", "this", "throw", "true", "try", "typeof", "undefined", "var", "void", "while",
    "yield",
];

fn is_ident_extra(c: char) -> bool {
    c == '$'
}

pub(super) fn tokenize(code: &str) -> Vec<Token<'_>> {
    let mut scanner = Scanner::new(code);

    while let Some(c) = scanner.peek() {
        let rest = scanner.rest();

        if rest.starts_with("//") {
            scanner.emit(TokenClass::Comment, line_len(rest));
        } else if rest.starts_with("/*") {
            scanner.emit(TokenClass::Comment, delimited_len(rest, 2, "*/"));
        } else if matches!(c, '"' | '\'') {
            scanner.emit(TokenClass::String, quoted_len(rest, false));
        } else if c == '`' {
            scanner.emit(TokenClass::String, quoted_len(rest, true));
        } else if let len @ 1.. = number_len(rest) {
            scanner.emit(TokenClass::Number, len);
        } else if let len @ 1.. = ident_len(rest, is_ident_extra) {
            let word = &rest[..len];
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
    fn test_loop_keywords_and_function() {
        let code = "for (let i=0;i<3;i++) { console.log(i); }";
        let tokens = tokenize(code);
        assert_eq!(joined(&tokens), code);
        assert_eq!(texts_of(&tokens, TokenClass::Keyword), vec!["for", "let"]);
        assert_eq!(texts_of(&tokens, TokenClass::Function), vec!["log"]);
        assert_eq!(texts_of(&tokens, TokenClass::Number), vec!["0", "3"]);
    }

    #[test]
    fn test_keywords_inside_strings_and_comments_not_matched() {
        let code = "const s = \"if return\"; // while true\n/* for let */ x";
        let tokens = tokenize(code);
        assert_eq!(texts_of(&tokens, TokenClass::Keyword), vec!["const"]);
        assert_eq!(texts_of(&tokens, TokenClass::String), vec!["\"if return\""]);
        assert_eq!(
            texts_of(&tokens, TokenClass::Comment),
            vec!["// while true", "/* for let */"]
        );
    }

    #[test]
    fn test_template_literal_spans_lines() {
        let code = "let t = `a\nb ${c}`;";
        let tokens = tokenize(code);
        assert_eq!(texts_of(&tokens, TokenClass::String), vec!["`a\nb ${c}`"]);
    }

    #[test]
    fn test_escaped_quote_in_string() {
        let code = r#"say('it\'s', "q\"q")"#;
        let tokens = tokenize(code);
        assert_eq!(texts_of(&tokens, TokenClass::Function), vec!["say"]);
        assert_eq!(
            texts_of(&tokens, TokenClass::String),
            vec![r"'it\'s'", r#""q\"q""#]
        );
    }

    #[test]
    fn test_identifier_containing_keyword_not_split() {
        let tokens = tokenize("format_if iffy forEach(x)");
        assert!(texts_of(&tokens, TokenClass::Keyword).is_empty());
        assert_eq!(texts_of(&tokens, TokenClass::Function), vec!["forEach"]);
    }

    #[test]
    fn test_unterminated_comment_and_string() {
        let code = "x = 'open\n/* never closed";
        let tokens = tokenize(code);
        assert_eq!(joined(&tokens), code);
        assert_eq!(texts_of(&tokens, TokenClass::String), vec!["'open"]);
        assert_eq!(texts_of(&tokens, TokenClass::Comment), vec!["/* never closed"]);
    }

    #[test]
    fn test_digits_in_identifier_not_numbers() {
        let tokens = tokenize("v8 = x2 + 10");
        assert_eq!(texts_of(&tokens, TokenClass::Number), vec!["10"]);
    }
}
