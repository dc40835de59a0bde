//! Response formatting: wraps a question/answer pair into a titled markdown document

use crate::config::FormatConfig;

/// A formatted markdown document, created once per question/answer pair
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    pub title: String,
    pub text: String,
}

impl Document {
    /// The markdown source
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// Format a question/answer pair with the default template
pub fn format(question: &str, answer: &str) -> Document {
    format_with(question, answer, &FormatConfig::default())
}

/// Format a question/answer pair with an explicit template.
///
/// The answer is never truncated, whatever `word_limit` is configured.
pub fn format_with(question: &str, answer: &str, config: &FormatConfig) -> Document {
    let title = make_title(question);
    let text = expand_template(&config.template, &title, answer);
    Document { title, text }
}

/// Derive the title from the question, appending `?` when missing
pub fn make_title(question: &str) -> String {
    if question.ends_with('?') {
        question.to_string()
    } else {
        format!("{question}?")
    }
}

/// Substitute `{title}` and `{answer}` in a single left-to-right pass so that
/// placeholder-like text inside the values is never expanded.
fn expand_template(template: &str, title: &str, answer: &str) -> String {
    let mut out = String::with_capacity(template.len() + title.len() + answer.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        if let Some(after) = tail.strip_prefix("{title}") {
            out.push_str(title);
            rest = after;
        } else if let Some(after) = tail.strip_prefix("{answer}") {
            out.push_str(answer);
            rest = after;
        } else {
            out.push('{');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appends_question_mark() {
        let doc = format("what is a loop", "A loop repeats code.");
        assert_eq!(doc.title, "what is a loop?");
        assert_eq!(doc.text, "# what is a loop?\n\nA loop repeats code.");
    }

    #[test]
    fn test_keeps_existing_question_mark() {
        let doc = format("why?", "Because.");
        assert_eq!(doc.text, "# why?\n\nBecause.");
    }

    #[test]
    fn test_empty_inputs() {
        let doc = format("", "");
        assert_eq!(doc.title, "?");
        assert_eq!(doc.text, "# ?\n\n");
    }

    #[test]
    fn test_long_answer_not_truncated() {
        let answer = "word ".repeat(10_000);
        let config = FormatConfig {
            word_limit: Some(5),
            ..Default::default()
        };
        let doc = format_with("q", &answer, &config);
        assert!(doc.text.ends_with(&answer));
    }

    #[test]
    fn test_placeholders_in_values_not_expanded() {
        let doc = format("{answer}", "{title}");
        assert_eq!(doc.text, "# {answer}?\n\n{title}");
    }

    #[test]
    fn test_custom_template() {
        let config = FormatConfig {
            template: "## {title}\n---\n{answer}\n{unknown}".to_string(),
            ..Default::default()
        };
        let doc = format_with("Hi", "there", &config);
        assert_eq!(doc.text, "## Hi?\n---\nthere\n{unknown}");
    }
}
