//! Top-level entry point: an answer payload in, one HTML fragment out

use std::panic::{self, AssertUnwindSafe};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::escape::escape_html;
use crate::format::format_with;
use crate::render::{is_safe_url, Renderer};

/// Fragment shown in place of an answer that could not be rendered
pub const RENDER_ERROR_HTML: &str =
    r#"<div class="render-error">Sorry, this answer could not be displayed.</div>"#;

/// Payload handed over by the request handler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Image {
        question: String,
        #[serde(rename = "imageUrl")]
        image_url: String,
    },
    Text {
        question: String,
        answer: String,
    },
}

impl Answer {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .context("Expected {\"question\", \"answer\"} or {\"question\", \"imageUrl\"}")
    }

    pub fn question(&self) -> &str {
        match self {
            Answer::Image { question, .. } | Answer::Text { question, .. } => question,
        }
    }
}

/// Image display fragment with a download control. No markdown processing.
pub fn render_image(question: &str, url: &str) -> String {
    let alt = escape_html(question);
    if !is_safe_url(url) {
        log::warn!("Refusing to display image with unsupported URL scheme");
        return format!(r#"<div class="image-answer"><p class="image-unavailable">{alt}</p></div>"#);
    }

    let src = escape_html(url);
    format!(
        concat!(
            r#"<div class="image-answer">"#,
            r#"<img src="{src}" alt="{alt}" class="generated-image">"#,
            r#"<a class="download-button" href="{src}" download target="_blank" rel="noopener noreferrer">Download</a>"#,
            "</div>"
        ),
        src = src,
        alt = alt,
    )
}

/// Render an answer. Never fails: unexpected failures are logged and replaced
/// by [`RENDER_ERROR_HTML`].
pub fn render_answer(answer: &Answer, config: &Config) -> String {
    let result = panic::catch_unwind(AssertUnwindSafe(|| render_answer_inner(answer, config)));
    match result {
        Ok(html) => html,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown failure".to_string());
            log::error!("Rendering answer failed: {message}");
            RENDER_ERROR_HTML.to_string()
        }
    }
}

fn render_answer_inner(answer: &Answer, config: &Config) -> String {
    match answer {
        Answer::Image {
            question,
            image_url,
        } => render_image(question, image_url),
        Answer::Text { question, answer } => {
            let doc = format_with(question, answer, &config.format);
            log::debug!("Rendering answer for {:?}", doc.title);
            Renderer::new(config.render.clone()).render(&doc)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text_answer() -> Result<()> {
        let answer = Answer::from_json(r#"{"question": "why", "answer": "because"}"#)?;
        assert_eq!(
            answer,
            Answer::Text {
                question: "why".to_string(),
                answer: "because".to_string()
            }
        );
        Ok(())
    }

    #[test]
    fn test_parse_image_answer() -> Result<()> {
        let answer = Answer::from_json(r#"{"question": "x", "imageUrl": "http://img/a.png"}"#)?;
        assert!(matches!(answer, Answer::Image { .. }));
        assert_eq!(answer.question(), "x");
        Ok(())
    }

    #[test]
    fn test_parse_rejects_unknown_shape() {
        assert!(Answer::from_json(r#"{"question": "x"}"#).is_err());
    }

    #[test]
    fn test_image_variant() {
        let answer = Answer::Image {
            question: "x".to_string(),
            image_url: "http://img/a.png".to_string(),
        };
        let html = render_answer(&answer, &Config::default());
        assert!(html.contains(r#"<img src="http://img/a.png" alt="x""#));
        assert!(html.contains(r#"href="http://img/a.png" download"#));
        assert!(!html.contains("<h1>"));
    }

    #[test]
    fn test_image_question_not_markdown() {
        let html = render_image("**bold** <b>", "https://img/a.png");
        assert!(html.contains(r#"alt="**bold** &lt;b&gt;""#));
        assert!(!html.contains("<strong>"));
    }

    #[test]
    fn test_image_unsafe_url() {
        let html = render_image("x", "javascript:alert(1)");
        assert!(!html.contains("<img"));
        assert!(!html.contains("javascript:"));
    }

    #[test]
    fn test_text_answer_rendered() {
        let answer = Answer::Text {
            question: "what is a loop".to_string(),
            answer: "A loop repeats code.".to_string(),
        };
        let html = render_answer(&answer, &Config::default());
        assert!(html.starts_with("<h1>what is a loop?</h1>"));
        assert!(html.contains("<p>A loop repeats code.</p>"));
    }
}
