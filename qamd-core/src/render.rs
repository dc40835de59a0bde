//! Markdown to HTML rendering
//!
//! The pipeline runs in a fixed order. Fenced code is pulled out first and
//! replaced by opaque slots, so no later markdown transform can see code
//! content; slots are filled back in as the very last step.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use uuid::Uuid;

use crate::codec::encode_raw;
use crate::config::RenderConfig;
use crate::copy::copy_button_html;
use crate::escape::escape_html;
use crate::fence::{self, Fragment};
use crate::format::Document;
use crate::highlight::highlight;

const SLOT_OPEN: char = '\u{E000}';
const SLOT_CLOSE: char = '\u{E001}';

/// Attributes every generated anchor carries
const LINK_ATTRS: &str = r#"target="_blank" rel="noopener noreferrer""#;

static BLANK_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n(?:[ \t]*\n){2,}").unwrap());
static INLINE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`\n]+)`").unwrap());
static H3: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^### (.+)$").unwrap());
static H2: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^## (.+)$").unwrap());
static H1: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^# (.+)$").unwrap());
static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(\S(?:.*?\S)?)\*\*").unwrap());
// Emphasis may not start or end on a '*', so a stray bold marker stays literal
static ITALIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*([^*\s](?:[^*\n]*?[^*\s])?)\*").unwrap());
static LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\[\]]+)\]\(([^()\s]+)\)").unwrap());
static CITATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r#"\[<a href="([^"]+)" {}>(\d+)</a>\]"#,
        regex::escape(LINK_ATTRS)
    ))
    .unwrap()
});
static PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());
static BETWEEN_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r">\s+<").unwrap());
static SLOT: Lazy<Regex> = Lazy::new(|| Regex::new("\u{E000}(\\d+)\u{E001}").unwrap());

/// A fenced code block found during one render pass
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeBlock {
    /// Unique within the render pass that produced it
    pub id: String,
    pub language: Option<String>,
    /// Code exactly as written between the fences (minus surrounding blank lines)
    pub raw: String,
}

/// Output of one render pass
#[derive(Clone, Debug, Default)]
pub struct Rendered {
    pub html: String,
    pub blocks: Vec<CodeBlock>,
}

/// Render a formatted document with default settings
pub fn render(doc: &Document) -> String {
    Renderer::default().render(doc)
}

/// Markdown renderer
#[derive(Clone, Debug, Default)]
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn render(&self, doc: &Document) -> String {
        self.render_document(doc).html
    }

    pub fn render_document(&self, doc: &Document) -> Rendered {
        self.render_markdown(doc.as_str())
    }

    /// Render markdown text to HTML, returning the code blocks alongside
    pub fn render_markdown(&self, text: &str) -> Rendered {
        let text = text.trim();
        let mut slots = Slots::default();
        let mut blocks = Vec::new();

        // Fenced code first; everything after this only sees prose and slots.
        // Code bodies are kept byte for byte.
        let mut prose = String::with_capacity(text.len());
        for fragment in fence::split(text) {
            match fragment {
                Fragment::Text(t) => {
                    let t = normalize_prose(t);
                    prose.push_str(&BLANK_RUNS.replace_all(&t, "\n\n"));
                }
                Fragment::Fence(f) => {
                    let block = CodeBlock {
                        id: new_block_id(),
                        language: f.language.map(str::to_string),
                        raw: f.body.to_string(),
                    };
                    let token = slots.push(SlotKind::Block, self.code_block_html(&block));
                    prose.push_str("\n\n");
                    prose.push_str(&token);
                    prose.push_str("\n\n");
                    blocks.push(block);
                }
            }
        }

        let prose = INLINE_CODE.replace_all(&prose, |caps: &Captures| {
            slots.push(
                SlotKind::Inline,
                format!(r#"<code class="inline-code">{}</code>"#, escape_html(&caps[1])),
            )
        });

        let html = escape_html(&prose);
        let html = apply_inline_markdown(&html);
        let html = assemble_paragraphs(&html, &slots);
        let html = collapse_between_tags(&html);
        let html = slots.restore(&html);

        log::debug!(
            "Rendered {} bytes of markdown into {} bytes of HTML with {} code blocks",
            text.len(),
            html.len(),
            blocks.len()
        );

        Rendered { html, blocks }
    }

    fn code_block_html(&self, block: &CodeBlock) -> String {
        let language = block.language.as_deref().unwrap_or("");
        let label = if language.is_empty() { "code" } else { language };
        let class = if language.is_empty() {
            "plaintext".to_string()
        } else {
            language.to_ascii_lowercase()
        };
        let body = if self.config.highlight {
            highlight(&block.raw, language)
        } else {
            escape_html(&block.raw)
        };

        format!(
            concat!(
                r#"<div class="code-block" data-block-id="{id}">"#,
                r#"<div class="code-header"><span class="code-language">{label}</span>{button}</div>"#,
                r#"<pre><code class="language-{class}" id="{id}" data-raw="{raw}">{body}</code></pre>"#,
                "</div>"
            ),
            id = block.id,
            label = escape_html(label),
            button = copy_button_html(&block.id),
            class = escape_html(&class),
            raw = encode_raw(&block.raw),
            body = body,
        )
    }
}

fn new_block_id() -> String {
    format!("code-{}", Uuid::new_v4().simple())
}

/// Unify line endings and drop slot marker characters
fn normalize_prose(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace([SLOT_OPEN, SLOT_CLOSE], "")
}

/// Headers, bold, italic, links, then citations. Expects escaped text.
fn apply_inline_markdown(html: &str) -> String {
    let html = H3.replace_all(html, "<h3>$1</h3>");
    let html = H2.replace_all(&html, "<h2>$1</h2>");
    let html = H1.replace_all(&html, "<h1>$1</h1>");
    let html = BOLD.replace_all(&html, "<strong>$1</strong>");
    let html = ITALIC.replace_all(&html, "<em>$1</em>");
    // The URL was escaped with the rest of the prose; it is not escaped again
    let html = LINK.replace_all(&html, |caps: &Captures| {
        let url = &caps[2];
        if is_safe_url(url) {
            format!(r#"<a href="{url}" {LINK_ATTRS}>{}</a>"#, &caps[1])
        } else {
            caps[0].to_string()
        }
    });
    let html = CITATION.replace_all(
        &html,
        format!(r#"<sup class="citation"><a href="$1" {LINK_ATTRS}>[$2]</a></sup>"#).as_str(),
    );
    html.into_owned()
}

/// Allow web and mail links, fragments and relative paths
pub(crate) fn is_safe_url(url: &str) -> bool {
    match url.find(':') {
        None => true,
        Some(colon) => {
            let scheme = url[..colon].to_ascii_lowercase();
            matches!(scheme.as_str(), "http" | "https" | "mailto")
                || url[..colon].contains(['/', '?', '#'])
        }
    }
}

/// Wrap prose in paragraphs, keeping headers and code blocks outside of them
fn assemble_paragraphs(html: &str, slots: &Slots) -> String {
    let mut out = String::with_capacity(html.len() + 64);

    for paragraph in PARAGRAPH_BREAK.split(html) {
        let mut lines: Vec<&str> = Vec::new();
        for line in paragraph.lines().map(str::trim_end) {
            if is_header(line) || slots.is_block(line) {
                push_paragraph(&mut out, &mut lines);
                out.push_str(line.trim_start());
            } else if !line.trim().is_empty() {
                lines.push(line.trim());
            }
        }
        push_paragraph(&mut out, &mut lines);
    }

    out
}

fn push_paragraph(out: &mut String, lines: &mut Vec<&str>) {
    if lines.is_empty() {
        return;
    }
    out.push_str("<p>");
    out.push_str(&lines.join("<br>"));
    out.push_str("</p>");
    lines.clear();
}

fn is_header(line: &str) -> bool {
    ["1", "2", "3"].iter().any(|level| {
        line.starts_with(&format!("<h{level}>")) && line.ends_with(&format!("</h{level}>"))
    })
}

const BLOCK_TAGS: &[&str] = &["p", "div", "pre", "br", "h1", "h2", "h3", "h4", "h5", "h6"];

/// Remove whitespace between tags next to block-level elements and reduce it
/// to a single space between inline elements
fn collapse_between_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut last = 0;

    for m in BETWEEN_TAGS.find_iter(html) {
        // Keep the '>' that closes the previous tag
        out.push_str(&html[last..=m.start()]);
        let prev = html[..m.start()].rfind('<').map(|idx| tag_name(&html[idx..]));
        let next = tag_name(&html[m.end() - 1..]);
        let touches_block = prev.is_some_and(|name| BLOCK_TAGS.contains(&name))
            || BLOCK_TAGS.contains(&next);
        if !touches_block {
            out.push(' ');
        }
        last = m.end() - 1;
    }
    out.push_str(&html[last..]);

    out
}

/// Name of the tag starting at `tag` (which begins with '<')
fn tag_name(tag: &str) -> &str {
    let name = tag.trim_start_matches('<').trim_start_matches('/');
    let end = name
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(name.len());
    &name[..end]
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SlotKind {
    Block,
    Inline,
}

/// Pre-rendered HTML parked outside the text while markdown transforms run
#[derive(Default)]
struct Slots {
    entries: Vec<(SlotKind, String)>,
}

impl Slots {
    fn push(&mut self, kind: SlotKind, html: String) -> String {
        let token = format!("{SLOT_OPEN}{}{SLOT_CLOSE}", self.entries.len());
        self.entries.push((kind, html));
        token
    }

    /// Whether `line` consists of exactly one block slot
    fn is_block(&self, line: &str) -> bool {
        let Some(inner) = line
            .trim()
            .strip_prefix(SLOT_OPEN)
            .and_then(|s| s.strip_suffix(SLOT_CLOSE))
        else {
            return false;
        };
        inner
            .parse::<usize>()
            .ok()
            .and_then(|idx| self.entries.get(idx))
            .is_some_and(|(kind, _)| *kind == SlotKind::Block)
    }

    fn restore(&self, html: &str) -> String {
        SLOT.replace_all(html, |caps: &Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|idx| self.entries.get(idx))
                .map(|(_, html)| html.clone())
                .unwrap_or_default()
        })
        .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode_raw;
    use crate::format::format;

    fn render_text(text: &str) -> Rendered {
        Renderer::default().render_markdown(text)
    }

    #[test]
    fn test_headers_and_paragraphs() {
        let out = render_text("# Title\n\nFirst line\nsecond line\n\n## Sub\nbody");
        assert_eq!(
            out.html,
            "<h1>Title</h1><p>First line<br>second line</p><h2>Sub</h2><p>body</p>"
        );
    }

    #[test]
    fn test_level_three_header_and_deeper_literal() {
        let out = render_text("### Three\n#### Four");
        assert_eq!(out.html, "<h3>Three</h3><p>#### Four</p>");
    }

    #[test]
    fn test_normalizes_blank_line_runs() {
        let out = render_text("\n\n  a\n\n\n\n\nb  \n\n");
        assert_eq!(out.html, "<p>a</p><p>b</p>");
    }

    #[test]
    fn test_bold_italic_inline_code() {
        let out = render_text("Use **bold**, *italic* and `a * b`.");
        assert_eq!(
            out.html,
            "<p>Use <strong>bold</strong>, <em>italic</em> and <code class=\"inline-code\">a * b</code>.</p>"
        );
    }

    #[test]
    fn test_unbalanced_markers_render_literally() {
        let out = render_text("2 * 3 = 6 and **open and `tick");
        assert_eq!(out.html, "<p>2 * 3 = 6 and **open and `tick</p>");
    }

    #[test]
    fn test_unclosed_bold_does_not_swallow_marker() {
        let out = render_text("**a* and x");
        assert!(!out.html.contains("<em>*"));
        assert_eq!(out.html, "<p>*<em>a</em> and x</p>");

        let out = render_text("*b** c");
        assert_eq!(out.html, "<p><em>b</em>* c</p>");
    }

    #[test]
    fn test_link_opens_in_new_tab() {
        let out = render_text("See [docs](https://example.com/a?b=1&c=2).");
        assert!(out.html.contains(
            r#"<a href="https://example.com/a?b=1&amp;c=2" target="_blank" rel="noopener noreferrer">docs</a>"#
        ));
    }

    #[test]
    fn test_unsafe_link_scheme_left_literal() {
        let out = render_text("[click](javascript:alert(1))");
        assert!(!out.html.contains("<a "));
        let out = render_text("[click](javascript:void)");
        assert!(!out.html.contains("href"));
    }

    #[test]
    fn test_citation_marker() {
        let out = render_text("foo [[1](https://example.com)]");
        assert_eq!(
            out.html,
            r#"<p>foo <sup class="citation"><a href="https://example.com" target="_blank" rel="noopener noreferrer">[1]</a></sup></p>"#
        );
    }

    #[test]
    fn test_raw_html_in_prose_is_escaped() {
        let out = render_text("<script>alert('x')</script>");
        assert_eq!(
            out.html,
            "<p>&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;</p>"
        );
    }

    #[test]
    fn test_code_block_container() {
        let out = render_text("Intro\n```js\nlet a = 1;\n```\nOutro");
        assert_eq!(out.blocks.len(), 1);
        let block = &out.blocks[0];
        assert_eq!(block.language.as_deref(), Some("js"));
        assert_eq!(block.raw, "let a = 1;");
        assert!(block.id.starts_with("code-"));

        assert!(out.html.starts_with("<p>Intro</p><div class=\"code-block\""));
        assert!(out.html.ends_with("</div><p>Outro</p>"));
        assert!(out
            .html
            .contains("<span class=\"code-language\">js</span>"));
        assert!(out
            .html
            .contains(&format!("data-copy-target=\"{}\"", block.id)));
        assert!(out.html.contains(&format!(
            "<code class=\"language-js\" id=\"{}\" data-raw=\"{}\">",
            block.id,
            encode_raw("let a = 1;")
        )));
        assert!(!out.html.contains("<p><div"));
    }

    #[test]
    fn test_code_block_without_language_labeled_code() {
        let out = render_text("```\nx\n```");
        assert!(out.html.contains("<span class=\"code-language\">code</span>"));
        assert!(out.html.contains("class=\"language-plaintext\""));
    }

    #[test]
    fn test_code_content_is_not_markdown() {
        let raw = "# not a header\n**not bold** [x](http://y) `z`\n\n\n\nend";
        let out = render_text(&format!("```\n{raw}\n```"));
        assert!(!out.html.contains("<h1>"));
        assert!(!out.html.contains("<strong>"));
        assert!(!out.html.contains("<a href"));
        assert!(!out.html.contains("inline-code"));
        assert_eq!(out.blocks[0].raw, raw);
    }

    #[test]
    fn test_code_indentation_preserved() {
        let raw = "def f():\n    if x:\n        return 1";
        let out = render_text(&format!("```python\n\n{raw}\n\n```"));
        assert_eq!(out.blocks[0].raw, raw);
        assert!(out.html.contains("\n    <span class=\"hl-keyword\">if</span>"));
    }

    #[test]
    fn test_escaping_precedes_highlighting_in_block() {
        let out = render_text("```js\nif (x < 1) { return \"<b>\"; }\n```");
        assert!(!out.html.contains("<b>"));
        assert_eq!(out.html.matches(">if</span>").count(), 1);
        assert_eq!(out.html.matches(">return</span>").count(), 1);
    }

    #[test]
    fn test_highlight_disabled() {
        let renderer = Renderer::new(RenderConfig { highlight: false });
        let out = renderer.render_markdown("```js\nlet a = '<';\n```");
        assert!(!out.html.contains("hl-keyword"));
        assert!(out.html.contains("let a = &#39;&lt;&#39;;"));
    }

    #[test]
    fn test_unterminated_fence() {
        let out = render_text("Look:\n```js\nconst a = `<tpl>`;");
        assert_eq!(out.blocks.len(), 1);
        assert_eq!(out.blocks[0].raw, "const a = `<tpl>`;");
        assert!(!out.html.contains("<tpl>"));
    }

    #[test]
    fn test_empty_code_block() {
        let out = render_text("```js\n```");
        assert_eq!(out.blocks[0].raw, "");
        assert!(out.html.contains(r#"data-raw=""></code>"#));
    }

    #[test]
    fn test_block_ids_unique_per_render() {
        let out = render_text("```\na\n```\n```\nb\n```\n```\nc\n```");
        assert_eq!(out.blocks.len(), 3);
        assert_ne!(out.blocks[0].id, out.blocks[1].id);
        assert_ne!(out.blocks[1].id, out.blocks[2].id);
        assert_ne!(out.blocks[0].id, out.blocks[2].id);
    }

    #[test]
    fn test_slot_characters_in_input_are_dropped() {
        let out = render_text("a \u{E000}0\u{E001} b");
        assert_eq!(out.html, "<p>a 0 b</p>");
    }

    #[test]
    fn test_private_use_characters_in_code_kept() {
        let raw = "let icon = \"\u{E000}\u{E001}\";\nlet slot = \"\u{E000}0\u{E001}\";";
        let out = render_text(&format!("Here:\n```js\n{raw}\n```"));
        assert_eq!(out.blocks[0].raw, raw);
        assert_eq!(decode_raw(&encode_raw(&out.blocks[0].raw)).unwrap(), raw);
        assert!(out.html.contains("\u{E000}0\u{E001}"));
    }

    #[test]
    fn test_carriage_returns_in_code_kept() {
        let raw = "a\r\nb\rc";
        let out = render_text(&format!("Here:\n```js\n{raw}\n```"));
        assert_eq!(out.blocks[0].raw, raw);
    }

    #[test]
    fn test_crlf_document_with_fence() {
        let out = render_text("Intro\r\n```py\r\nx = 1\r\ny = 2\r\n```\r\nOutro");
        assert_eq!(out.blocks[0].language.as_deref(), Some("py"));
        assert_eq!(out.blocks[0].raw, "x = 1\r\ny = 2");
        assert!(out.html.starts_with("<p>Intro</p>"));
        assert!(out.html.ends_with("<p>Outro</p>"));
    }

    #[test]
    fn test_crlf_input() {
        let out = render_text("# T\r\n\r\nline1\r\nline2");
        assert_eq!(out.html, "<h1>T</h1><p>line1<br>line2</p>");
    }

    #[test]
    fn test_collapse_between_tags() {
        assert_eq!(
            collapse_between_tags("<p>a</p>\n  <h1>b</h1> <em>x</em>   <strong>y</strong>"),
            "<p>a</p><h1>b</h1><em>x</em> <strong>y</strong>"
        );
    }

    #[test]
    fn test_rendered_raw_decodes() {
        let raw = "echo \"<&>\" | tr '\\n' ' '\n`backticks`";
        let out = render_text(&format!("```sh\n{raw}\n```"));
        let encoded = encode_raw(&out.blocks[0].raw);
        assert_eq!(decode_raw(&encoded).unwrap(), raw);
    }

    #[test]
    fn test_end_to_end_loop_answer() {
        let doc = format(
            "what is a loop",
            "A loop repeats code:\n```js\nfor (let i=0;i<3;i++) { console.log(i); }\n```",
        );
        let out = Renderer::default().render_document(&doc);
        assert!(out.html.starts_with("<h1>what is a loop?</h1>"));
        assert!(out.html.contains("<p>A loop repeats code:</p>"));
        assert!(out.html.contains("<span class=\"code-language\">js</span>"));
        assert!(out.html.contains("<span class=\"hl-keyword\">for</span>"));
        assert!(out.html.contains("<span class=\"hl-keyword\">let</span>"));
        assert_eq!(
            out.blocks[0].raw,
            "for (let i=0;i<3;i++) { console.log(i); }"
        );
    }
}
