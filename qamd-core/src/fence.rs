//! Fenced code block detection

const FENCE: &str = "```";

/// A piece of a markdown document: prose or a fenced code block
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fragment<'a> {
    Text(&'a str),
    Fence(Fence<'a>),
}

/// A fenced code block as written in the source
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fence<'a> {
    /// Declared language tag, if the first line held one
    pub language: Option<&'a str>,
    /// Code body with leading/trailing blank lines removed
    pub body: &'a str,
    /// False when the closing fence is missing
    pub terminated: bool,
}

/// Split `text` into prose and fenced code, in document order.
///
/// An unterminated fence runs to the end of the text.
pub fn split(text: &str) -> Vec<Fragment<'_>> {
    let mut fragments = Vec::new();
    let mut prose_start = 0;

    while let Some(rel) = text[prose_start..].find(FENCE) {
        let open = prose_start + rel;
        let content_start = open + FENCE.len();
        let (content_end, next, terminated) = match text[content_start..].find(FENCE) {
            Some(rel_close) => {
                let close = content_start + rel_close;
                (close, close + FENCE.len(), true)
            }
            None => (text.len(), text.len(), false),
        };

        if open > prose_start {
            fragments.push(Fragment::Text(&text[prose_start..open]));
        }
        fragments.push(Fragment::Fence(parse_fence(
            &text[content_start..content_end],
            terminated,
        )));
        prose_start = next;
    }

    if prose_start < text.len() {
        fragments.push(Fragment::Text(&text[prose_start..]));
    }

    fragments
}

fn parse_fence(content: &str, terminated: bool) -> Fence<'_> {
    let (language, body) = match content.find('\n') {
        Some(nl) => {
            let first = content[..nl].trim();
            if first.is_empty() {
                (None, &content[nl + 1..])
            } else if is_language_tag(first) {
                (Some(first), &content[nl + 1..])
            } else {
                (None, content)
            }
        }
        // An unterminated fence that is only a tag, e.g. a truncated "```js"
        None if !terminated && is_language_tag(content.trim()) => (Some(content.trim()), ""),
        None => (None, content),
    };

    Fence {
        language,
        body: strip_blank_lines(body),
        terminated,
    }
}

/// Whether `word` looks like a language tag rather than code
pub fn is_language_tag(word: &str) -> bool {
    !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '+' | '#' | '.' | '_' | '-'))
}

/// Remove leading and trailing blank lines without touching the lines between
pub fn strip_blank_lines(body: &str) -> &str {
    let mut start = 0;
    for line in body.split_inclusive('\n') {
        if !line.trim().is_empty() {
            break;
        }
        start += line.len();
    }
    let body = &body[start..];

    let mut end = body.len();
    while let Some(nl) = body[..end].rfind('\n') {
        if !body[nl + 1..end].trim().is_empty() {
            break;
        }
        end = nl;
        // The '\r' of a CRLF terminator belongs to the removed line break
        if body[..end].ends_with('\r') {
            end -= 1;
        }
    }
    if body[..end].trim().is_empty() {
        end = 0;
    }

    &body[..end]
}
