//! Code elements present in the displayed document
//!
//! The page is the set of code blocks that have been inserted into the
//! conversation so far. Rendered answers arrive as HTML fragments; each
//! fragment is scanned for the `<code>` elements the renderer emits.

use once_cell::sync::Lazy;
use regex::Regex;

static CODE_ELEMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<code class="language-([^"]*)" id="([^"]+)" data-raw="([^"]*)">"#).unwrap()
});

/// A code element found in the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageBlock {
    pub id: String,
    pub language: String,
    /// Original code, base64 encoded
    pub encoded_raw: String,
}

#[derive(Debug, Clone, Default)]
pub struct Page {
    blocks: Vec<PageBlock>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_html(html: &str) -> Self {
        let mut page = Self::new();
        page.insert_html(html);
        page
    }

    /// Add the code elements of an HTML fragment, returning how many were new
    pub fn insert_html(&mut self, html: &str) -> usize {
        let mut added = 0;
        for caps in CODE_ELEMENT.captures_iter(html) {
            let id = &caps[2];
            if self.contains(id) {
                log::debug!("Code block {id} already in page");
                continue;
            }
            self.blocks.push(PageBlock {
                id: id.to_string(),
                language: caps[1].to_string(),
                encoded_raw: caps[3].to_string(),
            });
            added += 1;
        }
        added
    }

    pub fn blocks(&self) -> &[PageBlock] {
        &self.blocks
    }

    pub fn block(&self, id: &str) -> Option<&PageBlock> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.block(id).is_some()
    }

    pub fn remove_block(&mut self, id: &str) -> bool {
        let before = self.blocks.len();
        self.blocks.retain(|b| b.id != id);
        self.blocks.len() != before
    }

    pub fn clear(&mut self) {
        self.blocks.clear();
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAGMENT: &str = concat!(
        r#"<p>See:</p><div class="code-block-container"><pre><code class="language-python" id="code-1" data-raw="cHJpbnQoMSk=">"#,
        r#"print(1)</code></pre></div><pre><code class="language-code" id="code-2" data-raw="">"#,
        "</code></pre>"
    );

    #[test]
    fn test_scan_fragment() {
        let page = Page::from_html(FRAGMENT);
        assert_eq!(page.len(), 2);
        let first = page.block("code-1").unwrap();
        assert_eq!(first.language, "python");
        assert_eq!(first.encoded_raw, "cHJpbnQoMSk=");
        assert_eq!(page.block("code-2").unwrap().encoded_raw, "");
    }

    #[test]
    fn test_duplicate_ids_ignored() {
        let mut page = Page::from_html(FRAGMENT);
        assert_eq!(page.insert_html(FRAGMENT), 0);
        assert_eq!(page.len(), 2);
    }

    #[test]
    fn test_remove_block() {
        let mut page = Page::from_html(FRAGMENT);
        assert!(page.remove_block("code-1"));
        assert!(!page.remove_block("code-1"));
        assert!(!page.contains("code-1"));
        assert_eq!(page.len(), 1);
    }

    #[test]
    fn test_plain_html_has_no_blocks() {
        let page = Page::from_html("<p>No code <code>here</code></p>");
        assert!(page.is_empty());
    }
}
