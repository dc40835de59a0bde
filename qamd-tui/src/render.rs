//! Answer layout for the terminal
//!
//! The formatted markdown is split into prose and code exactly the way the
//! HTML renderer splits it, so the n-th code block on screen is the n-th
//! block of the rendered page and copies the same text.

use qamd_core::fence::{self, Fragment};
use qamd_core::highlight::{tokenize, Language, Token, TokenClass};
use qamd_core::render::CodeBlock;

/// One classified run of text within a code line
pub type CodeSpan = (Option<TokenClass>, String);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewLine {
    Heading { level: u8, text: String },
    Text(String),
    Blank,
    /// Language label and copy control of a block
    CodeHeader { block: usize },
    Code { block: usize, spans: Vec<CodeSpan> },
}

/// A code block as laid out on screen
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockView {
    pub id: String,
    pub label: String,
    /// Index of the block's header in [`AnswerView::lines`]
    pub header_line: usize,
    pub line_count: usize,
}

#[derive(Clone, Debug, Default)]
pub struct AnswerView {
    pub lines: Vec<ViewLine>,
    pub blocks: Vec<BlockView>,
}

impl AnswerView {
    /// Lay out `markdown`, taking code from the blocks the renderer produced
    pub fn build(markdown: &str, blocks: &[CodeBlock], highlight: bool) -> Self {
        let mut view = Self::default();
        let mut rendered = blocks.iter();

        for fragment in fence::split(markdown.trim()) {
            match fragment {
                Fragment::Text(prose) => view.push_prose(prose),
                Fragment::Fence(_) => match rendered.next() {
                    Some(block) => view.push_code(block, highlight),
                    None => log::warn!("Fence without a rendered code block"),
                },
            }
        }

        while matches!(view.lines.last(), Some(ViewLine::Blank)) {
            view.lines.pop();
        }
        view
    }

    fn push_blank(&mut self) {
        if !matches!(self.lines.last(), None | Some(ViewLine::Blank)) {
            self.lines.push(ViewLine::Blank);
        }
    }

    fn push_prose(&mut self, prose: &str) {
        for line in prose.lines().map(str::trim_end) {
            if line.trim().is_empty() {
                self.push_blank();
            } else if let Some((level, text)) = heading(line) {
                self.lines.push(ViewLine::Heading {
                    level,
                    text: text.to_string(),
                });
            } else {
                self.lines.push(ViewLine::Text(line.to_string()));
            }
        }
    }

    fn push_code(&mut self, block: &CodeBlock, highlight: bool) {
        self.push_blank();

        let index = self.blocks.len();
        let language = block
            .language
            .as_deref()
            .filter(|_| highlight)
            .and_then(Language::from_tag);
        let code = code_lines(&block.raw, language);

        self.blocks.push(BlockView {
            id: block.id.clone(),
            label: block.language.clone().unwrap_or_else(|| "code".to_string()),
            header_line: self.lines.len(),
            line_count: code.len(),
        });
        self.lines.push(ViewLine::CodeHeader { block: index });
        self.lines.extend(
            code.into_iter()
                .map(|spans| ViewLine::Code { block: index, spans }),
        );
        self.lines.push(ViewLine::Blank);
    }
}

fn heading(line: &str) -> Option<(u8, &str)> {
    [(3, "### "), (2, "## "), (1, "# ")]
        .into_iter()
        .find_map(|(level, prefix)| line.strip_prefix(prefix).map(|text| (level, text)))
}

/// Split code into display lines of classified spans. Tabs are expanded and
/// carriage returns dropped.
pub fn code_lines(code: &str, language: Option<Language>) -> Vec<Vec<CodeSpan>> {
    let tokens = match language {
        Some(language) => tokenize(code, language),
        None => vec![Token {
            class: None,
            text: code,
        }],
    };

    let mut lines: Vec<Vec<CodeSpan>> = vec![Vec::new()];
    for token in tokens {
        for (i, part) in token.text.split('\n').enumerate() {
            if i > 0 {
                lines.push(Vec::new());
            }
            if !part.is_empty() {
                if let Some(line) = lines.last_mut() {
                    line.push((token.class, part.replace('\t', "    ").replace('\r', "")));
                }
            }
        }
    }
    lines
}
