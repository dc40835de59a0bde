//! Application state

use crate::copy_worker::CopyWorker;
use crate::render::{AnswerView, BlockView};
use crate::theme::Theme;
use qamd_core::clipboard::Clipboard;
use qamd_core::copy::ControlFace;
use qamd_core::format::format_with;
use qamd_core::{Config, CopyManager, Page, Renderer};
use std::time::Instant;

/// Main application state
pub struct App {
    pub config: Config,
    pub theme: Theme,
    pub title: String,
    pub view: AnswerView,
    pub page: Page,
    pub copy: CopyManager,
    pub copy_worker: CopyWorker,
    /// Index into `view.blocks`
    pub selected: Option<usize>,
    pub scroll: usize,
    pub show_help: bool,
    pub should_quit: bool,
    pub status_message: Option<String>,
}

impl App {
    /// Create a new application instance for one question/answer pair
    pub fn new(config: Config, question: &str, answer: &str) -> Self {
        let copy_config = config.copy.clone();
        let worker = CopyWorker::spawn(move || Clipboard::from_config(&copy_config));
        Self::with_worker(config, question, answer, worker)
    }

    /// Create an application instance with an existing copy worker
    pub fn with_worker(config: Config, question: &str, answer: &str, copy_worker: CopyWorker) -> Self {
        let doc = format_with(question, answer, &config.format);
        let rendered = Renderer::new(config.render.clone()).render_document(&doc);

        let page = Page::from_html(&rendered.html);
        let mut copy = CopyManager::from_config(&config.copy);
        copy.attach(&page);

        let view = AnswerView::build(doc.as_str(), &rendered.blocks, config.render.highlight);
        let selected = if view.blocks.is_empty() { None } else { Some(0) };

        Self {
            theme: Theme::for_variant(config.theme),
            config,
            title: doc.title,
            view,
            page,
            copy,
            copy_worker,
            selected,
            scroll: 0,
            show_help: false,
            should_quit: false,
            status_message: None,
        }
    }

    pub fn selected_block(&self) -> Option<&BlockView> {
        self.selected.and_then(|idx| self.view.blocks.get(idx))
    }

    pub fn select_next(&mut self) {
        if let Some(idx) = self.selected {
            if idx + 1 < self.view.blocks.len() {
                self.selected = Some(idx + 1);
            }
        }
    }

    pub fn select_prev(&mut self) {
        if let Some(idx) = self.selected {
            self.selected = Some(idx.saturating_sub(1));
        }
    }

    /// Scroll so the selected block's header is inside a viewport of `height` lines
    pub fn reveal_selected(&mut self, height: usize) {
        let Some(block) = self.selected_block() else {
            return;
        };
        let line = block.header_line;
        if line < self.scroll {
            self.scroll = line;
        } else if height > 0 && line >= self.scroll + height {
            self.scroll = line + 1 - height;
        }
    }

    pub fn scroll_down(&mut self, lines: usize) {
        let max = self.view.lines.len().saturating_sub(1);
        self.scroll = (self.scroll + lines).min(max);
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    /// Ask the worker to copy the selected block
    pub fn copy_selected(&mut self) {
        let Some(id) = self.selected_block().map(|b| b.id.clone()) else {
            return;
        };
        // Decode failures are logged by the manager; nothing is shown
        if let Ok(request) = self.copy.activate(&self.page, &id) {
            self.copy_worker.request_copy(request);
        }
    }

    /// Apply finished clipboard writes and expire acknowledgments.
    /// Returns true when something visible changed.
    pub fn poll_copy(&mut self, now: Instant) -> bool {
        let mut changed = false;
        while let Some(outcome) = self.copy_worker.try_recv_result() {
            if let Ok(method) = &outcome.result {
                self.status_message = Some(format!("Copied via {method}"));
            }
            changed |= self.copy.complete(outcome, now);
        }
        changed | self.copy.tick(now)
    }

    /// Face of the copy control of block `idx`
    pub fn control_face(&self, idx: usize) -> ControlFace {
        self.view
            .blocks
            .get(idx)
            .and_then(|b| self.copy.control(&b.id))
            .map(|c| c.face())
            .unwrap_or(ControlFace::IDLE)
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn clear_status_message(&mut self) {
        self.status_message = None;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}
