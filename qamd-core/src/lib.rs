//! QAMD Core - Answer formatting, markdown rendering, and copy interaction
//!
//! This crate contains the core logic for qamd, independent of any host UI:
//! - Response formatting (question/answer to titled markdown)
//! - Markdown to sanitized HTML rendering with fenced code extraction
//! - Single-pass syntax highlighting for a fixed set of languages
//! - Copy interaction state tracking and clipboard backends
//! - Configuration management

pub mod answer;
pub mod clipboard;
pub mod codec;
pub mod config;
pub mod copy;
pub mod escape;
pub mod fence;
pub mod format;
pub mod highlight;
pub mod page;
pub mod render;

// Re-export commonly used types
pub use answer::{render_answer, render_image, Answer};
pub use config::Config;
pub use copy::{CopyManager, CopyOutcome, CopyRequest};
pub use format::{format, Document};
pub use page::Page;
pub use render::{render, CodeBlock, Rendered, Renderer};
