//! Clipboard backends
//!
//! The primary backend is the system clipboard. When it is missing or a write
//! fails, the text is handed to a fallback, an OSC 52 escape sequence written
//! to the terminal, which most modern terminals forward to the host clipboard.

use std::io::{self, Write};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

use crate::config::CopyConfig;
use crate::copy::CopyError;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("{0} clipboard unavailable")]
    Unavailable(&'static str),
    #[error("{backend} clipboard write failed: {message}")]
    Write {
        backend: &'static str,
        message: String,
    },
}

pub trait ClipboardBackend {
    fn name(&self) -> &'static str;
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// System clipboard through arboard
#[cfg(feature = "clipboard")]
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

#[cfg(feature = "clipboard")]
impl SystemClipboard {
    pub fn new() -> Result<Self, ClipboardError> {
        arboard::Clipboard::new()
            .map(|inner| Self { inner })
            .map_err(|e| ClipboardError::Write {
                backend: "system",
                message: e.to_string(),
            })
    }
}

#[cfg(feature = "clipboard")]
impl ClipboardBackend for SystemClipboard {
    fn name(&self) -> &'static str {
        "system"
    }

    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.inner
            .set_text(text.to_string())
            .map_err(|e| ClipboardError::Write {
                backend: "system",
                message: e.to_string(),
            })
    }
}

/// OSC 52 clipboard writer
pub struct Osc52Clipboard<W: Write> {
    out: W,
}

impl Osc52Clipboard<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Osc52Clipboard<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// OSC 52 sequence that sets the clipboard selection to `text`
pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x1b\\", STANDARD.encode(text))
}

impl<W: Write> ClipboardBackend for Osc52Clipboard<W> {
    fn name(&self) -> &'static str {
        "osc52"
    }

    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let seq = osc52_sequence(text);
        self.out
            .write_all(seq.as_bytes())
            .and_then(|_| self.out.flush())
            .map_err(|e| ClipboardError::Write {
                backend: "osc52",
                message: e.to_string(),
            })
    }
}

/// Primary backend with an optional fallback
pub struct Clipboard {
    primary: Option<Box<dyn ClipboardBackend>>,
    fallback: Option<Box<dyn ClipboardBackend>>,
}

impl Clipboard {
    pub fn new(
        primary: Option<Box<dyn ClipboardBackend>>,
        fallback: Option<Box<dyn ClipboardBackend>>,
    ) -> Self {
        Self { primary, fallback }
    }

    /// System clipboard when available, OSC 52 on stdout as fallback if enabled
    pub fn from_config(config: &CopyConfig) -> Self {
        let fallback: Option<Box<dyn ClipboardBackend>> = if config.fallback {
            Some(Box::new(Osc52Clipboard::stdout()))
        } else {
            None
        };
        Self::new(system_backend(), fallback)
    }

    /// Write `text`, returning the name of the backend that took it
    pub fn copy_text(&mut self, text: &str) -> Result<&'static str, CopyError> {
        let primary_err = match self.primary.as_mut() {
            Some(backend) => match backend.set_text(text) {
                Ok(()) => return Ok(backend.name()),
                Err(e) => {
                    log::debug!("Primary clipboard failed, trying fallback: {e}");
                    e.to_string()
                }
            },
            None => ClipboardError::Unavailable("system").to_string(),
        };

        let fallback_err = match self.fallback.as_mut() {
            Some(backend) => match backend.set_text(text) {
                Ok(()) => return Ok(backend.name()),
                Err(e) => e.to_string(),
            },
            None => "no fallback configured".to_string(),
        };

        Err(CopyError::Clipboard {
            primary: primary_err,
            fallback: fallback_err,
        })
    }
}

#[cfg(feature = "clipboard")]
fn system_backend() -> Option<Box<dyn ClipboardBackend>> {
    match SystemClipboard::new() {
        Ok(clipboard) => Some(Box::new(clipboard)),
        Err(e) => {
            log::debug!("System clipboard not available: {e}");
            None
        }
    }
}

#[cfg(not(feature = "clipboard"))]
fn system_backend() -> Option<Box<dyn ClipboardBackend>> {
    None
}
