//! Copy-to-clipboard interaction for rendered code blocks
//!
//! Every code block in a [`Page`] gets one [`CopyControl`], tracked in a lookup
//! table keyed by block id. A control is either idle or showing a timed
//! "Copied!" acknowledgment:
//!
//! ```text
//! Idle --(clipboard write succeeded)--> Copied { until } --(tick past until)--> Idle
//! ```
//!
//! Clipboard writes are asynchronous from the manager's point of view:
//! [`CopyManager::activate`] hands out a [`CopyRequest`], the host performs
//! the write (see [`perform`]) and reports back with [`CopyManager::complete`].

use std::collections::HashMap;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::clipboard::Clipboard;
use crate::codec::{decode_raw, DecodeError};
use crate::config::CopyConfig;
use crate::escape::escape_html;
use crate::page::Page;

/// Visible content of a copy control
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControlFace {
    pub icon: &'static str,
    pub label: &'static str,
    pub class: &'static str,
}

impl ControlFace {
    pub const IDLE: ControlFace = ControlFace {
        icon: "⧉",
        label: "Copy",
        class: "copy-button",
    };

    pub const COPIED: ControlFace = ControlFace {
        icon: "✓",
        label: "Copied!",
        class: "copy-button copied",
    };

    /// Icon and label as one string
    pub fn text(&self) -> String {
        format!("{} {}", self.icon, self.label)
    }

    /// Button markup wired to `block_id`
    pub fn html(&self, block_id: &str) -> String {
        format!(
            concat!(
                r#"<button type="button" class="{class}" data-copy-target="{id}" aria-label="Copy code">"#,
                r#"<span class="copy-icon">{icon}</span><span class="copy-label">{label}</span></button>"#
            ),
            class = self.class,
            id = escape_html(block_id),
            icon = self.icon,
            label = self.label,
        )
    }
}

/// Markup for the idle copy control of a freshly rendered block
pub fn copy_button_html(block_id: &str) -> String {
    ControlFace::IDLE.html(block_id)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlState {
    Idle,
    Copied { until: Instant },
}

/// Copy control attached to one code block
#[derive(Clone, Debug)]
pub struct CopyControl {
    block_id: String,
    state: ControlState,
    pending: Option<u64>,
}

impl CopyControl {
    fn new(block_id: &str) -> Self {
        Self {
            block_id: block_id.to_string(),
            state: ControlState::Idle,
            pending: None,
        }
    }

    pub fn block_id(&self) -> &str {
        &self.block_id
    }

    pub fn state(&self) -> ControlState {
        self.state
    }

    pub fn is_copied(&self) -> bool {
        matches!(self.state, ControlState::Copied { .. })
    }

    /// Whether a clipboard write for this control is still in flight
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn face(&self) -> ControlFace {
        match self.state {
            ControlState::Idle => ControlFace::IDLE,
            ControlState::Copied { .. } => ControlFace::COPIED,
        }
    }
}

/// Errors from the copy interaction
#[derive(Debug, Error)]
pub enum CopyError {
    #[error("no copy control attached to code block {0}")]
    UnknownControl(String),
    #[error("code block {0} is no longer in the page")]
    MissingBlock(String),
    #[error("failed to recover the code of block {id}: {source}")]
    Decode {
        id: String,
        #[source]
        source: DecodeError,
    },
    #[error("clipboard unavailable (primary: {primary}; fallback: {fallback})")]
    Clipboard { primary: String, fallback: String },
}

/// A clipboard write the host should perform
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CopyRequest {
    pub request_id: u64,
    pub block_id: String,
    pub text: String,
}

/// Result of a clipboard write
#[derive(Debug)]
pub struct CopyOutcome {
    pub request_id: u64,
    pub block_id: String,
    /// Name of the clipboard method that succeeded
    pub result: Result<&'static str, CopyError>,
}

/// Perform the clipboard write for `request`
pub fn perform(clipboard: &mut Clipboard, request: CopyRequest) -> CopyOutcome {
    let result = clipboard.copy_text(&request.text);
    CopyOutcome {
        request_id: request.request_id,
        block_id: request.block_id,
        result,
    }
}

/// Tracks copy controls and their acknowledgment timers
#[derive(Debug)]
pub struct CopyManager {
    controls: HashMap<String, CopyControl>,
    feedback: Duration,
    next_request: u64,
}

impl Default for CopyManager {
    fn default() -> Self {
        Self::from_config(&CopyConfig::default())
    }
}

impl CopyManager {
    pub fn new(feedback: Duration) -> Self {
        Self {
            controls: HashMap::new(),
            feedback,
            next_request: 0,
        }
    }

    pub fn from_config(config: &CopyConfig) -> Self {
        Self::new(config.feedback())
    }

    /// Equip every block in `page` that has no control yet and drop controls
    /// whose block has left the page. Returns the number of new controls.
    ///
    /// Safe to call repeatedly: already equipped blocks are left alone.
    pub fn attach(&mut self, page: &Page) -> usize {
        let before = self.controls.len();
        self.controls.retain(|id, _| page.contains(id));
        let dropped = before - self.controls.len();

        let mut attached = 0;
        for block in page.blocks() {
            if !self.controls.contains_key(&block.id) {
                self.controls
                    .insert(block.id.clone(), CopyControl::new(&block.id));
                attached += 1;
            }
        }

        if attached > 0 || dropped > 0 {
            log::debug!("Copy controls: {attached} attached, {dropped} dropped");
        }

        attached
    }

    pub fn control(&self, block_id: &str) -> Option<&CopyControl> {
        self.controls.get(block_id)
    }

    pub fn control_count(&self) -> usize {
        self.controls.len()
    }

    /// Start a copy for the control of `block_id`, recovering the block's
    /// original text from the page
    pub fn activate(&mut self, page: &Page, block_id: &str) -> Result<CopyRequest, CopyError> {
        let control = self
            .controls
            .get_mut(block_id)
            .ok_or_else(|| CopyError::UnknownControl(block_id.to_string()))?;
        let block = page
            .block(block_id)
            .ok_or_else(|| CopyError::MissingBlock(block_id.to_string()))?;

        let text = decode_raw(&block.encoded_raw).map_err(|source| {
            log::warn!("Copy aborted, could not decode block {block_id}: {source}");
            CopyError::Decode {
                id: block_id.to_string(),
                source,
            }
        })?;

        self.next_request += 1;
        control.pending = Some(self.next_request);

        Ok(CopyRequest {
            request_id: self.next_request,
            block_id: block_id.to_string(),
            text,
        })
    }

    /// Apply the result of a clipboard write. Returns true when the visible
    /// state of a control changed.
    pub fn complete(&mut self, outcome: CopyOutcome, now: Instant) -> bool {
        let Some(control) = self.controls.get_mut(&outcome.block_id) else {
            log::debug!(
                "Ignoring copy result for block {} which is no longer present",
                outcome.block_id
            );
            return false;
        };

        if control.pending == Some(outcome.request_id) {
            control.pending = None;
        }

        match outcome.result {
            Ok(method) => {
                log::debug!("Copied block {} via {method}", outcome.block_id);
                // A repeat activation restarts the timer instead of stacking
                control.state = ControlState::Copied {
                    until: now + self.feedback,
                };
                true
            }
            Err(err) => {
                log::warn!("Copy failed for block {}: {err}", outcome.block_id);
                false
            }
        }
    }

    /// Return expired acknowledgments to idle. Returns true if any changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;
        for control in self.controls.values_mut() {
            if let ControlState::Copied { until } = control.state {
                if now >= until {
                    control.state = ControlState::Idle;
                    changed = true;
                }
            }
        }
        changed
    }

    /// Earliest pending acknowledgment expiry
    pub fn next_deadline(&self) -> Option<Instant> {
        self.controls
            .values()
            .filter_map(|c| match c.state {
                ControlState::Copied { until } => Some(until),
                ControlState::Idle => None,
            })
            .min()
    }
}
