//! Background clipboard worker thread
//!
//! Clipboard writes can block (X11 selection ownership, terminal output), so
//! they run off the UI thread. The event loop hands requests over and later
//! picks up outcomes with [`CopyWorker::try_recv_result`].

use crossbeam_channel::{Receiver, Sender};
use qamd_core::clipboard::Clipboard;
use qamd_core::copy::{perform, CopyOutcome, CopyRequest};
use std::thread;

/// Copy worker handle
pub struct CopyWorker {
    request_tx: Sender<CopyRequest>,
    result_rx: Receiver<CopyOutcome>,
    _worker_thread: thread::JoinHandle<()>,
}

impl CopyWorker {
    /// Spawn a worker that owns the clipboard built by `make_clipboard`.
    ///
    /// The clipboard is created on the worker thread itself.
    pub fn spawn<F>(make_clipboard: F) -> Self
    where
        F: FnOnce() -> Clipboard + Send + 'static,
    {
        let (request_tx, request_rx) = crossbeam_channel::unbounded();
        let (result_tx, result_rx) = crossbeam_channel::unbounded();

        let worker_thread = thread::spawn(move || {
            let mut clipboard = make_clipboard();
            worker_loop(&mut clipboard, request_rx, result_tx);
        });

        Self {
            request_tx,
            result_rx,
            _worker_thread: worker_thread,
        }
    }

    /// Queue a clipboard write
    pub fn request_copy(&self, req: CopyRequest) {
        if self.request_tx.send(req).is_err() {
            log::warn!("Copy worker has stopped, dropping copy request");
        }
    }

    /// Try to receive a copy outcome (non-blocking)
    pub fn try_recv_result(&self) -> Option<CopyOutcome> {
        self.result_rx.try_recv().ok()
    }
}

/// Worker thread main loop; ends when the handle is dropped
fn worker_loop(
    clipboard: &mut Clipboard,
    request_rx: Receiver<CopyRequest>,
    result_tx: Sender<CopyOutcome>,
) {
    for req in request_rx.iter() {
        log::debug!("Copy worker writing block {}", req.block_id);
        if result_tx.send(perform(clipboard, req)).is_err() {
            break;
        }
    }
}
