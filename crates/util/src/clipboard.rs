//! Best-effort clipboard access.

use std::sync::Mutex;

use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
}

/// Clipboard collaborator. Copies and reads never fail loudly; callers only
/// learn whether the text landed or what came back.
pub trait Clipboard {
    fn try_copy(&mut self, text: &str) -> Result<(), ClipboardError>;

    fn try_read(&mut self) -> Result<String, ClipboardError>;

    /// Copy `text`, returning `false` when the clipboard rejected it.
    fn copy_text(&mut self, text: &str) -> bool {
        match self.try_copy(text) {
            Ok(()) => true,
            Err(error) => {
                warn!(error = %error, "Clipboard copy failed");
                false
            }
        }
    }

    /// Current clipboard text. Failures and empty contents both read as
    /// `None` so callers can fall back to manual entry.
    fn read_text(&mut self) -> Option<String> {
        match self.try_read() {
            Ok(text) if !text.is_empty() => Some(text),
            Ok(_) => None,
            Err(error) => {
                debug!(error = %error, "Clipboard read failed");
                None
            }
        }
    }
}

/// The operating system clipboard.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn try_copy(&mut self, text: &str) -> Result<(), ClipboardError> {
        arboard::Clipboard::new()
            .and_then(|mut clipboard| clipboard.set_text(text.to_string()))
            .map_err(|error| ClipboardError::Unavailable(error.to_string()))
    }

    fn try_read(&mut self) -> Result<String, ClipboardError> {
        arboard::Clipboard::new()
            .and_then(|mut clipboard| clipboard.get_text())
            .map_err(|error| ClipboardError::Unavailable(error.to_string()))
    }
}

/// Clipboard held in memory, for tests and headless runs. Reads return the
/// most recent copy, or the seeded text before any copy.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    copied: Mutex<Vec<String>>,
    contents: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clipboard that already holds `text`.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            copied: Mutex::default(),
            contents: Mutex::new(Some(text.into())),
        }
    }

    /// Everything copied so far, oldest first.
    pub fn copied(&self) -> Vec<String> {
        self.copied.lock().expect("clipboard lock poisoned").clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn try_copy(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.copied.lock().expect("clipboard lock poisoned").push(text.to_string());
        *self.contents.lock().expect("clipboard lock poisoned") = Some(text.to_string());
        Ok(())
    }

    fn try_read(&mut self) -> Result<String, ClipboardError> {
        self.contents
            .lock()
            .expect("clipboard lock poisoned")
            .clone()
            .ok_or_else(|| ClipboardError::Unavailable("nothing copied".into()))
    }
}
