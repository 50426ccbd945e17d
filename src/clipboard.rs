//! Clipboard abstraction layer.
//!
//! Copy and cut hand TSV text to a [`ClipboardProvider`]; paste reads it back.
//! The front end uses the system clipboard through arboard, with an in-process
//! buffer as fallback when no clipboard is reachable (headless sessions).

/// Trait for clipboard operations.
pub trait ClipboardProvider {
    /// Get text from clipboard.
    fn get_text(&mut self) -> Option<String>;

    /// Set text to clipboard. Returns false if nothing could store it.
    fn set_text(&mut self, text: String) -> bool;
}

/// System clipboard implementation using arboard.
pub struct SystemClipboard;

impl ClipboardProvider for SystemClipboard {
    fn get_text(&mut self) -> Option<String> {
        let mut cb = arboard::Clipboard::new().ok()?;
        cb.get_text().ok()
    }

    fn set_text(&mut self, text: String) -> bool {
        let mut cb = match arboard::Clipboard::new() {
            Ok(cb) => cb,
            Err(err) => {
                tracing::debug!(error = %err, "system clipboard unavailable");
                return false;
            }
        };
        cb.set_text(text).is_ok()
    }
}

/// Process-local clipboard.
#[derive(Clone, Debug, Default)]
pub struct MemoryClipboard {
    text: Option<String>,
}

impl ClipboardProvider for MemoryClipboard {
    fn get_text(&mut self) -> Option<String> {
        self.text.clone()
    }

    fn set_text(&mut self, text: String) -> bool {
        self.text = Some(text);
        true
    }
}

/// System clipboard first, local buffer when the system one fails.
#[derive(Default)]
pub struct FallbackClipboard {
    local: MemoryClipboard,
}

impl ClipboardProvider for FallbackClipboard {
    fn get_text(&mut self) -> Option<String> {
        SystemClipboard.get_text().or_else(|| self.local.get_text())
    }

    fn set_text(&mut self, text: String) -> bool {
        self.local.set_text(text.clone());
        if !SystemClipboard.set_text(text) {
            tracing::warn!("system clipboard unavailable, keeping copy in process");
        }
        true
    }
}
