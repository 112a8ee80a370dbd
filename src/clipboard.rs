use arboard::Clipboard;

use crate::errors::AppError;

pub trait ClipboardSink: Send + Sync {
    fn set_text(&self, text: &str) -> Result<(), AppError>;
}

/// The desktop clipboard of the machine running the server.
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn set_text(&self, text: &str) -> Result<(), AppError> {
        let mut clipboard = Clipboard::new().map_err(|e| AppError::Clipboard {
            message: format!("failed to initialize clipboard: {e}"),
        })?;
        clipboard.set_text(text).map_err(|e| AppError::Clipboard {
            message: format!("failed to set clipboard text: {e}"),
        })
    }
}

/// Discards copies; used when no clipboard is wanted (headless servers, tests).
pub struct NoClipboard;

impl ClipboardSink for NoClipboard {
    fn set_text(&self, _text: &str) -> Result<(), AppError> {
        Ok(())
    }
}
