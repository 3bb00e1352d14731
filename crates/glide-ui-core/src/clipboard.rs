//! System clipboard adapter for [`crate::selection::SelectionAction::CopyRequested`].

use crate::error::Error;
use crate::error::Result;

/// Writes `text` to the system clipboard.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new().map_err(|e| Error::Clipboard(e.to_string()))?;
    clipboard
        .set_text(text.to_string())
        .map_err(|e| Error::Clipboard(e.to_string()))?;
    tracing::debug!(bytes = text.len(), "copied selection to clipboard");
    Ok(())
}

/// Like [`copy_to_clipboard`], but logs failures instead of returning them.
///
/// Headless sessions commonly have no clipboard; a failed copy should not end the app.
pub fn copy_or_log(text: &str) -> bool {
    match copy_to_clipboard(text) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "clipboard copy failed");
            false
        }
    }
}
