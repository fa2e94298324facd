use log::{info, warn};

#[derive(Debug)]
pub struct ClipboardError(pub String);

impl std::fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// What the visitor sees after pressing the copy-email button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    /// Copy failed; the address is surfaced in an alert instead.
    Alert(String),
}

pub fn copy_email(clipboard: &mut dyn Clipboard, email: &str) -> CopyOutcome {
    match clipboard.write_text(email) {
        Ok(()) => {
            info!("Copied {} to clipboard", email);
            CopyOutcome::Copied
        }
        Err(e) => {
            warn!("Clipboard unavailable: {}", e);
            CopyOutcome::Alert(email.to_string())
        }
    }
}

// ── Platform clipboard ────────────────────────────────────

/// System clipboard. The handle is opened on first use and kept, so the
/// copied text stays owned for the rest of the run on X11.
#[derive(Default)]
pub struct SystemClipboard {
    handle: Option<arboard::Clipboard>,
}

impl Clipboard for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if self.handle.is_none() {
            let handle = arboard::Clipboard::new()
                .map_err(|e| ClipboardError(format!("clipboard unavailable: {}", e)))?;
            self.handle = Some(handle);
        }
        match self.handle.as_mut() {
            Some(handle) => handle
                .set_text(text)
                .map_err(|e| ClipboardError(format!("copy failed: {}", e))),
            None => Err(ClipboardError("clipboard unavailable".to_string())),
        }
    }
}
