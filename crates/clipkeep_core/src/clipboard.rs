//! System clipboard seam.
//!
//! The clipboard is an external capability; the core only hands it clip
//! content and reports what happened. Copying never changes a clip.

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    /// The clipboard could not be opened in this environment.
    AccessDenied(String),
    WriteFailed(String),
}

impl Display for ClipboardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AccessDenied(reason) => write!(f, "clipboard access denied: {reason}"),
            Self::WriteFailed(reason) => write!(f, "failed to write to clipboard: {reason}"),
        }
    }
}

impl Error for ClipboardError {}

/// Text sink backed by the platform clipboard.
pub trait ClipboardWriter {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Outcome of a copy request for an existing clip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    Failed(ClipboardError),
}
