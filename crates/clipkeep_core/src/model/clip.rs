//! Clip record and write-boundary normalization.
//!
//! # Responsibility
//! - Define the canonical snippet record persisted in the clip slot.
//! - Normalize user-supplied content and tag text.
//!
//! # Invariants
//! - `id` and `created_at` never change after creation.
//! - `updated_at >= created_at`.
//! - `content` is trimmed and non-empty.
//! - `tag` is either absent or a trimmed, non-empty label.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of one clip.
pub type ClipId = Uuid;

/// Advisory tag list offered by callers when capturing a clip.
///
/// Tags outside this list are accepted as-is.
pub const TAG_SUGGESTIONS: &[&str] = &["Idea", "Code", "Meeting", "Personal", "Draft"];

const UNTAGGED_LABEL: &str = "untagged";

/// Validation failure for clip writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipValidationError {
    /// Content was empty or whitespace-only after trimming.
    EmptyContent,
    /// `updated_at` precedes `created_at`.
    TimestampsOutOfOrder,
}

impl Display for ClipValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyContent => write!(f, "clip content cannot be empty"),
            Self::TimestampsOutOfOrder => {
                write!(f, "clip updatedAt must not be earlier than createdAt")
            }
        }
    }
}

impl Error for ClipValidationError {}

/// One stored snippet.
///
/// Clips are only built by the clip store; callers read them through
/// accessors. Serialized with camelCase keys to match the slot format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clip {
    id: ClipId,
    content: String,
    #[serde(default)]
    tag: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Clip {
    /// Builds a fresh clip with a generated id.
    ///
    /// Content and tag must already be normalized.
    pub(crate) fn new(content: String, tag: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
            tag,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces the editable fields, keeping identity and creation time.
    ///
    /// `updated_at` never moves backwards even if `now` does.
    pub(crate) fn revise(&mut self, content: String, tag: Option<String>, now: DateTime<Utc>) {
        self.content = content;
        self.tag = tag;
        self.updated_at = now.max(self.updated_at);
    }

    pub fn id(&self) -> ClipId {
        self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Tag label for display, `untagged` when absent.
    pub fn display_tag(&self) -> &str {
        self.tag.as_deref().unwrap_or(UNTAGGED_LABEL)
    }

    /// Checks stored-state invariants.
    ///
    /// Used on the load path to drop entries written by something other than
    /// the store.
    pub fn validate(&self) -> Result<(), ClipValidationError> {
        if self.content.trim().is_empty() {
            return Err(ClipValidationError::EmptyContent);
        }
        if self.updated_at < self.created_at {
            return Err(ClipValidationError::TimestampsOutOfOrder);
        }
        Ok(())
    }
}

/// Trims content and rejects empty results.
pub fn normalize_content(content: &str) -> Result<String, ClipValidationError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(ClipValidationError::EmptyContent);
    }
    Ok(trimmed.to_string())
}

/// Trims a tag; empty or whitespace-only tags become absent.
pub fn normalize_tag(tag: Option<&str>) -> Option<String> {
    tag.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
