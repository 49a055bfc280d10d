//! Whole-collection persistence adapter for clips.
//!
//! # Responsibility
//! - Serialize the full clip collection into one JSON slot value.
//! - Decode stored values defensively so one bad entry cannot poison a load.
//!
//! # Invariants
//! - `load` never fails: missing, unreadable, or malformed data yields an
//!   empty collection plus a status describing why.
//! - `save` never fails: write errors are reported as `SaveStatus::Failed`.
//! - Loaded collections never contain two clips with the same id.

use crate::model::clip::Clip;
use crate::repo::slot::KeyValueSlot;
use log::{debug, warn};
use serde_json::Value;
use std::collections::HashSet;
use uuid::Uuid;

/// Fixed slot key holding the clip collection.
pub const CLIP_STORAGE_KEY: &str = "clip.entries.v1";

/// Why a load produced the collection it did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// A well-formed sequence was read.
    Loaded,
    /// Nothing has been stored under the key yet.
    Missing,
    /// The slot backend could not be read.
    Unavailable(String),
    /// The stored value is not valid JSON.
    Corrupt(String),
    /// The stored value parsed, but is not an array.
    NotASequence,
}

/// Result of one adapter load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    /// Decoded clips in stored order.
    pub clips: Vec<Clip>,
    pub status: LoadStatus,
    /// Entries dropped for an invalid id, bad shape, bad timestamps, or duplicate id.
    pub skipped: usize,
}

impl LoadReport {
    fn empty(status: LoadStatus) -> Self {
        Self {
            clips: Vec::new(),
            status,
            skipped: 0,
        }
    }
}

/// Result of one adapter save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    Saved,
    Failed(String),
}

impl SaveStatus {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved)
    }
}

/// Durable round-trip of the whole clip collection.
pub trait ClipPersistence {
    fn load(&self) -> LoadReport;
    fn save(&self, clips: &[Clip]) -> SaveStatus;
}

impl<P: ClipPersistence + ?Sized> ClipPersistence for &P {
    fn load(&self) -> LoadReport {
        (**self).load()
    }

    fn save(&self, clips: &[Clip]) -> SaveStatus {
        (**self).save(clips)
    }
}

/// Adapter storing the collection as a JSON array in a key-value slot.
pub struct SlotClipPersistence<S: KeyValueSlot> {
    slot: S,
}

impl<S: KeyValueSlot> SlotClipPersistence<S> {
    pub fn new(slot: S) -> Self {
        Self { slot }
    }
}

impl<S: KeyValueSlot> ClipPersistence for SlotClipPersistence<S> {
    fn load(&self) -> LoadReport {
        let raw = match self.slot.read(CLIP_STORAGE_KEY) {
            Ok(Some(raw)) if !raw.trim().is_empty() => raw,
            Ok(_) => return LoadReport::empty(LoadStatus::Missing),
            Err(err) => {
                warn!(
                    "event=clips_load module=repo status=error error_code=slot_unavailable error={}",
                    err
                );
                return LoadReport::empty(LoadStatus::Unavailable(err.to_string()));
            }
        };

        let entries = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(entries)) => entries,
            Ok(_) => {
                warn!("event=clips_load module=repo status=error error_code=not_a_sequence");
                return LoadReport::empty(LoadStatus::NotASequence);
            }
            Err(err) => {
                warn!(
                    "event=clips_load module=repo status=error error_code=corrupt_blob error={}",
                    err
                );
                return LoadReport::empty(LoadStatus::Corrupt(err.to_string()));
            }
        };

        let total = entries.len();
        let clips = decode_entries(entries);
        let skipped = total - clips.len();
        if skipped > 0 {
            warn!(
                "event=clips_load module=repo status=partial loaded={} skipped={}",
                clips.len(),
                skipped
            );
        } else {
            debug!("event=clips_load module=repo status=ok loaded={}", clips.len());
        }

        LoadReport {
            clips,
            status: LoadStatus::Loaded,
            skipped,
        }
    }

    fn save(&self, clips: &[Clip]) -> SaveStatus {
        let encoded = match serde_json::to_string(clips) {
            Ok(encoded) => encoded,
            Err(err) => {
                warn!(
                    "event=clips_save module=repo status=error error_code=encode_failed error={}",
                    err
                );
                return SaveStatus::Failed(err.to_string());
            }
        };

        match self.slot.write(CLIP_STORAGE_KEY, &encoded) {
            Ok(()) => {
                debug!("event=clips_save module=repo status=ok count={}", clips.len());
                SaveStatus::Saved
            }
            Err(err) => {
                warn!(
                    "event=clips_save module=repo status=error error_code=slot_write_failed error={}",
                    err
                );
                SaveStatus::Failed(err.to_string())
            }
        }
    }
}

fn decode_entries(entries: Vec<Value>) -> Vec<Clip> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(has_valid_id)
        .filter_map(|entry| serde_json::from_value::<Clip>(entry).ok())
        .filter(|clip| clip.validate().is_ok())
        .filter(|clip| seen.insert(clip.id()))
        .collect()
}

fn has_valid_id(entry: &Value) -> bool {
    entry
        .get("id")
        .and_then(Value::as_str)
        .is_some_and(|id| Uuid::parse_str(id).is_ok())
}

#[cfg(test)]
mod tests {
    use super::{decode_entries, has_valid_id};
    use serde_json::json;

    #[test]
    fn has_valid_id_requires_uuid_string() {
        assert!(has_valid_id(&json!({ "id": "67e55044-10b1-426f-9247-bb680e5fe0c8" })));
        assert!(!has_valid_id(&json!({ "id": 42 })));
        assert!(!has_valid_id(&json!({ "id": "not-a-uuid" })));
        assert!(!has_valid_id(&json!({ "content": "no id" })));
    }

    #[test]
    fn decode_entries_drops_duplicates_and_blank_content() {
        let id = "67e55044-10b1-426f-9247-bb680e5fe0c8";
        let entries = vec![
            json!({
                "id": id,
                "content": "first",
                "tag": null,
                "createdAt": "2024-05-01T10:00:00Z",
                "updatedAt": "2024-05-01T10:00:00Z"
            }),
            json!({
                "id": id,
                "content": "duplicate",
                "createdAt": "2024-05-01T10:00:00Z",
                "updatedAt": "2024-05-01T10:00:00Z"
            }),
            json!({
                "id": "a3bb189e-8bf9-3888-9912-ace4e6543002",
                "content": "   ",
                "createdAt": "2024-05-01T10:00:00Z",
                "updatedAt": "2024-05-01T10:00:00Z"
            }),
        ];

        let clips = decode_entries(entries);
        assert_eq!(clips.len(), 1);
        assert_eq!(clips[0].content(), "first");
        assert_eq!(clips[0].tag(), None);
    }
}
