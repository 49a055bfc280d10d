//! Core domain logic for ClipKeep.
//! This crate is the single source of truth for clip invariants.

pub mod clipboard;
pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use clipboard::{ClipboardError, ClipboardWriter, CopyOutcome};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::CoreConfig;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::clip::{Clip, ClipId, ClipValidationError, TAG_SUGGESTIONS};
pub use repo::clip_persistence::{
    ClipPersistence, LoadReport, LoadStatus, SaveStatus, SlotClipPersistence, CLIP_STORAGE_KEY,
};
pub use repo::slot::{KeyValueSlot, MemoryKeyValueSlot, SlotError, SqliteKeyValueSlot};
pub use search::filter::{ClipFilter, ALL_TAGS};
pub use service::clip_store::{ClipStore, ClipStoreError, ClipStoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
