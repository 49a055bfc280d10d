//! Clip store use-case service.
//!
//! # Responsibility
//! - Own the authoritative, newest-first clip collection.
//! - Provide create/update/delete/query entry points for UI callers.
//! - Write the full collection through to persistence after every mutation.
//!
//! # Invariants
//! - Failed calls leave the collection exactly as it was.
//! - New clips are prepended; edits keep position; deletes keep the order of
//!   the remaining clips.
//! - Persistence status never turns into a caller-visible error.

use crate::clipboard::{ClipboardWriter, CopyOutcome};
use crate::clock::{Clock, SystemClock};
use crate::model::clip::{normalize_content, normalize_tag, Clip, ClipId, ClipValidationError};
use crate::repo::clip_persistence::{ClipPersistence, LoadStatus, SaveStatus};
use crate::search::filter::ClipFilter;
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Recoverable store error returned to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipStoreError {
    /// Caller supplied unusable content.
    Validation(ClipValidationError),
    /// No live clip has this id.
    NotFound(ClipId),
}

impl Display for ClipStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "clip not found: {id}"),
        }
    }
}

impl Error for ClipStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl From<ClipValidationError> for ClipStoreError {
    fn from(value: ClipValidationError) -> Self {
        Self::Validation(value)
    }
}

pub type ClipStoreResult<T> = Result<T, ClipStoreError>;

/// In-memory clip collection with write-through persistence.
pub struct ClipStore<P: ClipPersistence, C: Clock = SystemClock> {
    persistence: P,
    clock: C,
    clips: Vec<Clip>,
    load_status: Option<LoadStatus>,
    last_save: Option<SaveStatus>,
}

impl<P: ClipPersistence> ClipStore<P, SystemClock> {
    /// Creates an empty, not yet hydrated store on the system clock.
    pub fn new(persistence: P) -> Self {
        Self::with_clock(persistence, SystemClock)
    }
}

impl<P: ClipPersistence, C: Clock> ClipStore<P, C> {
    pub fn with_clock(persistence: P, clock: C) -> Self {
        Self {
            persistence,
            clock,
            clips: Vec::new(),
            load_status: None,
            last_save: None,
        }
    }

    /// Replaces the collection with the persisted one.
    ///
    /// Loads at most once per store; later calls are no-ops so that a
    /// repeated bootstrap cannot discard in-memory edits.
    pub fn hydrate(&mut self) {
        if self.load_status.is_some() {
            debug!("event=store_hydrate module=service status=skipped reason=already_hydrated");
            return;
        }

        let report = self.persistence.load();
        info!(
            "event=store_hydrate module=service status=ok load_status={:?} loaded={} skipped={}",
            report.status,
            report.clips.len(),
            report.skipped
        );
        self.clips = report.clips;
        self.load_status = Some(report.status);
    }

    /// Captures a new clip at the front of the collection.
    ///
    /// # Errors
    /// - `ClipStoreError::Validation` when `content` is blank.
    pub fn create(&mut self, content: &str, tag: Option<&str>) -> ClipStoreResult<Clip> {
        let content = normalize_content(content)?;
        let clip = Clip::new(content, normalize_tag(tag), self.clock.now());

        self.clips.insert(0, clip.clone());
        debug!("event=clip_create module=service status=ok total={}", self.clips.len());
        self.persist();
        Ok(clip)
    }

    /// Replaces content and tag of an existing clip in place.
    ///
    /// # Errors
    /// - `ClipStoreError::Validation` when `content` is blank (checked first).
    /// - `ClipStoreError::NotFound` when `id` is not live.
    pub fn update(
        &mut self,
        id: ClipId,
        content: &str,
        tag: Option<&str>,
    ) -> ClipStoreResult<Clip> {
        let content = normalize_content(content)?;
        let now = self.clock.now();
        let clip = self
            .clips
            .iter_mut()
            .find(|clip| clip.id() == id)
            .ok_or(ClipStoreError::NotFound(id))?;

        clip.revise(content, normalize_tag(tag), now);
        let updated = clip.clone();
        debug!("event=clip_update module=service status=ok");
        self.persist();
        Ok(updated)
    }

    /// Removes a clip; returns whether anything was removed.
    pub fn delete(&mut self, id: ClipId) -> bool {
        let Some(index) = self.clips.iter().position(|clip| clip.id() == id) else {
            debug!("event=clip_delete module=service status=noop");
            return false;
        };

        self.clips.remove(index);
        debug!("event=clip_delete module=service status=ok total={}", self.clips.len());
        self.persist();
        true
    }

    /// Returns matching clips in collection order.
    pub fn query(&self, filter: &ClipFilter) -> Vec<Clip> {
        filter.apply(&self.clips)
    }

    pub fn get(&self, id: ClipId) -> Option<&Clip> {
        self.clips.iter().find(|clip| clip.id() == id)
    }

    /// Hands a clip's content to the clipboard.
    ///
    /// Clipboard failures are reported in the outcome; the store is never
    /// mutated and nothing is persisted.
    ///
    /// # Errors
    /// - `ClipStoreError::NotFound` when `id` is not live.
    pub fn copy_to_clipboard(
        &self,
        id: ClipId,
        clipboard: &dyn ClipboardWriter,
    ) -> ClipStoreResult<CopyOutcome> {
        let clip = self.get(id).ok_or(ClipStoreError::NotFound(id))?;
        match clipboard.write_text(clip.content()) {
            Ok(()) => {
                debug!("event=clip_copy module=service status=ok");
                Ok(CopyOutcome::Copied)
            }
            Err(err) => {
                warn!("event=clip_copy module=service status=error error={err}");
                Ok(CopyOutcome::Failed(err))
            }
        }
    }

    /// Full collection, newest first.
    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Status of the hydrate load, `None` before `hydrate`.
    pub fn load_status(&self) -> Option<&LoadStatus> {
        self.load_status.as_ref()
    }

    /// Status of the most recent write-through, for diagnostics only.
    pub fn last_save_status(&self) -> Option<&SaveStatus> {
        self.last_save.as_ref()
    }

    fn persist(&mut self) {
        let status = self.persistence.save(&self.clips);
        if !status.is_saved() {
            warn!("event=store_persist module=service status=error save_status={status:?}");
        }
        self.last_save = Some(status);
    }
}
