//! Clip domain model.
//!
//! # Responsibility
//! - Define the single record type held by the clip store.
//! - Own the content/tag normalization rules applied at write boundaries.
//!
//! # Invariants
//! - Every clip is identified by a stable `ClipId`.
//! - Stored content is trimmed and never empty.

pub mod clip;
