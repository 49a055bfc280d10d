//! Durable slot storage and the clip persistence adapter.
//!
//! # Responsibility
//! - Define the raw key-value slot contract and its SQLite/in-memory backends.
//! - Translate the whole clip collection to and from one slot value.
//!
//! # Invariants
//! - Slot values are opaque strings; only the adapter knows their format.
//! - Persistence faults stop at the adapter and come back as status values.

pub mod clip_persistence;
pub mod slot;
