//! Clip filtering.
//!
//! # Responsibility
//! - Decide which clips match a tag/search-text filter.
//!
//! # Invariants
//! - Filtering is a pure projection; it never reorders or mutates clips.

pub mod filter;
