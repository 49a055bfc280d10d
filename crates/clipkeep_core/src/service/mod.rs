//! Core use-case services.
//!
//! # Responsibility
//! - Expose the clip store as the single entry point for UI callers.
//! - Keep callers decoupled from slot storage details.

pub mod clip_store;
