//! Prelude module for datebound crate.
//!
//! Re-exports the derive macros from derive_more used across modules.

pub use derive_more::Display;
