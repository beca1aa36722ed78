//! Terminal input mapping.
//!
//! Translates `crossterm` key events into engine [`crate::types::Command`]s.
//! Keys without a binding map to `None` and are meant to be ignored.

pub mod map;

pub use blockfall_types as types;

pub use map::{command_for_key, should_quit};
