//! Terminal presentation for blockfall.
//!
//! `view` turns a board into a [`Frame`] of glyphs without touching the
//! terminal; `renderer` flushes frames through crossterm. Board cells are
//! drawn two columns wide.

pub mod frame;
pub mod renderer;
pub mod view;

pub use blockfall_core as core;
pub use blockfall_types as types;

pub use frame::{Frame, Glyph, Tone};
pub use renderer::{encode_frame_into, TerminalRenderer};
pub use view::BoardView;
