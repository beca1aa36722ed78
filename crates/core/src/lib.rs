//! Core engine - pure, deterministic, and testable
//!
//! This crate holds the falling-piece simulation. It has **no dependencies** on
//! UI, timers or I/O:
//!
//! - **Deterministic**: the piece sequence comes from an injected
//!   [`PieceSource`]; equal sources and equal commands give equal games
//! - **Synchronous**: every operation completes immediately and reports
//!   failure as a return value
//! - **Portable**: the embedding application owns the window, the input
//!   mapping and the gravity timer
//!
//! # Module Structure
//!
//! - [`shapes`]: the shape catalog, one 4x4 mask per shape and rotation
//! - [`sequence`]: piece selection policies (fixed list, seeded bag)
//! - [`grid`]: storage for settled cells
//! - [`board`]: the board state machine (move, rotate, tick, shadow, queries)
//! - [`config`]: board dimensions, spawn origin and gravity timing
//! - [`error`]: the contract-violation error type
//!
//! # Example
//!
//! ```
//! use blockfall_core::{Board, BoardConfig, FixedSequence, ShapeCatalog, ShapeKind, TickOutcome};
//! use blockfall_core::types::{Cell, Command};
//!
//! let mut board = Board::new(
//!     BoardConfig::sized(6, 10),
//!     ShapeCatalog::standard(),
//!     FixedSequence::repeat(ShapeKind::O.id()),
//! )
//! .unwrap();
//!
//! board.apply(Command::MoveLeft);
//! assert_eq!(board.shadow_row(1), Some(8));
//!
//! while board.tick() == TickOutcome::Fell {}
//! assert_eq!(board.cell_state(1, 9).unwrap(), Cell::Locked);
//! assert_eq!(board.fall_interval_ms(), 200);
//! ```

pub mod board;
pub mod config;
pub mod error;
pub mod grid;
pub mod sequence;
pub mod shapes;

pub use blockfall_types as types;

pub use board::{Board, Piece, PieceCells, TickOutcome};
pub use config::BoardConfig;
pub use error::{EngineError, Result};
pub use grid::Grid;
pub use sequence::{BagSequence, FixedSequence, PieceSource, SimpleRng};
pub use shapes::{Mask, ShapeCatalog, ShapeId, ShapeKind};
