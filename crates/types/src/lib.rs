//! Core types module - shared data structures and constants
//!
//! This crate defines the vocabulary shared by the engine, the input mapping and
//! the terminal view. Everything here is plain data with no engine logic, so it
//! can be used from any context (core simulation, rendering, tests).
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns by default (indexed 0-9, left to right)
//! - **Height**: 20 rows by default (indexed 0-19, top to bottom)
//! - **Shape grid**: every piece lives in a 4x4 local grid
//!
//! Both dimensions are only defaults; the engine accepts any size at runtime.
//!
//! # Gravity Timing
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `INITIAL_FALL_MS` | 300 | Gravity period when a game starts |
//! | `FALL_STEP_MS` | 100 | Speed-up applied on every lock |
//! | `MIN_FALL_MS` | 100 | Floor below which gravity never drops |
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{Command, Rotation, RotationDirection, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let rotation = Rotation::North;
//! assert_eq!(rotation.rotated(RotationDirection::Clockwise), Rotation::East);
//! assert_eq!(rotation.rotate_ccw(), Rotation::West);
//!
//! assert_eq!(Command::from_str("rotateCw"), Some(Command::RotateCw));
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

/// Default board width in cells
pub const BOARD_WIDTH: u16 = 10;

/// Default board height in cells
pub const BOARD_HEIGHT: u16 = 20;

/// Largest accepted board width or height
pub const MAX_BOARD_DIM: u16 = 1024;

/// Side length of the square local grid every shape mask is drawn in
pub const SHAPE_GRID: usize = 4;

/// Gravity period at the start of a game (milliseconds per row)
pub const INITIAL_FALL_MS: u32 = 300;

/// Amount the gravity period shrinks by on every lock
pub const FALL_STEP_MS: u32 = 100;

/// Gravity period floor
pub const MIN_FALL_MS: u32 = 100;

/// State of a single board position.
///
/// Exactly one variant holds per position at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Cell {
    #[default]
    Empty,
    /// Covered by the currently falling piece
    Active,
    /// Permanently settled
    Locked,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_locked(&self) -> bool {
        matches!(self, Cell::Locked)
    }
}

/// Game progress. `Ended` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    #[default]
    Playing,
    Ended,
}

/// The four discrete orientations of a piece.
///
/// The cycle goes North → East → South → West → North. North is the spawn
/// orientation (rotation index 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rotation {
    #[default]
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// All rotations in index order
    pub const ALL: [Rotation; 4] = [
        Rotation::North,
        Rotation::East,
        Rotation::South,
        Rotation::West,
    ];

    /// Rotation index in `0..4`
    pub fn index(&self) -> usize {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }

    /// Rotation for an arbitrary index, wrapping modulo 4
    ///
    /// ```
    /// use blockfall_types::Rotation;
    ///
    /// assert_eq!(Rotation::from_index(1), Rotation::East);
    /// assert_eq!(Rotation::from_index(5), Rotation::East);
    /// ```
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 4]
    }

    /// Rotate clockwise (90°)
    pub fn rotate_cw(&self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// Rotate counter-clockwise (-90°)
    pub fn rotate_ccw(&self) -> Self {
        Self::from_index(self.index() + 3)
    }

    pub fn rotated(&self, direction: RotationDirection) -> Self {
        match direction {
            RotationDirection::Clockwise => self.rotate_cw(),
            RotationDirection::CounterClockwise => self.rotate_ccw(),
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Rotation::North => "north",
            Rotation::East => "east",
            Rotation::South => "south",
            Rotation::West => "west",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

/// Player commands accepted by the engine.
///
/// The presentation layer translates raw key symbols into one of these; keys
/// that map to nothing are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Command {
    /// Shift the piece one column left
    MoveLeft,
    /// Shift the piece one column right
    MoveRight,
    /// Push the piece one row down (never locks it)
    SoftDrop,
    /// Rotate 90° clockwise, in place
    RotateCw,
    /// Rotate 90° counter-clockwise, in place
    RotateCcw,
}

impl Command {
    pub const ALL: [Command; 5] = [
        Command::MoveLeft,
        Command::MoveRight,
        Command::SoftDrop,
        Command::RotateCw,
        Command::RotateCcw,
    ];

    /// Parse a command name (case-insensitive)
    ///
    /// ```
    /// use blockfall_types::Command;
    ///
    /// assert_eq!(Command::from_str("moveLeft"), Some(Command::MoveLeft));
    /// assert_eq!(Command::from_str("SOFTDROP"), Some(Command::SoftDrop));
    /// assert_eq!(Command::from_str("hardDrop"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(Command::MoveLeft),
            "moveright" => Some(Command::MoveRight),
            "softdrop" => Some(Command::SoftDrop),
            "rotatecw" => Some(Command::RotateCw),
            "rotateccw" => Some(Command::RotateCcw),
            _ => None,
        }
    }

    /// camelCase name, the inverse of [`Command::from_str`]
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::MoveLeft => "moveLeft",
            Command::MoveRight => "moveRight",
            Command::SoftDrop => "softDrop",
            Command::RotateCw => "rotateCw",
            Command::RotateCcw => "rotateCcw",
        }
    }
}
