//! Engine error type.
//!
//! Only contract violations are errors. A blocked move or rotation is an
//! ordinary `false` result, never an `Err`.

use thiserror::Error;

use crate::shapes::ShapeId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Local coordinate outside the shape's N×N grid
    #[error("local cell ({local_x}, {local_y}) is outside the grid of shape {shape}")]
    OutOfRange {
        shape: ShapeId,
        local_x: i32,
        local_y: i32,
    },
    #[error("shape {0} is not in the catalog")]
    UnknownShape(ShapeId),
    /// Board coordinate outside `[0, width) x [0, height)`
    #[error("board cell ({x}, {y}) is out of bounds")]
    OutOfBounds { x: i32, y: i32 },
    #[error("invalid board configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
