//! Shapes module - piece geometry for every rotation state
//!
//! Each shape is four precomputed 4x4 occupancy masks, one per rotation. The
//! masks are data, not the output of a rotation formula, so a catalog may hold
//! deliberately asymmetric rotation sets.
//!
//! Local coordinates: `(x, y)` with x growing to the right and y growing down,
//! both in `0..4`. Inside a [`Mask`] row, bit 3 is local x 0.

use blockfall_types::{Rotation, SHAPE_GRID};

use crate::error::{EngineError, Result};

/// Index of a shape inside a [`ShapeCatalog`]
pub type ShapeId = usize;

/// 4x4 occupancy mask, one nibble per row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Mask([u8; SHAPE_GRID]);

impl Mask {
    /// Build a mask from four row nibbles, top row first.
    ///
    /// ```
    /// use blockfall_core::shapes::Mask;
    ///
    /// // ##..
    /// // ##..
    /// let square = Mask::from_rows([0b1100, 0b1100, 0, 0]);
    /// assert!(square.contains(1, 1));
    /// assert!(!square.contains(2, 0));
    /// ```
    pub const fn from_rows(rows: [u8; SHAPE_GRID]) -> Self {
        Self(rows)
    }

    /// Whether the local cell is covered. Coordinates outside the grid are not.
    #[inline(always)]
    pub fn contains(&self, local_x: usize, local_y: usize) -> bool {
        if local_x >= SHAPE_GRID || local_y >= SHAPE_GRID {
            return false;
        }
        self.0[local_y] & (0b1000 >> local_x) != 0
    }

    /// Occupied local cells in row-major order
    pub fn cells(self) -> impl Iterator<Item = (i32, i32)> {
        (0..SHAPE_GRID).flat_map(move |y| {
            (0..SHAPE_GRID)
                .filter(move |&x| self.contains(x, y))
                .map(move |x| (x as i32, y as i32))
        })
    }

    pub fn count(&self) -> usize {
        self.0.iter().map(|row| (row & 0b1111).count_ones() as usize).sum()
    }
}

/// The shapes of the standard catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    O,
    I,
    T,
    S,
    Z,
    J,
    L,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 7] = [
        ShapeKind::O,
        ShapeKind::I,
        ShapeKind::T,
        ShapeKind::S,
        ShapeKind::Z,
        ShapeKind::J,
        ShapeKind::L,
    ];

    /// Position of this shape in [`ShapeCatalog::standard`]
    pub fn id(&self) -> ShapeId {
        match self {
            ShapeKind::O => 0,
            ShapeKind::I => 1,
            ShapeKind::T => 2,
            ShapeKind::S => 3,
            ShapeKind::Z => 4,
            ShapeKind::J => 5,
            ShapeKind::L => 6,
        }
    }

    pub fn from_id(id: ShapeId) -> Option<Self> {
        Self::ALL.get(id).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::O => "o",
            ShapeKind::I => "i",
            ShapeKind::T => "t",
            ShapeKind::S => "s",
            ShapeKind::Z => "z",
            ShapeKind::J => "j",
            ShapeKind::L => "l",
        }
    }
}

const fn m(rows: [u8; SHAPE_GRID]) -> Mask {
    Mask::from_rows(rows)
}

/// Masks for the standard catalog, indexed by `[ShapeKind::id()][Rotation::index()]`
static STANDARD: [[Mask; 4]; 7] = [
    // O: identical in every rotation
    [
        m([0b1100, 0b1100, 0, 0]),
        m([0b1100, 0b1100, 0, 0]),
        m([0b1100, 0b1100, 0, 0]),
        m([0b1100, 0b1100, 0, 0]),
    ],
    // I
    [
        m([0, 0b1111, 0, 0]),
        m([0b0010, 0b0010, 0b0010, 0b0010]),
        m([0, 0, 0b1111, 0]),
        m([0b0100, 0b0100, 0b0100, 0b0100]),
    ],
    // T
    [
        m([0b0100, 0b1110, 0, 0]),
        m([0b0100, 0b0110, 0b0100, 0]),
        m([0, 0b1110, 0b0100, 0]),
        m([0b0100, 0b1100, 0b0100, 0]),
    ],
    // S
    [
        m([0b0110, 0b1100, 0, 0]),
        m([0b0100, 0b0110, 0b0010, 0]),
        m([0, 0b0110, 0b1100, 0]),
        m([0b1000, 0b1100, 0b0100, 0]),
    ],
    // Z
    [
        m([0b1100, 0b0110, 0, 0]),
        m([0b0010, 0b0110, 0b0100, 0]),
        m([0, 0b1100, 0b0110, 0]),
        m([0b0100, 0b1100, 0b1000, 0]),
    ],
    // J
    [
        m([0b1000, 0b1110, 0, 0]),
        m([0b0110, 0b0100, 0b0100, 0]),
        m([0, 0b1110, 0b0010, 0]),
        m([0b0100, 0b0100, 0b1100, 0]),
    ],
    // L
    [
        m([0b0010, 0b1110, 0, 0]),
        m([0b0100, 0b0100, 0b0110, 0]),
        m([0, 0b1110, 0b1000, 0]),
        m([0b1100, 0b0100, 0b0100, 0]),
    ],
];

/// Immutable table of shape masks.
///
/// Cheap to copy; the table itself is `'static`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeCatalog {
    table: &'static [[Mask; 4]],
}

impl ShapeCatalog {
    /// The seven standard shapes, indexed by [`ShapeKind::id`]
    pub fn standard() -> Self {
        Self { table: &STANDARD }
    }

    /// A catalog over a caller-supplied static table
    pub const fn new(table: &'static [[Mask; 4]]) -> Self {
        Self { table }
    }

    /// Number of shapes
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn contains_shape(&self, shape: ShapeId) -> bool {
        shape < self.table.len()
    }

    /// Mask of `shape` at `rotation`
    pub fn mask(&self, shape: ShapeId, rotation: Rotation) -> Result<Mask> {
        self.table
            .get(shape)
            .map(|rotations| rotations[rotation.index()])
            .ok_or(EngineError::UnknownShape(shape))
    }

    /// Whether `shape` at `rotation` covers local cell `(local_x, local_y)`.
    ///
    /// Both coordinates must lie in `[0, 4)`; anything else is
    /// [`EngineError::OutOfRange`].
    pub fn occupied(
        &self,
        shape: ShapeId,
        rotation: Rotation,
        local_x: i32,
        local_y: i32,
    ) -> Result<bool> {
        let grid = SHAPE_GRID as i32;
        if !(0..grid).contains(&local_x) || !(0..grid).contains(&local_y) {
            return Err(EngineError::OutOfRange {
                shape,
                local_x,
                local_y,
            });
        }
        let mask = self.mask(shape, rotation)?;
        Ok(mask.contains(local_x as usize, local_y as usize))
    }

    /// Occupied local cells of `shape` at `rotation`
    pub fn cells(
        &self,
        shape: ShapeId,
        rotation: Rotation,
    ) -> Result<impl Iterator<Item = (i32, i32)>> {
        Ok(self.mask(shape, rotation)?.cells())
    }
}

impl Default for ShapeCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
