//! Sequence module - piece selection policies
//!
//! The board never decides which shape comes next; it asks a [`PieceSource`].
//! Two deterministic sources ship with the engine:
//!
//! - [`FixedSequence`]: cycles through an explicit list of shape ids.
//! - [`BagSequence`]: the "bag" policy. Every bag holds each shape of the
//!   catalog once, shuffled with a seeded LCG, so equal seeds give equal games.

use crate::shapes::{ShapeCatalog, ShapeId};

/// Supplies the shape of every newly spawned piece.
pub trait PieceSource {
    /// Consume and return the next shape
    fn next_shape(&mut self) -> ShapeId;

    /// The shape the next call to [`PieceSource::next_shape`] will return, if known
    fn peek(&self) -> Option<ShapeId>;
}

impl<S: PieceSource + ?Sized> PieceSource for Box<S> {
    fn next_shape(&mut self) -> ShapeId {
        (**self).next_shape()
    }

    fn peek(&self) -> Option<ShapeId> {
        (**self).peek()
    }
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // A zero state is a fixed point of the multiply; nudge it.
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Random value in `[0, max)`; `max` must be non-zero
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }

    /// Fisher-Yates shuffle
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }
}

/// Cycles through a fixed list of shapes forever.
#[derive(Debug, Clone)]
pub struct FixedSequence {
    shapes: Vec<ShapeId>,
    index: usize,
}

impl FixedSequence {
    /// An empty list behaves like `[0]`.
    pub fn new(shapes: impl Into<Vec<ShapeId>>) -> Self {
        let mut shapes = shapes.into();
        if shapes.is_empty() {
            shapes.push(0);
        }
        Self { shapes, index: 0 }
    }

    /// The same shape every time
    pub fn repeat(shape: ShapeId) -> Self {
        Self::new(vec![shape])
    }

    pub fn shapes(&self) -> &[ShapeId] {
        &self.shapes
    }
}

impl PieceSource for FixedSequence {
    fn next_shape(&mut self) -> ShapeId {
        let shape = self.shapes[self.index];
        self.index = (self.index + 1) % self.shapes.len();
        shape
    }

    fn peek(&self) -> Option<ShapeId> {
        self.shapes.get(self.index).copied()
    }
}

/// Seeded bag generator over every shape of a catalog.
#[derive(Debug, Clone)]
pub struct BagSequence {
    bag: Vec<ShapeId>,
    bag_index: usize,
    rng: SimpleRng,
    seed: u32,
}

impl BagSequence {
    /// Bag over `catalog`'s shapes, shuffled from `seed`
    pub fn new(catalog: &ShapeCatalog, seed: u32) -> Self {
        Self::with_shape_count(catalog.len().max(1), seed)
    }

    /// Bag over shape ids `0..count`
    pub fn with_shape_count(count: usize, seed: u32) -> Self {
        let mut sequence = Self {
            bag: (0..count.max(1)).collect(),
            bag_index: 0,
            rng: SimpleRng::new(seed),
            seed,
        };
        sequence.refill_bag();
        sequence
    }

    fn refill_bag(&mut self) {
        self.bag.sort_unstable();
        self.rng.shuffle(&mut self.bag);
        self.bag_index = 0;
    }

    /// Seed this sequence was created with
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Shapes left in the current bag
    pub fn remaining(&self) -> &[ShapeId] {
        &self.bag[self.bag_index..]
    }
}

impl PieceSource for BagSequence {
    fn next_shape(&mut self) -> ShapeId {
        if self.bag_index >= self.bag.len() {
            self.refill_bag();
        }
        let shape = self.bag[self.bag_index];
        self.bag_index += 1;
        shape
    }

    fn peek(&self) -> Option<ShapeId> {
        if let Some(&shape) = self.bag.get(self.bag_index) {
            return Some(shape);
        }
        // Preview the next bag on a copy so peeking never advances the RNG.
        let mut preview = self.clone();
        Some(preview.next_shape())
    }
}
