//! Board module - the falling-piece state machine
//!
//! A [`Board`] owns the settled grid, the falling piece and the gravity period.
//! It moves through `Playing → Ended` exactly once: when a freshly spawned
//! piece overlaps a locked cell. Every operation is synchronous and bounded by
//! the size of a piece's local grid.
//!
//! Collision testing overlays a candidate mask on the grid and checks each
//! covered cell for being in bounds and not locked. The falling piece is never
//! stored in the grid, so a move is never tested against the piece's own
//! previous position.

use std::fmt;
use std::time::Duration;

use arrayvec::ArrayVec;
use log::{debug, info, trace, warn};

use blockfall_types::{Cell, Command, Phase, Rotation, RotationDirection, SHAPE_GRID};

use crate::config::BoardConfig;
use crate::error::{EngineError, Result};
use crate::grid::Grid;
use crate::sequence::{BagSequence, PieceSource};
use crate::shapes::{ShapeCatalog, ShapeId};

/// Board coordinates covered by one piece
pub type PieceCells = ArrayVec<(i32, i32), { SHAPE_GRID * SHAPE_GRID }>;

/// A falling piece: which shape, which way round, and where its local grid sits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Piece {
    pub shape: ShapeId,
    pub rotation: Rotation,
    /// Board column of local x 0
    pub x: i32,
    /// Board row of local y 0
    pub y: i32,
}

impl Piece {
    /// A piece in spawn orientation
    pub fn new(shape: ShapeId, x: i32, y: i32) -> Self {
        Self {
            shape,
            rotation: Rotation::North,
            x,
            y,
        }
    }

    pub fn origin(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Translated copy; `None` if the origin would overflow `i32`
    pub fn moved(&self, dx: i32, dy: i32) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
            ..*self
        })
    }

    pub fn rotated(&self, direction: RotationDirection) -> Self {
        Self {
            rotation: self.rotation.rotated(direction),
            ..*self
        }
    }

    /// Board coordinates this piece covers. Coordinates past `i32::MAX` saturate.
    pub fn cells(&self, catalog: &ShapeCatalog) -> Result<PieceCells> {
        Ok(catalog
            .cells(self.shape, self.rotation)?
            .map(|(lx, ly)| (self.x.saturating_add(lx), self.y.saturating_add(ly)))
            .collect())
    }

    /// Whether this piece covers board cell `(x, y)`
    pub fn covers(&self, catalog: &ShapeCatalog, x: i32, y: i32) -> bool {
        let (Some(lx), Some(ly)) = (x.checked_sub(self.x), y.checked_sub(self.y)) else {
            return false;
        };
        let grid = SHAPE_GRID as i32;
        if !(0..grid).contains(&lx) || !(0..grid).contains(&ly) {
            return false;
        }
        catalog
            .occupied(self.shape, self.rotation, lx, ly)
            .unwrap_or(false)
    }
}

/// What a call to [`Board::tick`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickOutcome {
    /// The piece dropped one row
    Fell,
    /// The piece could not drop; it locked and a new piece spawned
    Locked,
    /// The piece locked and the next spawn collided; the board has ended
    GameOver,
    /// The board had already ended; nothing happened
    Inert,
}

impl TickOutcome {
    /// Whether a lock happened during this tick
    pub fn locked(&self) -> bool {
        matches!(self, TickOutcome::Locked | TickOutcome::GameOver)
    }
}

/// The board state machine
#[derive(Clone)]
pub struct Board<S = BagSequence> {
    config: BoardConfig,
    catalog: ShapeCatalog,
    grid: Grid,
    source: S,
    active: Option<Piece>,
    phase: Phase,
    fall_interval_ms: u32,
    /// Number of lock events so far
    locks: u32,
    /// Number of successful spawns so far
    spawned: u32,
}

impl Board<BagSequence> {
    /// Default-sized board with the standard catalog and a seeded bag
    pub fn seeded(seed: u32) -> Self {
        let catalog = ShapeCatalog::standard();
        Self::assemble(
            BoardConfig::default(),
            catalog,
            BagSequence::new(&catalog, seed),
        )
    }
}

impl<S: PieceSource> Board<S> {
    /// Create a board and spawn its first piece.
    ///
    /// Fails with [`EngineError::InvalidConfig`] if the config is invalid, the
    /// catalog is empty, or some shape would not fit at the spawn origin of an
    /// empty board.
    pub fn new(config: BoardConfig, catalog: ShapeCatalog, source: S) -> Result<Self> {
        config.validate()?;
        if catalog.is_empty() {
            return Err(EngineError::InvalidConfig(
                "shape catalog has no shapes".to_string(),
            ));
        }

        let empty = Grid::new(config.width, config.height);
        for shape in 0..catalog.len() {
            let piece = Piece::new(shape, config.spawn_x, config.spawn_y);
            if !fits(&catalog, &empty, &piece) {
                return Err(EngineError::InvalidConfig(format!(
                    "shape {} does not fit at spawn ({}, {}) on a {}x{} board",
                    shape, config.spawn_x, config.spawn_y, config.width, config.height
                )));
            }
        }

        Ok(Self::assemble(config, catalog, source))
    }

    /// Default config and the standard catalog
    pub fn with_defaults(source: S) -> Self {
        Self::assemble(BoardConfig::default(), ShapeCatalog::standard(), source)
    }

    fn assemble(config: BoardConfig, catalog: ShapeCatalog, source: S) -> Self {
        let mut board = Self {
            grid: Grid::new(config.width, config.height),
            fall_interval_ms: config.initial_fall_ms,
            config,
            catalog,
            source,
            active: None,
            phase: Phase::Playing,
            locks: 0,
            spawned: 0,
        };
        board.spawn_piece();
        board
    }

    pub fn width(&self) -> u16 {
        self.grid.width()
    }

    pub fn height(&self) -> u16 {
        self.grid.height()
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn catalog(&self) -> &ShapeCatalog {
        &self.catalog
    }

    /// Settled cells only (the falling piece is not included)
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_ended(&self) -> bool {
        self.phase == Phase::Ended
    }

    pub fn active_piece(&self) -> Option<Piece> {
        self.active
    }

    /// Board cells covered by the falling piece
    pub fn active_cells(&self) -> PieceCells {
        self.active
            .and_then(|piece| piece.cells(&self.catalog).ok())
            .unwrap_or_default()
    }

    /// Current gravity period in milliseconds
    pub fn fall_interval_ms(&self) -> u32 {
        self.fall_interval_ms
    }

    pub fn fall_interval(&self) -> Duration {
        Duration::from_millis(self.fall_interval_ms as u64)
    }

    pub fn locks(&self) -> u32 {
        self.locks
    }

    pub fn pieces_spawned(&self) -> u32 {
        self.spawned
    }

    /// Shape the next spawn will use, if the source can tell
    pub fn next_shape(&self) -> Option<ShapeId> {
        self.source.peek()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn fits(&self, piece: &Piece) -> bool {
        fits(&self.catalog, &self.grid, piece)
    }

    /// State of board cell `(x, y)`.
    ///
    /// Fails with [`EngineError::OutOfBounds`] outside `[0, width) x [0, height)`.
    pub fn cell_state(&self, x: i32, y: i32) -> Result<Cell> {
        let stored = self.grid.get(x, y).ok_or(EngineError::OutOfBounds { x, y })?;
        match self.active {
            Some(piece) if piece.covers(&self.catalog, x, y) => Ok(Cell::Active),
            _ => Ok(stored),
        }
    }

    /// Install the next shape at the spawn origin in spawn orientation.
    ///
    /// Any current piece is replaced, not locked. If the placement collides
    /// with a locked cell the board ends and no piece is installed.
    pub fn spawn_piece(&mut self) -> bool {
        if self.is_ended() {
            return false;
        }

        let mut shape = self.source.next_shape();
        if !self.catalog.contains_shape(shape) {
            warn!(
                "piece source produced unknown shape {}; wrapping into catalog of {}",
                shape,
                self.catalog.len()
            );
            shape %= self.catalog.len();
        }

        let piece = Piece::new(shape, self.config.spawn_x, self.config.spawn_y);
        if !self.fits(&piece) {
            self.active = None;
            self.phase = Phase::Ended;
            info!(
                "spawn of shape {} at ({}, {}) collided; game over after {} locks",
                shape, piece.x, piece.y, self.locks
            );
            return false;
        }

        self.active = Some(piece);
        self.spawned = self.spawned.wrapping_add(1);
        debug!("spawned shape {} at ({}, {})", shape, piece.x, piece.y);
        true
    }

    /// Translate the falling piece by `(dx, dy)` if the result is in bounds and
    /// clear of locked cells. A blocked move changes nothing and returns false.
    pub fn try_move(&mut self, dx: i32, dy: i32) -> bool {
        if self.is_ended() {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        if let Some(candidate) = active.moved(dx, dy) {
            if self.fits(&candidate) {
                self.active = Some(candidate);
                return true;
            }
        }

        trace!("move ({}, {}) blocked at ({}, {})", dx, dy, active.x, active.y);
        false
    }

    /// Rotate the falling piece one step in place. There is no kick search:
    /// if the rotated mask does not fit at the same origin, nothing changes.
    pub fn try_rotate(&mut self, direction: RotationDirection) -> bool {
        if self.is_ended() {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        let candidate = active.rotated(direction);
        if self.fits(&candidate) {
            self.active = Some(candidate);
            return true;
        }

        trace!(
            "rotation {} -> {} blocked at ({}, {})",
            active.rotation.as_str(),
            candidate.rotation.as_str(),
            active.x,
            active.y
        );
        false
    }

    /// Advance gravity by one step.
    ///
    /// Drops the piece one row. If it cannot drop, the piece locks, the gravity
    /// period shrinks by the configured step (not below the floor), and the
    /// next piece spawns. This is the only place cells become locked.
    pub fn tick(&mut self) -> TickOutcome {
        if self.is_ended() || self.active.is_none() {
            return TickOutcome::Inert;
        }

        if self.try_move(0, 1) {
            return TickOutcome::Fell;
        }

        self.lock_active();
        if self.spawn_piece() {
            TickOutcome::Locked
        } else {
            TickOutcome::GameOver
        }
    }

    fn lock_active(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };

        for (x, y) in active.cells(&self.catalog).unwrap_or_default() {
            self.grid.lock(x, y);
        }

        self.locks = self.locks.wrapping_add(1);
        self.fall_interval_ms = self
            .fall_interval_ms
            .saturating_sub(self.config.fall_step_ms)
            .max(self.config.min_fall_ms);

        debug!(
            "locked shape {} at ({}, {}); fall interval now {}ms",
            active.shape, active.x, active.y, self.fall_interval_ms
        );
    }

    /// Lowest origin row the falling piece could reach in column `origin_x`
    /// under pure gravity, probing down from its current row.
    ///
    /// `None` when there is no falling piece, or when the piece does not fit at
    /// `(origin_x, current row)` in the first place.
    pub fn shadow_row(&self, origin_x: i32) -> Option<i32> {
        let active = self.active?;
        let mut probe = Piece {
            x: origin_x,
            ..active
        };
        if !self.fits(&probe) {
            return None;
        }

        loop {
            match probe.moved(0, 1) {
                Some(below) if self.fits(&below) => probe = below,
                _ => return Some(probe.y),
            }
        }
    }

    /// The falling piece moved to its shadow row
    pub fn shadow_piece(&self) -> Option<Piece> {
        let active = self.active?;
        let y = self.shadow_row(active.x)?;
        Some(Piece { y, ..active })
    }

    /// Dispatch a player command. Returns whether the piece changed.
    pub fn apply(&mut self, command: Command) -> bool {
        trace!("apply {}", command.as_str());
        match command {
            Command::MoveLeft => self.try_move(-1, 0),
            Command::MoveRight => self.try_move(1, 0),
            Command::SoftDrop => self.try_move(0, 1),
            Command::RotateCw => self.try_rotate(RotationDirection::Clockwise),
            Command::RotateCcw => self.try_rotate(RotationDirection::CounterClockwise),
        }
    }
}

impl<S> fmt::Debug for Board<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("width", &self.grid.width())
            .field("height", &self.grid.height())
            .field("phase", &self.phase)
            .field("active", &self.active)
            .field("fall_interval_ms", &self.fall_interval_ms)
            .field("locks", &self.locks)
            .finish_non_exhaustive()
    }
}

/// In bounds and clear of locked cells
fn fits(catalog: &ShapeCatalog, grid: &Grid, piece: &Piece) -> bool {
    match catalog.cells(piece.shape, piece.rotation) {
        Ok(mut cells) => cells.all(|(lx, ly)| {
            match (piece.x.checked_add(lx), piece.y.checked_add(ly)) {
                (Some(x), Some(y)) => grid.is_free(x, y),
                _ => false,
            }
        }),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::FixedSequence;
    use crate::shapes::ShapeKind;

    fn square_board(width: u16, height: u16) -> Board<FixedSequence> {
        Board::new(
            BoardConfig::sized(width, height),
            ShapeCatalog::standard(),
            FixedSequence::repeat(ShapeKind::O.id()),
        )
        .unwrap()
    }

    #[test]
    fn new_board_spawns_first_piece() {
        let board = square_board(6, 10);
        assert_eq!(board.phase(), Phase::Playing);
        assert_eq!(
            board.active_piece(),
            Some(Piece::new(ShapeKind::O.id(), 2, 0))
        );
        assert_eq!(board.pieces_spawned(), 1);
        assert_eq!(board.fall_interval_ms(), 300);
    }

    #[test]
    fn new_rejects_spawn_that_cannot_fit() {
        // I is four wide; a three-wide board cannot hold it at any column.
        let result = Board::new(
            BoardConfig::sized(3, 10),
            ShapeCatalog::standard(),
            FixedSequence::repeat(0),
        );
        assert!(matches!(result, Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn new_rejects_invalid_config() {
        let result = Board::new(
            BoardConfig::sized(0, 10),
            ShapeCatalog::standard(),
            FixedSequence::repeat(0),
        );
        assert!(result.is_err());
    }

    #[test]
    fn try_move_commits_and_rejects() {
        let mut board = square_board(6, 10);
        assert!(board.try_move(-1, 0));
        assert!(board.try_move(-1, 0));
        assert_eq!(board.active_piece().unwrap().x, 0);
        assert!(!board.try_move(-1, 0));
        assert_eq!(board.active_piece().unwrap().x, 0);
    }

    #[test]
    fn move_is_not_blocked_by_own_cells() {
        let mut board = square_board(6, 10);
        // One row down overlaps the piece's own previous lower row.
        assert!(board.try_move(0, 1));
        assert_eq!(board.active_piece().unwrap().y, 1);
    }

    #[test]
    fn extreme_offsets_are_rejected_without_mutation() {
        let mut board = square_board(6, 10);
        let before = board.active_piece();
        for (dx, dy) in [(i32::MAX, 0), (i32::MIN, 0), (0, i32::MAX), (0, i32::MIN)] {
            assert!(!board.try_move(dx, dy), "({}, {})", dx, dy);
            assert_eq!(board.active_piece(), before);
        }
        assert_eq!(board.shadow_row(i32::MAX), None);
        assert_eq!(board.shadow_row(i32::MIN), None);
    }

    #[test]
    fn moved_reports_overflow() {
        let piece = Piece::new(0, i32::MAX - 1, 0);
        assert_eq!(piece.moved(1, 0).map(|p| p.x), Some(i32::MAX));
        assert_eq!(piece.moved(2, 0), None);
        assert!(!piece.covers(&ShapeCatalog::standard(), i32::MIN, 0));
    }

    #[test]
    fn soft_drop_never_locks() {
        let mut board = square_board(6, 10);
        while board.apply(Command::SoftDrop) {}
        assert_eq!(board.active_piece().unwrap().y, 8);
        assert!(!board.apply(Command::SoftDrop));
        assert_eq!(board.locks(), 0);
        assert_eq!(board.grid().locked_count(), 0);
    }

    #[test]
    fn tick_locks_and_speeds_up() {
        let mut board = square_board(6, 10);
        for _ in 0..8 {
            assert_eq!(board.tick(), TickOutcome::Fell);
        }
        assert_eq!(board.tick(), TickOutcome::Locked);
        assert_eq!(board.locks(), 1);
        assert_eq!(board.fall_interval_ms(), 200);
        for (x, y) in [(2, 8), (3, 8), (2, 9), (3, 9)] {
            assert_eq!(board.cell_state(x, y), Ok(Cell::Locked));
        }
    }

    #[test]
    fn fall_interval_stops_at_floor() {
        let mut board = Board::new(
            BoardConfig::sized(6, 10).with_fall_timing(250, 100, 120),
            ShapeCatalog::standard(),
            FixedSequence::repeat(ShapeKind::O.id()),
        )
        .unwrap();
        let mut seen = vec![board.fall_interval_ms()];
        while !board.is_ended() {
            if board.tick().locked() {
                seen.push(board.fall_interval_ms());
            }
        }
        assert_eq!(&seen[..4], &[250, 150, 120, 120]);
    }

    #[test]
    fn cell_state_overlays_active_piece() {
        let board = square_board(6, 10);
        assert_eq!(board.cell_state(2, 0), Ok(Cell::Active));
        assert_eq!(board.cell_state(3, 1), Ok(Cell::Active));
        assert_eq!(board.cell_state(4, 0), Ok(Cell::Empty));
        assert_eq!(
            board.cell_state(6, 0),
            Err(EngineError::OutOfBounds { x: 6, y: 0 })
        );
        assert_eq!(
            board.cell_state(0, -1),
            Err(EngineError::OutOfBounds { x: 0, y: -1 })
        );
    }

    #[test]
    fn shadow_row_on_empty_board_is_floor() {
        let board = square_board(6, 10);
        assert_eq!(board.shadow_row(2), Some(8));
        assert_eq!(board.shadow_row(0), Some(8));
        // Square would poke out of the right wall.
        assert_eq!(board.shadow_row(5), None);
        assert_eq!(board.shadow_piece().map(|p| p.y), Some(8));
    }

    #[test]
    fn shadow_row_does_not_mutate() {
        let mut board = square_board(6, 10);
        board.try_move(0, 3);
        let before = board.clone();
        let _ = board.shadow_row(1);
        assert_eq!(board.active_piece(), before.active_piece());
        assert_eq!(board.grid(), before.grid());
    }

    #[test]
    fn unknown_shape_from_source_wraps_into_catalog() {
        let board = Board::new(
            BoardConfig::default(),
            ShapeCatalog::standard(),
            FixedSequence::repeat(7 + ShapeKind::T.id()),
        )
        .unwrap();
        assert_eq!(board.active_piece().unwrap().shape, ShapeKind::T.id());
    }

    #[test]
    fn boxed_source_is_accepted() {
        let source: Box<dyn PieceSource> = Box::new(FixedSequence::repeat(1));
        let board = Board::with_defaults(source);
        assert_eq!(board.active_piece().unwrap().shape, 1);
        assert_eq!(board.next_shape(), Some(1));
    }

    #[test]
    fn seeded_boards_are_reproducible() {
        let mut a = Board::seeded(42);
        let mut b = Board::seeded(42);
        for _ in 0..500 {
            assert_eq!(a.tick(), b.tick());
            assert_eq!(a.active_piece(), b.active_piece());
        }
    }
}
