//! Board scenarios on small boards, driven through the facade crate.

use blockfall::core::{
    Board, BoardConfig, EngineError, FixedSequence, Piece, ShapeCatalog, ShapeKind, TickOutcome,
};
use blockfall::types::{Cell, Command, Phase, Rotation, RotationDirection};

fn board_of(width: u16, height: u16, kind: ShapeKind) -> Board<FixedSequence> {
    Board::new(
        BoardConfig::sized(width, height),
        ShapeCatalog::standard(),
        FixedSequence::repeat(kind.id()),
    )
    .unwrap()
}

fn cells_with(board: &Board<FixedSequence>, state: Cell) -> Vec<(i32, i32)> {
    let mut out = Vec::new();
    for y in 0..board.height() as i32 {
        for x in 0..board.width() as i32 {
            if board.cell_state(x, y) == Ok(state) {
                out.push((x, y));
            }
        }
    }
    out
}

#[test]
fn test_square_spawns_at_canonical_origin() {
    let board = board_of(6, 10, ShapeKind::O);
    assert_eq!(board.phase(), Phase::Playing);
    assert!(!board.is_ended());
    assert_eq!(board.active_piece(), Some(Piece::new(ShapeKind::O.id(), 2, 0)));
    assert_eq!(cells_with(&board, Cell::Active), vec![(2, 0), (3, 0), (2, 1), (3, 1)]);
    assert!(cells_with(&board, Cell::Locked).is_empty());
}

#[test]
fn test_square_locks_on_ninth_tick() {
    let mut board = board_of(6, 10, ShapeKind::O);

    for i in 0..8 {
        assert_eq!(board.tick(), TickOutcome::Fell, "tick {}", i + 1);
    }
    assert_eq!(board.active_piece().map(|p| p.y), Some(8));
    assert_eq!(board.locks(), 0);

    assert_eq!(board.tick(), TickOutcome::Locked);
    assert_eq!(cells_with(&board, Cell::Locked), vec![(2, 8), (3, 8), (2, 9), (3, 9)]);
    assert_eq!(board.fall_interval_ms(), 200);
    assert_eq!(board.active_piece(), Some(Piece::new(ShapeKind::O.id(), 2, 0)));
    assert_eq!(board.pieces_spawned(), 2);
}

#[test]
fn test_squares_stack_to_the_top_and_end_the_game() {
    let mut board = board_of(6, 10, ShapeKind::O);
    let mut outcomes = Vec::new();
    while !board.is_ended() {
        let outcome = board.tick();
        if outcome.locked() {
            outcomes.push(outcome);
        }
    }

    // Five squares fill rows 0..10 of columns 2 and 3; the sixth cannot spawn.
    assert_eq!(board.locks(), 5);
    assert_eq!(outcomes.last(), Some(&TickOutcome::GameOver));
    assert_eq!(
        outcomes.iter().filter(|o| **o == TickOutcome::GameOver).count(),
        1
    );
    assert_eq!(board.phase(), Phase::Ended);
    assert_eq!(board.active_piece(), None);
    assert!(cells_with(&board, Cell::Active).is_empty());
    assert_eq!(cells_with(&board, Cell::Locked).len(), 20);
    assert_eq!(board.fall_interval_ms(), 100);
}

#[test]
fn test_ended_board_is_inert() {
    let mut board = board_of(6, 10, ShapeKind::O);
    while !board.is_ended() {
        board.tick();
    }
    let locked = board.grid().clone();

    assert_eq!(board.tick(), TickOutcome::Inert);
    assert!(!board.try_move(-1, 0));
    assert!(!board.try_rotate(RotationDirection::Clockwise));
    assert!(!board.spawn_piece());
    for command in Command::ALL {
        assert!(!board.apply(command));
    }
    assert_eq!(board.grid(), &locked);
    assert_eq!(board.shadow_row(2), None);
    assert!(board.is_ended());
}

#[test]
fn test_rotation_out_of_left_bound_fails_without_mutation() {
    let mut board = board_of(6, 10, ShapeKind::I);
    // Vertical I occupies local column 2.
    assert!(board.try_rotate(RotationDirection::Clockwise));
    while board.try_move(-1, 0) {}
    let before = board.active_piece().unwrap();
    assert_eq!((before.x, before.rotation), (-2, Rotation::East));

    assert!(!board.try_rotate(RotationDirection::Clockwise));
    assert!(!board.try_rotate(RotationDirection::CounterClockwise));
    assert_eq!(board.active_piece(), Some(before));
}

#[test]
fn test_rotation_out_of_right_bound_fails_without_mutation() {
    let mut board = board_of(6, 10, ShapeKind::I);
    assert!(board.try_rotate(RotationDirection::Clockwise));
    assert!(board.try_move(1, 0));
    assert!(!board.try_move(1, 0));
    let before = board.active_piece().unwrap();
    assert_eq!(before.x, 3);

    assert!(!board.try_rotate(RotationDirection::Clockwise));
    assert_eq!(board.active_piece(), Some(before));
}

#[test]
fn test_rotation_is_cyclic() {
    let mut board = board_of(10, 20, ShapeKind::T);
    board.try_move(0, 2);
    for _ in 0..4 {
        assert!(board.try_rotate(RotationDirection::Clockwise));
    }
    assert_eq!(board.active_piece().unwrap().rotation, Rotation::North);
    assert!(board.try_rotate(RotationDirection::CounterClockwise));
    assert_eq!(board.active_piece().unwrap().rotation, Rotation::West);
}

#[test]
fn test_moves_are_blocked_by_locked_cells() {
    let mut board = board_of(6, 10, ShapeKind::O);
    while board.tick() == TickOutcome::Fell {}

    // Second square drops onto the first and stops one stack higher.
    assert_eq!(board.shadow_row(2), Some(6));
    // Shifted left by one it still overlaps column 2.
    assert_eq!(board.shadow_row(1), Some(6));
    assert_eq!(board.shadow_row(0), Some(8));
    assert_eq!(board.shadow_row(4), Some(8));

    board.try_move(0, 6);
    assert!(!board.try_move(0, 1));
    assert!(board.try_move(-2, 0));
    assert!(board.try_move(0, 1));
    assert!(!board.try_move(2, 0));
}

#[test]
fn test_huge_offsets_fail_and_leave_piece_in_place() {
    let mut board = board_of(6, 10, ShapeKind::O);
    board.try_move(-1, 3);
    let before = board.active_piece();

    assert!(!board.try_move(i32::MAX, 0));
    assert!(!board.try_move(0, i32::MIN));
    assert!(!board.try_move(i32::MIN, i32::MAX));
    assert_eq!(board.active_piece(), before);
    assert_eq!(board.grid().locked_count(), 0);
}

#[test]
fn test_cell_state_out_of_bounds() {
    let board = board_of(6, 10, ShapeKind::O);
    assert_eq!(board.cell_state(-1, 0), Err(EngineError::OutOfBounds { x: -1, y: 0 }));
    assert_eq!(board.cell_state(0, 10), Err(EngineError::OutOfBounds { x: 0, y: 10 }));
    assert_eq!(board.cell_state(5, 9), Ok(Cell::Empty));
}

#[test]
fn test_spawn_piece_replaces_active_piece() {
    let mut board = Board::new(
        BoardConfig::sized(10, 20),
        ShapeCatalog::standard(),
        FixedSequence::new(vec![ShapeKind::T.id(), ShapeKind::L.id()]),
    )
    .unwrap();
    board.try_move(0, 5);
    assert!(board.spawn_piece());
    assert_eq!(board.active_piece(), Some(Piece::new(ShapeKind::L.id(), 4, 0)));
    assert_eq!(board.grid().locked_count(), 0);
}

#[test]
fn test_custom_catalog_with_asymmetric_rotations() {
    use blockfall::core::Mask;

    // A domino that only turns one way: North and East are distinct, South and
    // West repeat North.
    static DOMINO: [[Mask; 4]; 1] = [[
        Mask::from_rows([0b1100, 0, 0, 0]),
        Mask::from_rows([0b1000, 0b1000, 0, 0]),
        Mask::from_rows([0b1100, 0, 0, 0]),
        Mask::from_rows([0b1100, 0, 0, 0]),
    ]];

    let mut board = Board::new(
        BoardConfig::sized(4, 4),
        ShapeCatalog::new(&DOMINO),
        FixedSequence::repeat(0),
    )
    .unwrap();
    assert_eq!(board.shadow_row(1), Some(3));
    assert!(board.try_rotate(RotationDirection::Clockwise));
    assert_eq!(board.shadow_row(1), Some(2));
    assert!(board.try_rotate(RotationDirection::Clockwise));
    assert_eq!(board.shadow_row(1), Some(3));
}

#[test]
fn test_active_piece_serializes() {
    let board = board_of(6, 10, ShapeKind::O);
    let json = serde_json::to_value(board.active_piece().unwrap()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "shape": 0, "rotation": "North", "x": 2, "y": 0 })
    );
}
