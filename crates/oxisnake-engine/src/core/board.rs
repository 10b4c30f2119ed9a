use super::Position;

/// Number of columns on the board.
pub const BOARD_WIDTH: i32 = 10;
/// Number of rows on the board.
pub const BOARD_HEIGHT: i32 = 10;

/// Total number of cells on the board.
#[expect(clippy::cast_sign_loss)]
pub const BOARD_CELLS: usize = (BOARD_WIDTH * BOARD_HEIGHT) as usize;

/// Returns `true` if `pos` lies inside `[0, BOARD_WIDTH) x [0, BOARD_HEIGHT)`.
///
/// # Example
///
/// ```
/// use oxisnake_engine::{Position, is_in_bounds};
///
/// assert!(is_in_bounds(Position::new(0, 9)));
/// assert!(!is_in_bounds(Position::new(-1, 0)));
/// assert!(!is_in_bounds(Position::new(0, 10)));
/// ```
#[must_use]
pub const fn is_in_bounds(pos: Position) -> bool {
    pos.x >= 0 && pos.y >= 0 && pos.x < BOARD_WIDTH && pos.y < BOARD_HEIGHT
}
