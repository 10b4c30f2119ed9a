use serde::{Deserialize, Serialize};

/// A cell coordinate on the board.
///
/// `x` grows to the right and `y` grows downwards, so moving [`Up`] decreases `y`.
/// Coordinates are signed because the head may leave the board on its final move.
///
/// [`Up`]: crate::Direction::Up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the position shifted by `(dx, dy)`.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}
