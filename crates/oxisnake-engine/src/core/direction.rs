use serde::{Deserialize, Serialize};

/// Heading of the snake.
///
/// The discriminants fix the order used everywhere a direction is encoded as an
/// index: controller outputs, one-hot features, and [`Direction::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Direction {
    pub const LEN: usize = 4;
    pub const ALL: [Self; Self::LEN] = [Self::Up, Self::Right, Self::Down, Self::Left];

    /// Returns the direction with the given index, or `None` if `index >= 4`.
    ///
    /// # Example
    ///
    /// ```
    /// use oxisnake_engine::Direction;
    ///
    /// assert_eq!(Direction::from_index(0), Some(Direction::Up));
    /// assert_eq!(Direction::from_index(3), Some(Direction::Left));
    /// assert_eq!(Direction::from_index(4), None);
    /// ```
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Up),
            1 => Some(Self::Right),
            2 => Some(Self::Down),
            3 => Some(Self::Left),
            _ => None,
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Right => Self::Left,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
        }
    }

    /// Returns the `(dx, dy)` unit step for this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Right => (1, 0),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
        }
    }
}
