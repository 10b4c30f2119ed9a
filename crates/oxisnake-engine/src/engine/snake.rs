use std::collections::VecDeque;

use crate::{Direction, Position};

/// Number of body segments (excluding the head) right after a reset.
pub const INITIAL_BODY_LEN: usize = 3;

/// Consecutive moves without food after which the snake starves.
pub const STARVATION_LIMIT: usize = 100;

/// The actor: a head plus an ordered list of body segments.
///
/// Body segments are ordered head-to-tail: `body()[0]` is the segment right
/// behind the head and the last element is the tail end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    head: Position,
    body: VecDeque<Position>,
    direction: Direction,
    pending_direction: Direction,
    moves_since_food: usize,
}

impl Default for Snake {
    fn default() -> Self {
        Self::new()
    }
}

impl Snake {
    /// Creates the fixed starting snake: head at `(5, 5)` heading right, with
    /// body segments at `(4, 5)`, `(3, 5)`, `(2, 5)`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            head: Position::new(5, 5),
            body: VecDeque::from([
                Position::new(4, 5),
                Position::new(3, 5),
                Position::new(2, 5),
            ]),
            direction: Direction::Right,
            pending_direction: Direction::Right,
            moves_since_food: 0,
        }
    }

    #[must_use]
    pub fn head(&self) -> Position {
        self.head
    }

    pub fn body(&self) -> impl ExactSizeIterator<Item = Position> + DoubleEndedIterator + '_ {
        self.body.iter().copied()
    }

    /// Number of body segments, not counting the head.
    #[must_use]
    pub fn body_len(&self) -> usize {
        self.body.len()
    }

    /// The last body segment.
    #[must_use]
    pub fn tail_end(&self) -> Position {
        self.body.back().copied().unwrap_or(self.head)
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The direction most recently requested, after the reversal rule was applied.
    #[must_use]
    pub fn pending_direction(&self) -> Direction {
        self.pending_direction
    }

    #[must_use]
    pub fn moves_since_food(&self) -> usize {
        self.moves_since_food
    }

    #[must_use]
    pub fn is_starving(&self) -> bool {
        self.moves_since_food > STARVATION_LIMIT
    }

    /// Returns `true` if `pos` is one of the body segments.
    #[must_use]
    pub fn body_contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Returns `true` if `pos` is the head or one of the body segments.
    #[must_use]
    pub fn occupies(&self, pos: Position) -> bool {
        self.head == pos || self.body_contains(pos)
    }

    /// Records the requested heading.
    ///
    /// A request for the exact opposite of the current heading is ignored.
    pub(crate) fn request_direction(&mut self, requested: Direction) {
        self.pending_direction = if requested == self.direction.opposite() {
            self.direction
        } else {
            requested
        };
    }

    /// Turns to the pending heading and moves the head one cell, pushing the
    /// previous head onto the front of the body.
    pub(crate) fn advance_head(&mut self) {
        self.direction = self.pending_direction;
        let (dx, dy) = self.direction.delta();
        self.body.push_front(self.head);
        self.head = self.head.offset(dx, dy);
    }

    /// Drops the tail end after a move without food.
    pub(crate) fn shrink_tail(&mut self) {
        self.body.pop_back();
        self.moves_since_food += 1;
    }

    /// Keeps the tail end after eating, so the body grows by one.
    pub(crate) fn grow(&mut self) {
        self.moves_since_food = 0;
    }

    #[cfg(test)]
    pub(crate) fn from_parts(head: Position, body: &[Position], direction: Direction) -> Self {
        Self {
            head,
            body: body.iter().copied().collect(),
            direction,
            pending_direction: direction,
            moves_since_food: 0,
        }
    }
}
