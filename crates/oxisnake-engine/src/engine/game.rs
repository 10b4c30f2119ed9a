use serde::{Deserialize, Serialize};

use crate::{BOARD_CELLS, Direction, FoodPlacementError, Position, is_in_bounds};

use super::{FoodPlacer, Seed, Snake};

/// Why an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
pub enum DeathCause {
    /// The head left the board.
    Wall,
    /// The head moved onto a body segment.
    SelfCollision,
    /// Too many consecutive moves without food.
    Starvation,
    /// The snake covers every cell, so no food can be placed.
    BoardFilled,
}

/// Result of a single [`SnakeGame::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum StepOutcome {
    /// The snake moved without eating.
    Moved,
    /// The snake ate the food and grew by one segment.
    Ate,
    /// The move ended the episode.
    Died(DeathCause),
    /// The episode was already over; nothing changed.
    Ignored,
}

/// One episode of the grid survival game.
///
/// The game owns its food generator, so a game created with a given [`Seed`]
/// and driven with the same directions always plays out identically.
#[derive(Debug, Clone)]
pub struct SnakeGame {
    snake: Snake,
    food: Position,
    food_placer: FoodPlacer,
    death: Option<DeathCause>,
    moves: usize,
    ate: bool,
}

impl Default for SnakeGame {
    fn default() -> Self {
        Self::new()
    }
}

impl SnakeGame {
    /// Creates a reset game with a random food seed.
    #[must_use]
    pub fn new() -> Self {
        Self::from_placer(FoodPlacer::new())
    }

    /// Like [`Self::new`], but with a specific seed for deterministic food placement.
    #[must_use]
    pub fn with_seed(seed: Seed) -> Self {
        Self::from_placer(FoodPlacer::with_seed(seed))
    }

    fn from_placer(food_placer: FoodPlacer) -> Self {
        let mut game = Self {
            snake: Snake::new(),
            food: Position::default(),
            food_placer,
            death: None,
            moves: 0,
            ate: false,
        };
        game.reset();
        game
    }

    /// Restores the fixed starting snake and places new food.
    ///
    /// The food generator is not reseeded, so consecutive resets continue the
    /// same random stream.
    pub fn reset(&mut self) {
        self.snake = Snake::new();
        self.death = None;
        self.moves = 0;
        self.ate = false;
        self.relocate_food();
    }

    #[must_use]
    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    #[must_use]
    pub fn food(&self) -> Position {
        self.food
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.death.is_none()
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        !self.is_alive()
    }

    #[must_use]
    pub fn death_cause(&self) -> Option<DeathCause> {
        self.death
    }

    /// Total moves taken since the last reset.
    #[must_use]
    pub fn moves(&self) -> usize {
        self.moves
    }

    /// Returns `true` if the snake ate during the most recent step.
    #[must_use]
    pub fn just_ate(&self) -> bool {
        self.ate
    }

    /// Food eaten since the last reset.
    #[must_use]
    pub fn apples(&self) -> usize {
        self.snake.body_len().saturating_sub(super::INITIAL_BODY_LEN)
    }

    /// Puts the food on a specific cell.
    ///
    /// Fails if the cell is outside the board or occupied by the snake.
    pub fn place_food_at(&mut self, pos: Position) -> Result<(), FoodPlacementError> {
        if !is_in_bounds(pos) {
            return Err(FoodPlacementError::OutOfBounds);
        }
        if self.snake.occupies(pos) {
            return Err(FoodPlacementError::Occupied);
        }
        self.food = pos;
        Ok(())
    }

    /// Advances the game by one move.
    ///
    /// Rules, in order:
    ///
    /// 1. A request for the exact opposite of the current heading is ignored.
    /// 2. The head moves one cell; the previous head becomes the first body segment.
    /// 3. Landing on a body segment ends the episode immediately.
    /// 4. Without food, the tail end is dropped; more than
    ///    [`STARVATION_LIMIT`](super::STARVATION_LIMIT) such moves in a row ends
    ///    the episode.
    /// 5. With food, the body keeps its tail end and the food is relocated.
    /// 6. Leaving the board ends the episode.
    ///
    /// Stepping a finished episode is a no-op that returns [`StepOutcome::Ignored`].
    pub fn step(&mut self, requested: Direction) -> StepOutcome {
        if self.is_over() {
            return StepOutcome::Ignored;
        }

        self.ate = false;
        self.moves += 1;

        self.snake.request_direction(requested);
        self.snake.advance_head();
        let head = self.snake.head();

        if self.snake.body_contains(head) {
            return self.die(DeathCause::SelfCollision);
        }

        if head == self.food {
            self.snake.grow();
            self.ate = true;
            if self.is_board_filled() {
                return self.die(DeathCause::BoardFilled);
            }
            self.relocate_food();
        } else {
            self.snake.shrink_tail();
            if self.snake.is_starving() {
                self.death = Some(DeathCause::Starvation);
            }
        }

        if !is_in_bounds(head) {
            self.death.get_or_insert(DeathCause::Wall);
        }

        match self.death {
            Some(cause) => StepOutcome::Died(cause),
            None if self.ate => StepOutcome::Ate,
            None => StepOutcome::Moved,
        }
    }

    fn die(&mut self, cause: DeathCause) -> StepOutcome {
        self.death = Some(cause);
        StepOutcome::Died(cause)
    }

    fn is_board_filled(&self) -> bool {
        self.snake.body_len() + 1 >= BOARD_CELLS
    }

    fn relocate_food(&mut self) {
        let snake = &self.snake;
        self.food = self.food_placer.place(|pos| snake.occupies(pos));
    }

    #[cfg(test)]
    pub(crate) fn with_snake(seed: Seed, snake: Snake, food: Position) -> Self {
        let mut game = Self::with_seed(seed);
        game.snake = snake;
        game.food = food;
        game
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BOARD_HEIGHT, BOARD_WIDTH, STARVATION_LIMIT};

    const SEED: Seed = Seed::from_bytes([
        0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77,
        0x88,
    ]);

    /// Far corner, off every path used below.
    const FAR_FOOD: Position = Position::new(9, 9);

    fn game_with_far_food() -> SnakeGame {
        let mut game = SnakeGame::with_seed(SEED);
        game.place_food_at(FAR_FOOD).unwrap();
        game
    }

    #[test]
    fn test_reset_state() {
        let game = SnakeGame::with_seed(SEED);
        let snake = game.snake();
        assert_eq!(snake.head(), Position::new(5, 5));
        assert_eq!(
            snake.body().collect::<Vec<_>>(),
            [Position::new(4, 5), Position::new(3, 5), Position::new(2, 5)]
        );
        assert_eq!(snake.direction(), Direction::Right);
        assert_eq!(snake.pending_direction(), Direction::Right);
        assert!(game.is_alive());
        assert_eq!(game.moves(), 0);
        assert_eq!(game.apples(), 0);
        assert!(!snake.occupies(game.food()));
        assert!(is_in_bounds(game.food()));
    }

    #[test]
    fn test_reverse_request_is_ignored() {
        let mut game = game_with_far_food();
        assert_eq!(game.step(Direction::Left), StepOutcome::Moved);
        assert_eq!(game.snake().direction(), Direction::Right);
        assert_eq!(game.snake().head(), Position::new(6, 5));
    }

    #[test]
    fn test_move_keeps_length() {
        let mut game = game_with_far_food();
        game.step(Direction::Down);
        assert_eq!(game.snake().head(), Position::new(5, 6));
        assert_eq!(game.snake().body_len(), 3);
        assert_eq!(game.snake().body().next(), Some(Position::new(5, 5)));
        assert_eq!(game.snake().tail_end(), Position::new(3, 5));
        assert_eq!(game.snake().moves_since_food(), 1);
    }

    #[test]
    fn test_eating_grows_and_relocates_food() {
        let mut game = SnakeGame::with_seed(SEED);
        game.place_food_at(Position::new(6, 5)).unwrap();

        assert_eq!(game.step(Direction::Right), StepOutcome::Ate);
        assert!(game.just_ate());
        assert_eq!(game.snake().body_len(), 4);
        assert_eq!(game.apples(), 1);
        assert_eq!(game.snake().moves_since_food(), 0);
        assert!(!game.snake().occupies(game.food()));

        // The flag only lasts for the step that ate.
        game.place_food_at(FAR_FOOD).unwrap();
        game.step(Direction::Up);
        assert!(!game.just_ate());
    }

    #[test]
    fn test_self_collision_with_tail_end() {
        // Up, Left, Down curls the head onto the tail end before it is dropped.
        let mut game = game_with_far_food();
        assert_eq!(game.step(Direction::Up), StepOutcome::Moved);
        assert_eq!(game.step(Direction::Left), StepOutcome::Moved);
        assert_eq!(
            game.step(Direction::Down),
            StepOutcome::Died(DeathCause::SelfCollision)
        );
        assert!(game.is_over());
        assert_eq!(game.snake().head(), Position::new(4, 5));
        assert_eq!(game.moves(), 3);
    }

    #[test]
    fn test_self_collision_with_inner_segment() {
        let snake = Snake::from_parts(
            Position::new(5, 5),
            &[
                Position::new(5, 6),
                Position::new(4, 6),
                Position::new(4, 5),
                Position::new(4, 4),
                Position::new(3, 4),
            ],
            Direction::Up,
        );
        let mut game = SnakeGame::with_snake(SEED, snake, FAR_FOOD);
        assert_eq!(
            game.step(Direction::Left),
            StepOutcome::Died(DeathCause::SelfCollision)
        );
    }

    #[test]
    fn test_wall_collision() {
        let mut game = game_with_far_food();
        for _ in 0..4 {
            assert_eq!(game.step(Direction::Right), StepOutcome::Moved);
        }
        assert_eq!(game.snake().head(), Position::new(BOARD_WIDTH - 1, 5));
        assert_eq!(game.step(Direction::Right), StepOutcome::Died(DeathCause::Wall));
        assert!(!is_in_bounds(game.snake().head()));
    }

    #[test]
    fn test_starvation_after_limit() {
        // Circle a 3x3 square so the snake never collides or reaches the food.
        let cycle = [
            Direction::Up,
            Direction::Up,
            Direction::Left,
            Direction::Left,
            Direction::Down,
            Direction::Down,
            Direction::Right,
            Direction::Right,
        ];
        let mut game = game_with_far_food();
        for dir in cycle.iter().cycle().take(STARVATION_LIMIT) {
            assert_eq!(game.step(*dir), StepOutcome::Moved);
        }
        assert!(game.is_alive());
        assert_eq!(game.snake().moves_since_food(), STARVATION_LIMIT);

        let next = cycle[STARVATION_LIMIT % cycle.len()];
        assert_eq!(game.step(next), StepOutcome::Died(DeathCause::Starvation));
        assert_eq!(game.moves(), STARVATION_LIMIT + 1);
    }

    /// Body of a snake whose head sits at `(1, 0)` heading left, winding
    /// through every row below so that only `(0, 0)` and the dropped trailing
    /// cells stay free.
    fn winding_body(drop_last: usize) -> Vec<Position> {
        let mut body: Vec<_> = (2..BOARD_WIDTH).map(|x| Position::new(x, 0)).collect();
        for y in 1..BOARD_HEIGHT {
            if y % 2 == 1 {
                body.extend((0..BOARD_WIDTH).rev().map(|x| Position::new(x, y)));
            } else {
                body.extend((0..BOARD_WIDTH).map(|x| Position::new(x, y)));
            }
        }
        body.truncate(body.len() - drop_last);
        body
    }

    #[test]
    fn test_eating_last_free_cell_fills_board() {
        let body = winding_body(0);
        assert_eq!(body.len() + 2, BOARD_CELLS);
        let snake = Snake::from_parts(Position::new(1, 0), &body, Direction::Left);
        let mut game = SnakeGame::with_snake(SEED, snake, Position::new(0, 0));

        assert_eq!(
            game.step(Direction::Left),
            StepOutcome::Died(DeathCause::BoardFilled)
        );
        assert_eq!(game.snake().body_len(), 99);
        assert_eq!(game.snake().head(), Position::new(0, 0));
        assert_eq!(game.death_cause(), Some(DeathCause::BoardFilled));
        assert_eq!(game.step(Direction::Down), StepOutcome::Ignored);
    }

    #[test]
    fn test_eating_with_one_cell_left_relocates_food() {
        let body = winding_body(1);
        let free = Position::new(0, BOARD_HEIGHT - 1);
        assert!(!body.contains(&free));
        let snake = Snake::from_parts(Position::new(1, 0), &body, Direction::Left);
        let mut game = SnakeGame::with_snake(SEED, snake, Position::new(0, 0));

        assert_eq!(game.step(Direction::Left), StepOutcome::Ate);
        assert!(game.is_alive());
        assert_eq!(game.snake().body_len(), 98);
        assert_eq!(game.food(), free);
    }

    #[test]
    fn test_step_after_game_over_is_noop() {
        let mut game = game_with_far_food();
        while !game.is_over() {
            game.step(Direction::Up);
        }
        let head = game.snake().head();
        let moves = game.moves();
        assert_eq!(game.step(Direction::Left), StepOutcome::Ignored);
        assert_eq!(game.snake().head(), head);
        assert_eq!(game.moves(), moves);
    }

    #[test]
    fn test_place_food_rejects_invalid_cells() {
        let mut game = SnakeGame::with_seed(SEED);
        assert_eq!(
            game.place_food_at(Position::new(BOARD_WIDTH, 0)),
            Err(FoodPlacementError::OutOfBounds)
        );
        assert_eq!(
            game.place_food_at(Position::new(0, BOARD_HEIGHT)),
            Err(FoodPlacementError::OutOfBounds)
        );
        assert_eq!(
            game.place_food_at(Position::new(3, 5)),
            Err(FoodPlacementError::Occupied)
        );
        assert_eq!(
            game.place_food_at(Position::new(5, 5)),
            Err(FoodPlacementError::Occupied)
        );
    }

    #[test]
    fn test_same_seed_same_episode() {
        let play = || {
            let mut game = SnakeGame::with_seed(SEED);
            let mut foods = vec![game.food()];
            let mut dirs = Direction::ALL.iter().cycle();
            while !game.is_over() {
                if game.step(*dirs.next().unwrap()).is_ate() {
                    foods.push(game.food());
                }
            }
            (foods, game.moves(), game.death_cause())
        };
        assert_eq!(play(), play());
    }
}
