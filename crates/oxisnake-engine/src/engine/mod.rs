//! Game state and step rules.
//!
//! - [`SnakeGame`] - One episode: snake, food, move counters, terminal state
//! - [`Snake`] - Head, ordered body segments, heading and starvation counter
//! - [`FoodPlacer`] - Seedable source of food positions
//! - [`Seed`] - 128-bit seed for deterministic food placement
//!
//! # Episode Flow
//!
//! 1. Create a game with [`SnakeGame::with_seed`] (the game is reset on creation)
//! 2. Call [`SnakeGame::step`] with the requested direction
//! 3. Repeat until [`SnakeGame::is_over`] returns `true`
//!
//! # Example
//!
//! ```
//! use oxisnake_engine::{Direction, SnakeGame, Seed};
//!
//! let mut game = SnakeGame::with_seed(Seed::from_bytes([7; 16]));
//! while !game.is_over() {
//!     game.step(Direction::Up);
//! }
//! // Going straight up from the start row hits the top wall on the sixth move.
//! assert_eq!(game.moves(), 6);
//! ```

pub use self::{food_placer::*, game::*, snake::*};

mod food_placer;
mod game;
mod snake;
