//! Deterministic grid survival game used as a fitness oracle.
//!
//! The engine knows nothing about the controller driving it: callers request a
//! [`Direction`] each step and observe the resulting [`StepOutcome`]. The only
//! source of randomness is food placement, which draws from a seedable
//! generator owned by the game (see [`Seed`]).
//!
//! - [`core`] - Board geometry: [`Position`], [`Direction`], board bounds
//! - [`engine`] - Game state: [`Snake`], [`FoodPlacer`], [`SnakeGame`]

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Error returned when food cannot be put on the requested cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum FoodPlacementError {
    #[display("food position is outside the board")]
    OutOfBounds,
    #[display("food position is occupied by the snake")]
    Occupied,
}
