//! Controller: driving a game with a policy until the episode ends.
//!
//! Each step the controller encodes the game state, asks the policy for action
//! scores, and moves in the direction with the highest score. There is no
//! lookahead; the policy alone decides.
//!
//! # Usage
//!
//! ```
//! use oxisnake_engine::{DeathCause, Seed, SnakeGame};
//! use oxisnake_evaluator::{controller::Controller, policy::FnPolicy};
//!
//! let always_up = FnPolicy::new(|_: &[f64]| vec![1.0, 0.0, 0.0, 0.0]);
//! let controller = Controller::new(&always_up);
//!
//! let mut game = SnakeGame::with_seed(Seed::from_bytes([9; 16]));
//! let stats = controller.play_session(&mut game).unwrap();
//! assert_eq!(stats.moves, 6);
//! assert_eq!(stats.death, Some(DeathCause::Wall));
//! ```

use oxisnake_engine::{DeathCause, Direction, SnakeGame, StepOutcome};
use serde::Serialize;

use crate::{
    policy::{InferenceError, Policy, select_direction},
    state_encoder::{self, FEATURE_COUNT},
};

/// Outcome of a finished (or interrupted) episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    /// Food eaten: body length minus the initial body length.
    pub apples: usize,
    /// Total moves taken.
    pub moves: usize,
    /// Body length, not counting the head.
    pub body_len: usize,
    /// Why the episode ended, or `None` if it is still running.
    pub death: Option<DeathCause>,
}

impl SessionStats {
    #[must_use]
    pub fn from_game(game: &SnakeGame) -> Self {
        Self {
            apples: game.apples(),
            moves: game.moves(),
            body_len: game.snake().body_len(),
            death: game.death_cause(),
        }
    }
}

/// Chooses moves for a game using a [`Policy`].
#[derive(Debug)]
pub struct Controller<'a> {
    policy: &'a dyn Policy,
}

impl<'a> Controller<'a> {
    #[must_use]
    pub fn new(policy: &'a dyn Policy) -> Self {
        Self { policy }
    }

    /// Selects the direction the policy prefers for the current state.
    pub fn select_direction(&self, game: &SnakeGame) -> Result<Direction, InferenceError> {
        let features: [f64; FEATURE_COUNT] = state_encoder::encode(game);
        let scores = self.policy.infer(&features)?;
        select_direction(&scores)
    }

    /// Selects a direction and applies it to the game.
    pub fn step(&self, game: &mut SnakeGame) -> Result<StepOutcome, InferenceError> {
        if game.is_over() {
            return Ok(StepOutcome::Ignored);
        }
        let direction = self.select_direction(game)?;
        Ok(game.step(direction))
    }

    /// Plays the game until the episode is over.
    ///
    /// Episodes always terminate: every move either eats, which is bounded by the
    /// board size, or brings the snake closer to starvation.
    pub fn play_session(&self, game: &mut SnakeGame) -> Result<SessionStats, InferenceError> {
        while !game.is_over() {
            self.step(game)?;
        }
        Ok(SessionStats::from_game(game))
    }
}

#[cfg(test)]
mod tests {
    use oxisnake_engine::{Position, Seed};

    use super::*;
    use crate::policy::FnPolicy;

    const SEED: Seed = Seed::from_bytes([0xA5; 16]);

    #[test]
    fn test_always_up_hits_top_wall() {
        let always_up = FnPolicy::new(|_: &[f64]| vec![1.0, 0.0, 0.0, 0.0]);
        let controller = Controller::new(&always_up);

        let run = || {
            let mut game = SnakeGame::with_seed(SEED);
            controller.play_session(&mut game).unwrap()
        };
        let stats = run();
        assert_eq!(stats.moves, 6);
        assert_eq!(stats.death, Some(DeathCause::Wall));
        assert_eq!(run(), stats);
    }

    #[test]
    fn test_reverse_scores_keep_heading() {
        // Always asks for Left while heading Right, so the snake runs into the right wall.
        let always_left = FnPolicy::new(|_: &[f64]| vec![0.0, 0.0, 0.0, 1.0]);
        let controller = Controller::new(&always_left);
        let mut game = SnakeGame::with_seed(SEED);
        game.place_food_at(Position::new(0, 0)).unwrap();

        let stats = controller.play_session(&mut game).unwrap();
        assert_eq!(stats.moves, 5);
        assert_eq!(stats.death, Some(DeathCause::Wall));
        assert_eq!(game.snake().direction(), Direction::Right);
    }

    #[test]
    fn test_policy_receives_encoded_features() {
        let width_checked = FnPolicy::new(|input: &[f64]| {
            assert_eq!(input.len(), FEATURE_COUNT);
            vec![0.0, 1.0, 0.0, 0.0]
        });
        let controller = Controller::new(&width_checked);
        let mut game = SnakeGame::with_seed(SEED);
        assert!(controller.play_session(&mut game).is_ok());
    }

    #[test]
    fn test_wrong_output_width_is_an_error() {
        let three_outputs = FnPolicy::new(|_: &[f64]| vec![1.0, 0.0, 0.0]);
        let controller = Controller::new(&three_outputs);
        let mut game = SnakeGame::with_seed(SEED);
        assert_eq!(
            controller.play_session(&mut game),
            Err(InferenceError::InvalidOutput {
                expected: 4,
                actual: 3
            })
        );
        assert_eq!(game.moves(), 0);
    }

    #[test]
    fn test_step_on_finished_game_is_ignored() {
        let always_up = FnPolicy::new(|_: &[f64]| vec![1.0, 0.0, 0.0, 0.0]);
        let controller = Controller::new(&always_up);
        let mut game = SnakeGame::with_seed(SEED);
        controller.play_session(&mut game).unwrap();
        assert_eq!(controller.step(&mut game), Ok(StepOutcome::Ignored));
    }
}
