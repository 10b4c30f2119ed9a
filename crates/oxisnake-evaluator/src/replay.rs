//! Replay: a policy-driven game stepped at the caller's pace.
//!
//! [`Controller::play_session`](crate::controller::Controller::play_session) runs an
//! episode to the end in one call. A display layer instead wants one move per
//! frame, with its own timing. [`Replay`] owns both the game and the policy, so
//! it can be moved into a rendering thread and stepped from there.
//!
//! # Example
//!
//! ```
//! use oxisnake_engine::Seed;
//! use oxisnake_evaluator::{policy::FnPolicy, replay::Replay};
//!
//! let always_up = FnPolicy::new(|_: &[f64]| vec![1.0, 0.0, 0.0, 0.0]);
//! let mut replay = Replay::new(always_up, Seed::from_bytes([3; 16]));
//!
//! let mut frames = 0;
//! while !replay.is_over() {
//!     replay.step().unwrap();
//!     frames += 1;
//! }
//! assert_eq!(frames, 6);
//! ```

use oxisnake_engine::{Seed, SnakeGame, StepOutcome};

use crate::{
    controller::{Controller, SessionStats},
    policy::{InferenceError, Policy},
};

/// A game together with the policy that drives it.
#[derive(Debug, Clone)]
pub struct Replay<P> {
    game: SnakeGame,
    policy: P,
}

impl<P> Replay<P>
where
    P: Policy,
{
    /// Starts a freshly reset game whose food placement is seeded by `seed`.
    pub fn new(policy: P, seed: Seed) -> Self {
        Self {
            game: SnakeGame::with_seed(seed),
            policy,
        }
    }

    #[must_use]
    pub fn game(&self) -> &SnakeGame {
        &self.game
    }

    #[must_use]
    pub fn policy(&self) -> &P {
        &self.policy
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.game.is_over()
    }

    #[must_use]
    pub fn stats(&self) -> SessionStats {
        SessionStats::from_game(&self.game)
    }

    /// Lets the policy make one move.
    ///
    /// Returns [`StepOutcome::Ignored`] once the episode is over.
    pub fn step(&mut self) -> Result<StepOutcome, InferenceError> {
        Controller::new(&self.policy).step(&mut self.game)
    }

    /// Plays the remaining moves without pausing.
    pub fn finish(&mut self) -> Result<SessionStats, InferenceError> {
        Controller::new(&self.policy).play_session(&mut self.game)
    }

    /// Starts a new episode, continuing the same food placement stream.
    pub fn reset(&mut self) {
        self.game.reset();
    }
}
