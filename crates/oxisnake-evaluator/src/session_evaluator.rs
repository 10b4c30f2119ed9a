//! Session evaluation: fitness functions for training.
//!
//! A session evaluator plays one full episode with a policy and reduces the
//! outcome to a scalar fitness score. The genetic algorithm maximizes this score.
//!
//! # Fitness Functions
//!
//! ## Growth Session Evaluator
//!
//! ```text
//! fitness = steps + (2^apples + apples^2.1 × 500) - apples^1.2 × (0.25 × steps)^1.3
//! ```
//!
//! Growth is rewarded super-linearly. Once apples are scarce relative to steps,
//! the last term penalizes wandering, which pushes policies towards seeking food
//! instead of circling until they starve.
//!
//! ## Length Session Evaluator
//!
//! ```text
//! fitness = 1.5^body_len - max(0, moves - 10) / 10
//! ```
//!
//! Rewards body length exponentially and charges a flat cost per move after
//! the first ten.
//!
//! # Determinism
//!
//! Food placement is the only randomness in an episode. Evaluating the same
//! policy with the same [`Seed`] always yields the same score.

use std::fmt;

use oxisnake_engine::{Seed, SnakeGame};

use crate::{
    controller::{Controller, SessionStats},
    policy::{ACTION_COUNT, InferenceError, Policy},
    state_encoder::FEATURE_COUNT,
};

/// Evaluates session statistics to compute fitness scores.
pub trait EvaluateSessionStats {
    /// Computes fitness from the statistics of a finished episode.
    ///
    /// Higher is better.
    fn evaluate_session_stats(&self, stats: &SessionStats) -> f64;
}

/// Evaluates complete episodes for training.
///
/// Used by the genetic algorithm to compute fitness scores for individuals.
pub trait SessionEvaluator: fmt::Debug + Send + Sync {
    /// Width of the feature vector handed to policies.
    fn feature_count(&self) -> usize {
        FEATURE_COUNT
    }

    /// Number of action scores expected from policies.
    fn action_count(&self) -> usize {
        ACTION_COUNT
    }

    /// Plays one episode with food placement seeded by `seed` and scores it.
    fn play_and_evaluate_session(
        &self,
        seed: Seed,
        policy: &dyn Policy,
    ) -> Result<f64, InferenceError>;

    /// Plays one episode per seed and returns the scores in seed order.
    fn play_and_evaluate_sessions(
        &self,
        seeds: &[Seed],
        policy: &dyn Policy,
    ) -> Result<Vec<f64>, InferenceError> {
        seeds
            .iter()
            .map(|seed| self.play_and_evaluate_session(*seed, policy))
            .collect()
    }
}

impl<E> SessionEvaluator for Box<E>
where
    E: SessionEvaluator + ?Sized,
{
    fn feature_count(&self) -> usize {
        (**self).feature_count()
    }

    fn action_count(&self) -> usize {
        (**self).action_count()
    }

    fn play_and_evaluate_session(
        &self,
        seed: Seed,
        policy: &dyn Policy,
    ) -> Result<f64, InferenceError> {
        (**self).play_and_evaluate_session(seed, policy)
    }

    fn play_and_evaluate_sessions(
        &self,
        seeds: &[Seed],
        policy: &dyn Policy,
    ) -> Result<Vec<f64>, InferenceError> {
        (**self).play_and_evaluate_sessions(seeds, policy)
    }
}

/// Default session evaluator implementation.
///
/// Plays an episode from reset to game over and scores it with a fitness function.
#[derive(Debug, Default)]
pub struct DefaultSessionEvaluator<E> {
    evaluator: E,
}

impl<E> DefaultSessionEvaluator<E> {
    pub const fn new(evaluator: E) -> Self {
        Self { evaluator }
    }
}

impl<E> SessionEvaluator for DefaultSessionEvaluator<E>
where
    E: EvaluateSessionStats + fmt::Debug + Send + Sync,
{
    fn play_and_evaluate_session(
        &self,
        seed: Seed,
        policy: &dyn Policy,
    ) -> Result<f64, InferenceError> {
        let mut game = SnakeGame::with_seed(seed);
        let stats = Controller::new(policy).play_session(&mut game)?;
        Ok(self.evaluator.evaluate_session_stats(&stats))
    }
}

/// Rewards growth super-linearly and penalizes wandering without food.
#[derive(Default, Debug)]
pub struct GrowthSessionEvaluator {}

impl GrowthSessionEvaluator {
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }
}

impl EvaluateSessionStats for GrowthSessionEvaluator {
    fn evaluate_session_stats(&self, stats: &SessionStats) -> f64 {
        growth_fitness(stats.apples, stats.moves)
    }
}

/// Computes `steps + (2^apples + apples^2.1 × 500) - apples^1.2 × (0.25 × steps)^1.3`.
///
/// # Example
///
/// ```
/// use oxisnake_evaluator::session_evaluator::growth_fitness;
///
/// assert_eq!(growth_fitness(0, 50), 51.0);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn growth_fitness(apples: usize, steps: usize) -> f64 {
    let apples = apples as f64;
    let steps = steps as f64;
    steps + (2.0_f64.powf(apples) + apples.powf(2.1) * 500.0)
        - (apples.powf(1.2) * (0.25 * steps).powf(1.3))
}

/// Rewards body length exponentially with a small per-move cost.
#[derive(Default, Debug)]
pub struct LengthSessionEvaluator {}

impl LengthSessionEvaluator {
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }
}

impl EvaluateSessionStats for LengthSessionEvaluator {
    fn evaluate_session_stats(&self, stats: &SessionStats) -> f64 {
        length_fitness(stats.body_len, stats.moves)
    }
}

/// Computes `1.5^body_len - max(0, moves - 10) / 10`.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn length_fitness(body_len: usize, moves: usize) -> f64 {
    1.5_f64.powf(body_len as f64) - (moves.saturating_sub(10) as f64) / 10.0
}
