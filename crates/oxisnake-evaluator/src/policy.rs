//! The inference seam between controllers and whatever computes action scores.
//!
//! A [`Policy`] maps a feature vector to one score per [`Direction`]. The
//! controller then moves in the direction with the highest score (see
//! [`select_direction`]).

use std::{fmt, sync::Arc};

use oxisnake_engine::Direction;

/// Number of outputs a policy must produce: one score per [`Direction`], in
/// `Up, Right, Down, Left` order.
pub const ACTION_COUNT: usize = Direction::LEN;

/// Error returned when a policy receives or produces a vector of the wrong width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum InferenceError {
    #[display("invalid input width: expected {expected}, got {actual}")]
    InvalidInput { expected: usize, actual: usize },
    #[display("invalid output width: expected {expected}, got {actual}")]
    InvalidOutput { expected: usize, actual: usize },
}

/// Maps a feature vector to action scores.
///
/// Implementations must be pure: the same input always yields the same output,
/// and calls on a shared reference from several threads are allowed.
pub trait Policy: fmt::Debug + Send + Sync {
    /// Computes action scores for `input`.
    ///
    /// Fails with [`InferenceError::InvalidInput`] if `input` does not have the
    /// width the policy was built for. Inputs are never truncated or padded.
    fn infer(&self, input: &[f64]) -> Result<Vec<f64>, InferenceError>;
}

impl<P> Policy for &P
where
    P: Policy + ?Sized,
{
    fn infer(&self, input: &[f64]) -> Result<Vec<f64>, InferenceError> {
        (**self).infer(input)
    }
}

impl<P> Policy for Arc<P>
where
    P: Policy + ?Sized,
{
    fn infer(&self, input: &[f64]) -> Result<Vec<f64>, InferenceError> {
        (**self).infer(input)
    }
}

/// Adapts a closure into a [`Policy`].
///
/// # Example
///
/// ```
/// use oxisnake_evaluator::policy::{FnPolicy, Policy};
///
/// let always_up = FnPolicy::new(|_: &[f64]| vec![1.0, 0.0, 0.0, 0.0]);
/// assert_eq!(always_up.infer(&[0.5; 44]).unwrap(), [1.0, 0.0, 0.0, 0.0]);
/// ```
#[derive(Clone)]
pub struct FnPolicy<F> {
    f: F,
}

impl<F> FnPolicy<F> {
    pub const fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> fmt::Debug for FnPolicy<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnPolicy").finish_non_exhaustive()
    }
}

impl<F> Policy for FnPolicy<F>
where
    F: Fn(&[f64]) -> Vec<f64> + Send + Sync,
{
    fn infer(&self, input: &[f64]) -> Result<Vec<f64>, InferenceError> {
        Ok((self.f)(input))
    }
}

/// Returns the index of the largest value.
///
/// Ties resolve to the lowest index. Returns `None` for an empty slice.
#[must_use]
pub fn argmax(values: &[f64]) -> Option<usize> {
    let (first, rest) = values.split_first()?;
    let mut best = (0, *first);
    for (i, v) in rest.iter().enumerate() {
        if *v > best.1 {
            best = (i + 1, *v);
        }
    }
    Some(best.0)
}

/// Picks the direction with the highest score.
///
/// Fails with [`InferenceError::InvalidOutput`] unless `scores` has exactly
/// [`ACTION_COUNT`] values.
pub fn select_direction(scores: &[f64]) -> Result<Direction, InferenceError> {
    let invalid = InferenceError::InvalidOutput {
        expected: ACTION_COUNT,
        actual: scores.len(),
    };
    if scores.len() != ACTION_COUNT {
        return Err(invalid);
    }
    argmax(scores)
        .and_then(Direction::from_index)
        .ok_or(invalid)
}
