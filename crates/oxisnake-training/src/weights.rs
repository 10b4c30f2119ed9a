//! Gene vector operations for the genetic algorithm.
//!
//! A network's genes are its weights and biases. These functions work on flat
//! `f64` slices, one weight array or bias array at a time, and are used by
//! [`NeuralNetwork`](crate::network::NeuralNetwork) to implement initialization,
//! crossover and mutation.
//!
//! # Operations
//!
//! - **Initialization**: [`random`] samples genes uniformly from `[-1, 1]`
//! - **Crossover**: [`crossover_uniform`] picks every gene from either parent
//! - **Mutation**: [`Mutation::apply`] perturbs genes with a fixed probability
//!
//! # Uniform Crossover
//!
//! Each gene is copied from one parent or the other with probability 0.5. Values
//! are never blended, so every child gene is bit-identical to a parent gene.
//!
//! # Mutation
//!
//! Each gene is perturbed independently with probability `chance`. The
//! perturbation is drawn from one of:
//!
//! - [`Perturbation::Uniform`]: `U(-rate, rate)`, the default
//! - [`Perturbation::Gaussian`]: `N(0, rate²)`, for small steps with rare large jumps

use rand::{
    Rng,
    distr::{Distribution, Uniform},
};
use rand_distr::Normal;
use serde::{Deserialize, Serialize};

use crate::genetic::ConfigError;

/// Generates `len` genes, each uniform in `[-1, 1]`.
pub fn random<R>(rng: &mut R, len: usize) -> Vec<f64>
where
    R: Rng + ?Sized,
{
    (0..len).map(|_| rng.random_range(-1.0..=1.0)).collect()
}

/// Builds a child gene vector by picking each gene from `p1` or `p2` with equal
/// probability.
///
/// # Panics
///
/// Panics if the parents have different lengths.
///
/// # Examples
///
/// ```
/// use oxisnake_training::weights;
/// use rand::SeedableRng as _;
/// use rand_pcg::Pcg32;
///
/// let mut rng = Pcg32::seed_from_u64(7);
/// let child = weights::crossover_uniform(&[1.0; 8], &[2.0; 8], &mut rng);
/// assert!(child.iter().all(|g| *g == 1.0 || *g == 2.0));
/// ```
pub fn crossover_uniform<R>(p1: &[f64], p2: &[f64], rng: &mut R) -> Vec<f64>
where
    R: Rng + ?Sized,
{
    assert_eq!(p1.len(), p2.len());
    p1.iter()
        .zip(p2)
        .map(|(a, b)| if rng.random_bool(0.5) { *a } else { *b })
        .collect()
}

/// Distribution of the amount added to a mutated gene.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Perturbation {
    /// Uniform in `[-rate, rate]`.
    #[default]
    Uniform,
    /// Normal with mean 0 and standard deviation `rate`.
    Gaussian,
}

#[derive(Debug, Clone, Copy)]
enum PerturbationDistr {
    Uniform(Uniform<f64>),
    Gaussian(Normal<f64>),
}

impl Distribution<f64> for PerturbationDistr {
    fn sample<R>(&self, rng: &mut R) -> f64
    where
        R: Rng + ?Sized,
    {
        match self {
            Self::Uniform(d) => d.sample(rng),
            Self::Gaussian(d) => d.sample(rng),
        }
    }
}

/// A validated mutation operator.
#[derive(Debug, Clone, Copy)]
pub struct Mutation {
    chance: f64,
    distr: PerturbationDistr,
}

impl Mutation {
    /// Creates a mutation operator.
    ///
    /// `chance` must lie in `[0, 1]` and `rate` must be finite and non-negative.
    pub fn new(chance: f64, rate: f64, perturbation: Perturbation) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&chance) {
            return Err(ConfigError::InvalidMutationChance { value: chance });
        }
        let invalid_rate = || ConfigError::InvalidMutationRate { value: rate };
        if !rate.is_finite() || rate < 0.0 {
            return Err(invalid_rate());
        }
        let distr = match perturbation {
            Perturbation::Uniform => PerturbationDistr::Uniform(
                Uniform::new_inclusive(-rate, rate).map_err(|_| invalid_rate())?,
            ),
            Perturbation::Gaussian => {
                PerturbationDistr::Gaussian(Normal::new(0.0, rate).map_err(|_| invalid_rate())?)
            }
        };
        Ok(Self { chance, distr })
    }

    #[must_use]
    pub fn chance(&self) -> f64 {
        self.chance
    }

    /// Perturbs each gene in place with probability `chance`.
    pub fn apply<R>(&self, genes: &mut [f64], rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        for gene in genes {
            if rng.random_bool(self.chance) {
                *gene += self.distr.sample(rng);
            }
        }
    }
}
