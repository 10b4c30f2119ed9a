//! Genetic algorithm for evolving neural network genomes.
//!
//! The engine owns a population of [`NeuralNetwork`]s and alternates two steps:
//!
//! 1. [`GeneticAlgorithm::evaluate_generation`] - each individual plays several
//!    episodes and receives a fitness score
//! 2. [`GeneticAlgorithm::evolve_generation`] - a new population is bred by
//!    tournament selection, uniform crossover and mutation
//!
//! There is no terminal state; the caller decides when to stop.
//!
//! # Genetic Operators
//!
//! ## Tournament Selection
//!
//! Sample `k` individuals uniformly with replacement and keep the fittest. Ties
//! go to the first sampled. Larger `k` means stronger selection pressure.
//!
//! ## Uniform Crossover
//!
//! Every weight and bias of the child comes from one parent or the other with
//! probability 0.5 (see [`crossover_uniform`](crate::weights::crossover_uniform)).
//!
//! ## Mutation
//!
//! Every weight and bias is perturbed with probability `mutation_chance` by an
//! amount scaled by `mutation_rate` (see [`Mutation`]).
//!
//! # Noisy Fitness
//!
//! Food placement is random, so a single episode is a noisy measure of a genome.
//! Each individual plays `evaluations_per_individual` episodes and the scores are
//! combined with a [`FitnessAggregation`].
//!
//! # Randomness and Parallelism
//!
//! All randomness comes from one [`Pcg32`] seeded at construction. Episode seeds
//! are drawn from it in population order before the episodes are fanned out over
//! the rayon thread pool, so a run is fully reproducible from its [`Seed`]
//! regardless of thread scheduling.
//!
//! # Example
//!
//! ```
//! use oxisnake_engine::Seed;
//! use oxisnake_evaluator::session_evaluator::{DefaultSessionEvaluator, GrowthSessionEvaluator};
//! use oxisnake_training::genetic::{GeneticAlgorithm, GeneticAlgorithmParams};
//!
//! let params = GeneticAlgorithmParams {
//!     population_size: 6,
//!     layer_sizes: vec![44, 8, 4],
//!     evaluations_per_individual: 2,
//!     ..GeneticAlgorithmParams::default()
//! };
//! let evaluator = DefaultSessionEvaluator::new(GrowthSessionEvaluator::new());
//! let mut ga = GeneticAlgorithm::new(params, evaluator, Seed::from_bytes([1; 16])).unwrap();
//!
//! for _ in 0..3 {
//!     ga.evaluate_generation().unwrap();
//!     let best = ga.best_individual();
//!     assert!(best.fitness().is_finite());
//!     ga.evolve_generation();
//! }
//! assert_eq!(ga.generation_number(), 3);
//! ```

use std::{num::NonZeroUsize, sync::Arc};

use rand::Rng;
use rand_pcg::Pcg32;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use oxisnake_engine::Seed;
use oxisnake_evaluator::{policy::InferenceError, session_evaluator::SessionEvaluator};
use oxisnake_stats::descriptive::{self, DescriptiveStats};

use crate::{
    network::{self, NeuralNetwork},
    weights::{Mutation, Perturbation},
};

/// Invalid training configuration, detected before any evaluation runs.
#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("layer sizes must not be empty")]
    EmptyLayers,
    #[display("at least an input and an output layer are required")]
    TooFewLayers,
    #[display("layer {index} has zero neurons")]
    ZeroSizedLayer { index: usize },
    #[display("population size must be positive")]
    ZeroPopulation,
    #[display("input layer width {actual} does not match the encoder's {expected} features")]
    InputWidthMismatch { expected: usize, actual: usize },
    #[display("output layer width {actual} does not match the {expected} actions")]
    OutputWidthMismatch { expected: usize, actual: usize },
    #[display("mutation chance {value} is not within [0, 1]")]
    InvalidMutationChance { value: f64 },
    #[display("mutation rate {value} must be finite and non-negative")]
    InvalidMutationRate { value: f64 },
    #[display("tournament size must be positive")]
    ZeroTournamentSize,
    #[display("at least one evaluation per individual is required")]
    ZeroEvaluations,
}

/// How the scores of an individual's episodes are combined into its fitness.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FitnessAggregation {
    /// The raw score of the middle episode, in play order.
    #[default]
    MiddleRun,
    /// The median of the sorted scores.
    Median,
    /// The arithmetic mean of the scores.
    Mean,
}

impl FitnessAggregation {
    /// Combines episode scores into a single fitness value.
    ///
    /// Returns `f64::MIN` for an empty slice.
    #[must_use]
    pub fn aggregate(self, scores: &[f64]) -> f64 {
        let value = match self {
            Self::MiddleRun => scores.get(scores.len() / 2).copied(),
            Self::Median => descriptive::median(scores.iter().copied()),
            Self::Mean => DescriptiveStats::new(scores.iter().copied()).map(|s| s.mean),
        };
        value.unwrap_or(f64::MIN)
    }
}

/// Parameters of a training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneticAlgorithmParams {
    /// Number of individuals per generation.
    pub population_size: usize,
    /// Network layer sizes, input first.
    pub layer_sizes: Vec<usize>,
    /// Per-gene probability of mutation.
    pub mutation_chance: f64,
    /// Scale of a mutation's perturbation.
    pub mutation_rate: f64,
    pub perturbation: Perturbation,
    /// Candidates sampled per tournament.
    pub tournament_size: usize,
    /// Episodes played per individual and generation.
    pub evaluations_per_individual: usize,
    pub fitness_aggregation: FitnessAggregation,
}

impl Default for GeneticAlgorithmParams {
    fn default() -> Self {
        Self {
            population_size: 1300,
            layer_sizes: vec![44, 18, 18, 4],
            mutation_chance: 0.01,
            mutation_rate: 0.1,
            perturbation: Perturbation::Uniform,
            tournament_size: 10,
            evaluations_per_individual: 5,
            fitness_aggregation: FitnessAggregation::MiddleRun,
        }
    }
}

impl GeneticAlgorithmParams {
    /// Checks the parameters against the widths a session evaluator works with.
    pub fn validate(&self, feature_count: usize, action_count: usize) -> Result<(), ConfigError> {
        network::validate_layer_sizes(&self.layer_sizes)?;
        let input = self.layer_sizes[0];
        if input != feature_count {
            return Err(ConfigError::InputWidthMismatch {
                expected: feature_count,
                actual: input,
            });
        }
        let output = self.layer_sizes[self.layer_sizes.len() - 1];
        if output != action_count {
            return Err(ConfigError::OutputWidthMismatch {
                expected: action_count,
                actual: output,
            });
        }
        if self.population_size == 0 {
            return Err(ConfigError::ZeroPopulation);
        }
        if self.tournament_size == 0 {
            return Err(ConfigError::ZeroTournamentSize);
        }
        if self.evaluations_per_individual == 0 {
            return Err(ConfigError::ZeroEvaluations);
        }
        self.mutation()?;
        Ok(())
    }

    fn mutation(&self) -> Result<Mutation, ConfigError> {
        Mutation::new(self.mutation_chance, self.mutation_rate, self.perturbation)
    }
}

/// A single genome and its fitness.
#[derive(Debug, Clone)]
pub struct Individual {
    network: Arc<NeuralNetwork>,
    fitness: f64,
    evaluated: bool,
}

impl Individual {
    fn new(network: NeuralNetwork) -> Self {
        Self {
            network: Arc::new(network),
            fitness: 0.0,
            evaluated: false,
        }
    }

    /// The genome, shareable with other threads as a policy.
    #[must_use]
    pub fn network(&self) -> &Arc<NeuralNetwork> {
        &self.network
    }

    /// Fitness from the last evaluation, or 0 if never evaluated.
    #[must_use]
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    #[must_use]
    pub fn is_evaluated(&self) -> bool {
        self.evaluated
    }
}

/// A non-empty generation of individuals.
#[derive(Debug, Clone)]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    /// Creates `count` individuals with independent random networks.
    pub fn random<R>(layer_sizes: &[usize], count: usize, rng: &mut R) -> Result<Self, ConfigError>
    where
        R: Rng + ?Sized,
    {
        if count == 0 {
            return Err(ConfigError::ZeroPopulation);
        }
        let individuals = (0..count)
            .map(|_| NeuralNetwork::random(layer_sizes, rng).map(Individual::new))
            .collect::<Result<_, _>>()?;
        Ok(Self { individuals })
    }

    #[must_use]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// The individual with the highest fitness; the earliest one on ties.
    #[must_use]
    pub fn best(&self) -> &Individual {
        let mut best = &self.individuals[0];
        for ind in &self.individuals[1..] {
            if ind.fitness > best.fitness {
                best = ind;
            }
        }
        best
    }

    /// Computes descriptive statistics over the population's fitness.
    #[must_use]
    pub fn compute_fitness_stats(&self) -> Option<DescriptiveStats> {
        DescriptiveStats::new(self.individuals.iter().map(|ind| ind.fitness))
    }
}

/// Selects an individual using tournament selection.
///
/// Samples `tournament_size` individuals uniformly with replacement and returns
/// the fittest, preferring the earliest sampled on ties.
///
/// # Panics
///
/// Panics if `tournament_size` is zero or `population` is empty.
pub fn tournament_select<'a, R>(
    population: &'a [Individual],
    tournament_size: usize,
    rng: &mut R,
) -> &'a Individual
where
    R: Rng + ?Sized,
{
    assert!(tournament_size > 0);
    assert!(!population.is_empty());
    let mut best = &population[rng.random_range(0..population.len())];
    for _ in 1..tournament_size {
        let candidate = &population[rng.random_range(0..population.len())];
        if candidate.fitness > best.fitness {
            best = candidate;
        }
    }
    best
}

/// The training engine.
#[derive(Debug)]
pub struct GeneticAlgorithm<E> {
    params: GeneticAlgorithmParams,
    evaluator: E,
    mutation: Mutation,
    rng: Pcg32,
    population: Population,
    generation: usize,
    evaluated: bool,
}

impl<E> GeneticAlgorithm<E>
where
    E: SessionEvaluator,
{
    /// Validates `params` against `evaluator` and creates a random population.
    pub fn new(params: GeneticAlgorithmParams, evaluator: E, seed: Seed) -> Result<Self, ConfigError> {
        params.validate(evaluator.feature_count(), evaluator.action_count())?;
        let mutation = params.mutation()?;
        let mut rng = seed.to_rng();
        let population = Population::random(&params.layer_sizes, params.population_size, &mut rng)?;
        Ok(Self {
            params,
            evaluator,
            mutation,
            rng,
            population,
            generation: 0,
            evaluated: false,
        })
    }

    #[must_use]
    pub fn params(&self) -> &GeneticAlgorithmParams {
        &self.params
    }

    #[must_use]
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Number of completed [`Self::evolve_generation`] calls.
    #[must_use]
    pub fn generation_number(&self) -> usize {
        self.generation
    }

    /// Returns `true` if the current population has been evaluated.
    #[must_use]
    pub fn is_evaluated(&self) -> bool {
        self.evaluated
    }

    /// Plays episodes for every individual and assigns fitness.
    ///
    /// Individuals are evaluated in parallel; the call returns once all of them
    /// have finished.
    pub fn evaluate_generation(&mut self) -> Result<(), InferenceError> {
        let evaluations = self.params.evaluations_per_individual;
        let seeds = (0..self.population.len())
            .map(|_| {
                (0..evaluations)
                    .map(|_| self.rng.random::<Seed>())
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();

        let aggregation = self.params.fitness_aggregation;
        let evaluator = &self.evaluator;
        self.population
            .individuals
            .par_iter_mut()
            .zip(seeds.par_iter())
            .try_for_each(|(ind, seeds)| {
                let scores = evaluator.play_and_evaluate_sessions(seeds, ind.network.as_ref())?;
                ind.fitness = aggregation.aggregate(&scores);
                ind.evaluated = true;
                Ok::<_, InferenceError>(())
            })?;
        self.evaluated = true;

        let best = self.population.best();
        tracing::debug!(
            generation = self.generation,
            best_fitness = best.fitness,
            "generation evaluated"
        );
        Ok(())
    }

    /// The fittest individual of the current population.
    #[must_use]
    pub fn best_individual(&self) -> &Individual {
        self.population.best()
    }

    /// Runs one tournament over the current population.
    pub fn tournament_select(&mut self, tournament_size: NonZeroUsize) -> &Individual {
        tournament_select(
            &self.population.individuals,
            tournament_size.get(),
            &mut self.rng,
        )
    }

    /// Replaces the population with bred offspring.
    ///
    /// Should follow [`Self::evaluate_generation`]; otherwise selection works on
    /// stale fitness values. This is logged but not prevented.
    pub fn evolve_generation(&mut self) {
        if !self.evaluated {
            tracing::warn!(
                generation = self.generation,
                "evolving a population that has not been evaluated"
            );
        }

        let parents = &self.population.individuals;
        let k = self.params.tournament_size;
        let individuals = (0..self.params.population_size)
            .map(|_| {
                let p1 = tournament_select(parents, k, &mut self.rng);
                let p2 = tournament_select(parents, k, &mut self.rng);
                let mut child = p1.network.crossover(&p2.network, &mut self.rng);
                child.mutate(&self.mutation, &mut self.rng);
                Individual::new(child)
            })
            .collect();
        self.population = Population { individuals };
        self.generation += 1;
        self.evaluated = false;

        tracing::debug!(generation = self.generation, "generation evolved");
    }

    /// Computes descriptive statistics over the current fitness values.
    #[must_use]
    pub fn compute_fitness_stats(&self) -> Option<DescriptiveStats> {
        self.population.compute_fitness_stats()
    }
}
