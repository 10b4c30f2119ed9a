//! Feed-forward neural network used as a genome.
//!
//! A network is described by its layer sizes `[n0, n1, ..., nk]`, where `n0` is
//! the input width and `nk` the output width. Between consecutive layers sits a
//! [`LayerTransition`] holding `n_i × n_(i+1)` weights and `n_(i+1)` biases.
//!
//! # Weight Layout
//!
//! Weights are stored row-major by input index: the weight from input `in` to
//! output `o` lives at `weights[in * outputs + o]`. Crossover and mutation index
//! genes by position, so this layout must not change.
//!
//! # Activations
//!
//! Every transition except the last applies [`leaky_relu`]; the last applies
//! [`sigmoid`], so outputs always lie in `(0, 1)`.

use rand::Rng;

use oxisnake_evaluator::policy::{InferenceError, Policy};

use crate::{
    genetic::ConfigError,
    weights::{self, Mutation},
};

/// Slope of [`leaky_relu`] for negative inputs.
pub const LEAKY_RELU_SLOPE: f64 = 0.01;

/// `x` for non-negative inputs, `0.01 * x` otherwise.
#[must_use]
pub fn leaky_relu(x: f64) -> f64 {
    if x < 0.0 { LEAKY_RELU_SLOPE * x } else { x }
}

/// Logistic function `1 / (1 + e^-x)`.
#[must_use]
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Activation {
    LeakyRelu,
    Sigmoid,
}

impl Activation {
    fn apply(self, x: f64) -> f64 {
        match self {
            Self::LeakyRelu => leaky_relu(x),
            Self::Sigmoid => sigmoid(x),
        }
    }
}

/// Weights and biases connecting one layer to the next.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerTransition {
    inputs: usize,
    outputs: usize,
    weights: Vec<f64>,
    biases: Vec<f64>,
}

impl LayerTransition {
    fn random<R>(inputs: usize, outputs: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let weights = weights::random(rng, inputs * outputs);
        let biases = weights::random(rng, outputs);
        Self {
            inputs,
            outputs,
            weights,
            biases,
        }
    }

    #[must_use]
    pub fn inputs(&self) -> usize {
        self.inputs
    }

    #[must_use]
    pub fn outputs(&self) -> usize {
        self.outputs
    }

    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    #[must_use]
    pub fn biases(&self) -> &[f64] {
        &self.biases
    }

    /// Weight from input `input` to output `output`.
    #[must_use]
    pub fn weight(&self, input: usize, output: usize) -> f64 {
        self.weights[input * self.outputs + output]
    }

    fn forward(&self, input: &[f64], activation: Activation) -> Vec<f64> {
        let mut output = self.biases.clone();
        for (x, row) in input.iter().zip(self.weights.chunks_exact(self.outputs)) {
            for (o, w) in output.iter_mut().zip(row) {
                *o += x * w;
            }
        }
        for o in &mut output {
            *o = activation.apply(*o);
        }
        output
    }
}

/// A fully connected feed-forward network.
///
/// # Example
///
/// ```
/// use oxisnake_evaluator::policy::Policy as _;
/// use oxisnake_training::network::NeuralNetwork;
/// use rand::SeedableRng as _;
/// use rand_pcg::Pcg32;
///
/// let mut rng = Pcg32::seed_from_u64(0);
/// let network = NeuralNetwork::random(&[44, 18, 18, 4], &mut rng).unwrap();
///
/// let output = network.infer(&[0.5; 44]).unwrap();
/// assert_eq!(output.len(), 4);
/// assert!(output.iter().all(|v| *v > 0.0 && *v < 1.0));
/// assert!(network.infer(&[0.5; 43]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NeuralNetwork {
    layer_sizes: Vec<usize>,
    transitions: Vec<LayerTransition>,
}

impl NeuralNetwork {
    /// Creates a network with every weight and bias uniform in `[-1, 1]`.
    ///
    /// Fails if `layer_sizes` has fewer than two entries or contains a zero.
    pub fn random<R>(layer_sizes: &[usize], rng: &mut R) -> Result<Self, ConfigError>
    where
        R: Rng + ?Sized,
    {
        validate_layer_sizes(layer_sizes)?;
        let transitions = layer_sizes
            .windows(2)
            .map(|w| LayerTransition::random(w[0], w[1], rng))
            .collect();
        Ok(Self {
            layer_sizes: layer_sizes.to_vec(),
            transitions,
        })
    }

    #[must_use]
    pub fn layer_sizes(&self) -> &[usize] {
        &self.layer_sizes
    }

    #[must_use]
    pub fn transitions(&self) -> &[LayerTransition] {
        &self.transitions
    }

    #[must_use]
    pub fn input_width(&self) -> usize {
        self.transitions.first().map_or(0, LayerTransition::inputs)
    }

    #[must_use]
    pub fn output_width(&self) -> usize {
        self.transitions.last().map_or(0, LayerTransition::outputs)
    }

    /// Total number of weights and biases.
    #[must_use]
    pub fn gene_count(&self) -> usize {
        self.transitions
            .iter()
            .map(|t| t.weights.len() + t.biases.len())
            .sum()
    }

    /// All genes in transition order, weights before biases.
    pub fn genes(&self) -> impl Iterator<Item = f64> + '_ {
        self.transitions
            .iter()
            .flat_map(|t| t.weights.iter().chain(&t.biases).copied())
    }

    /// Uniform per-gene crossover of two networks with the same layer sizes.
    ///
    /// # Panics
    ///
    /// Panics if the parents have different layer sizes.
    #[must_use]
    pub fn crossover<R>(&self, other: &Self, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        assert_eq!(self.layer_sizes, other.layer_sizes);
        let transitions = self
            .transitions
            .iter()
            .zip(&other.transitions)
            .map(|(a, b)| LayerTransition {
                inputs: a.inputs,
                outputs: a.outputs,
                weights: weights::crossover_uniform(&a.weights, &b.weights, rng),
                biases: weights::crossover_uniform(&a.biases, &b.biases, rng),
            })
            .collect();
        Self {
            layer_sizes: self.layer_sizes.clone(),
            transitions,
        }
    }

    /// Mutates every weight and bias in place.
    pub fn mutate<R>(&mut self, mutation: &Mutation, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        for t in &mut self.transitions {
            mutation.apply(&mut t.weights, rng);
            mutation.apply(&mut t.biases, rng);
        }
    }
}

impl Policy for NeuralNetwork {
    fn infer(&self, input: &[f64]) -> Result<Vec<f64>, InferenceError> {
        let expected = self.input_width();
        if input.len() != expected {
            return Err(InferenceError::InvalidInput {
                expected,
                actual: input.len(),
            });
        }

        let last = self.transitions.len() - 1;
        let mut values = input.to_vec();
        for (i, transition) in self.transitions.iter().enumerate() {
            let activation = if i == last {
                Activation::Sigmoid
            } else {
                Activation::LeakyRelu
            };
            values = transition.forward(&values, activation);
        }
        Ok(values)
    }
}

pub(crate) fn validate_layer_sizes(layer_sizes: &[usize]) -> Result<(), ConfigError> {
    match layer_sizes {
        [] => Err(ConfigError::EmptyLayers),
        [_] => Err(ConfigError::TooFewLayers),
        _ => match layer_sizes.iter().position(|n| *n == 0) {
            Some(index) => Err(ConfigError::ZeroSizedLayer { index }),
            None => Ok(()),
        },
    }
}
