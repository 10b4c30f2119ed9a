//! Training system for evolving snake-playing neural networks.
//!
//! Each genome is a small feed-forward [`NeuralNetwork`](network::NeuralNetwork)
//! that maps the 44 encoded game features to four direction scores. A genetic
//! algorithm evolves a population of them towards higher fitness, as scored by a
//! [`SessionEvaluator`](oxisnake_evaluator::session_evaluator::SessionEvaluator).
//!
//! # How Training Works
//!
//! 1. **Population** - Create a population of random networks
//! 2. **Evaluation** - Each network plays several episodes in parallel
//! 3. **Fitness** - Episode scores are combined into one fitness value
//! 4. **Selection** - Parents are picked by tournament
//! 5. **Reproduction** - Children are bred by uniform crossover and mutation
//! 6. **Repeat** - Until the caller stops
//!
//! # Architecture
//!
//! ```text
//! Genetic Algorithm (genetic)
//!     ↓ evolves
//! Neural Networks (network, weights)
//!     ↓ act as Policy for
//! Controller (oxisnake-evaluator)
//!     ↓ scored by
//! Session Evaluator (fitness function)
//!     ↓ guides
//! Selection & Reproduction
//! ```
//!
//! The best network of each generation can be handed to a display thread
//! through a [`BestSlot`](snapshot::BestSlot) without blocking training.
//!
//! # Current Limitations
//!
//! - **Fixed topology**: Only weights and biases evolve, never the layer sizes
//! - **No elitism**: The best individual is not carried over unchanged, so the best
//!   fitness can drop between generations
//! - **No persistence**: Networks live only as long as the process

pub mod genetic;
pub mod network;
pub mod snapshot;
pub mod weights;
