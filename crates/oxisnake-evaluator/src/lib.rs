//! Evaluator system connecting controllers to the snake game.
//!
//! This crate turns a [`Policy`](policy::Policy) (anything that maps a feature vector to
//! four action scores) into moves on an [`oxisnake_engine::SnakeGame`], and turns finished
//! episodes into fitness scores for training.
//!
//! # Architecture
//!
//! ```text
//! Session Evaluation (fitness for training)
//!     ↓ uses
//! Controller (play one episode, pick a direction per step)
//!     ↓ uses
//! State Encoder (game → 44 features) + Policy (features → 4 scores)
//! ```
//!
//! - [`state_encoder`] - Pure function from game state to a fixed-length feature vector
//! - [`policy`] - The inference seam and argmax action selection
//! - [`controller`] - Plays episodes to completion and collects [`SessionStats`](controller::SessionStats)
//! - [`session_evaluator`] - Fitness functions over finished episodes
//! - [`replay`] - Caller-paced stepping of a policy-driven game for display layers
//!
//! # Contract Between Encoder and Policy
//!
//! The encoder always produces [`FEATURE_COUNT`](state_encoder::FEATURE_COUNT) values and
//! the controller always expects [`ACTION_COUNT`](policy::ACTION_COUNT) outputs. Policies
//! with other widths are rejected by the training engine at construction time, and by
//! [`Policy::infer`](policy::Policy::infer) at run time.

pub mod controller;
pub mod policy;
pub mod replay;
pub mod session_evaluator;
pub mod state_encoder;
