//! Statistics over fitness values for the oxisnake training loop.
//!
//! # Examples
//!
//! ```
//! use oxisnake_stats::descriptive::DescriptiveStats;
//!
//! let fitness = [51.0, 7.0, 13.0, 120.5];
//! let stats = DescriptiveStats::new(fitness).unwrap();
//! assert_eq!(stats.max, 120.5);
//! assert_eq!(stats.median, 32.0);
//! ```

pub mod descriptive;
