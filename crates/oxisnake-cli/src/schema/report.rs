use chrono::{DateTime, Utc};
use oxisnake_engine::Seed;
use oxisnake_stats::descriptive::DescriptiveStats;
use oxisnake_training::genetic::GeneticAlgorithmParams;
use serde::{Deserialize, Serialize};

/// Fitness function used for a training run.
#[derive(
    Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::FromStr,
)]
#[serde(rename_all = "lowercase")]
pub enum FitnessKind {
    #[default]
    Growth,
    Length,
}

/// Summary of a training run, written with `--report`.
///
/// Networks are not part of the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub seed: Seed,
    pub fitness: FitnessKind,
    pub params: GeneticAlgorithmParams,
    pub generations: Vec<GenerationSummary>,
    pub best_fitness: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub generation: usize,
    pub fitness: DescriptiveStats,
}

impl TrainingReport {
    pub fn new(seed: Seed, fitness: FitnessKind, params: GeneticAlgorithmParams) -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            seed,
            fitness,
            params,
            generations: vec![],
            best_fitness: None,
        }
    }

    pub fn record_generation(&mut self, generation: usize, fitness: DescriptiveStats) {
        self.best_fitness = Some(
            self.best_fitness
                .map_or(fitness.max, |best| best.max(fitness.max)),
        );
        self.generations.push(GenerationSummary {
            generation,
            fitness,
        });
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }
}
