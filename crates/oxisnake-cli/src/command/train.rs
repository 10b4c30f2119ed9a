use std::{
    num::NonZeroUsize,
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use anyhow::Context as _;
use oxisnake_engine::Seed;
use oxisnake_evaluator::{
    replay::Replay,
    session_evaluator::{
        DefaultSessionEvaluator, GrowthSessionEvaluator, LengthSessionEvaluator, SessionEvaluator,
    },
};
use oxisnake_training::{
    genetic::{GeneticAlgorithm, GeneticAlgorithmParams},
    snapshot::{BestSlot, BestSnapshot},
};
use rand::Rng as _;
use tracing::{info, warn};

use crate::{
    schema::report::{FitnessKind, TrainingReport},
    util::{self, Output},
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// JSON file with training parameters; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of individuals per generation
    #[arg(long)]
    population: Option<usize>,
    /// Network layer sizes, input first (e.g. 44,18,18,4)
    #[arg(long, value_delimiter = ',')]
    layers: Option<Vec<usize>>,
    /// Per-gene probability of mutation
    #[arg(long)]
    mutation_chance: Option<f64>,
    /// Scale of a mutation's perturbation
    #[arg(long)]
    mutation_rate: Option<f64>,
    /// Seed as 32 hex digits; random if omitted
    #[arg(long)]
    seed: Option<Seed>,
    /// Stop after this many generations; run until killed if omitted
    #[arg(long)]
    generations: Option<NonZeroUsize>,
    #[arg(long, default_value = "growth")]
    fitness: FitnessKind,
    /// Write a JSON training report to this file ("-" for stdout)
    #[arg(long)]
    report: Option<PathBuf>,
    /// Replay the best network of each generation in a background thread
    #[arg(long)]
    watch: bool,
    /// Delay between replayed moves
    #[arg(long, default_value_t = 50)]
    watch_interval_ms: u64,
}

impl TrainArg {
    fn params(&self) -> anyhow::Result<GeneticAlgorithmParams> {
        let mut params = match &self.config {
            Some(path) => util::read_json_file("config", path)?,
            None => GeneticAlgorithmParams::default(),
        };
        if let Some(population) = self.population {
            params.population_size = population;
        }
        if let Some(layers) = &self.layers {
            params.layer_sizes.clone_from(layers);
        }
        if let Some(chance) = self.mutation_chance {
            params.mutation_chance = chance;
        }
        if let Some(rate) = self.mutation_rate {
            params.mutation_rate = rate;
        }
        Ok(params)
    }
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let params = arg.params()?;
    let seed = arg.seed.unwrap_or_else(|| rand::rng().random());
    let session_evaluator: Box<dyn SessionEvaluator> = match arg.fitness {
        FitnessKind::Growth => Box::new(DefaultSessionEvaluator::new(GrowthSessionEvaluator::new())),
        FitnessKind::Length => Box::new(DefaultSessionEvaluator::new(LengthSessionEvaluator::new())),
    };

    let mut report = TrainingReport::new(seed, arg.fitness, params.clone());
    let mut ga = GeneticAlgorithm::new(params, session_evaluator, seed)
        .context("Invalid training configuration")?;
    info!(
        %seed,
        fitness = ?arg.fitness,
        population = ga.params().population_size,
        layers = ?ga.params().layer_sizes,
        "training started"
    );

    let slot = Arc::new(BestSlot::new());
    let stop = Arc::new(AtomicBool::new(false));
    let watcher = arg.watch.then(|| {
        spawn_watcher(
            Arc::clone(&slot),
            Arc::clone(&stop),
            Duration::from_millis(arg.watch_interval_ms),
            seed,
        )
    });

    loop {
        ga.evaluate_generation()
            .with_context(|| format!("Failed to evaluate generation {}", ga.generation_number()))?;

        let generation = ga.generation_number();
        if let Some(stats) = ga.compute_fitness_stats() {
            info!(
                generation,
                best = format_args!("{:.3}", stats.max),
                mean = format_args!("{:.3}", stats.mean),
                median = format_args!("{:.3}", stats.median),
                norm_std_dev = format_args!("{:.3}", stats.normalized_std_dev),
                "generation evaluated"
            );
            report.record_generation(generation, stats);
        }
        slot.publish(BestSnapshot::new(generation, ga.best_individual()));

        if arg
            .generations
            .is_some_and(|max| generation + 1 >= max.get())
        {
            break;
        }
        ga.evolve_generation();
    }

    stop.store(true, Ordering::Relaxed);
    if let Some(watcher) = watcher {
        match watcher.join() {
            Ok(replays) => info!(replays, "watch thread stopped"),
            Err(_) => warn!("watch thread panicked"),
        }
    }

    report.finish();
    info!(
        generations = report.generations.len(),
        best_fitness = report.best_fitness,
        "training completed"
    );
    if let Some(path) = &arg.report {
        Output::save_json(&report, Some(path.clone()))?;
        info!(path = %path.display(), "report saved");
    }

    Ok(())
}

/// Replays each published best network until `stop` is set.
///
/// The thread returns the number of snapshots it took from the slot.
fn spawn_watcher(
    slot: Arc<BestSlot>,
    stop: Arc<AtomicBool>,
    interval: Duration,
    seed: Seed,
) -> JoinHandle<usize> {
    thread::spawn(move || {
        let mut rng = seed.to_rng();
        let mut replays = 0;
        while !stop.load(Ordering::Relaxed) {
            let Some(snapshot) = slot.take() else {
                thread::sleep(interval);
                continue;
            };

            replays += 1;
            let mut replay = Replay::new(Arc::clone(&snapshot.network), rng.random());
            while !replay.is_over() && !stop.load(Ordering::Relaxed) {
                if let Err(e) = replay.step() {
                    warn!(error = %e, "replay failed");
                    break;
                }
                thread::sleep(interval);
            }

            let stats = replay.stats();
            info!(
                generation = snapshot.generation,
                fitness = format_args!("{:.3}", snapshot.fitness),
                apples = stats.apples,
                moves = stats.moves,
                death = ?stats.death,
                "replayed best network"
            );
        }
        replays
    })
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::command::CommandArgs;

    fn parse(args: &[&str]) -> TrainArg {
        let args = CommandArgs::try_parse_from(
            ["oxisnake", "train"].iter().chain(args).copied(),
        )
        .unwrap();
        match args.mode {
            crate::command::Mode::Train(arg) => arg,
        }
    }

    #[test]
    fn test_defaults() {
        let arg = parse(&[]);
        assert_eq!(arg.fitness, FitnessKind::Growth);
        assert_eq!(arg.watch_interval_ms, 50);
        assert!(arg.seed.is_none());
        assert_eq!(arg.params().unwrap(), GeneticAlgorithmParams::default());
    }

    #[test]
    fn test_flags_override_params() {
        let arg = parse(&[
            "--population",
            "20",
            "--layers",
            "44,10,4",
            "--mutation-chance",
            "0.2",
            "--mutation-rate",
            "0.5",
            "--fitness",
            "length",
            "--seed",
            "000102030405060708090a0b0c0d0e0f",
            "--generations",
            "3",
        ]);
        let params = arg.params().unwrap();
        assert_eq!(params.population_size, 20);
        assert_eq!(params.layer_sizes, [44, 10, 4]);
        assert_eq!(params.mutation_chance, 0.2);
        assert_eq!(params.mutation_rate, 0.5);
        assert_eq!(params.tournament_size, 10);
        assert_eq!(arg.fitness, FitnessKind::Length);
        assert_eq!(arg.seed.unwrap().to_bytes()[15], 0x0f);
        assert_eq!(arg.generations.map(NonZeroUsize::get), Some(3));
    }

    #[test]
    fn test_rejects_bad_values() {
        let run = |args: &[&str]| {
            CommandArgs::try_parse_from(["oxisnake", "train"].iter().chain(args).copied())
        };
        assert!(run(&["--seed", "xyz"]).is_err());
        assert!(run(&["--generations", "0"]).is_err());
        assert!(run(&["--fitness", "speed"]).is_err());
    }

    #[test]
    fn test_short_training_run_writes_report() {
        let path = std::env::temp_dir().join(format!("oxisnake-report-{}.json", std::process::id()));
        let arg = TrainArg {
            population: Some(6),
            layers: Some(vec![44, 5, 4]),
            seed: Some(Seed::from_bytes([4; 16])),
            generations: NonZeroUsize::new(2),
            report: Some(path.clone()),
            watch: true,
            watch_interval_ms: 1,
            ..TrainArg::default()
        };
        run(&arg).unwrap();

        let report: TrainingReport = util::read_json_file("report", &path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(report.generations.len(), 2);
        assert_eq!(report.params.population_size, 6);
        assert!(report.best_fitness.is_some());
        assert!(report.finished_at.is_some());
    }

    #[test]
    fn test_watcher_drains_published_snapshot() {
        let params = GeneticAlgorithmParams {
            population_size: 2,
            layer_sizes: vec![44, 4],
            ..GeneticAlgorithmParams::default()
        };
        let evaluator = DefaultSessionEvaluator::new(GrowthSessionEvaluator::new());
        let seed = Seed::from_bytes([9; 16]);
        let mut ga = GeneticAlgorithm::new(params, evaluator, seed).unwrap();
        ga.evaluate_generation().unwrap();

        let slot = Arc::new(BestSlot::new());
        let stop = Arc::new(AtomicBool::new(false));
        let watcher = spawn_watcher(
            Arc::clone(&slot),
            Arc::clone(&stop),
            Duration::from_millis(1),
            seed,
        );
        slot.publish(BestSnapshot::new(0, ga.best_individual()));

        let deadline = std::time::Instant::now() + Duration::from_secs(10);
        while slot.latest().is_some() && std::time::Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
        stop.store(true, Ordering::Relaxed);

        assert!(slot.latest().is_none());
        assert_eq!(watcher.join().unwrap(), 1);
    }

    #[test]
    fn test_invalid_configuration_fails() {
        let arg = TrainArg {
            layers: Some(vec![40, 4]),
            generations: NonZeroUsize::new(1),
            ..TrainArg::default()
        };
        let err = run(&arg).unwrap_err();
        assert!(err.to_string().contains("Invalid training configuration"));
    }
}
