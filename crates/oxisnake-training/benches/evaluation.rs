//! Benchmarks for episode evaluation throughput.

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use oxisnake_engine::Seed;
use oxisnake_evaluator::session_evaluator::{
    DefaultSessionEvaluator, GrowthSessionEvaluator, SessionEvaluator as _,
};
use oxisnake_training::{
    genetic::{GeneticAlgorithm, GeneticAlgorithmParams},
    network::NeuralNetwork,
};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

fn bench_inference(c: &mut Criterion) {
    use oxisnake_evaluator::policy::Policy as _;

    let mut rng = Pcg32::seed_from_u64(42);
    let network = NeuralNetwork::random(&[44, 18, 18, 4], &mut rng).unwrap();
    let input = (0..44).map(|_| rng.random_range(0.0..1.0)).collect::<Vec<f64>>();

    c.bench_function("network_infer", |b| {
        b.iter(|| black_box(network.infer(black_box(&input)).unwrap()));
    });
}

fn bench_episode(c: &mut Criterion) {
    let mut rng = Pcg32::seed_from_u64(42);
    let network = NeuralNetwork::random(&[44, 18, 18, 4], &mut rng).unwrap();
    let evaluator = DefaultSessionEvaluator::new(GrowthSessionEvaluator::new());

    c.bench_function("play_and_evaluate_session", |b| {
        b.iter(|| {
            let seed: Seed = rng.random();
            black_box(evaluator.play_and_evaluate_session(seed, &network).unwrap());
        });
    });
}

fn bench_generation(c: &mut Criterion) {
    let params = GeneticAlgorithmParams {
        population_size: 64,
        ..GeneticAlgorithmParams::default()
    };
    let evaluator = DefaultSessionEvaluator::new(GrowthSessionEvaluator::new());
    let mut ga = GeneticAlgorithm::new(params, evaluator, Seed::from_bytes([7; 16])).unwrap();

    c.bench_function("evaluate_and_evolve_64", |b| {
        b.iter(|| {
            ga.evaluate_generation().unwrap();
            ga.evolve_generation();
        });
    });
}

criterion_group!(benches, bench_inference, bench_episode, bench_generation);
criterion_main!(benches);
