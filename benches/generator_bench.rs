//! Benchmarks for problem generation and the mastery tracker.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use prealgebra_tutor::adaptive::{DifficultyLevel, MasteryTracker};
use prealgebra_tutor::generator::{ConceptType, EquationGenerator};
use prealgebra_tutor::linear::LinearEquation;

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");

    for concept in ConceptType::ALL {
        let mut generator = EquationGenerator::with_seed(1);
        group.bench_with_input(BenchmarkId::from_parameter(concept.key()), &concept, |b, &concept| {
            b.iter(|| black_box(generator.generate(concept, DifficultyLevel::Hard)))
        });
    }
    group.finish();
}

fn bench_parse_and_solve(c: &mut Criterion) {
    let text = "4(x - 3) + 7 = 2x + 11";
    c.bench_function("parse_and_solve", |b| {
        b.iter(|| {
            let equation = LinearEquation::parse(black_box(text)).ok();
            black_box(equation.and_then(|eq| eq.solve().ok()))
        })
    });
}

fn bench_tracker_record(c: &mut Criterion) {
    c.bench_function("tracker_record_20", |b| {
        b.iter(|| {
            let mut tracker = MasteryTracker::default();
            for i in 0..20 {
                let difficulty = tracker.current_difficulty();
                tracker.record_attempt(i % 3 != 0, 25.0, false, difficulty);
            }
            black_box(tracker.summary())
        })
    });
}

criterion_group!(benches, bench_generate, bench_parse_and_solve, bench_tracker_record);
criterion_main!(benches);
