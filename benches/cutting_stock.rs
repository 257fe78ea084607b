//! Benchmarks for cutting-stock model construction and solving
//!
//! Problems grow in the number of cut types and rod slots, which together set the number of
//! integer variables in the model (`max_rods * (cut types + 1)`).

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rodcut::lp_solver::SolverBackend;
use rodcut::solve::{build_model, solve_problem_with};
use rodcut::{CutType, CuttingProblem};

/// (name, rod length, cuts, max rods)
const PROBLEMS: &[(&str, u32, &[(u32, u32)], u32)] = &[
    ("reference", 600, &[(20, 5), (30, 2)], 10),
    ("window_frames", 6000, &[(1200, 4), (900, 6), (450, 8)], 10),
    (
        "mixed_small",
        100,
        &[(45, 3), (30, 4), (20, 5), (15, 2)],
        8,
    ),
    (
        "many_types",
        1000,
        &[(510, 2), (320, 3), (270, 4), (190, 3), (120, 6), (80, 5)],
        12,
    ),
];

fn problems() -> impl Iterator<Item = (&'static str, CuttingProblem)> {
    PROBLEMS.iter().map(|&(name, rod_length, cuts, max_rods)| {
        let cuts = cuts
            .iter()
            .map(|&(length, demand)| CutType::new(length, demand))
            .collect();
        (name, CuttingProblem::new(rod_length, cuts).with_max_rods(max_rods))
    })
}

/// Benchmark building the integer program
fn bench_model_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("model_construction");

    for (name, problem) in problems() {
        let variables = problem.max_rods as u64 * (problem.cuts.len() as u64 + 1);
        group.throughput(Throughput::Elements(variables));
        group.bench_with_input(BenchmarkId::from_parameter(name), &problem, |b, problem| {
            b.iter(|| build_model(black_box(problem)))
        });
    }

    group.finish();
}

/// Benchmark a full solve with the default backend
fn bench_solve(c: &mut Criterion) {
    let solver = match SolverBackend::from_env_or_default() {
        Ok(solver) => solver,
        Err(e) => {
            eprintln!("Warning: {}. Skipping solve benchmarks.", e);
            return;
        }
    };

    let mut group = c.benchmark_group("solve");
    group.sample_size(10);

    for (name, problem) in problems() {
        group.bench_with_input(BenchmarkId::from_parameter(name), &problem, |b, problem| {
            b.iter(|| solve_problem_with(black_box(problem), &solver, None))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_model_construction, bench_solve);
criterion_main!(benches);
