use std::{hint::black_box, sync::Arc};

use courier_optimizer::{
    problem::{
        capacity::Capacity,
        job::JobBuilder,
        location::Location,
        model_params::ModelParams,
        travel_matrices::TravelMatrices,
        vehicle_routing_problem::{VehicleRoutingProblem, VehicleRoutingProblemBuilder},
    },
    solver::{
        construction::{
            construct_solution::construct_solution, first_solution_strategy::FirstSolutionStrategy,
        },
        search::Search,
        solver_params::{SolverParams, Termination},
    },
};
use criterion::{Criterion, criterion_group, criterion_main};
use jiff::SignedDuration;

/// Jobs on a golden-angle spiral around the depot, so the instance is the
/// same on every run.
fn create_problem(num_jobs: usize, num_vehicles: usize) -> VehicleRoutingProblem {
    let golden_angle = std::f64::consts::PI * (3.0 - 5f64.sqrt());

    let locations = (0..=num_jobs)
        .map(|index| {
            let radius = 100.0 * (index as f64).sqrt();
            let angle = index as f64 * golden_angle;
            Location::from_cartesian(radius * angle.cos(), radius * angle.sin())
        })
        .collect::<Vec<_>>();

    let jobs = locations
        .iter()
        .enumerate()
        .map(|(index, &location)| {
            JobBuilder::new(index as i64, location)
                .set_demand(if index == 0 { 0 } else { 10 + (index % 7) as u32 * 5 })
                .build()
        })
        .collect();

    let mut builder = VehicleRoutingProblemBuilder::default();
    builder
        .set_jobs(jobs)
        .set_fleet(num_vehicles, Capacity::Limited(400), 480)
        .set_matrices(TravelMatrices::from_euclidean(&locations))
        .set_params(ModelParams::default());

    builder.build().unwrap()
}

fn search_benchmark(c: &mut Criterion) {
    let problem = Arc::new(create_problem(60, 6));

    let mut group = c.benchmark_group("search");
    group.sample_size(10);

    for strategy in [
        FirstSolutionStrategy::PathCheapestArc,
        FirstSolutionStrategy::ParallelCheapestInsertion,
    ] {
        group.bench_function(format!("construction {strategy}"), |b| {
            b.iter(|| construct_solution(black_box(Arc::clone(&problem)), strategy).unwrap())
        });
    }

    group.bench_function("guided local search (200 moves)", |b| {
        b.iter(|| {
            Search::new(
                Arc::clone(&problem),
                SolverParams {
                    time_limit: SignedDuration::from_secs(10),
                    terminations: vec![Termination::Iterations(200)],
                    ..SolverParams::default()
                },
            )
            .solve()
            .unwrap()
        })
    });

    group.finish();
}

criterion_group!(benches, search_benchmark);
criterion_main!(benches);
