use std::sync::Arc;

use crate::{
    problem::{
        capacity::Capacity,
        job::{Job, JobBuilder, NodeIdx},
        location::Location,
        model_params::ModelParams,
        time_window::TimeWindow,
        travel_matrices::TravelMatrices,
        vehicle_routing_problem::{VehicleRoutingProblem, VehicleRoutingProblemBuilder},
    },
    solver::solution::{
        route::RouteChange, route_id::RouteIdx, working_solution::WorkingSolution,
    },
};

pub fn create_location_grid(rows: usize, cols: usize) -> Vec<Location> {
    let mut locations = Vec::new();

    for y in 0..rows {
        for x in 0..cols {
            locations.push(Location::from_cartesian(x as f64, y as f64));
        }
    }

    locations
}

pub fn create_locations(locations: Vec<(f64, f64)>) -> Vec<Location> {
    locations
        .iter()
        .map(|&(x, y)| Location::from_cartesian(x, y))
        .collect()
}

/// Default model parameters without span cost, so that the objective of a
/// problem without windows is its total distance.
pub fn create_test_model_params() -> ModelParams {
    ModelParams {
        span_cost_coefficient: 0.0,
        ..ModelParams::default()
    }
}

fn create_jobs(
    locations: &[Location],
    demands: &[u32],
    windows: &[Option<TimeWindow>],
) -> Vec<Job> {
    locations
        .iter()
        .enumerate()
        .map(|(index, &location)| {
            let mut builder = JobBuilder::new(index as i64, location);

            if index > 0 {
                if let Some(&demand) = demands.get(index - 1) {
                    builder.set_demand(demand);
                }
                if let Some(Some(window)) = windows.get(index - 1) {
                    builder.set_time_window(*window);
                }
            }

            builder.build()
        })
        .collect()
}

fn create_builder(
    locations: &[Location],
    vehicle_count: usize,
    capacity: Capacity,
    demands: &[u32],
    windows: &[Option<TimeWindow>],
) -> VehicleRoutingProblemBuilder {
    let params = create_test_model_params();

    let mut builder = VehicleRoutingProblemBuilder::default();
    builder
        .set_jobs(create_jobs(locations, demands, windows))
        .set_fleet(vehicle_count, capacity, params.depot_departure)
        .set_matrices(TravelMatrices::from_euclidean(locations))
        .set_params(params);

    builder
}

/// The first location is the depot, job ids are the location indices.
pub fn create_test_problem_builder(
    locations: &[Location],
    vehicle_count: usize,
) -> VehicleRoutingProblemBuilder {
    create_builder(locations, vehicle_count, Capacity::Unlimited, &[], &[])
}

pub fn create_test_problem(
    locations: &[Location],
    vehicle_count: usize,
    capacity: Capacity,
) -> VehicleRoutingProblem {
    create_builder(locations, vehicle_count, capacity, &[], &[])
        .build()
        .unwrap()
}

/// `demands[i]` belongs to node `i + 1`.
pub fn create_test_problem_with_demands(
    locations: &[Location],
    vehicle_count: usize,
    capacity: Capacity,
    demands: &[u32],
) -> VehicleRoutingProblem {
    create_builder(locations, vehicle_count, capacity, demands, &[])
        .build()
        .unwrap()
}

/// `windows[i]` belongs to node `i + 1`.
pub fn create_test_problem_builder_with_windows(
    locations: &[Location],
    vehicle_count: usize,
    windows: &[Option<TimeWindow>],
) -> VehicleRoutingProblemBuilder {
    create_builder(locations, vehicle_count, Capacity::Unlimited, &[], windows)
}

/// `windows[i]` belongs to node `i + 1`.
pub fn create_test_problem_with_windows(
    locations: &[Location],
    vehicle_count: usize,
    windows: &[Option<TimeWindow>],
) -> VehicleRoutingProblem {
    create_builder(locations, vehicle_count, Capacity::Unlimited, &[], windows)
        .build()
        .unwrap()
}

pub struct TestRoute {
    pub vehicle_id: usize,
    pub nodes: Vec<usize>,
}

pub fn create_test_working_solution(
    problem: Arc<VehicleRoutingProblem>,
    routes: Vec<TestRoute>,
) -> WorkingSolution {
    let mut solution = WorkingSolution::new(problem);

    for route in routes {
        solution.apply_changes(&[RouteChange {
            route_id: RouteIdx::new(route.vehicle_id),
            start: 0,
            end: 0,
            nodes: route.nodes.into_iter().map(NodeIdx::new).collect(),
        }]);
    }

    solution
}

pub fn route_nodes(solution: &WorkingSolution, route_id: usize) -> Vec<usize> {
    solution
        .route(RouteIdx::new(route_id))
        .nodes()
        .iter()
        .map(|node| node.get())
        .collect()
}

/// A 10x10 grid problem (depot at the origin) with one vehicle per route and
/// the given routes already in place.
pub fn create_grid_solution(routes: Vec<Vec<usize>>) -> WorkingSolution {
    let locations = create_location_grid(10, 10);
    let problem = Arc::new(create_test_problem(
        &locations,
        routes.len(),
        Capacity::Unlimited,
    ));

    create_test_working_solution(
        problem,
        routes
            .into_iter()
            .enumerate()
            .map(|(vehicle_id, nodes)| TestRoute { vehicle_id, nodes })
            .collect(),
    )
}

/// Applies `changes` and checks that the incremental `transport_delta` and
/// the full `evaluated_delta` both match the cost after the change.
pub fn assert_consistent_deltas(
    solution: &mut WorkingSolution,
    changes: &[RouteChange],
    transport_delta: f64,
) {
    let cost_before = solution.transport_cost();
    let objective_before = solution.objective();
    let evaluated_delta = solution
        .evaluate_changes(changes, &crate::solver::arc_cost::ArcCost::new(solution.problem()))
        .unwrap();

    solution.apply_changes(changes);

    assert_eq!(solution.transport_cost(), cost_before + transport_delta);
    assert!((solution.objective() - (objective_before + evaluated_delta)).abs() < 1e-9);
}
