use serde::Serialize;
use tracing::{Level, instrument};

use crate::{
    problem::{
        job::NodeIdx, time_window::Minutes, travel_matrices::Distance, vehicle::VehicleIdx,
    },
    solver::{arc_cost::ArcCost, dimensions::walk_route, solution::working_solution::WorkingSolution},
};

const MINUTES_PER_DAY: Minutes = 1440;

/// A visit of a solved route with the dimension values read on arrival.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolvedStop {
    pub node: NodeIdx,
    pub original_id: i64,
    pub lat: f64,
    pub lon: f64,
    pub demand: u32,

    /// Load carried after serving the stop.
    pub load: u64,

    /// Absolute minutes, after any wait for the window start.
    pub arrival: Minutes,
}

impl SolvedStop {
    pub fn arrival_time(&self) -> String {
        format_clock_time(self.arrival)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolvedRoute {
    pub vehicle_id: VehicleIdx,

    /// Depot departure, jobs, then the depot return unless the problem is an
    /// open path. Empty when the vehicle serves no job.
    pub stops: Vec<SolvedStop>,
    pub total_load: u64,

    /// Distance driven, without the return leg in open-path mode.
    pub distance: Distance,
    pub late_minutes: Minutes,
}

impl SolvedRoute {
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Stops that are jobs, depot visits excluded.
    pub fn jobs(&self) -> impl Iterator<Item = &SolvedStop> {
        self.stops.iter().filter(|stop| !stop.node.is_depot())
    }
}

/// Walks every route of `solution` into its ordered stop list, one entry per
/// vehicle.
#[instrument(skip_all, level = Level::DEBUG)]
pub fn extract_routes(solution: &WorkingSolution) -> Vec<SolvedRoute> {
    let problem = solution.problem();
    let arc_cost = ArcCost::new(problem);

    solution
        .routes()
        .iter()
        .map(|route| {
            if route.is_empty() {
                return SolvedRoute {
                    vehicle_id: route.vehicle_id(),
                    stops: vec![],
                    total_load: 0,
                    distance: 0,
                    late_minutes: 0,
                };
            }

            let mut stops = Vec::with_capacity(route.len() + 2);
            let summary = walk_route(
                problem,
                problem.vehicle(route.vehicle_id()),
                route.nodes().iter().copied(),
                &arc_cost,
                |visit| {
                    let job = problem.job(visit.node);
                    stops.push(SolvedStop {
                        node: visit.node,
                        original_id: job.external_id(),
                        lat: job.location().lat(),
                        lon: job.location().lon(),
                        demand: if visit.node.is_depot() { 0 } else { job.demand() },
                        load: visit.load,
                        arrival: visit.arrival,
                    });
                },
            );

            if problem.is_open_path() {
                stops.pop();
            }

            SolvedRoute {
                vehicle_id: route.vehicle_id(),
                stops,
                total_load: summary.load,
                distance: summary.driven_distance(problem),
                late_minutes: summary.late_minutes,
            }
        })
        .collect()
}

/// Formats absolute minutes as a wall clock "HH:MM", wrapping past midnight.
pub fn format_clock_time(minutes: Minutes) -> String {
    let minute_of_day = minutes.rem_euclid(MINUTES_PER_DAY);
    format!("{:02}:{:02}", minute_of_day / 60, minute_of_day % 60)
}
