pub mod capacity;
pub mod distance;
pub mod time;

use serde::Serialize;

use crate::{
    problem::{
        job::{DEPOT, NodeIdx},
        time_window::Minutes,
        travel_matrices::Distance,
        vehicle::Vehicle,
        vehicle_routing_problem::VehicleRoutingProblem,
    },
    solver::arc_cost::ArcCostEvaluator,
};

use self::{capacity::CapacityDimension, distance::DistanceDimension, time::TimeDimension};

/// State of the dimensions when a vehicle reaches a node.
#[derive(Debug, Clone, Copy)]
pub struct StopVisit {
    pub node: NodeIdx,
    pub load: u64,
    pub arrival: Minutes,
}

/// Accumulated dimension values of a whole route, depot to depot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RouteSummary {
    /// Sum of the arc costs under the evaluator used for the walk.
    pub arc_cost: f64,

    /// Real distance, return to the depot included.
    pub distance: Distance,

    /// Real distance of the final arc back to the depot.
    pub return_distance: Distance,

    pub load: u64,
    pub late_minutes: Minutes,

    /// Clock time when the vehicle is back at the depot (or at its last stop
    /// in open-path mode).
    pub end_time: Minutes,

    /// Capacity respected on every prefix and every time within the horizon.
    pub is_feasible: bool,
}

impl RouteSummary {
    pub fn lateness_cost(&self, problem: &VehicleRoutingProblem) -> f64 {
        self.late_minutes as f64 * problem.params().lateness_penalty_per_minute
    }

    /// Arc costs plus the soft time window penalty.
    pub fn penalized_cost(&self, problem: &VehicleRoutingProblem) -> f64 {
        self.arc_cost + self.lateness_cost(problem)
    }

    /// Distance actually driven: the return leg is dropped in open-path mode.
    pub fn driven_distance(&self, problem: &VehicleRoutingProblem) -> Distance {
        if problem.is_open_path() {
            self.distance - self.return_distance
        } else {
            self.distance
        }
    }
}

/// Walks `nodes` (jobs only, depot excluded) from the depot start back to the
/// depot end, accumulating capacity, time and distance. `visit` receives the
/// depot start, every job and the depot end, in order.
pub fn walk_route<I, E, F>(
    problem: &VehicleRoutingProblem,
    vehicle: &Vehicle,
    nodes: I,
    arc_cost: &E,
    mut visit: F,
) -> RouteSummary
where
    I: IntoIterator<Item = NodeIdx>,
    E: ArcCostEvaluator + ?Sized,
    F: FnMut(StopVisit),
{
    let mut capacity = CapacityDimension::new(vehicle);
    let mut time = TimeDimension::new(problem, vehicle);
    let mut distance = DistanceDimension::default();
    let mut cost = 0.0;

    visit(StopVisit {
        node: DEPOT,
        load: 0,
        arrival: time.cumul(),
    });

    let mut previous = DEPOT;
    for node in nodes {
        cost += arc_cost.arc_cost(previous, node);
        distance.travel(problem, previous, node);
        let arrival = time.travel(problem, previous, node);
        let load = capacity.visit(problem, node);

        visit(StopVisit {
            node,
            load,
            arrival,
        });

        previous = node;
    }

    cost += arc_cost.arc_cost(previous, DEPOT);
    let return_distance = distance.travel(problem, previous, DEPOT);
    let end_time = time.travel(problem, previous, DEPOT);

    visit(StopVisit {
        node: DEPOT,
        load: capacity.load(),
        arrival: end_time,
    });

    RouteSummary {
        arc_cost: cost,
        distance: distance.distance(),
        return_distance,
        load: capacity.load(),
        late_minutes: time.late_minutes(),
        end_time,
        is_feasible: capacity.is_satisfied() && time.is_within_horizon(),
    }
}

pub fn summarize_route<I, E>(
    problem: &VehicleRoutingProblem,
    vehicle: &Vehicle,
    nodes: I,
    arc_cost: &E,
) -> RouteSummary
where
    I: IntoIterator<Item = NodeIdx>,
    E: ArcCostEvaluator + ?Sized,
{
    walk_route(problem, vehicle, nodes, arc_cost, |_| {})
}
