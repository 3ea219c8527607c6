use crate::problem::{
    job::NodeIdx, travel_matrices::Distance, vehicle_routing_problem::VehicleRoutingProblem,
};

/// Real distance driven by a vehicle. Unlike the arc cost, the return to the
/// depot is always counted, even in open-path mode.
#[derive(Default)]
pub struct DistanceDimension {
    distance: Distance,
}

impl DistanceDimension {
    pub fn travel(&mut self, problem: &VehicleRoutingProblem, from: NodeIdx, to: NodeIdx) -> Distance {
        let leg = problem.distance(from, to);
        self.distance += leg;
        leg
    }

    pub fn distance(&self) -> Distance {
        self.distance
    }
}

/// Difference between the longest and the shortest route distance, unused
/// vehicles included.
pub fn distance_span<I>(distances: I) -> Distance
where
    I: IntoIterator<Item = Distance>,
{
    let (min, max) = distances
        .into_iter()
        .fold((Distance::MAX, Distance::MIN), |(min, max), distance| {
            (min.min(distance), max.max(distance))
        });

    if min > max { 0 } else { max - min }
}

pub fn span_cost(problem: &VehicleRoutingProblem, span: Distance) -> f64 {
    if problem.has_span_cost() {
        problem.params().span_cost_coefficient * span as f64
    } else {
        0.0
    }
}
