use crate::problem::{
    job::NodeIdx, travel_matrices::TravelMatrices, vehicle_routing_problem::VehicleRoutingProblem,
};

/// Cost of travelling along a single arc. Implementations are pure functions
/// of the two nodes so the search may call them any number of times, from any
/// thread.
pub trait ArcCostEvaluator: Sync {
    fn arc_cost(&self, from: NodeIdx, to: NodeIdx) -> f64;

    /// True when every arc between two jobs costs the same in both
    /// directions, so reversing a run of jobs keeps its inner cost.
    fn is_symmetric(&self) -> bool;
}

/// The routing objective's arc cost: the matrix distance, except that an arc
/// back to the depot is free in open-path mode.
#[derive(Clone, Copy)]
pub struct ArcCost<'a> {
    matrices: &'a TravelMatrices,
    open_path: bool,
}

impl<'a> ArcCost<'a> {
    pub fn new(problem: &'a VehicleRoutingProblem) -> Self {
        Self {
            matrices: problem.matrices(),
            open_path: problem.is_open_path(),
        }
    }
}

impl ArcCostEvaluator for ArcCost<'_> {
    #[inline]
    fn arc_cost(&self, from: NodeIdx, to: NodeIdx) -> f64 {
        if self.open_path && to.is_depot() {
            0.0
        } else {
            self.matrices.distance(from, to) as f64
        }
    }

    fn is_symmetric(&self) -> bool {
        self.matrices.is_symmetric()
    }
}
