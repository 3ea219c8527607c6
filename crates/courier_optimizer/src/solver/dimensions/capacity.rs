use crate::problem::{
    capacity::Capacity, job::NodeIdx, vehicle::Vehicle,
    vehicle_routing_problem::VehicleRoutingProblem,
};

/// Running load of a vehicle. Demands are non-negative so the load only
/// grows, and the bound is checked on every prefix.
pub struct CapacityDimension {
    capacity: Capacity,
    load: u64,
    violated: bool,
}

impl CapacityDimension {
    pub fn new(vehicle: &Vehicle) -> Self {
        Self {
            capacity: vehicle.capacity(),
            load: 0,
            violated: false,
        }
    }

    /// Adds the demand of `node` and returns the load after serving it.
    pub fn visit(&mut self, problem: &VehicleRoutingProblem, node: NodeIdx) -> u64 {
        self.load += problem.demand(node);
        if !self.capacity.is_satisfied(self.load) {
            self.violated = true;
        }
        self.load
    }

    pub fn load(&self) -> u64 {
        self.load
    }

    pub fn is_satisfied(&self) -> bool {
        !self.violated
    }
}
