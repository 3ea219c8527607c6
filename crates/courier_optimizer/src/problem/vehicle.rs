use crate::define_index_newtype;

use super::{capacity::Capacity, time_window::Minutes};

define_index_newtype!(VehicleIdx, Vehicle);

/// Vehicles are identical apart from their index: same depot, same capacity,
/// same departure time.
#[derive(Debug, Clone)]
pub struct Vehicle {
    capacity: Capacity,
    departure: Minutes,
}

impl Vehicle {
    pub fn new(capacity: Capacity, departure: Minutes) -> Self {
        Self {
            capacity,
            departure,
        }
    }

    pub fn capacity(&self) -> Capacity {
        self.capacity
    }

    /// Clock time at the depot start, fixed for every vehicle.
    pub fn departure(&self) -> Minutes {
        self.departure
    }
}
