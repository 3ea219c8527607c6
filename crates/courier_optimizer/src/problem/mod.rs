pub mod capacity;
pub mod job;
pub mod location;
pub mod model_params;
mod node_index;
pub mod time_window;
pub mod travel_matrices;
pub mod vehicle;
pub mod vehicle_routing_problem;
