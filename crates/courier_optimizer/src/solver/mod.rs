pub mod arc_cost;
pub mod construction;
pub mod dimensions;
pub mod error;
pub mod guided_local_search;
pub mod ls;
pub mod score;
pub mod search;
pub mod solution;
pub mod solution_extractor;
pub mod solver_params;
pub mod statistics;
