pub mod construct_solution;
pub mod first_solution_strategy;
pub mod parallel_cheapest_insertion;
pub mod path_cheapest_arc;
