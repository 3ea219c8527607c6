use std::sync::Arc;

use tracing::{Level, info, instrument};

use crate::{
    problem::vehicle_routing_problem::VehicleRoutingProblem,
    solver::{error::SolverError, solution::working_solution::WorkingSolution},
};

use super::{
    first_solution_strategy::FirstSolutionStrategy,
    parallel_cheapest_insertion::parallel_cheapest_insertion, path_cheapest_arc::path_cheapest_arc,
};

/// Builds a solution visiting every job without breaking capacity or the time
/// horizon. Soft time windows may be violated.
#[instrument(skip_all, level = Level::DEBUG)]
pub fn construct_solution(
    problem: Arc<VehicleRoutingProblem>,
    strategy: FirstSolutionStrategy,
) -> Result<WorkingSolution, SolverError> {
    let mut solution = WorkingSolution::new(problem);

    let unassigned = match strategy {
        FirstSolutionStrategy::PathCheapestArc => path_cheapest_arc(&mut solution),
        FirstSolutionStrategy::ParallelCheapestInsertion => {
            parallel_cheapest_insertion(&mut solution)
        }
    };

    if !unassigned.is_empty() {
        info!(
            strategy = %strategy,
            "Construction: {} jobs could not be routed",
            unassigned.len()
        );
        return Err(SolverError::NoSolutionFound);
    }

    info!(
        strategy = %strategy,
        cost = solution.objective(),
        vehicles = solution.non_empty_routes_count(),
        "Construction: initial solution built"
    );

    Ok(solution)
}

#[cfg(test)]
mod tests {
    use crate::{problem::capacity::Capacity, test_utils};

    use super::*;

    #[test]
    fn test_both_strategies_route_every_job() {
        let locations = test_utils::create_location_grid(3, 4);
        let problem = Arc::new(test_utils::create_test_problem_with_demands(
            &locations,
            3,
            Capacity::Limited(4),
            &[1; 11],
        ));

        for strategy in [
            FirstSolutionStrategy::PathCheapestArc,
            FirstSolutionStrategy::ParallelCheapestInsertion,
        ] {
            let solution = construct_solution(Arc::clone(&problem), strategy).unwrap();
            assert!(solution.is_feasible(), "{strategy} built an infeasible solution");
        }
    }

    #[test]
    fn test_total_demand_above_fleet_capacity() {
        let locations = test_utils::create_location_grid(1, 4);
        let problem = Arc::new(test_utils::create_test_problem_with_demands(
            &locations,
            1,
            Capacity::Limited(10),
            &[5, 5, 5],
        ));

        assert_eq!(
            construct_solution(problem, FirstSolutionStrategy::PathCheapestArc).err(),
            Some(SolverError::NoSolutionFound)
        );
    }
}
