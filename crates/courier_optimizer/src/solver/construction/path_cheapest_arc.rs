use tracing::{Level, debug, instrument};

use crate::{
    problem::job::NodeIdx,
    solver::{
        arc_cost::{ArcCost, ArcCostEvaluator},
        solution::{route::RouteChange, working_solution::WorkingSolution},
    },
};

use super::parallel_cheapest_insertion::insert_cheapest;

/// Extends the routes one vehicle after the other: from the last stop, the
/// vehicle moves to the unrouted job with the cheapest arc that keeps the
/// route feasible. When a vehicle cannot be extended anymore, the next one
/// starts. Jobs left over are placed by cheapest insertion.
#[instrument(skip_all, level = Level::DEBUG)]
pub fn path_cheapest_arc(solution: &mut WorkingSolution) -> Vec<NodeIdx> {
    let problem = solution.shared_problem();
    let arc_cost = ArcCost::new(&problem);

    let mut pending = solution.unassigned_nodes();

    for route_id in solution.route_ids() {
        loop {
            let route = solution.route(route_id);
            let last = route.previous_node(route.len());
            let position = route.len();

            // Stable sort keeps node order on equal arc costs.
            let mut candidates = pending.clone();
            candidates.sort_by(|&a, &b| {
                arc_cost
                    .arc_cost(last, a)
                    .total_cmp(&arc_cost.arc_cost(last, b))
            });

            let next = candidates.into_iter().find(|&node| {
                let change = RouteChange {
                    route_id,
                    start: position,
                    end: position,
                    nodes: vec![node],
                };

                solution.evaluate_changes(&[change], &arc_cost).is_some()
            });

            let Some(next) = next else {
                break;
            };

            solution.insert(route_id, position, next);
            pending.retain(|&node| node != next);
        }

        if pending.is_empty() {
            break;
        }
    }

    if !pending.is_empty() {
        debug!(
            "PathCheapestArc: {} jobs left after extending every vehicle",
            pending.len()
        );
        pending = insert_cheapest(solution, pending);
    }

    pending
}
