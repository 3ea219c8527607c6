use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use tracing::{Level, instrument};

use crate::{
    problem::job::NodeIdx,
    solver::{
        arc_cost::{ArcCost, ArcCostEvaluator},
        solution::{route::RouteChange, route_id::RouteIdx, working_solution::WorkingSolution},
    },
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Insertion {
    pub node: NodeIdx,
    pub route_id: RouteIdx,
    pub position: usize,
    pub delta: f64,
}

impl Insertion {
    fn change(&self) -> RouteChange {
        RouteChange {
            route_id: self.route_id,
            start: self.position,
            end: self.position,
            nodes: vec![self.node],
        }
    }
}

/// Cheapest feasible position for `node` in `route_id`.
pub fn best_insertion_in_route(
    solution: &WorkingSolution,
    route_id: RouteIdx,
    node: NodeIdx,
) -> Option<Insertion> {
    let problem = solution.problem();
    let arc_cost = ArcCost::new(problem);
    let screen = problem.is_pure_arc_cost();
    let route = solution.route(route_id);

    let mut best: Option<Insertion> = None;

    for position in 0..=route.len() {
        let best_delta = best.map_or(f64::INFINITY, |insertion| insertion.delta);

        if screen {
            let previous = route.previous_node(position);
            let next = route.node_or_end(position);
            let arc_delta = arc_cost.arc_cost(previous, node) + arc_cost.arc_cost(node, next)
                - arc_cost.arc_cost(previous, next);

            if arc_delta >= best_delta {
                continue;
            }
        }

        let insertion = Insertion {
            node,
            route_id,
            position,
            delta: 0.0,
        };

        if let Some(delta) = solution.evaluate_changes(&[insertion.change()], &arc_cost)
            && delta < best_delta
        {
            best = Some(Insertion { delta, ..insertion });
        }
    }

    best
}

/// Inserts `nodes` one at a time, always applying the cheapest feasible
/// insertion over all of them, all routes and all positions. Returns the
/// nodes that fit nowhere.
#[instrument(skip_all, level = Level::DEBUG)]
pub fn insert_cheapest(solution: &mut WorkingSolution, nodes: Vec<NodeIdx>) -> Vec<NodeIdx> {
    let route_ids = solution.route_ids().collect::<Vec<_>>();

    // table[i][r]: best insertion of nodes[i] in route r
    let compute_row = |solution: &WorkingSolution, node: NodeIdx| {
        route_ids
            .iter()
            .map(|&route_id| best_insertion_in_route(solution, route_id, node))
            .collect::<Vec<_>>()
    };

    let mut pending = nodes;
    let mut table = {
        let solution = &*solution;
        pending
            .par_iter()
            .map(|&node| compute_row(solution, node))
            .collect::<Vec<_>>()
    };

    while !pending.is_empty() {
        let best = table
            .iter()
            .enumerate()
            .flat_map(|(index, row)| row.iter().flatten().map(move |insertion| (index, insertion)))
            .min_by(|(_, a), (_, b)| a.delta.total_cmp(&b.delta))
            .map(|(index, insertion)| (index, *insertion));

        let Some((index, insertion)) = best else {
            break;
        };

        solution.apply_changes(&[insertion.change()]);
        pending.swap_remove(index);
        table.swap_remove(index);

        if solution.problem().has_span_cost() {
            // The span term of every cached insertion may have moved.
            let solution = &*solution;
            table = pending
                .par_iter()
                .map(|&node| compute_row(solution, node))
                .collect();
        } else {
            let solution = &*solution;
            let column = insertion.route_id.get();
            let refreshed = pending
                .par_iter()
                .map(|&node| best_insertion_in_route(solution, insertion.route_id, node))
                .collect::<Vec<_>>();

            for (row, entry) in table.iter_mut().zip(refreshed) {
                row[column] = entry;
            }
        }
    }

    pending
}

/// Builds routes from scratch by cheapest insertion in every route in
/// parallel.
pub fn parallel_cheapest_insertion(solution: &mut WorkingSolution) -> Vec<NodeIdx> {
    let nodes = solution.unassigned_nodes();
    insert_cheapest(solution, nodes)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{problem::capacity::Capacity, test_utils};

    use super::*;

    #[test]
    fn test_best_insertion_in_route() {
        let solution = test_utils::create_grid_solution(vec![vec![1, 3]]);

        let insertion =
            best_insertion_in_route(&solution, RouteIdx::new(0), NodeIdx::new(2)).unwrap();

        assert_eq!(insertion.position, 1);
        assert_eq!(insertion.delta, 0.0);
    }

    #[test]
    fn test_inserts_every_job() {
        let locations = test_utils::create_location_grid(4, 4);
        let problem = Arc::new(test_utils::create_test_problem(
            &locations,
            3,
            Capacity::Unlimited,
        ));

        let mut solution = WorkingSolution::new(Arc::clone(&problem));
        let unassigned = parallel_cheapest_insertion(&mut solution);

        assert!(unassigned.is_empty());
        assert!(solution.is_feasible());
        assert_eq!(
            solution
                .routes()
                .iter()
                .map(|route| route.len())
                .sum::<usize>(),
            15
        );
    }

    #[test]
    fn test_respects_capacity() {
        let locations = test_utils::create_location_grid(2, 3);
        let problem = Arc::new(test_utils::create_test_problem_with_demands(
            &locations,
            2,
            Capacity::Limited(30),
            &[10, 10, 10, 10, 10],
        ));

        let mut solution = WorkingSolution::new(Arc::clone(&problem));
        let unassigned = parallel_cheapest_insertion(&mut solution);

        assert!(unassigned.is_empty());
        assert!(solution.routes().iter().all(|route| route.summary().load <= 30));
    }

    #[test]
    fn test_reports_jobs_that_fit_nowhere() {
        let locations = test_utils::create_location_grid(1, 4);
        let problem = Arc::new(test_utils::create_test_problem_with_demands(
            &locations,
            1,
            Capacity::Limited(20),
            &[10, 10, 10],
        ));

        let mut solution = WorkingSolution::new(Arc::clone(&problem));
        let unassigned = parallel_cheapest_insertion(&mut solution);

        assert_eq!(unassigned.len(), 1);
        assert_eq!(solution.route(RouteIdx::new(0)).len(), 2);
    }
}
