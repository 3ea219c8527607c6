use smallvec::smallvec;

use crate::solver::{
    arc_cost::ArcCostEvaluator,
    ls::r#move::LocalSearchOperator,
    solution::{
        route::RouteChange,
        route_id::RouteIdx,
        working_solution::{RouteChanges, WorkingSolution},
    },
};

/// **Inter-Route 2-Opt\***
///
/// Cuts both routes and exchanges their tails: the first route keeps its
/// jobs before `first` and finishes with the second route's jobs from
/// `second` on, and conversely.
///
/// ```text
/// BEFORE:
///    Route 1: (A1) ... (A) | (B) ... (An)
///    Route 2: (X1) ... (X) | (Y) ... (Xn)
///
/// AFTER:
///    Route 1: (A1) ... (A) -> (Y) ... (Xn)
///    Route 2: (X1) ... (X) -> (B) ... (An)
///
/// Edges Removed: (A->B), (X->Y)
/// Edges Created: (A->Y), (X->B)
/// ```
#[derive(Debug, Clone)]
pub struct TwoOptStarOperator {
    params: TwoOptStarParams,
}

#[derive(Debug, Clone)]
pub struct TwoOptStarParams {
    pub first_route_id: RouteIdx,
    pub second_route_id: RouteIdx,

    /// Position of the first job of the tail in the first route.
    pub first: usize,

    /// Position of the first job of the tail in the second route.
    pub second: usize,
}

impl TwoOptStarOperator {
    pub fn new(params: TwoOptStarParams) -> Self {
        debug_assert_ne!(params.first_route_id, params.second_route_id);
        Self { params }
    }
}

impl LocalSearchOperator for TwoOptStarOperator {
    fn generate_moves<C>(solution: &WorkingSolution, (r1, r2): (RouteIdx, RouteIdx), mut consumer: C)
    where
        C: FnMut(Self),
    {
        if r1 >= r2 {
            return;
        }

        let first_len = solution.route(r1).len();
        let second_len = solution.route(r2).len();

        for first in 0..=first_len {
            for second in 0..=second_len {
                // Exchanging whole routes or nothing at all.
                if (first == 0 && second == 0) || (first == first_len && second == second_len) {
                    continue;
                }

                consumer(TwoOptStarOperator::new(TwoOptStarParams {
                    first_route_id: r1,
                    second_route_id: r2,
                    first,
                    second,
                }));
            }
        }
    }

    fn transport_cost_delta<E>(&self, solution: &WorkingSolution, arc_cost: &E) -> f64
    where
        E: ArcCostEvaluator + ?Sized,
    {
        let first_route = solution.route(self.params.first_route_id);
        let second_route = solution.route(self.params.second_route_id);

        let a = first_route.previous_node(self.params.first);
        let b = first_route.node_or_end(self.params.first);
        let x = second_route.previous_node(self.params.second);
        let y = second_route.node_or_end(self.params.second);

        arc_cost.arc_cost(a, y) + arc_cost.arc_cost(x, b)
            - arc_cost.arc_cost(a, b)
            - arc_cost.arc_cost(x, y)
    }

    fn route_changes(&self, solution: &WorkingSolution) -> RouteChanges {
        let first_route = solution.route(self.params.first_route_id);
        let second_route = solution.route(self.params.second_route_id);

        smallvec![
            RouteChange {
                route_id: self.params.first_route_id,
                start: self.params.first,
                end: first_route.len(),
                nodes: second_route.nodes()[self.params.second..].to_vec(),
            },
            RouteChange {
                route_id: self.params.second_route_id,
                start: self.params.second,
                end: second_route.len(),
                nodes: first_route.nodes()[self.params.first..].to_vec(),
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use crate::{solver::arc_cost::ArcCost, test_utils};

    use super::*;

    fn two_opt_star(routes: Vec<Vec<usize>>, first: usize, second: usize) -> (Vec<usize>, Vec<usize>) {
        let mut solution = test_utils::create_grid_solution(routes);

        let operator = TwoOptStarOperator::new(TwoOptStarParams {
            first_route_id: RouteIdx::new(0),
            second_route_id: RouteIdx::new(1),
            first,
            second,
        });

        let delta = operator.transport_cost_delta(&solution, &ArcCost::new(solution.problem()));
        let changes = operator.route_changes(&solution);
        test_utils::assert_consistent_deltas(&mut solution, &changes, delta);

        (
            test_utils::route_nodes(&solution, 0),
            test_utils::route_nodes(&solution, 1),
        )
    }

    #[test]
    fn test_two_opt_star() {
        let (first, second) =
            two_opt_star(vec![vec![1, 2, 3, 4], vec![10, 20, 30, 40, 50]], 2, 3);

        assert_eq!(first, vec![1, 2, 40, 50]);
        assert_eq!(second, vec![10, 20, 30, 3, 4]);
    }

    #[test]
    fn test_two_opt_star_moves_whole_tail() {
        let (first, second) = two_opt_star(vec![vec![1, 2, 3], vec![10, 20]], 0, 2);

        assert!(first.is_empty());
        assert_eq!(second, vec![10, 20, 1, 2, 3]);
    }

    #[test]
    fn test_skips_identity_moves() {
        let solution = test_utils::create_grid_solution(vec![vec![1], vec![10]]);
        let mut count = 0;

        TwoOptStarOperator::generate_moves(&solution, (RouteIdx::new(0), RouteIdx::new(1)), |_| {
            count += 1
        });

        // (0, 1) and (1, 0)
        assert_eq!(count, 2);
    }
}
