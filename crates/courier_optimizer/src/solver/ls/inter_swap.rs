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

/// **Inter-Route Swap**
///
/// Exchanges the job at `first` in the first route with the job at `second`
/// in the second route.
///
/// ```text
/// BEFORE:
///    Route 1: ... (A) -> [first] -> (B) ...
///    Route 2: ... (X) -> [second] -> (Y) ...
///
/// AFTER:
///    Route 1: ... (A) -> [second] -> (B) ...
///    Route 2: ... (X) -> [first] -> (Y) ...
/// ```
#[derive(Debug, Clone)]
pub struct InterSwapOperator {
    params: InterSwapOperatorParams,
}

#[derive(Debug, Clone)]
pub struct InterSwapOperatorParams {
    pub first_route_id: RouteIdx,
    pub second_route_id: RouteIdx,
    pub first: usize,
    pub second: usize,
}

impl InterSwapOperator {
    pub fn new(params: InterSwapOperatorParams) -> Self {
        debug_assert_ne!(params.first_route_id, params.second_route_id);
        Self { params }
    }
}

impl LocalSearchOperator for InterSwapOperator {
    fn generate_moves<C>(solution: &WorkingSolution, (r1, r2): (RouteIdx, RouteIdx), mut consumer: C)
    where
        C: FnMut(Self),
    {
        // Symmetric, the (r2, r1) pair yields the same moves.
        if r1 >= r2 {
            return;
        }

        let first_len = solution.route(r1).len();
        let second_len = solution.route(r2).len();

        for first in 0..first_len {
            for second in 0..second_len {
                consumer(InterSwapOperator::new(InterSwapOperatorParams {
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
        let f = first_route.node(self.params.first);
        let b = first_route.next_node(self.params.first);

        let x = second_route.previous_node(self.params.second);
        let s = second_route.node(self.params.second);
        let y = second_route.next_node(self.params.second);

        let current_cost = arc_cost.arc_cost(a, f)
            + arc_cost.arc_cost(f, b)
            + arc_cost.arc_cost(x, s)
            + arc_cost.arc_cost(s, y);
        let new_cost = arc_cost.arc_cost(a, s)
            + arc_cost.arc_cost(s, b)
            + arc_cost.arc_cost(x, f)
            + arc_cost.arc_cost(f, y);

        new_cost - current_cost
    }

    fn route_changes(&self, solution: &WorkingSolution) -> RouteChanges {
        let f = solution
            .route(self.params.first_route_id)
            .node(self.params.first);
        let s = solution
            .route(self.params.second_route_id)
            .node(self.params.second);

        smallvec![
            RouteChange {
                route_id: self.params.first_route_id,
                start: self.params.first,
                end: self.params.first + 1,
                nodes: vec![s],
            },
            RouteChange {
                route_id: self.params.second_route_id,
                start: self.params.second,
                end: self.params.second + 1,
                nodes: vec![f],
            },
        ]
    }
}
