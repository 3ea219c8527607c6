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

/// **Intra-Route Swap**
///
/// Exchanges the jobs at positions `first < second` of the same route.
///
/// ```text
/// BEFORE:
///    Route: ... (A) -> [first] -> (B) ... (X) -> [second] -> (Y) ...
///
/// AFTER:
///    Route: ... (A) -> [second] -> (B) ... (X) -> [first] -> (Y) ...
/// ```
#[derive(Debug, Clone)]
pub struct SwapOperator {
    params: SwapOperatorParams,
}

#[derive(Debug, Clone)]
pub struct SwapOperatorParams {
    pub route_id: RouteIdx,
    pub first: usize,
    pub second: usize,
}

impl SwapOperator {
    pub fn new(params: SwapOperatorParams) -> Self {
        debug_assert!(params.first < params.second);
        Self { params }
    }
}

impl LocalSearchOperator for SwapOperator {
    fn generate_moves<C>(solution: &WorkingSolution, (r1, r2): (RouteIdx, RouteIdx), mut consumer: C)
    where
        C: FnMut(Self),
    {
        if r1 != r2 {
            return;
        }

        let len = solution.route(r1).len();

        for first in 0..len {
            for second in first + 1..len {
                consumer(SwapOperator::new(SwapOperatorParams {
                    route_id: r1,
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
        let route = solution.route(self.params.route_id);
        let (first, second) = (self.params.first, self.params.second);

        let a = route.previous_node(first);
        let f = route.node(first);
        let s = route.node(second);
        let y = route.next_node(second);

        if first + 1 == second {
            let current_cost = arc_cost.arc_cost(a, f) + arc_cost.arc_cost(f, s) + arc_cost.arc_cost(s, y);
            let new_cost = arc_cost.arc_cost(a, s) + arc_cost.arc_cost(s, f) + arc_cost.arc_cost(f, y);

            return new_cost - current_cost;
        }

        let b = route.next_node(first);
        let x = route.previous_node(second);

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
        let route = solution.route(self.params.route_id);
        let (first, second) = (self.params.first, self.params.second);

        let mut nodes = Vec::with_capacity(second - first + 1);
        nodes.push(route.node(second));
        nodes.extend_from_slice(&route.nodes()[first + 1..second]);
        nodes.push(route.node(first));

        smallvec![RouteChange {
            route_id: self.params.route_id,
            start: first,
            end: second + 1,
            nodes,
        }]
    }
}
