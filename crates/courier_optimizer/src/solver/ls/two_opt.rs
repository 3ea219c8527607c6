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

/// **Intra-Route 2-Opt**
///
/// Reverses the segment between `from` and `to` (inclusive).
///
/// ```text
/// BEFORE:
///    Route: ... (A) -> [from] -> ... -> [to] -> (D) ...
///
/// AFTER:
///    Route: ... (A) -> [to] -> ... -> [from] -> (D) ...
///
/// Edges Removed: (A->from), (to->D)
/// Edges Created: (A->to),   (from->D)
/// ```
///
/// Arcs inside the segment are traversed backwards afterwards, which only
/// costs something when the arc costs are asymmetric.
#[derive(Debug, Clone)]
pub struct TwoOptOperator {
    params: TwoOptParams,
}

#[derive(Debug, Clone)]
pub struct TwoOptParams {
    pub route_id: RouteIdx,
    pub from: usize,
    pub to: usize,
}

impl TwoOptOperator {
    pub fn new(params: TwoOptParams) -> Self {
        debug_assert!(params.from < params.to);
        Self { params }
    }
}

impl LocalSearchOperator for TwoOptOperator {
    fn generate_moves<C>(solution: &WorkingSolution, (r1, r2): (RouteIdx, RouteIdx), mut consumer: C)
    where
        C: FnMut(Self),
    {
        if r1 != r2 {
            return;
        }

        let len = solution.route(r1).len();

        for from in 0..len {
            for to in from + 1..len {
                consumer(TwoOptOperator::new(TwoOptParams {
                    route_id: r1,
                    from,
                    to,
                }));
            }
        }
    }

    fn transport_cost_delta<E>(&self, solution: &WorkingSolution, arc_cost: &E) -> f64
    where
        E: ArcCostEvaluator + ?Sized,
    {
        let route = solution.route(self.params.route_id);
        let (from, to) = (self.params.from, self.params.to);

        let a = route.previous_node(from);
        let b = route.node(from);
        let c = route.node(to);
        let d = route.next_node(to);

        let mut delta = arc_cost.arc_cost(a, c) + arc_cost.arc_cost(b, d)
            - arc_cost.arc_cost(a, b)
            - arc_cost.arc_cost(c, d);

        if !arc_cost.is_symmetric() {
            for pair in route.nodes()[from..=to].windows(2) {
                delta += arc_cost.arc_cost(pair[1], pair[0]) - arc_cost.arc_cost(pair[0], pair[1]);
            }
        }

        delta
    }

    fn route_changes(&self, solution: &WorkingSolution) -> RouteChanges {
        let route = solution.route(self.params.route_id);
        let nodes = route.nodes()[self.params.from..=self.params.to]
            .iter()
            .rev()
            .copied()
            .collect();

        smallvec![RouteChange {
            route_id: self.params.route_id,
            start: self.params.from,
            end: self.params.to + 1,
            nodes,
        }]
    }
}
