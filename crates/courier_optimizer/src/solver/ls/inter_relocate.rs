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

/// **Inter-Route Relocate**
///
/// Removes the job at `from` in the first route and inserts it at position
/// `to` of the second route.
///
/// ```text
/// BEFORE:
///    Route 1: ... (A) -> [from] -> (C) ...
///    Route 2: ... (X) -> (Y) ...
///
/// AFTER:
///    Route 1: ... (A) -> (C) ...
///    Route 2: ... (X) -> [from] -> (Y) ...
/// ```
#[derive(Debug, Clone)]
pub struct InterRelocateOperator {
    params: InterRelocateParams,
}

#[derive(Debug, Clone)]
pub struct InterRelocateParams {
    pub from_route_id: RouteIdx,
    pub to_route_id: RouteIdx,
    pub from: usize,
    pub to: usize,
}

impl InterRelocateOperator {
    pub fn new(params: InterRelocateParams) -> Self {
        debug_assert_ne!(params.from_route_id, params.to_route_id);
        Self { params }
    }
}

impl LocalSearchOperator for InterRelocateOperator {
    fn generate_moves<C>(solution: &WorkingSolution, (r1, r2): (RouteIdx, RouteIdx), mut consumer: C)
    where
        C: FnMut(Self),
    {
        if r1 == r2 {
            return;
        }

        let from_len = solution.route(r1).len();
        let to_len = solution.route(r2).len();

        for from in 0..from_len {
            for to in 0..=to_len {
                consumer(InterRelocateOperator::new(InterRelocateParams {
                    from_route_id: r1,
                    to_route_id: r2,
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
        let from_route = solution.route(self.params.from_route_id);
        let to_route = solution.route(self.params.to_route_id);

        let a = from_route.previous_node(self.params.from);
        let job = from_route.node(self.params.from);
        let c = from_route.next_node(self.params.from);

        let x = to_route.previous_node(self.params.to);
        let y = to_route.node_or_end(self.params.to);

        let removal = arc_cost.arc_cost(a, c) - arc_cost.arc_cost(a, job) - arc_cost.arc_cost(job, c);
        let insertion =
            arc_cost.arc_cost(x, job) + arc_cost.arc_cost(job, y) - arc_cost.arc_cost(x, y);

        removal + insertion
    }

    fn route_changes(&self, solution: &WorkingSolution) -> RouteChanges {
        let job = solution
            .route(self.params.from_route_id)
            .node(self.params.from);

        smallvec![
            RouteChange {
                route_id: self.params.from_route_id,
                start: self.params.from,
                end: self.params.from + 1,
                nodes: vec![],
            },
            RouteChange {
                route_id: self.params.to_route_id,
                start: self.params.to,
                end: self.params.to,
                nodes: vec![job],
            },
        ]
    }
}
