use smallvec::smallvec;
use tracing::{Level, instrument};

use crate::solver::{
    arc_cost::ArcCostEvaluator,
    ls::r#move::LocalSearchOperator,
    solution::{
        route::RouteChange,
        route_id::RouteIdx,
        working_solution::{RouteChanges, WorkingSolution},
    },
};

/// **Intra-Route Relocate**
///
/// Moves the job at `from` so that it is visited right before the job
/// currently at `to` (or last when `to == len`).
///
/// ```text
/// BEFORE:
///    Route: ... (A) -> [from] -> (C) ... (X) -> (Y) ...
///
/// AFTER:
///    Route: ... (A) -> (C) ... (X) -> [from] -> (Y) ...
///
/// Edges Removed: (A->from), (from->C), (X->Y)
/// Edges Created: (A->C),    (X->from), (from->Y)
/// ```
#[derive(Debug, Clone)]
pub struct RelocateOperator {
    params: RelocateOperatorParams,
}

#[derive(Debug, Clone)]
pub struct RelocateOperatorParams {
    pub route_id: RouteIdx,
    pub from: usize,
    pub to: usize,
}

impl RelocateOperator {
    pub fn new(params: RelocateOperatorParams) -> Self {
        debug_assert!(
            params.from != params.to && params.from + 1 != params.to,
            "relocating a job onto its own position"
        );

        Self { params }
    }
}

impl LocalSearchOperator for RelocateOperator {
    #[instrument(skip_all, level = Level::TRACE)]
    fn generate_moves<C>(solution: &WorkingSolution, (r1, r2): (RouteIdx, RouteIdx), mut consumer: C)
    where
        C: FnMut(Self),
    {
        if r1 != r2 {
            return;
        }

        let len = solution.route(r1).len();

        for from in 0..len {
            for to in 0..=len {
                if from == to || from + 1 == to {
                    continue;
                }

                consumer(RelocateOperator::new(RelocateOperatorParams {
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

        let a = route.previous_node(self.params.from);
        let from = route.node(self.params.from);
        let c = route.next_node(self.params.from);

        let x = route.previous_node(self.params.to);
        let y = route.node_or_end(self.params.to);

        let current_cost =
            arc_cost.arc_cost(a, from) + arc_cost.arc_cost(from, c) + arc_cost.arc_cost(x, y);

        let new_cost =
            arc_cost.arc_cost(a, c) + arc_cost.arc_cost(x, from) + arc_cost.arc_cost(from, y);

        new_cost - current_cost
    }

    fn route_changes(&self, solution: &WorkingSolution) -> RouteChanges {
        let route = solution.route(self.params.route_id);
        let (from, to) = (self.params.from, self.params.to);
        let job = route.node(from);

        // A - B - C - D - E: moving B before E rewrites B - C - D as C - D - B,
        // moving D before B rewrites B - C - D as D - B - C.
        let change = if from < to {
            let mut nodes = route.nodes()[from + 1..to].to_vec();
            nodes.push(job);

            RouteChange {
                route_id: self.params.route_id,
                start: from,
                end: to,
                nodes,
            }
        } else {
            let mut nodes = Vec::with_capacity(from - to + 1);
            nodes.push(job);
            nodes.extend_from_slice(&route.nodes()[to..from]);

            RouteChange {
                route_id: self.params.route_id,
                start: to,
                end: from + 1,
                nodes,
            }
        };

        smallvec![change]
    }
}
