use crate::solver::{
    arc_cost::ArcCostEvaluator,
    ls::{
        inter_relocate::InterRelocateOperator, inter_swap::InterSwapOperator,
        relocate::RelocateOperator, swap::SwapOperator, two_opt::TwoOptOperator,
        two_opt_star::TwoOptStarOperator,
    },
    solution::{route_id::RouteIdx, working_solution::RouteChanges, working_solution::WorkingSolution},
};

pub trait LocalSearchOperator: Sized {
    /// Calls `consumer` with every move of this neighborhood between routes
    /// `r1` and `r2`. Intra-route operators only produce moves when
    /// `r1 == r2`, inter-route operators only when they differ.
    fn generate_moves<C>(solution: &WorkingSolution, pair: (RouteIdx, RouteIdx), consumer: C)
    where
        C: FnMut(Self);

    /// Change of the summed arc costs, computed from the removed and added
    /// arcs only.
    fn transport_cost_delta<E>(&self, solution: &WorkingSolution, arc_cost: &E) -> f64
    where
        E: ArcCostEvaluator + ?Sized;

    /// The node sequences this move writes into the affected routes.
    fn route_changes(&self, solution: &WorkingSolution) -> RouteChanges;
}

#[derive(Debug, Clone)]
pub enum LocalSearchMove {
    /// Moves a job to another position of the same route.
    Relocate(RelocateOperator),

    /// Moves a job into another route.
    InterRelocate(InterRelocateOperator),

    /// Exchanges two jobs of the same route.
    Swap(SwapOperator),

    /// Exchanges two jobs between two routes.
    InterSwap(InterSwapOperator),

    /// Reverses a segment of a route.
    TwoOpt(TwoOptOperator),

    /// Exchanges the tails of two routes.
    TwoOptStar(TwoOptStarOperator),
}

impl LocalSearchMove {
    pub fn operator_name(&self) -> &'static str {
        match self {
            LocalSearchMove::Relocate(_) => "Relocate",
            LocalSearchMove::InterRelocate(_) => "Inter-Relocate",
            LocalSearchMove::Swap(_) => "Swap",
            LocalSearchMove::InterSwap(_) => "Inter-Swap",
            LocalSearchMove::TwoOpt(_) => "Two-Opt",
            LocalSearchMove::TwoOptStar(_) => "Two-Opt*",
        }
    }

    pub fn transport_cost_delta<E>(&self, solution: &WorkingSolution, arc_cost: &E) -> f64
    where
        E: ArcCostEvaluator + ?Sized,
    {
        match self {
            LocalSearchMove::Relocate(op) => op.transport_cost_delta(solution, arc_cost),
            LocalSearchMove::InterRelocate(op) => op.transport_cost_delta(solution, arc_cost),
            LocalSearchMove::Swap(op) => op.transport_cost_delta(solution, arc_cost),
            LocalSearchMove::InterSwap(op) => op.transport_cost_delta(solution, arc_cost),
            LocalSearchMove::TwoOpt(op) => op.transport_cost_delta(solution, arc_cost),
            LocalSearchMove::TwoOptStar(op) => op.transport_cost_delta(solution, arc_cost),
        }
    }

    pub fn route_changes(&self, solution: &WorkingSolution) -> RouteChanges {
        match self {
            LocalSearchMove::Relocate(op) => op.route_changes(solution),
            LocalSearchMove::InterRelocate(op) => op.route_changes(solution),
            LocalSearchMove::Swap(op) => op.route_changes(solution),
            LocalSearchMove::InterSwap(op) => op.route_changes(solution),
            LocalSearchMove::TwoOpt(op) => op.route_changes(solution),
            LocalSearchMove::TwoOptStar(op) => op.route_changes(solution),
        }
    }

    pub fn apply(&self, solution: &mut WorkingSolution) {
        let changes = self.route_changes(solution);
        solution.apply_changes(&changes);
    }
}
