use fxhash::{FxBuildHasher, FxHashMap, FxHashSet};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use tracing::{debug, instrument};

use crate::solver::{
    arc_cost::ArcCostEvaluator,
    ls::{
        inter_relocate::InterRelocateOperator,
        inter_swap::InterSwapOperator,
        r#move::{LocalSearchMove, LocalSearchOperator},
        relocate::RelocateOperator,
        swap::SwapOperator,
        two_opt::TwoOptOperator,
        two_opt_star::TwoOptStarOperator,
    },
    solution::{route_id::RouteIdx, working_solution::WorkingSolution},
};

/// Moves must improve the objective by more than this to be applied.
const IMPROVEMENT_EPSILON: f64 = 1e-6;

type RoutePair = (RouteIdx, RouteIdx);

/// Move applied by one local search iteration.
#[derive(Debug, Clone, Copy)]
pub struct AppliedMove {
    pub operator_name: &'static str,
    pub delta: f64,
}

/// Best-improvement descent over every route pair.
///
/// The best move of each pair is cached by route versions, so an iteration
/// only explores pairs that involve a route changed since the last one.
pub struct LocalSearch {
    pairs: Vec<RoutePair>,
    state: LocalSearchState,
}

impl LocalSearch {
    pub fn new(solution: &WorkingSolution) -> Self {
        let count = solution.routes().len();

        LocalSearch {
            pairs: Vec::with_capacity(count * count),
            state: LocalSearchState::new(),
        }
    }

    /// Forgets every cached move. Needed whenever the arc costs change.
    pub fn reset(&mut self) {
        self.state.clear();
    }

    /// Applies the best improving move under `arc_cost`, or returns `None`
    /// when the solution is a local optimum.
    #[instrument(skip_all, level = "trace")]
    pub fn run_iteration<E>(
        &mut self,
        solution: &mut WorkingSolution,
        arc_cost: &E,
    ) -> Option<AppliedMove>
    where
        E: ArcCostEvaluator + ?Sized,
    {
        self.build_pairs(solution);

        let screen = solution.problem().is_pure_arc_cost();
        let explored = {
            let solution = &*solution;

            self.pairs
                .par_iter()
                .map(|&pair| (pair, best_move_for_pair(solution, pair, arc_cost, screen)))
                .collect::<Vec<_>>()
        };

        for (pair, best) in explored {
            self.state.update(solution, pair, best);
        }

        let (delta, best_move) = self.best_cached_move(solution)?;

        debug!(
            operator = best_move.operator_name(),
            delta, "Local Search: applying {:?}", best_move
        );

        best_move.apply(solution);

        if solution.problem().has_span_cost() {
            // The span couples every route, cached deltas of untouched
            // pairs are no longer exact.
            self.state.clear();
        } else {
            self.state.clear_stale(solution);
        }

        Some(AppliedMove {
            operator_name: best_move.operator_name(),
            delta,
        })
    }

    fn best_cached_move(&self, solution: &WorkingSolution) -> Option<(f64, LocalSearchMove)> {
        let mut best: Option<(f64, &LocalSearchMove)> = None;

        for r1 in solution.route_ids() {
            for r2 in solution.route_ids() {
                if let Some((delta, candidate)) = self.state.get(solution, (r1, r2))
                    && delta < -IMPROVEMENT_EPSILON
                    && best.is_none_or(|(best_delta, _)| delta < best_delta)
                {
                    best = Some((delta, candidate));
                }
            }
        }

        best.map(|(delta, best_move)| (delta, best_move.clone()))
    }

    fn build_pairs(&mut self, solution: &WorkingSolution) {
        self.pairs.clear();

        for r1 in solution.route_ids() {
            for r2 in solution.route_ids() {
                if !self.state.contains(solution, (r1, r2)) {
                    self.pairs.push((r1, r2));
                }
            }
        }
    }
}

fn best_move_for_pair<E>(
    solution: &WorkingSolution,
    pair: RoutePair,
    arc_cost: &E,
    screen: bool,
) -> Option<(f64, LocalSearchMove)>
where
    E: ArcCostEvaluator + ?Sized,
{
    let mut best = None;

    explore::<RelocateOperator, E>(solution, pair, arc_cost, screen, &mut best, LocalSearchMove::Relocate);
    explore::<SwapOperator, E>(solution, pair, arc_cost, screen, &mut best, LocalSearchMove::Swap);
    explore::<TwoOptOperator, E>(solution, pair, arc_cost, screen, &mut best, LocalSearchMove::TwoOpt);
    explore::<InterRelocateOperator, E>(
        solution,
        pair,
        arc_cost,
        screen,
        &mut best,
        LocalSearchMove::InterRelocate,
    );
    explore::<InterSwapOperator, E>(
        solution,
        pair,
        arc_cost,
        screen,
        &mut best,
        LocalSearchMove::InterSwap,
    );
    explore::<TwoOptStarOperator, E>(
        solution,
        pair,
        arc_cost,
        screen,
        &mut best,
        LocalSearchMove::TwoOptStar,
    );

    best
}

/// Keeps in `best` the feasible move of operator `O` with the lowest
/// objective delta. With `screen`, the objective is the sum of arc costs and
/// moves whose arc cost delta is not better are discarded before building
/// the changed routes.
fn explore<O, E>(
    solution: &WorkingSolution,
    pair: RoutePair,
    arc_cost: &E,
    screen: bool,
    best: &mut Option<(f64, LocalSearchMove)>,
    wrap: fn(O) -> LocalSearchMove,
) where
    O: LocalSearchOperator,
    E: ArcCostEvaluator + ?Sized,
{
    O::generate_moves(solution, pair, |op| {
        let best_delta = best
            .as_ref()
            .map_or(-IMPROVEMENT_EPSILON, |(delta, _)| *delta);

        if screen && op.transport_cost_delta(solution, arc_cost) >= best_delta {
            return;
        }

        let changes = op.route_changes(solution);
        if let Some(delta) = solution.evaluate_changes(&changes, arc_cost)
            && delta < best_delta
        {
            *best = Some((delta, wrap(op)));
        }
    });
}

type VersionPair = (usize, usize);

/// Best move found for a pair of route versions, `None` when the pair has no
/// improving move.
struct LocalSearchState(FxHashMap<VersionPair, Option<(f64, LocalSearchMove)>>);

impl LocalSearchState {
    fn new() -> Self {
        Self(FxHashMap::with_capacity_and_hasher(
            256,
            FxBuildHasher::default(),
        ))
    }

    fn key(solution: &WorkingSolution, (r1, r2): RoutePair) -> VersionPair {
        (solution.route(r1).version(), solution.route(r2).version())
    }

    fn contains(&self, solution: &WorkingSolution, pair: RoutePair) -> bool {
        self.0.contains_key(&Self::key(solution, pair))
    }

    fn get(&self, solution: &WorkingSolution, pair: RoutePair) -> Option<(f64, &LocalSearchMove)> {
        self.0
            .get(&Self::key(solution, pair))
            .and_then(|entry| entry.as_ref())
            .map(|(delta, best_move)| (*delta, best_move))
    }

    fn update(
        &mut self,
        solution: &WorkingSolution,
        pair: RoutePair,
        best: Option<(f64, LocalSearchMove)>,
    ) {
        self.0.insert(Self::key(solution, pair), best);
    }

    fn clear(&mut self) {
        self.0.clear();
    }

    fn clear_stale(&mut self, solution: &WorkingSolution) {
        let versions = solution
            .routes()
            .iter()
            .map(|route| route.version())
            .collect::<FxHashSet<_>>();

        self.0
            .retain(|&(v1, v2), _| versions.contains(&v1) && versions.contains(&v2));
    }
}
