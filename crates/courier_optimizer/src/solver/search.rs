use std::sync::Arc;

use jiff::Timestamp;
use tracing::{debug, info, instrument, warn};

use crate::{
    problem::vehicle_routing_problem::VehicleRoutingProblem,
    solver::{
        construction::construct_solution::construct_solution,
        error::SolverError,
        guided_local_search::GuidedLocalSearch,
        ls::local_search::LocalSearch,
        score,
        solution::working_solution::WorkingSolution,
        solver_params::{Metaheuristic, SolverParams, Termination},
        statistics::{SearchStatistics, TerminationReason},
    },
    timer_debug,
};

/// Consecutive penalization rounds without a single applied move after which
/// the guided local search gives up before the deadline.
const MAX_STALLED_PENALTY_ROUNDS: usize = 50;

const IMPROVEMENT_EPSILON: f64 = 1e-6;

pub struct SearchResult {
    pub solution: WorkingSolution,
    pub statistics: SearchStatistics,
}

/// Construction followed by local search under the configured metaheuristic.
pub struct Search {
    problem: Arc<VehicleRoutingProblem>,
    params: SolverParams,
}

struct SearchState {
    started: Timestamp,
    iterations_without_improvement: usize,
    stalled_penalty_rounds: usize,
}

impl Search {
    pub fn new(problem: Arc<VehicleRoutingProblem>, params: SolverParams) -> Self {
        Self { problem, params }
    }

    /// Blocks until a termination criterion is met and returns the best
    /// solution found.
    #[instrument(skip_all, level = "debug")]
    pub fn solve(&self) -> Result<SearchResult, SolverError> {
        let mut state = SearchState {
            started: Timestamp::now(),
            iterations_without_improvement: 0,
            stalled_penalty_rounds: 0,
        };

        let mut current = timer_debug!(
            "Construction",
            construct_solution(
                Arc::clone(&self.problem),
                self.params.first_solution_strategy
            )
        )?;

        let mut statistics = SearchStatistics {
            construction_cost: current.objective(),
            best_cost: current.objective(),
            ..SearchStatistics::default()
        };
        info!(
            cost = statistics.construction_cost,
            strategy = %self.params.first_solution_strategy,
            "Search: construction finished"
        );

        let mut best = current.clone();
        let mut local_search = LocalSearch::new(&current);
        let mut gls = GuidedLocalSearch::new(&self.problem, self.params.gls_lambda_coefficient);

        let termination = loop {
            if let Some(reason) = self.check_termination(&state, &statistics) {
                break reason;
            }

            let applied = {
                let arc_cost = gls.arc_cost(&self.problem);
                local_search.run_iteration(&mut current, &arc_cost)
            };

            if applied.is_some() {
                statistics.iterations += 1;
                state.stalled_penalty_rounds = 0;

                let cost = current.objective();
                if cost < statistics.best_cost - IMPROVEMENT_EPSILON {
                    best = current.clone();
                    statistics.best_cost = cost;
                    statistics.improvements += 1;
                    state.iterations_without_improvement = 0;

                    debug!(
                        cost,
                        elapsed = ?Timestamp::now().duration_since(state.started),
                        "Search: new best solution"
                    );
                } else {
                    state.iterations_without_improvement += 1;
                }

                continue;
            }

            if self.params.metaheuristic == Metaheuristic::GreedyDescent
                || self.is_trivial()
                || state.stalled_penalty_rounds >= MAX_STALLED_PENALTY_ROUNDS
                || !gls.penalize(&current)
            {
                break TerminationReason::LocalOptimum;
            }

            statistics.local_optima += 1;
            state.stalled_penalty_rounds += 1;
            local_search.reset();
        };

        statistics.elapsed = Timestamp::now().duration_since(state.started);
        statistics.termination = termination;

        info!(
            construction_cost = statistics.construction_cost,
            best_cost = statistics.best_cost,
            iterations = statistics.iterations,
            local_optima = statistics.local_optima,
            elapsed = ?statistics.elapsed,
            termination = ?statistics.termination,
            "Search: finished"
        );

        if !best.is_feasible() {
            let analysis = best.score_analysis();
            warn!(
                capacity = analysis.score(score::CAPACITY).hard_score,
                time_horizon = analysis.score(score::TIME_HORIZON).hard_score,
                unassigned_jobs = analysis.score(score::UNASSIGNED_JOBS).hard_score,
                "Search: best solution violates hard constraints"
            );
            return Err(SolverError::NoSolutionFound);
        }

        Ok(SearchResult {
            solution: best,
            statistics,
        })
    }

    /// A single vehicle with fewer than two jobs has a single route.
    fn is_trivial(&self) -> bool {
        self.problem.vehicles().len() == 1 && self.problem.num_customers() < 2
    }

    fn check_termination(
        &self,
        state: &SearchState,
        statistics: &SearchStatistics,
    ) -> Option<TerminationReason> {
        if Timestamp::now().duration_since(state.started) >= self.params.time_limit {
            return Some(TerminationReason::TimeLimit);
        }

        self.params
            .terminations
            .iter()
            .find(|termination| match **termination {
                Termination::Iterations(max_iterations) => statistics.iterations >= max_iterations,
                Termination::IterationsWithoutImprovement(max_iterations) => {
                    state.iterations_without_improvement >= max_iterations
                }
            })
            .map(|termination| TerminationReason::Termination(termination.clone()))
    }
}
