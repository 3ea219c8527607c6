use jiff::SignedDuration;
use serde::{Deserialize, Serialize};

use super::construction::first_solution_strategy::FirstSolutionStrategy;

pub const DEFAULT_TIME_LIMIT: SignedDuration = SignedDuration::from_secs(30);
pub const DEFAULT_GLS_LAMBDA_COEFFICIENT: f64 = 0.1;

#[derive(Clone, Debug)]
pub struct SolverParams {
    pub first_solution_strategy: FirstSolutionStrategy,
    pub metaheuristic: Metaheuristic,

    /// Wall-clock budget of the whole search, construction included. Always
    /// applies, on top of `terminations`.
    pub time_limit: SignedDuration,
    pub terminations: Vec<Termination>,

    /// Scales the penalty weight to the average arc cost of the first local
    /// optimum.
    pub gls_lambda_coefficient: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metaheuristic {
    #[default]
    GuidedLocalSearch,

    /// Plain descent, stops at the first local optimum.
    GreedyDescent,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Termination {
    Iterations(usize),
    IterationsWithoutImprovement(usize),
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            first_solution_strategy: FirstSolutionStrategy::default(),
            metaheuristic: Metaheuristic::default(),
            time_limit: DEFAULT_TIME_LIMIT,
            terminations: vec![],
            gls_lambda_coefficient: DEFAULT_GLS_LAMBDA_COEFFICIENT,
        }
    }
}
