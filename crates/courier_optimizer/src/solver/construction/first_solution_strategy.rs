use std::{fmt::Display, str::FromStr};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Heuristic used to build the first solution before the local search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FirstSolutionStrategy {
    /// Each vehicle extends its route with the cheapest feasible arc from its
    /// last stop.
    #[default]
    PathCheapestArc,

    /// The globally cheapest feasible insertion, over all routes and
    /// positions, is applied until every job is routed.
    ParallelCheapestInsertion,
}

impl Display for FirstSolutionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PathCheapestArc => write!(f, "path_cheapest_arc"),
            Self::ParallelCheapestInsertion => write!(f, "parallel_cheapest_insertion"),
        }
    }
}

impl FromStr for FirstSolutionStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "path_cheapest_arc" => Ok(Self::PathCheapestArc),
            "parallel_cheapest_insertion" => Ok(Self::ParallelCheapestInsertion),
            _ => Err(format!("unknown first solution strategy: {s}")),
        }
    }
}
