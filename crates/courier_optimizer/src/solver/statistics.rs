use jiff::SignedDuration;
use serde::Serialize;

use super::solver_params::Termination;

/// Why the search stopped.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// No improving move exists and the metaheuristic cannot go further.
    #[default]
    LocalOptimum,
    TimeLimit,
    Termination(Termination),
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct SearchStatistics {
    /// Local search moves applied.
    pub iterations: usize,

    /// Times a new best solution was found.
    pub improvements: usize,

    /// Local optima escaped through arc penalties.
    pub local_optima: usize,

    pub construction_cost: f64,
    pub best_cost: f64,

    #[serde(serialize_with = "serialize_duration")]
    pub elapsed: SignedDuration,
    pub termination: TerminationReason,
}

fn serialize_duration<S>(duration: &SignedDuration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_f64(duration.as_secs_f64())
}
