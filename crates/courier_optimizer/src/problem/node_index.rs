use fxhash::FxHashSet;

use crate::solver::error::SolverError;

use super::job::{Job, NodeIdx};

/// External job id of every node position, built once per problem. Ids are
/// unique.
#[derive(Debug, Clone)]
pub(crate) struct NodeIndexMap {
    external_ids: Vec<i64>,
}

impl NodeIndexMap {
    pub(crate) fn new(jobs: &[Job]) -> Result<Self, SolverError> {
        let mut seen = FxHashSet::with_capacity_and_hasher(jobs.len(), Default::default());

        for job in jobs {
            if !seen.insert(job.external_id()) {
                return Err(SolverError::InvalidProblem(format!(
                    "duplicate job id {}",
                    job.external_id()
                )));
            }
        }

        Ok(Self {
            external_ids: jobs.iter().map(|job| job.external_id()).collect(),
        })
    }

    pub(crate) fn external_id(&self, node: NodeIdx) -> i64 {
        self.external_ids[node.get()]
    }
}
