use courier_matrix_providers::travel_matrices::TravelMatrices as ProviderMatrices;

use crate::solver::error::SolverError;

use super::{job::NodeIdx, location::Location, time_window::Minutes};

/// Meters.
pub type Distance = i64;

/// Square distance (meters) and duration (minutes) matrices over the problem
/// nodes, depot first. Unreachable pairs hold large sentinel values and are
/// treated as ordinary, very expensive arcs.
#[derive(Debug, Clone)]
pub struct TravelMatrices {
    distances: Vec<Distance>,
    durations: Vec<Minutes>,
    num_nodes: usize,
    is_symmetric: bool,
}

impl TravelMatrices {
    pub fn new(
        distances: Vec<Distance>,
        durations: Vec<Minutes>,
        num_nodes: usize,
    ) -> Result<Self, SolverError> {
        let expected = num_nodes * num_nodes;
        if distances.len() != expected || durations.len() != expected {
            return Err(SolverError::InvalidProblem(format!(
                "expected {num_nodes}x{num_nodes} matrices, got {} distances and {} durations",
                distances.len(),
                durations.len()
            )));
        }

        Ok(Self::from_square(distances, durations, num_nodes))
    }

    fn from_square(distances: Vec<Distance>, durations: Vec<Minutes>, num_nodes: usize) -> Self {
        let is_symmetric = (0..num_nodes).all(|i| {
            (i + 1..num_nodes).all(|j| {
                distances[i * num_nodes + j] == distances[j * num_nodes + i]
                    && durations[i * num_nodes + j] == durations[j * num_nodes + i]
            })
        });

        Self {
            distances,
            durations,
            num_nodes,
            is_symmetric,
        }
    }

    /// Integer matrices from planar coordinates, one distance unit per minute.
    pub fn from_euclidean(locations: &[Location]) -> Self {
        let num_nodes = locations.len();
        let mut distances = Vec::with_capacity(num_nodes * num_nodes);

        for from in locations {
            for to in locations {
                distances.push(from.euclidean_distance(to).round() as Distance);
            }
        }

        let durations = distances.clone();
        Self::from_square(distances, durations, num_nodes)
    }

    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// A node is always at distance 0 from itself, whatever the provider said.
    #[inline]
    pub fn distance(&self, from: NodeIdx, to: NodeIdx) -> Distance {
        if from == to {
            0
        } else {
            self.distances[from.get() * self.num_nodes + to.get()]
        }
    }

    #[inline]
    pub fn duration(&self, from: NodeIdx, to: NodeIdx) -> Minutes {
        if from == to {
            0
        } else {
            self.durations[from.get() * self.num_nodes + to.get()]
        }
    }

    pub fn is_symmetric(&self) -> bool {
        self.is_symmetric
    }
}

impl TryFrom<ProviderMatrices> for TravelMatrices {
    type Error = SolverError;

    fn try_from(matrices: ProviderMatrices) -> Result<Self, Self::Error> {
        TravelMatrices::new(
            matrices.distances,
            matrices.durations,
            matrices.num_locations,
        )
    }
}
