use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// Distance reported for a pair the provider could not route.
pub const UNREACHABLE_DISTANCE_METERS: i64 = 1_000_000;

/// Duration reported for a pair the provider could not route.
pub const UNREACHABLE_DURATION_MINUTES: i64 = 999;

/// TravelMatrices holds the distance (meters) and duration (minutes) matrices
/// returned by a distance provider. Stored as flat vectors, row-major:
/// `index = from * num_locations + to`.
///
/// Unreachable pairs carry the sentinel values above, never a missing marker.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TravelMatrices {
    pub distances: Vec<i64>,
    pub durations: Vec<i64>,
    pub num_locations: usize,
}

impl TravelMatrices {
    pub fn from_rows(
        distances: Vec<Vec<i64>>,
        durations: Vec<Vec<i64>>,
    ) -> Result<Self, ProviderError> {
        let num_locations = distances.len();

        if durations.len() != num_locations {
            return Err(ProviderError::InvalidResponse(format!(
                "distance matrix has {} rows but duration matrix has {}",
                num_locations,
                durations.len()
            )));
        }

        if let Some(row) = distances
            .iter()
            .chain(durations.iter())
            .find(|row| row.len() != num_locations)
        {
            return Err(ProviderError::InvalidResponse(format!(
                "expected square matrices of size {num_locations}, found a row of length {}",
                row.len()
            )));
        }

        Ok(TravelMatrices {
            distances: distances.into_iter().flatten().collect(),
            durations: durations.into_iter().flatten().collect(),
            num_locations,
        })
    }

    #[inline]
    pub fn distance(&self, from: usize, to: usize) -> i64 {
        self.distances[from * self.num_locations + to]
    }

    #[inline]
    pub fn duration(&self, from: usize, to: usize) -> i64 {
        self.durations[from * self.num_locations + to]
    }
}

/// Converts a provider distance in meters, truncating like an integer cast.
pub fn distance_or_sentinel(meters: Option<f64>) -> i64 {
    meters
        .map(|meters| meters.trunc() as i64)
        .unwrap_or(UNREACHABLE_DISTANCE_METERS)
}

/// Converts a provider duration in seconds into whole minutes.
pub fn duration_or_sentinel(seconds: Option<f64>) -> i64 {
    seconds
        .map(|seconds| (seconds / 60.0).trunc() as i64)
        .unwrap_or(UNREACHABLE_DURATION_MINUTES)
}
