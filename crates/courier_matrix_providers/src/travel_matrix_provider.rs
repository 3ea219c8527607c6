use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::osrm::OSRM_PUBLIC_URL;

pub const DEFAULT_CROW_SPEED_KMH: f64 = 50.0;

#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TravelMatrixProvider {
    /// http://project-osrm.org/docs/v5.24.0/api/#table-service
    Osrm { base_url: String },

    AsTheCrowFlies { speed_kmh: f64 },
}

impl Default for TravelMatrixProvider {
    fn default() -> Self {
        TravelMatrixProvider::Osrm {
            base_url: OSRM_PUBLIC_URL.to_string(),
        }
    }
}

impl TravelMatrixProvider {
    pub fn as_the_crow_flies() -> Self {
        TravelMatrixProvider::AsTheCrowFlies {
            speed_kmh: DEFAULT_CROW_SPEED_KMH,
        }
    }
}
