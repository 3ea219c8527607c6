use serde::{Deserialize, Serialize};

/// Road geometry of a single route, as returned by a routing service.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct RouteGeometry {
    /// `[lat, lon]` pairs
    pub points: Vec<[f64; 2]>,
    pub distance_meters: f64,
}

impl RouteGeometry {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
