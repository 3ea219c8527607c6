use std::future::Future;

use tracing::{instrument, warn};

use crate::{
    as_the_crow_flies::{as_the_crow_flies_geometry, as_the_crow_flies_matrices},
    error::ProviderError,
    osrm::{OsrmClient, OsrmClientParams},
    route_geometry::RouteGeometry,
    travel_matrices::TravelMatrices,
    travel_matrix_provider::TravelMatrixProvider,
};

/// Source of the pairwise distance and duration matrices.
pub trait DistanceProvider {
    fn fetch_matrices(
        &self,
        points: &[geo_types::Point],
    ) -> impl Future<Output = Result<TravelMatrices, ProviderError>> + Send;
}

/// Source of road geometry for a finished route.
///
/// Failures never propagate: an unavailable geometry yields an empty one.
pub trait GeometryProvider {
    fn fetch_geometry(
        &self,
        points: &[geo_types::Point],
    ) -> impl Future<Output = RouteGeometry> + Send;
}

enum Backend {
    Osrm(OsrmClient),
    AsTheCrowFlies { speed_kmh: f64 },
}

pub struct TravelMatrixClient {
    backend: Backend,
}

impl TravelMatrixClient {
    pub fn new(provider: TravelMatrixProvider) -> Self {
        let backend = match provider {
            TravelMatrixProvider::Osrm { base_url } => Backend::Osrm(OsrmClient::new(
                OsrmClientParams { osrm_url: base_url },
            )),
            TravelMatrixProvider::AsTheCrowFlies { speed_kmh } => {
                Backend::AsTheCrowFlies { speed_kmh }
            }
        };

        Self { backend }
    }
}

impl DistanceProvider for TravelMatrixClient {
    #[instrument(skip_all, level = "debug")]
    async fn fetch_matrices(
        &self,
        points: &[geo_types::Point],
    ) -> Result<TravelMatrices, ProviderError> {
        match &self.backend {
            Backend::Osrm(client) => client.fetch_matrix(points).await,
            Backend::AsTheCrowFlies { speed_kmh } => {
                Ok(as_the_crow_flies_matrices(points, *speed_kmh))
            }
        }
    }
}

impl GeometryProvider for TravelMatrixClient {
    async fn fetch_geometry(&self, points: &[geo_types::Point]) -> RouteGeometry {
        if points.len() < 2 {
            return RouteGeometry::empty();
        }

        match &self.backend {
            Backend::Osrm(client) => match client.fetch_route(points).await {
                Ok(geometry) => geometry,
                Err(err) => {
                    warn!("OSRM: route geometry unavailable: {err}");
                    RouteGeometry::empty()
                }
            },
            Backend::AsTheCrowFlies { .. } => as_the_crow_flies_geometry(points),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points() -> Vec<geo_types::Point> {
        vec![
            geo_types::Point::new(13.38, 52.51),
            geo_types::Point::new(13.39, 52.52),
            geo_types::Point::new(13.40, 52.50),
        ]
    }

    #[tokio::test]
    async fn test_crow_client_matrices() {
        let client = TravelMatrixClient::new(TravelMatrixProvider::as_the_crow_flies());
        let matrices = client.fetch_matrices(&points()).await.unwrap();
        assert_eq!(matrices.num_locations, 3);
        assert!(matrices.distance(0, 1) > 0);
    }

    #[tokio::test]
    async fn test_geometry_of_single_point_is_empty() {
        let client = TravelMatrixClient::new(TravelMatrixProvider::as_the_crow_flies());
        let geometry = client.fetch_geometry(&points()[..1]).await;
        assert!(geometry.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_osrm_is_an_error() {
        let client = TravelMatrixClient::new(TravelMatrixProvider::Osrm {
            base_url: "http://127.0.0.1:9".to_string(),
        });
        let result = client.fetch_matrices(&points()).await;
        assert!(matches!(result, Err(ProviderError::Request(_))));
    }

    #[tokio::test]
    async fn test_unreachable_osrm_geometry_is_empty() {
        let client = TravelMatrixClient::new(TravelMatrixProvider::Osrm {
            base_url: "http://127.0.0.1:9".to_string(),
        });
        let geometry = client.fetch_geometry(&points()).await;
        assert!(geometry.is_empty());
    }
}
