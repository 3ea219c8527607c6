use serde::Deserialize;
use tracing::debug;

use crate::{
    error::ProviderError,
    route_geometry::RouteGeometry,
    travel_matrices::{TravelMatrices, distance_or_sentinel, duration_or_sentinel},
};

pub const OSRM_PUBLIC_URL: &str = "http://router.project-osrm.org";
pub const OSRM_TABLE_API_PATH: &str = "/table/v1/driving/";
pub const OSRM_ROUTE_API_PATH: &str = "/route/v1/driving/";

#[derive(Deserialize)]
struct OsrmTableResponse {
    code: String,
    message: Option<String>,

    /// Distances in meters, `null` when no route was found
    distances: Option<Vec<Vec<Option<f64>>>>,

    /// Travel times in seconds, `null` when no route was found
    durations: Option<Vec<Vec<Option<f64>>>>,
}

#[derive(Deserialize)]
struct OsrmRouteResponse {
    code: String,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Deserialize)]
struct OsrmRoute {
    distance: f64,
    geometry: OsrmLineString,
}

#[derive(Deserialize)]
struct OsrmLineString {
    /// `[lon, lat]` pairs
    coordinates: Vec<[f64; 2]>,
}

pub struct OsrmClientParams {
    pub osrm_url: String,
}

pub struct OsrmClient {
    params: OsrmClientParams,
    client: reqwest::Client,
}

fn coordinates_path(points: &[geo_types::Point]) -> String {
    points
        .iter()
        .map(|point| format!("{},{}", point.x(), point.y()))
        .collect::<Vec<_>>()
        .join(";")
}

impl OsrmClient {
    pub fn new(params: OsrmClientParams) -> Self {
        Self::with_client(params, reqwest::Client::new())
    }

    pub fn with_client(params: OsrmClientParams, client: reqwest::Client) -> Self {
        Self { params, client }
    }

    fn url(&self, api_path: &str, points: &[geo_types::Point]) -> String {
        let mut url = self.params.osrm_url.trim_end_matches('/').to_string();
        url.push_str(api_path);
        url.push_str(&coordinates_path(points));
        url
    }

    pub async fn fetch_matrix(
        &self,
        points: &[geo_types::Point],
    ) -> Result<TravelMatrices, ProviderError> {
        let url = self.url(OSRM_TABLE_API_PATH, points);

        debug!("OSRM: requesting table for {} points", points.len());

        let response = self
            .client
            .get(url)
            .query(&[("annotations", "distance,duration")])
            .send()
            .await?;

        let body = Self::response_text(response).await?;
        parse_table_response(&body, points.len())
    }

    pub async fn fetch_route(
        &self,
        points: &[geo_types::Point],
    ) -> Result<RouteGeometry, ProviderError> {
        let url = self.url(OSRM_ROUTE_API_PATH, points);

        let response = self
            .client
            .get(url)
            .query(&[("overview", "full"), ("geometries", "geojson")])
            .send()
            .await?;

        let body = Self::response_text(response).await?;
        parse_route_response(&body)
    }

    async fn response_text(response: reqwest::Response) -> Result<String, ProviderError> {
        if response.status().is_success() {
            Ok(response.text().await?)
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            Err(ProviderError::Api { status, message })
        }
    }
}

fn ensure_ok(code: &str, message: Option<String>) -> Result<(), ProviderError> {
    if code == "Ok" {
        Ok(())
    } else {
        Err(ProviderError::InvalidResponse(format!(
            "{code}: {}",
            message.unwrap_or_default()
        )))
    }
}

pub(crate) fn parse_table_response(
    body: &str,
    num_points: usize,
) -> Result<TravelMatrices, ProviderError> {
    let response: OsrmTableResponse = serde_json::from_str(body)?;
    ensure_ok(&response.code, response.message)?;

    let (Some(distances), Some(durations)) = (response.distances, response.durations) else {
        return Err(ProviderError::InvalidResponse(
            "table response is missing distances or durations".to_string(),
        ));
    };

    let distances = distances
        .into_iter()
        .map(|row| row.into_iter().map(distance_or_sentinel).collect())
        .collect();
    let durations = durations
        .into_iter()
        .map(|row| row.into_iter().map(duration_or_sentinel).collect())
        .collect();

    let matrices = TravelMatrices::from_rows(distances, durations)?;

    if matrices.num_locations != num_points {
        return Err(ProviderError::InvalidResponse(format!(
            "requested {num_points} points, received matrices of size {}",
            matrices.num_locations
        )));
    }

    Ok(matrices)
}

pub(crate) fn parse_route_response(body: &str) -> Result<RouteGeometry, ProviderError> {
    let response: OsrmRouteResponse = serde_json::from_str(body)?;
    ensure_ok(&response.code, response.message)?;

    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::InvalidResponse("no route returned".to_string()))?;

    Ok(RouteGeometry {
        points: route
            .geometry
            .coordinates
            .into_iter()
            .map(|[lon, lat]| [lat, lon])
            .collect(),
        distance_meters: route.distance,
    })
}

#[cfg(test)]
mod tests {
    use crate::travel_matrices::{UNREACHABLE_DISTANCE_METERS, UNREACHABLE_DURATION_MINUTES};

    use super::*;

    #[test]
    fn test_parse_table_with_unreachable_pairs() {
        let body = r#"{
            "code": "Ok",
            "distances": [[0, 1520.7, null], [1498.2, 0, 800], [null, 790.1, 0]],
            "durations": [[0, 179.9, null], [170.0, 0, 61.0], [null, 59.0, 0]]
        }"#;

        let matrices = parse_table_response(body, 3).unwrap();

        assert_eq!(matrices.distance(0, 1), 1520);
        assert_eq!(matrices.distance(0, 2), UNREACHABLE_DISTANCE_METERS);
        assert_eq!(matrices.duration(0, 1), 2);
        assert_eq!(matrices.duration(1, 2), 1);
        assert_eq!(matrices.duration(2, 1), 0);
        assert_eq!(matrices.duration(2, 0), UNREACHABLE_DURATION_MINUTES);
    }

    #[test]
    fn test_parse_table_size_mismatch() {
        let body = r#"{"code": "Ok", "distances": [[0]], "durations": [[0]]}"#;
        let result = parse_table_response(body, 2);
        assert!(matches!(result, Err(ProviderError::InvalidResponse(_))));
    }

    #[test]
    fn test_parse_table_error_code() {
        let body = r#"{"code": "InvalidQuery", "message": "Query string malformed"}"#;
        let result = parse_table_response(body, 2);
        assert!(matches!(result, Err(ProviderError::InvalidResponse(_))));
    }

    #[test]
    fn test_parse_route_swaps_coordinates() {
        let body = r#"{
            "code": "Ok",
            "routes": [{
                "distance": 2345.6,
                "duration": 300.0,
                "geometry": {"type": "LineString", "coordinates": [[13.38, 52.51], [13.39, 52.52]]}
            }]
        }"#;

        let geometry = parse_route_response(body).unwrap();
        assert_eq!(geometry.points, vec![[52.51, 13.38], [52.52, 13.39]]);
        assert_eq!(geometry.distance_meters, 2345.6);
    }

    #[test]
    fn test_coordinates_path_is_lon_lat() {
        let path = coordinates_path(&[
            geo_types::Point::new(13.38, 52.51),
            geo_types::Point::new(13.39, 52.52),
        ]);
        assert_eq!(path, "13.38,52.51;13.39,52.52");
    }
}
