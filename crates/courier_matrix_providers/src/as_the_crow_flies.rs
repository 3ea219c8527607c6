use crate::{route_geometry::RouteGeometry, travel_matrices::TravelMatrices};

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

pub fn haversine_distance(from: geo_types::Point, to: geo_types::Point) -> f64 {
    let lat1_rad = from.y().to_radians();
    let lon1_rad = from.x().to_radians();
    let lat2_rad = to.y().to_radians();
    let lon2_rad = to.x().to_radians();

    let delta_lat = lat2_rad - lat1_rad;
    let delta_lon = lon2_rad - lon1_rad;

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Straight-line matrices, in meters and whole minutes at a constant speed.
pub fn as_the_crow_flies_matrices(points: &[geo_types::Point], speed_kmh: f64) -> TravelMatrices {
    let num_locations = points.len();
    let mut distances = vec![0; num_locations * num_locations];
    let mut durations = vec![0; num_locations * num_locations];

    let meters_per_minute = speed_kmh * 1000.0 / 60.0;

    for (i, &from) in points.iter().enumerate() {
        for (j, &to) in points.iter().enumerate() {
            if i == j {
                continue;
            }

            let meters = haversine_distance(from, to);
            distances[i * num_locations + j] = meters.trunc() as i64;
            durations[i * num_locations + j] = (meters / meters_per_minute).trunc() as i64;
        }
    }

    TravelMatrices {
        distances,
        durations,
        num_locations,
    }
}

pub fn as_the_crow_flies_geometry(points: &[geo_types::Point]) -> RouteGeometry {
    RouteGeometry {
        points: points.iter().map(|point| [point.y(), point.x()]).collect(),
        distance_meters: points
            .windows(2)
            .map(|pair| haversine_distance(pair[0], pair[1]))
            .sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_known_distance() {
        // Paris to London
        let paris = geo_types::Point::new(2.3522, 48.8566);
        let london = geo_types::Point::new(-0.1278, 51.5074);
        let distance = haversine_distance(paris, london);
        assert!((distance - 343_500.0).abs() < 1_000.0);
    }

    #[test]
    fn test_matrices_diagonal_and_speed() {
        let points = vec![
            geo_types::Point::new(0.0, 0.0),
            geo_types::Point::new(0.0, 0.1),
            geo_types::Point::new(0.1, 0.1),
        ];

        let matrices = as_the_crow_flies_matrices(&points, 60.0);

        for i in 0..3 {
            assert_eq!(matrices.distance(i, i), 0);
            assert_eq!(matrices.duration(i, i), 0);
        }

        // 0.1 degree of latitude is ~11.1 km, 1 km per minute at 60 km/h
        assert_eq!(matrices.distance(0, 1), matrices.distance(1, 0));
        assert!((11_100..11_150).contains(&matrices.distance(0, 1)));
        assert_eq!(matrices.duration(0, 1), 11);
    }

    #[test]
    fn test_geometry_is_lat_lon() {
        let geometry = as_the_crow_flies_geometry(&[
            geo_types::Point::new(13.38, 52.51),
            geo_types::Point::new(13.39, 52.52),
        ]);
        assert_eq!(geometry.points[0], [52.51, 13.38]);
        assert!(geometry.distance_meters > 0.0);
    }
}
