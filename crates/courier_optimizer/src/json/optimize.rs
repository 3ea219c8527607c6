use std::sync::Arc;

use courier_matrix_providers::{
    error::ProviderError,
    travel_matrix_client::{DistanceProvider, GeometryProvider},
};
use jiff::SignedDuration;
use thiserror::Error;
use tracing::{info, instrument};

use crate::{
    problem::{
        model_params::ModelParams, travel_matrices::TravelMatrices,
        vehicle_routing_problem::VehicleRoutingProblem,
    },
    solver::{
        error::SolverError,
        search::Search,
        solution_extractor::{SolvedRoute, extract_routes},
        solver_params::SolverParams,
    },
};

use super::types::{JsonRoute, JsonStop, OptimizationRequest, OptimizationResponse};

/// Parameters applied to every request unless the request overrides them.
#[derive(Clone, Debug, Default)]
pub struct OptimizeDefaults {
    pub model: ModelParams,
    pub solver: SolverParams,
}

#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Distance provider unavailable: {0}")]
    Upstream(#[from] ProviderError),

    #[error("No route found")]
    NoRouteFound,

    #[error("Search task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<SolverError> for OptimizeError {
    fn from(error: SolverError) -> Self {
        match error {
            SolverError::NoSolutionFound => OptimizeError::NoRouteFound,
            SolverError::InvalidProblem(message) => OptimizeError::InvalidRequest(message),
        }
    }
}

/// Applies the request overrides to the server defaults. A requested time
/// limit never exceeds the configured one.
fn solver_params(request: &OptimizationRequest, defaults: &SolverParams) -> SolverParams {
    let mut solver = defaults.clone();
    if let Some(seconds) = request.time_limit_seconds {
        let requested = SignedDuration::from_secs(i64::try_from(seconds).unwrap_or(i64::MAX));
        solver.time_limit = requested.min(defaults.time_limit);
    }
    if let Some(strategy) = request.first_solution_strategy {
        solver.first_solution_strategy = strategy;
    }
    solver
}

/// Runs a request end to end: matrices, search, extraction and geometry.
#[instrument(skip_all, level = "debug")]
pub async fn optimize<P>(
    request: OptimizationRequest,
    provider: &P,
    defaults: &OptimizeDefaults,
) -> Result<OptimizationResponse, OptimizeError>
where
    P: DistanceProvider + GeometryProvider,
{
    request.validate().map_err(OptimizeError::InvalidRequest)?;

    let points = request.points();
    let matrices = TravelMatrices::try_from(provider.fetch_matrices(&points).await?)?;

    let mut model = defaults.model.clone();
    if let Some(coefficient) = request.span_cost_coefficient {
        model.span_cost_coefficient = coefficient;
    }

    let solver = solver_params(&request, &defaults.solver);
    let problem = Arc::new(request.build_problem(matrices, model)?);

    info!(
        jobs = problem.num_customers(),
        vehicles = problem.vehicles().len(),
        open_path = problem.is_open_path(),
        "Optimizing"
    );

    let search_problem = Arc::clone(&problem);
    let result =
        tokio::task::spawn_blocking(move || Search::new(search_problem, solver).solve()).await??;

    let solved_routes = extract_routes(&result.solution);

    let mut routes = Vec::with_capacity(solved_routes.len());
    for route in &solved_routes {
        routes.push(json_route(&problem, route, provider).await);
    }

    Ok(OptimizationResponse {
        status: "success".to_string(),
        total_distance_meters: solved_routes.iter().map(|route| route.distance).sum(),
        objective: result.solution.objective(),
        routes,
        statistics: result.statistics,
    })
}

async fn json_route<P>(
    problem: &VehicleRoutingProblem,
    route: &SolvedRoute,
    provider: &P,
) -> JsonRoute
where
    P: GeometryProvider,
{
    let vehicle_id = route.vehicle_id.get() + 1;

    if route.is_empty() {
        return JsonRoute {
            vehicle_id,
            path: vec![],
            geometry: vec![],
            total_km: 0.0,
            total_load: 0,
            distance_meters: 0,
            late_minutes: 0,
        };
    }

    let points = route
        .stops
        .iter()
        .map(|stop| geo::Point::new(stop.lon, stop.lat))
        .collect::<Vec<_>>();
    let geometry = provider.fetch_geometry(&points).await;

    let path = route
        .stops
        .iter()
        .enumerate()
        .map(|(index, stop)| JsonStop {
            order: index + 1,
            lat: stop.lat,
            lon: stop.lon,
            original_id: problem.external_id(stop.node),
            demand: stop.demand,
            arrival_time: stop.arrival_time(),
        })
        .collect();

    JsonRoute {
        vehicle_id,
        path,
        total_km: round_km(geometry.distance_meters),
        geometry: geometry.points,
        total_load: route.total_load,
        distance_meters: route.distance,
        late_minutes: route.late_minutes,
    }
}

/// Meters to kilometers, rounded to two decimals.
fn round_km(meters: f64) -> f64 {
    (meters / 1000.0 * 100.0).round() / 100.0
}
