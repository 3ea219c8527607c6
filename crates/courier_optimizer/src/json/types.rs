use fxhash::FxHashSet;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    problem::{
        capacity::Capacity,
        job::{Job, JobBuilder},
        location::Location,
        model_params::{DEFAULT_DEPOT_DEPARTURE, ModelParams},
        time_window::{Minutes, TimeWindow},
        travel_matrices::TravelMatrices,
        vehicle_routing_problem::{VehicleRoutingProblem, VehicleRoutingProblemBuilder},
    },
    solver::{
        construction::first_solution_strategy::FirstSolutionStrategy, error::SolverError,
        statistics::SearchStatistics,
    },
};

const DEFAULT_VEHICLE_CAPACITY: u64 = 1000;
const DEFAULT_TIME_END: Minutes = 1080;

/// Largest fleet a request may ask for. The local search keeps one entry per
/// pair of routes.
pub const MAX_VEHICLE_COUNT: usize = 500;

/// Largest job list a request may carry, depot included. Matrices and arc
/// penalties are quadratic in it.
pub const MAX_JOBS: usize = 2500;

fn default_vehicle_capacity() -> u64 {
    DEFAULT_VEHICLE_CAPACITY
}

fn default_true() -> bool {
    true
}

fn default_time_start() -> Minutes {
    DEFAULT_DEPOT_DEPARTURE
}

fn default_time_end() -> Minutes {
    DEFAULT_TIME_END
}

/// A routing request. The first job is the depot.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct OptimizationRequest {
    pub vehicle_count: usize,

    #[serde(default = "default_vehicle_capacity")]
    pub vehicle_capacity: u64,

    /// When false, loads are tracked but never limited.
    #[serde(default = "default_true")]
    pub use_capacity: bool,

    /// Vehicles end their route at the last job instead of the depot.
    #[serde(default)]
    pub open_path: bool,

    pub jobs: Vec<JsonJob>,

    pub span_cost_coefficient: Option<f64>,
    pub time_limit_seconds: Option<u64>,
    pub first_solution_strategy: Option<FirstSolutionStrategy>,
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(rename = "Job")]
pub struct JsonJob {
    pub id: i64,
    pub lat: f64,
    pub lon: f64,

    #[serde(default)]
    pub demand: u32,

    /// Minutes since midnight.
    #[serde(default = "default_time_start")]
    pub time_start: Minutes,

    #[serde(default = "default_time_end")]
    pub time_end: Minutes,
}

impl OptimizationRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.jobs.is_empty() {
            return Err("jobs must contain at least the depot".to_string());
        }

        if self.jobs.len() > MAX_JOBS {
            return Err(format!("at most {MAX_JOBS} jobs are supported"));
        }

        if self.vehicle_count == 0 {
            return Err("vehicle_count must be at least 1".to_string());
        }

        if self.vehicle_count > MAX_VEHICLE_COUNT {
            return Err(format!("vehicle_count must be at most {MAX_VEHICLE_COUNT}"));
        }

        let mut ids = FxHashSet::default();
        if let Some(job) = self.jobs.iter().find(|job| !ids.insert(job.id)) {
            return Err(format!("duplicate job id {}", job.id));
        }

        if let Some(job) = self
            .jobs
            .iter()
            .find(|job| !job.lat.is_finite() || !job.lon.is_finite())
        {
            return Err(format!("job {} has invalid coordinates", job.id));
        }

        if let Some(coefficient) = self.span_cost_coefficient
            && !(coefficient.is_finite() && coefficient >= 0.0)
        {
            return Err("span_cost_coefficient must be a non-negative number".to_string());
        }

        Ok(())
    }

    /// Job coordinates in request order, as (lon, lat) points.
    pub fn points(&self) -> Vec<geo::Point> {
        self.jobs
            .iter()
            .map(|job| geo::Point::new(job.lon, job.lat))
            .collect()
    }

    pub fn capacity(&self) -> Capacity {
        if self.use_capacity {
            Capacity::Limited(self.vehicle_capacity)
        } else {
            Capacity::Unlimited
        }
    }

    pub fn build_problem(
        &self,
        matrices: TravelMatrices,
        params: ModelParams,
    ) -> Result<VehicleRoutingProblem, SolverError> {
        let jobs = self
            .jobs
            .iter()
            .enumerate()
            .map(|(index, job)| job.to_job(index == 0, &params))
            .collect::<Vec<_>>();

        let mut builder = VehicleRoutingProblemBuilder::default();
        builder
            .set_jobs(jobs)
            .set_fleet(self.vehicle_count, self.capacity(), params.depot_departure)
            .set_matrices(matrices)
            .set_open_path(self.open_path)
            .set_params(params);

        builder.build()
    }
}

impl JsonJob {
    fn to_job(&self, is_depot: bool, params: &ModelParams) -> Job {
        let mut builder = JobBuilder::new(self.id, Location::from_lat_lon(self.lat, self.lon));

        if !is_depot {
            builder.set_demand(self.demand).set_time_window_unless_default(
                TimeWindow::new(self.time_start, self.time_end),
                params.default_time_window,
            );
        }

        builder.build()
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename = "Stop")]
pub struct JsonStop {
    /// 1-based position in the route.
    pub order: usize,
    pub lat: f64,
    pub lon: f64,
    pub original_id: i64,
    pub demand: u32,

    /// "HH:MM", wrapped past midnight.
    pub arrival_time: String,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename = "Route")]
pub struct JsonRoute {
    /// 1-based.
    pub vehicle_id: usize,
    pub path: Vec<JsonStop>,

    /// Road geometry as [lat, lon] pairs.
    pub geometry: Vec<[f64; 2]>,
    pub total_km: f64,
    pub total_load: u64,
    pub distance_meters: i64,
    pub late_minutes: Minutes,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptimizationResponse {
    pub status: String,
    pub routes: Vec<JsonRoute>,
    pub objective: f64,
    pub total_distance_meters: i64,
    pub statistics: SearchStatistics,
}
