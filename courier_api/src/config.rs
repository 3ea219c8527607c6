use anyhow::Context;
use courier_matrix_providers::{osrm::OSRM_PUBLIC_URL, travel_matrix_provider::TravelMatrixProvider};
use courier_optimizer::{
    json::optimize::OptimizeDefaults,
    solver::construction::first_solution_strategy::FirstSolutionStrategy,
};
use jiff::SignedDuration;

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8080";

/// Server settings, read from `COURIER_*` environment variables.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_address: String,
    pub osrm_url: String,
    pub time_limit: Option<SignedDuration>,
    pub span_cost_coefficient: Option<f64>,
    pub first_solution_strategy: Option<FirstSolutionStrategy>,
    pub debug: bool,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let time_limit = lookup("COURIER_TIME_LIMIT")
            .map(|value| {
                value
                    .parse::<SignedDuration>()
                    .with_context(|| format!("COURIER_TIME_LIMIT: invalid duration {value:?}"))
            })
            .transpose()?;

        let span_cost_coefficient = lookup("COURIER_SPAN_COST_COEFFICIENT")
            .map(|value| {
                value.parse::<f64>().with_context(|| {
                    format!("COURIER_SPAN_COST_COEFFICIENT: invalid number {value:?}")
                })
            })
            .transpose()?;

        let first_solution_strategy = lookup("COURIER_FIRST_SOLUTION_STRATEGY")
            .map(|value| value.parse::<FirstSolutionStrategy>())
            .transpose()
            .map_err(|err| anyhow::anyhow!("COURIER_FIRST_SOLUTION_STRATEGY: {err}"))?;

        let debug = lookup("COURIER_LOG_DEBUG")
            .is_some_and(|value| matches!(value.as_str(), "1" | "true" | "yes"));

        Ok(Self {
            bind_address: lookup("COURIER_BIND_ADDRESS")
                .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            osrm_url: lookup("COURIER_OSRM_URL").unwrap_or_else(|| OSRM_PUBLIC_URL.to_string()),
            time_limit,
            span_cost_coefficient,
            first_solution_strategy,
            debug,
        })
    }

    pub fn provider(&self) -> TravelMatrixProvider {
        TravelMatrixProvider::Osrm {
            base_url: self.osrm_url.clone(),
        }
    }

    pub fn optimize_defaults(&self) -> OptimizeDefaults {
        let mut defaults = OptimizeDefaults::default();

        if let Some(time_limit) = self.time_limit {
            defaults.solver.time_limit = time_limit;
        }
        if let Some(strategy) = self.first_solution_strategy {
            defaults.solver.first_solution_strategy = strategy;
        }
        if let Some(coefficient) = self.span_cost_coefficient {
            defaults.model.span_cost_coefficient = coefficient;
        }

        defaults
    }
}
