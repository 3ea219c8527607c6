use std::{fs::File, io::BufReader, path::PathBuf};

use clap::{Args, ValueEnum};
use comfy_table::{Table, presets::UTF8_FULL};
use courier_matrix_providers::{
    osrm::OSRM_PUBLIC_URL, travel_matrix_client::TravelMatrixClient,
    travel_matrix_provider::TravelMatrixProvider,
};
use courier_optimizer::{
    json::{
        optimize::{OptimizeDefaults, optimize},
        types::{OptimizationRequest, OptimizationResponse},
    },
    solver::construction::first_solution_strategy::FirstSolutionStrategy,
};
use tracing::info;

use crate::parsers;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Provider {
    /// Road network distances from an OSRM server
    Osrm,

    /// Straight-line distances, no network needed
    Crow,
}

#[derive(Args)]
pub struct OptimizeArgs {
    /// The request file to optimize
    #[arg(short = 'i', long)]
    input: PathBuf,

    #[arg(short, long, value_parser = parsers::parse_duration, default_value = "30s")]
    timeout: jiff::SignedDuration,

    #[arg(short, long, value_enum, default_value_t = Provider::Osrm)]
    provider: Provider,

    #[arg(long, default_value = OSRM_PUBLIC_URL)]
    osrm_url: String,

    #[arg(short, long)]
    strategy: Option<FirstSolutionStrategy>,

    #[arg(long)]
    span_cost: Option<f64>,

    /// Writes the full response as JSON
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl OptimizeArgs {
    fn provider(&self) -> TravelMatrixProvider {
        match self.provider {
            Provider::Osrm => TravelMatrixProvider::Osrm {
                base_url: self.osrm_url.clone(),
            },
            Provider::Crow => TravelMatrixProvider::as_the_crow_flies(),
        }
    }

    fn defaults(&self) -> OptimizeDefaults {
        let mut defaults = OptimizeDefaults::default();
        defaults.solver.time_limit = self.timeout;

        if let Some(strategy) = self.strategy {
            defaults.solver.first_solution_strategy = strategy;
        }
        if let Some(coefficient) = self.span_cost {
            defaults.model.span_cost_coefficient = coefficient;
        }

        defaults
    }
}

pub async fn run(args: OptimizeArgs) -> anyhow::Result<()> {
    let f = File::open(&args.input)?;
    let request: OptimizationRequest = serde_json::from_reader(BufReader::new(f))?;
    info!(
        jobs = request.jobs.len(),
        vehicles = request.vehicle_count,
        "Loaded {:?}",
        args.input
    );

    let client = TravelMatrixClient::new(args.provider());
    let response = optimize(request, &client, &args.defaults()).await?;

    println!("{}", routes_table(&response));
    info!(
        "Finished: objective = {:.2}, distance = {} m, iterations = {}, elapsed = {:?}",
        response.objective,
        response.total_distance_meters,
        response.statistics.iterations,
        response.statistics.elapsed,
    );

    if let Some(output) = &args.output {
        std::fs::write(output, serde_json::to_string_pretty(&response)?)?;
        info!("Response written to {:?}", output);
    }

    Ok(())
}

fn routes_table(response: &OptimizationResponse) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Vehicle",
        "Stops",
        "Load",
        "Distance (m)",
        "Road km",
        "Late (min)",
        "Path",
    ]);

    for route in &response.routes {
        let path = route
            .path
            .iter()
            .map(|stop| format!("{} ({})", stop.original_id, stop.arrival_time))
            .collect::<Vec<_>>()
            .join(" -> ");

        table.add_row(vec![
            route.vehicle_id.to_string(),
            route.path.len().to_string(),
            route.total_load.to_string(),
            route.distance_meters.to_string(),
            format!("{:.2}", route.total_km),
            route.late_minutes.to_string(),
            path,
        ]);
    }

    table
}
