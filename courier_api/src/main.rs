mod config;
mod error;
mod optimize;
mod state;

use std::sync::Arc;

use axum::http::Method;
use axum::routing::{get, post};
use axum::{Router, serve};
use courier_matrix_providers::travel_matrix_client::TravelMatrixClient;
use courier_optimizer::json::schema::generate_json_schema;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::{Level, info};

use mimalloc::MiMalloc;

use crate::config::ApiConfig;
use crate::optimize::{health_handler, optimize_handler};
use crate::state::AppState;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const SCHEMA_PATH: &str = "schemas/optimization_request.json";

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::from_filename("./.env.local").ok();

    let config = ApiConfig::from_env()?;
    tracing_subscriber::fmt()
        .with_max_level(if config.debug {
            Level::DEBUG
        } else {
            Level::INFO
        })
        .init();

    if std::env::args().any(|a| a == "--generate-schema") {
        std::fs::create_dir_all("schemas")?;
        std::fs::write(SCHEMA_PATH, generate_json_schema()?)?;
        info!("Request schema has been written to {SCHEMA_PATH}");
        return Ok(());
    }

    let state = Arc::new(AppState {
        matrix_client: TravelMatrixClient::new(config.provider()),
        defaults: config.optimize_defaults(),
    });

    let cors_layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_origin(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/optimize", post(optimize_handler))
        .route("/health", get(health_handler))
        .layer(ServiceBuilder::new().layer(cors_layer))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!("Listening on {}", config.bind_address);

    serve(listener, app).await?;

    Ok(())
}
