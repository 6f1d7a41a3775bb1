// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::application::prediction_service::PredictionService;
use crate::application::reading_source::SimulatedReadingSource;
use crate::application::simulation_feed::SimulationFeed;
use crate::application::telemetry_store::TelemetryStore;
use crate::application::turbine_service::TurbineService;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::http_prediction_repository::HttpPredictionRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Load configuration
    let config = load_app_config()?;
    let addr = config.bind_addr()?;

    // Shared state (application layer)
    let store = TelemetryStore::new(config.initial_turbine()).shared();
    let turbine_service =
        TurbineService::new(store.clone(), config.turbines(), config.initial_turbine());
    let prediction_service = PredictionService::new();

    if config.feed.enabled {
        let feed = SimulationFeed::new(
            store.clone(),
            Box::new(SimulatedReadingSource::new()),
            config.feed.alert_probability,
        );
        tokio::spawn(feed.run(config.feed_interval()));
    } else {
        tracing::info!("Simulation feed disabled; waiting for posted readings");
    }

    // Create repository (infrastructure layer)
    if config.backend.enabled {
        let settings = config.poll_settings();
        let repository = Arc::new(HttpPredictionRepository::new(
            config.backend.base_url.clone(),
            settings.timeout,
        )?);
        prediction_service.spawn_pollers(repository, turbine_service.subscribe(), settings);
        tracing::info!("Polling prediction backend at {}", config.backend.base_url);
    } else {
        tracing::info!("Prediction backend disabled; serving fallback data");
    }

    // Create application state
    let state = Arc::new(AppState {
        store,
        turbine_service,
        prediction_service,
    });

    // Build router (presentation layer)
    let router = build_router(state);

    // Start server
    tracing::info!("Starting turbine-telemetry service on {}", addr);
    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
