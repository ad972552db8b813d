// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! TourGuide API Server
//!
//! Tracks user positions in the background and rewards visits to nearby
//! attractions.

use std::sync::Arc;
use tour_guide::{
    config::Config,
    db::UserStore,
    services::{GpsCatalog, RewardCentral, RewardService, TourGuideService},
    routes::create_router,
    tracker::Tracker,
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting TourGuide API");

    // Load attraction catalog
    tracing::info!(path = %config.attractions_path, "Loading attractions");
    let catalog = GpsCatalog::load_from_file(&config.attractions_path)
        .expect("Failed to load attractions")
        .with_simulated_latency(config.simulated_provider_latency);
    let oracle = RewardCentral::new().with_simulated_latency(config.simulated_provider_latency);

    let rewards = Arc::new(RewardService::new(
        Arc::new(catalog),
        Arc::new(oracle),
        config.reward_settings(),
    ));

    // Seed users
    let users = UserStore::new();
    if config.test_mode {
        tracing::info!(count = config.internal_user_count, "Test mode: initializing users");
        users.initialize_internal_users(config.internal_user_count);
    }

    let tour_guide = TourGuideService::new(users, rewards);

    // Start background tracking
    let tracker = Tracker::new(tour_guide.clone(), config.tracking_interval);
    tracker.start();

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        tour_guide,
    });

    // Build router
    let app = create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracker.stop_tracking().await;
    tracing::info!("TourGuide shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.ok();
    tracing::info!("Shutdown signal received");
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tour_guide=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
