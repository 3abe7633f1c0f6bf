// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! GreenRoute API Server
//!
//! Fleet backend for the GreenRoute driver app: sign-in with role
//! resolution, route guarding, trip navigation and fleet administration.

use greenroute::{
    config::{Config, StoreBackend},
    db::{FirestoreDb, FleetStore, MemoryStore},
    services::{FirebaseAuthClient, OpenRouteServiceClient},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        landing_policy = ?config.landing_policy,
        "Starting GreenRoute API"
    );

    // Initialize fleet store
    let store: Arc<dyn FleetStore> = match config.store_backend {
        StoreBackend::Firestore => Arc::new(FirestoreDb::new(&config.gcp_project_id).await?),
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory fleet store; data is lost on exit");
            Arc::new(MemoryStore::new())
        }
    };

    // External providers
    let identity = Arc::new(FirebaseAuthClient::new(config.firebase_api_key.clone()));
    let routing = Arc::new(OpenRouteServiceClient::new(
        config.ors_base_url.clone(),
        config.ors_api_key.clone(),
    ));
    tracing::info!(base_url = %config.ors_base_url, "Routing client initialized");

    // Build shared state
    let state = Arc::new(AppState::new(config.clone(), store, identity, routing));

    // Build router
    let app = greenroute::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("greenroute=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
