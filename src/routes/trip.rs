// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Trip navigation routes.
//!
//! One active trip per driver. Mounted behind `require_auth` + `require_active`.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Coordinates, TripView};
use crate::services::{ActiveTrip, LocationPermission};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/trip", get(get_trip).post(start_trip).delete(close_trip))
        .route("/api/trip/position", post(push_position))
        .route("/api/trip/addresses", post(set_addresses))
        .route("/api/trip/route", post(fetch_route))
        .route("/api/trip/end", post(end_trip))
}

fn active_trip(state: &AppState, uid: &str) -> Result<Arc<ActiveTrip>> {
    state
        .trips
        .get(uid)
        .ok_or_else(|| AppError::NotFound("No active trip".to_string()))
}

async fn view(trip: &ActiveTrip) -> TripView {
    TripView::from_state(&trip.session.snapshot().await, trip.session.gps_enabled())
}

#[derive(Deserialize)]
struct StartTripRequest {
    /// Answer to the foreground location prompt
    permission: LocationPermission,
}

/// Mount the trip screen, replacing any previous trip.
async fn start_trip(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<StartTripRequest>,
) -> (StatusCode, Json<TripView>) {
    let trip = state.trips.start(&user.uid, request.permission);
    tracing::info!(uid = %user.uid, permission = ?request.permission, "Trip started");
    (StatusCode::CREATED, Json(view(&trip).await))
}

async fn get_trip(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<TripView>> {
    let trip = active_trip(&state, &user.uid)?;
    Ok(Json(view(&trip).await))
}

/// Unmount the trip screen; stops position tracking.
async fn close_trip(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<StatusCode> {
    if !state.trips.remove(&user.uid) {
        return Err(AppError::NotFound("No active trip".to_string()));
    }
    tracing::info!(uid = %user.uid, "Trip closed");
    Ok(StatusCode::NO_CONTENT)
}

/// Accept a GPS fix. Applied asynchronously by the tracking task.
async fn push_position(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(fix): Json<Coordinates>,
) -> Result<StatusCode> {
    if !fix.is_valid() {
        return Err(AppError::BadRequest(format!(
            "Coordinates out of range: {}, {}",
            fix.lat, fix.lng
        )));
    }

    let trip = active_trip(&state, &user.uid)?;
    trip.push_position(fix).await?;
    Ok(StatusCode::ACCEPTED)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddressesRequest {
    /// Omit to start from the live GPS position
    #[serde(default)]
    start_address: Option<String>,
    destination_address: String,
}

async fn set_addresses(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<AddressesRequest>,
) -> Result<Json<TripView>> {
    let trip = active_trip(&state, &user.uid)?;
    let trip_state = trip
        .session
        .set_addresses(
            request.start_address.as_deref(),
            &request.destination_address,
        )
        .await?;
    Ok(Json(TripView::from_state(
        &trip_state,
        trip.session.gps_enabled(),
    )))
}

async fn fetch_route(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<TripView>> {
    let trip = active_trip(&state, &user.uid)?;
    let trip_state = trip.session.fetch_route().await?;
    Ok(Json(TripView::from_state(
        &trip_state,
        trip.session.gps_enabled(),
    )))
}

/// Clear the route and addresses; the trip stays mounted.
async fn end_trip(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<TripView>> {
    let trip = active_trip(&state, &user.uid)?;
    let trip_state = trip.session.end_trip().await;
    tracing::info!(uid = %user.uid, "Trip ended");
    Ok(Json(TripView::from_state(
        &trip_state,
        trip.session.gps_enabled(),
    )))
}
