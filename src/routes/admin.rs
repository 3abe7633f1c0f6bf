// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fleet administration routes (users and vehicles).
//!
//! Mounted behind `require_auth` + `require_admin`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{FuelType, Role, Status, UserProfile, Vehicle, VehicleStatus};
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/admin/users", get(list_users))
        .route("/api/admin/users/{uid}", put(update_user))
        .route("/api/admin/vehicles", get(list_vehicles).post(create_vehicle))
        .route("/api/admin/vehicles/{id}", put(update_vehicle))
}

// ─── Users ───────────────────────────────────────────────────

async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<Vec<UserProfile>>> {
    Ok(Json(state.store.list_profiles().await?))
}

#[derive(Deserialize)]
struct UserAccessUpdate {
    role: Role,
    status: Status,
}

/// Change a user's role and approval status.
async fn update_user(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<AuthUser>,
    Path(uid): Path<String>,
    Json(update): Json<UserAccessUpdate>,
) -> Result<Json<UserProfile>> {
    if update.role == Role::Unassigned {
        return Err(AppError::BadRequest(
            "Role must be 'admin' or 'driver'".to_string(),
        ));
    }
    if update.status == Status::Unassigned {
        return Err(AppError::BadRequest(
            "Status must be 'pending' or 'active'".to_string(),
        ));
    }

    let profile = state
        .store
        .update_profile_access(&uid, update.role, update.status)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {}", uid)))?;

    tracing::info!(
        admin = %admin.uid,
        uid = %uid,
        role = %profile.role,
        status = %profile.status,
        "User access updated"
    );

    // Signed-in users see the change without signing in again
    state.sessions.refresh(&uid).await;

    Ok(Json(profile))
}

// ─── Vehicles ────────────────────────────────────────────────

async fn list_vehicles(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Vehicle>>> {
    Ok(Json(state.store.list_vehicles().await?))
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct NewVehicle {
    #[validate(length(min = 1, max = 100, message = "Vehicle name is required"))]
    name: String,
    #[validate(length(min = 1, max = 20, message = "License plate is required"))]
    license: String,
    fuel: FuelType,
    #[validate(range(min = 0.0, message = "CO2 baseline must not be negative"))]
    co2_baseline: f64,
}

/// Register a vehicle. New vehicles are active and unassigned.
async fn create_vehicle(
    State(state): State<Arc<AppState>>,
    Json(input): Json<NewVehicle>,
) -> Result<(StatusCode, Json<Vehicle>)> {
    let input = NewVehicle {
        name: input.name.trim().to_string(),
        license: input.license.trim().to_uppercase(),
        ..input
    };
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let vehicle = Vehicle {
        id: uuid::Uuid::new_v4().to_string(),
        name: input.name,
        license: input.license,
        fuel: input.fuel,
        co2_baseline: input.co2_baseline,
        assigned_driver: None,
        status: VehicleStatus::Active,
        created_at: format_utc_rfc3339(chrono::Utc::now()),
    };

    state.store.put_vehicle(&vehicle).await?;
    tracing::info!(vehicle_id = %vehicle.id, license = %vehicle.license, "Vehicle registered");

    Ok((StatusCode::CREATED, Json(vehicle)))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VehicleUpdate {
    #[serde(default)]
    status: Option<VehicleStatus>,
    /// Driver uid to assign; an empty string unassigns
    #[serde(default)]
    assigned_driver: Option<String>,
}

/// Update a vehicle's status and/or driver assignment.
async fn update_vehicle(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(update): Json<VehicleUpdate>,
) -> Result<Json<Vehicle>> {
    let mut vehicle = state
        .store
        .get_vehicle(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Vehicle {}", id)))?;

    if let Some(status) = update.status {
        vehicle.status = status;
    }

    if let Some(driver) = update.assigned_driver {
        let driver = driver.trim();
        vehicle.assigned_driver = if driver.is_empty() {
            None
        } else {
            let profile = state
                .store
                .get_profile(driver)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Driver {}", driver)))?;
            if profile.role != Role::Driver {
                return Err(AppError::BadRequest(format!(
                    "User {} is not a driver",
                    driver
                )));
            }
            Some(profile.uid)
        };
    }

    state.store.put_vehicle(&vehicle).await?;
    tracing::info!(
        vehicle_id = %vehicle.id,
        status = ?vehicle.status,
        driver = ?vehicle.assigned_driver,
        "Vehicle updated"
    );

    Ok(Json(vehicle))
}
