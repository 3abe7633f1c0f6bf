// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Fleet vehicle model.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum FuelType {
    Diesel,
    Petrol,
    Electric,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum VehicleStatus {
    Active,
    Inactive,
    Maintenance,
}

/// Vehicle stored in Firestore (`vehicles/{id}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Vehicle {
    /// Generated vehicle ID (also used as document ID)
    pub id: String,
    /// Make and model (e.g. "TATA Ace")
    pub name: String,
    /// License plate
    pub license: String,
    pub fuel: FuelType,
    /// Baseline emissions in kg CO₂ per km
    pub co2_baseline: f64,
    /// UID of the assigned driver, if any
    pub assigned_driver: Option<String>,
    pub status: VehicleStatus,
    /// When the vehicle was registered (RFC 3339)
    pub created_at: String,
}
