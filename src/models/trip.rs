// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Trip navigation models (in-memory only, never persisted).

use geo::Coord;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A WGS84 position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// `[lng, lat]` as used by GeoJSON and openrouteservice.
    pub fn lng_lat(&self) -> [f64; 2] {
        [self.lng, self.lat]
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

impl From<Coord<f64>> for Coordinates {
    fn from(c: Coord<f64>) -> Self {
        Self { lat: c.y, lng: c.x }
    }
}

impl From<Coordinates> for Coord<f64> {
    fn from(c: Coordinates) -> Self {
        Coord { x: c.lng, y: c.lat }
    }
}

/// Route returned by the directions API.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Polyline from start to destination
    pub line: geo::LineString<f64>,
    /// First maneuver, formatted for display
    pub next_instruction: Option<String>,
    /// Total distance in meters, if reported
    pub distance_m: Option<f64>,
    /// Estimated duration in seconds, if reported
    pub duration_s: Option<f64>,
}

impl Route {
    pub fn coordinates(&self) -> Vec<Coordinates> {
        self.line.coords().copied().map(Coordinates::from).collect()
    }

    /// Encoded polyline (precision 5).
    pub fn encoded_polyline(&self) -> Result<String, String> {
        polyline::encode_coordinates(self.line.coords().copied(), 5).map_err(|e| e.to_string())
    }
}

/// Current state of a trip navigation session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripState {
    pub start_address: String,
    pub destination_address: String,
    /// Live GPS position or geocoded start address
    pub start_coords: Option<Coordinates>,
    pub destination_coords: Option<Coordinates>,
    pub route: Option<Route>,
    pub next_instruction: String,
    /// Bumped when the destination is committed or the trip ends. Lookups
    /// started under an older generation are discarded.
    pub generation: u64,
}

/// Trip state as returned to the client.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TripView {
    pub start_address: String,
    pub destination_address: String,
    pub start_coords: Option<Coordinates>,
    pub destination_coords: Option<Coordinates>,
    pub route_coords: Vec<Coordinates>,
    pub route_polyline: Option<String>,
    pub next_instruction: String,
    pub distance_m: Option<f64>,
    pub duration_s: Option<f64>,
    pub gps_enabled: bool,
}

impl TripView {
    pub fn from_state(state: &TripState, gps_enabled: bool) -> Self {
        let route = state.route.as_ref();
        Self {
            start_address: state.start_address.clone(),
            destination_address: state.destination_address.clone(),
            start_coords: state.start_coords,
            destination_coords: state.destination_coords,
            route_coords: route.map(Route::coordinates).unwrap_or_default(),
            route_polyline: route.and_then(|r| r.encoded_polyline().ok()),
            next_instruction: state.next_instruction.clone(),
            distance_m: route.and_then(|r| r.distance_m),
            duration_s: route.and_then(|r| r.duration_s),
            gps_enabled,
        }
    }
}
