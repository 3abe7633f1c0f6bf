// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Trip navigation session.
//!
//! Drives a single active navigation attempt:
//! - Live position updates overwrite the trip start
//! - One-shot geocoding of start/destination addresses
//! - One route fetch producing a polyline and the first maneuver
//!
//! State is in memory only. Every external call is attempted once.

use crate::models::{Coordinates, TripState};
use crate::services::openroute::{RoutingError, RoutingProvider};
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use serde::Deserialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// Navigation errors; each is terminal for the single operation that raised it.
#[derive(Debug, Clone, thiserror::Error)]
pub enum NavigationError {
    #[error("Address not found: {0}")]
    NotFound(String),

    #[error("Geocoding error: {0}")]
    Geocode(String),

    #[error("Routing failed: {0}")]
    RouteFetch(String),

    #[error("Start and destination coordinates required")]
    MissingCoordinates,

    #[error("Location permission required")]
    PermissionDenied,

    /// The trip ended or changed destination while a lookup was in flight
    #[error("Trip changed before the request completed")]
    Superseded,
}

/// Outcome of the foreground location permission prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationPermission {
    Granted,
    Denied,
}

/// Live position subscription.
///
/// The tracking task is stopped exactly once: by [`cancel`](Self::cancel) or
/// when the subscription is dropped, whichever happens first.
pub struct PositionSubscription {
    task: Option<JoinHandle<()>>,
}

impl PositionSubscription {
    pub fn cancel(mut self) {
        self.release();
    }

    #[cfg(test)]
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    fn release(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::debug!("Position subscription released");
        }
    }
}

impl Drop for PositionSubscription {
    fn drop(&mut self) {
        self.release();
    }
}

/// A single trip's navigation state and operations.
pub struct TripNavigationSession {
    routing: Arc<dyn RoutingProvider>,
    state: Arc<RwLock<TripState>>,
    gps_enabled: AtomicBool,
}

impl TripNavigationSession {
    pub fn new(routing: Arc<dyn RoutingProvider>) -> Self {
        Self {
            routing,
            state: Arc::new(RwLock::new(TripState::default())),
            gps_enabled: AtomicBool::new(false),
        }
    }

    /// Copy of the current state.
    pub async fn snapshot(&self) -> TripState {
        self.state.read().await.clone()
    }

    /// Whether live tracking was granted for this session.
    pub fn gps_enabled(&self) -> bool {
        self.gps_enabled.load(Ordering::Relaxed)
    }

    /// Subscribe to live positions; every fix overwrites the start coordinate.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn track_position(
        &self,
        permission: LocationPermission,
        mut fixes: BoxStream<'static, Coordinates>,
    ) -> Result<PositionSubscription, NavigationError> {
        if permission == LocationPermission::Denied {
            self.gps_enabled.store(false, Ordering::Relaxed);
            tracing::warn!("Location permission denied, GPS features disabled");
            return Err(NavigationError::PermissionDenied);
        }
        self.gps_enabled.store(true, Ordering::Relaxed);

        let state = self.state.clone();
        let task = tokio::spawn(async move {
            while let Some(fix) = fixes.next().await {
                state.write().await.start_coords = Some(fix);
            }
            tracing::debug!("Position stream ended");
        });

        Ok(PositionSubscription { task: Some(task) })
    }

    /// Geocode a free-text address (first match only).
    pub async fn geocode(&self, address: &str) -> Result<Coordinates, NavigationError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(NavigationError::NotFound(String::new()));
        }

        match self.routing.geocode(address).await {
            Ok(Some(coords)) => Ok(coords),
            Ok(None) => {
                tracing::info!(address, "Address not found");
                Err(NavigationError::NotFound(address.to_string()))
            }
            Err(e) => {
                tracing::warn!(address, error = %e, "Geocoding error");
                Err(NavigationError::Geocode(e.to_string()))
            }
        }
    }

    /// Resolve the optional start address and the destination address.
    ///
    /// Without a start address the live GPS position stays the start. State
    /// is only changed when every lookup succeeded.
    pub async fn set_addresses(
        &self,
        start_address: Option<&str>,
        destination_address: &str,
    ) -> Result<TripState, NavigationError> {
        let start_address = start_address.map(str::trim).filter(|a| !a.is_empty());
        let generation = self.state.read().await.generation;

        let start = match start_address {
            Some(address) => Some(self.geocode(address).await?),
            None => None,
        };
        let destination = self.geocode(destination_address).await?;

        let mut state = self.state.write().await;
        if state.generation != generation {
            tracing::info!("Trip changed while geocoding, discarding addresses");
            return Err(NavigationError::Superseded);
        }
        state.generation += 1;
        if let Some(start) = start {
            state.start_coords = Some(start);
        }
        state.start_address = start_address.unwrap_or_default().to_string();
        state.destination_address = destination_address.trim().to_string();
        state.destination_coords = Some(destination);
        Ok(state.clone())
    }

    /// Fetch the driving route between the current start and destination.
    ///
    /// On failure the previous route and instruction are left untouched.
    pub async fn fetch_route(&self) -> Result<TripState, NavigationError> {
        let (start, destination, generation) = {
            let state = self.state.read().await;
            match (state.start_coords, state.destination_coords) {
                (Some(start), Some(destination)) => (start, destination, state.generation),
                _ => return Err(NavigationError::MissingCoordinates),
            }
        };

        let route = self
            .routing
            .directions(start, destination)
            .await
            .map_err(|e: RoutingError| {
                tracing::warn!(error = %e, "Routing failed");
                NavigationError::RouteFetch(e.to_string())
            })?;

        tracing::info!(
            points = route.line.0.len(),
            distance_m = ?route.distance_m,
            "Route fetched"
        );

        let mut state = self.state.write().await;
        if state.generation != generation {
            tracing::info!("Trip changed while routing, discarding route");
            return Err(NavigationError::Superseded);
        }
        if let Some(instruction) = &route.next_instruction {
            state.next_instruction = instruction.clone();
        }
        state.route = Some(route);
        Ok(state.clone())
    }

    /// End the trip: clear route, addresses, destination and instruction.
    ///
    /// The live start position is kept; it belongs to the position stream.
    /// Route and address lookups still in flight are discarded.
    pub async fn end_trip(&self) -> TripState {
        let mut state = self.state.write().await;
        let start_coords = state.start_coords;
        let generation = state.generation + 1;
        *state = TripState {
            start_coords,
            generation,
            ..TripState::default()
        };
        state.clone()
    }
}
