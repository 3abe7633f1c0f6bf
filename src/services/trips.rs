// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-user registry of mounted trip screens.
//!
//! Each driver has at most one active trip. Dropping a trip (unmount, or
//! mounting a new one) drops its position subscription, which stops tracking.

use crate::models::Coordinates;
use crate::services::navigation::{
    LocationPermission, NavigationError, PositionSubscription, TripNavigationSession,
};
use crate::services::openroute::RoutingProvider;
use dashmap::DashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Buffered position fixes per trip before pushes wait.
const POSITION_BUFFER: usize = 16;

/// A mounted trip: navigation session plus its live position feed.
pub struct ActiveTrip {
    pub session: TripNavigationSession,
    positions: Option<mpsc::Sender<Coordinates>>,
    subscription: Mutex<Option<PositionSubscription>>,
}

impl ActiveTrip {
    /// Feed a GPS fix into the tracking task.
    pub async fn push_position(&self, fix: Coordinates) -> Result<(), NavigationError> {
        let sender = self
            .positions
            .as_ref()
            .ok_or(NavigationError::PermissionDenied)?;

        sender
            .send(fix)
            .await
            .map_err(|_| NavigationError::PermissionDenied)
    }

    /// Stop live tracking even while other handlers still hold the trip.
    fn stop_tracking(&self) {
        let subscription = match self.subscription.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(subscription) = subscription {
            subscription.cancel();
        }
    }
}

/// Active trips keyed by uid.
pub struct TripRegistry {
    routing: Arc<dyn RoutingProvider>,
    trips: DashMap<String, Arc<ActiveTrip>>,
}

impl TripRegistry {
    pub fn new(routing: Arc<dyn RoutingProvider>) -> Self {
        Self {
            routing,
            trips: DashMap::new(),
        }
    }

    /// Mount a fresh trip for `uid`, replacing any previous one.
    ///
    /// A denied permission still mounts the trip with GPS disabled; addresses
    /// can then be entered manually.
    pub fn start(&self, uid: &str, permission: LocationPermission) -> Arc<ActiveTrip> {
        let session = TripNavigationSession::new(self.routing.clone());

        let (tx, rx) = mpsc::channel(POSITION_BUFFER);
        let fixes = futures_util::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|fix| (fix, rx))
        });

        let (positions, subscription) =
            match session.track_position(permission, Box::pin(fixes)) {
                Ok(subscription) => (Some(tx), Some(subscription)),
                Err(e) => {
                    tracing::info!(uid, error = %e, "Trip started without GPS");
                    (None, None)
                }
            };

        let trip = Arc::new(ActiveTrip {
            session,
            positions,
            subscription: Mutex::new(subscription),
        });

        if let Some(previous) = self.trips.insert(uid.to_string(), trip.clone()) {
            previous.stop_tracking();
            tracing::debug!(uid, "Replaced previous trip");
        }
        tracing::debug!(uid, active = self.active_count(), "Trip mounted");
        trip
    }

    pub fn get(&self, uid: &str) -> Option<Arc<ActiveTrip>> {
        self.trips.get(uid).map(|entry| entry.value().clone())
    }

    /// Unmount the trip for `uid`. Returns `false` if none was active.
    pub fn remove(&self, uid: &str) -> bool {
        let Some((_, trip)) = self.trips.remove(uid) else {
            return false;
        };
        trip.stop_tracking();
        tracing::debug!(uid, active = self.active_count(), "Trip unmounted");
        true
    }

    /// Number of mounted trips.
    pub fn active_count(&self) -> usize {
        self.trips.len()
    }
}
