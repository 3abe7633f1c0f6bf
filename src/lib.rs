// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! GreenRoute: fleet management backend
//!
//! This crate provides session role resolution, route-group navigation
//! guarding, trip navigation (geocoding and driving routes), and fleet
//! administration for the GreenRoute driver app.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FleetStore;
use services::{IdentityProvider, NavigationGuard, RoleResolver, SessionRegistry, TripRegistry};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn FleetStore>,
    pub resolver: RoleResolver,
    pub identity: Arc<dyn IdentityProvider>,
    pub guard: NavigationGuard,
    pub sessions: SessionRegistry,
    pub trips: TripRegistry,
}

impl AppState {
    /// Wire services around a store and the external providers.
    pub fn new(
        config: Config,
        store: Arc<dyn FleetStore>,
        identity: Arc<dyn IdentityProvider>,
        routing: Arc<dyn services::RoutingProvider>,
    ) -> Self {
        let resolver = RoleResolver::new(store.clone());
        Self {
            guard: NavigationGuard::new(config.landing_policy),
            sessions: SessionRegistry::new(resolver.clone()),
            resolver,
            trips: TripRegistry::new(routing),
            config,
            store,
            identity,
        }
    }
}
