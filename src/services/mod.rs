// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod guard;
pub mod identity;
pub mod navigation;
pub mod openroute;
pub mod role_resolver;
pub mod session;
pub mod trips;

pub use guard::{GuardDecision, LandingPolicy, NavigationGuard, RouteSegment};
pub use identity::{AuthError, AuthSession, Credentials, FirebaseAuthClient, IdentityProvider};
pub use navigation::{
    LocationPermission, NavigationError, PositionSubscription, TripNavigationSession,
};
pub use openroute::{OpenRouteServiceClient, RoutingError, RoutingProvider};
pub use role_resolver::RoleResolver;
pub use session::{SessionManager, SessionRegistry};
pub use trips::{ActiveTrip, TripRegistry};
