// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use dashmap::DashMap;
use geo::{Coord, LineString};
use greenroute::config::Config;
use greenroute::db::{FirestoreDb, FleetStore, MemoryStore};
use greenroute::middleware::auth::create_jwt;
use greenroute::models::{Coordinates, Identity, Route};
use greenroute::routes::create_router;
use greenroute::services::{
    AuthError, AuthSession, IdentityProvider, RoutingError, RoutingProvider,
};
use greenroute::AppState;
use std::sync::Arc;
use tower::ServiceExt;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

// ─── Fake providers ──────────────────────────────────────────

/// Email/password accounts kept in memory.
#[derive(Default)]
pub struct FakeIdentity {
    accounts: DashMap<String, (String, String)>,
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        match self.accounts.get(email) {
            Some(account) if account.1 == password => Ok(AuthSession {
                identity: Identity::new(account.0.clone(), Some(email)),
            }),
            _ => Err(AuthError::Rejected("invalid credential".to_string())),
        }
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        if self.accounts.contains_key(email) {
            return Err(AuthError::AlreadyRegistered(
                "email already in use".to_string(),
            ));
        }
        let uid = format!("uid-{}", email.split('@').next().unwrap_or(email));
        self.accounts
            .insert(email.to_string(), (uid.clone(), password.to_string()));
        Ok(AuthSession {
            identity: Identity::new(uid, Some(email)),
        })
    }
}

pub const DEPOT: Coordinates = Coordinates {
    lat: 12.9716,
    lng: 77.5946,
};
pub const AIRPORT: Coordinates = Coordinates {
    lat: 13.1986,
    lng: 77.7066,
};

/// Knows "Depot" and "Airport"; routes are straight lines.
pub struct FakeRouting;

#[async_trait]
impl RoutingProvider for FakeRouting {
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>, RoutingError> {
        Ok(match address {
            "Depot" => Some(DEPOT),
            "Airport" => Some(AIRPORT),
            _ => None,
        })
    }

    async fn directions(
        &self,
        start: Coordinates,
        destination: Coordinates,
    ) -> Result<Route, RoutingError> {
        Ok(Route {
            line: LineString::from(vec![Coord::from(start), Coord::from(destination)]),
            next_instruction: Some("Head north on Airport Road (250 m)".to_string()),
            distance_m: Some(31_000.0),
            duration_s: Some(2_400.0),
        })
    }
}

// ─── App construction ────────────────────────────────────────

/// Create a test app backed by an in-memory store and fake providers.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with_store(Arc::new(MemoryStore::new()))
}

#[allow(dead_code)]
pub fn create_test_app_with_store(store: Arc<dyn FleetStore>) -> (axum::Router, Arc<AppState>) {
    create_test_app_with(Config::test_default(), store)
}

#[allow(dead_code)]
pub fn create_test_app_with(
    config: Config,
    store: Arc<dyn FleetStore>,
) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(
        config,
        store,
        Arc::new(FakeIdentity::default()),
        Arc::new(FakeRouting),
    ));
    (create_router(state.clone()), state)
}

/// Session token for an identity, signed with the test key.
#[allow(dead_code)]
pub fn token_for(uid: &str, email: Option<&str>) -> String {
    create_jwt(
        &Identity::new(uid, email),
        &Config::test_default().jwt_signing_key,
    )
    .unwrap()
}

/// Send a request and decode the JSON response.
///
/// Empty bodies become `Null`; non-JSON bodies (extractor rejections) become
/// a string.
#[allow(dead_code)]
pub async fn send(
    app: &axum::Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            serde_json::Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, json)
}
