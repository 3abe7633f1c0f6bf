// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session and navigation guard routes.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    routing::get,
    Extension, Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::middleware::auth::{optional_user, AuthUser};
use crate::models::SessionState;
use crate::services::{GuardDecision, RouteSegment};
use crate::AppState;

/// Public guard route (works signed in or out).
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new().route("/session/guard", get(evaluate_guard))
}

/// Routes requiring a session token.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/session", get(get_session))
}

#[derive(Deserialize)]
struct GuardQuery {
    /// Route path or first segment the client is positioned in
    #[serde(default)]
    segment: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct GuardResponse {
    pub decision: GuardDecision,
    pub session: SessionState,
}

/// Evaluate the root navigation guard for the caller's session.
async fn evaluate_guard(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    headers: HeaderMap,
    Query(params): Query<GuardQuery>,
) -> Json<GuardResponse> {
    let user = optional_user(&jar, &headers, &state.config.jwt_signing_key);

    // Signed-in callers see their published state, loading included
    let session = match user {
        Some(user) => state.sessions.current_or_resolve(&user.identity()).await,
        None => SessionState::signed_out(),
    };

    let segment = RouteSegment::parse(&params.segment);
    let decision = state.guard.decide(&session, &segment);

    tracing::debug!(segment = %params.segment, decision = ?decision, "Guard evaluated");

    Json(GuardResponse { decision, session })
}

/// Current session with resolved role and status.
///
/// Waits for any in-flight resolution instead of returning a loading state.
async fn get_session(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Json<SessionState> {
    Json(state.sessions.settled(&user.identity()).await)
}
