// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Email/password authentication routes.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, optional_user, SESSION_COOKIE};
use crate::models::{Role, Status};
use crate::services::{AuthSession, Credentials, GuardDecision, RouteSegment};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/signin", post(sign_in))
        .route("/auth/signup", post(sign_up))
        .route("/auth/logout", post(logout))
}

/// Successful sign-in/sign-up.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SignInResponse {
    /// Session token (also set as a cookie)
    pub token: String,
    pub uid: String,
    pub email: Option<String>,
    /// `None` if the role could not be resolved
    pub role: Option<Role>,
    pub status: Option<Status>,
    /// Where the client goes next from the login screen
    pub decision: GuardDecision,
}

async fn sign_in(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(credentials): Json<Credentials>,
) -> Result<(CookieJar, Json<SignInResponse>)> {
    let credentials = credentials.normalized()?;
    let session = state
        .identity
        .sign_in(&credentials.email, &credentials.password)
        .await?;

    tracing::info!(uid = %session.identity.uid, "User signed in");
    start_session(&state, jar, session).await
}

async fn sign_up(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(credentials): Json<Credentials>,
) -> Result<(CookieJar, Json<SignInResponse>)> {
    let credentials = credentials.normalized()?;
    let session = state
        .identity
        .sign_up(&credentials.email, &credentials.password)
        .await?;

    start_session(&state, jar, session).await
}

/// Resolve the role for a fresh provider session and issue our own token.
async fn start_session(
    state: &AppState,
    jar: CookieJar,
    session: AuthSession,
) -> Result<(CookieJar, Json<SignInResponse>)> {
    let resolved = state.sessions.sign_in(session.identity.clone()).await;

    let decision = state.guard.decide(&resolved, &RouteSegment::Auth);

    let token = create_jwt(&session.identity, &state.config.jwt_signing_key)
        .map_err(|e| AppError::Internal(e.context("Failed to sign session token")))?;

    let cookie = Cookie::build((SESSION_COOKIE, token.clone()))
        .path("/")
        .http_only(true)
        .secure(state.config.frontend_url.starts_with("https://"))
        .same_site(SameSite::Lax);

    Ok((
        jar.add(cookie),
        Json(SignInResponse {
            token,
            uid: session.identity.uid,
            email: session.identity.email,
            role: resolved.role,
            status: resolved.status,
            decision,
        }),
    ))
}

/// Sign out: drop the caller's session and trip, then clear the cookie.
async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    headers: HeaderMap,
) -> (CookieJar, StatusCode) {
    if let Some(user) = optional_user(&jar, &headers, &state.config.jwt_signing_key) {
        let closed_trip = state.trips.remove(&user.uid);
        state.sessions.sign_out(&user.uid).await;
        tracing::info!(uid = %user.uid, closed_trip, "User signed out");
    }

    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, StatusCode::NO_CONTENT)
}
