// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Role/status authorization middleware.
//!
//! Runs after [`require_auth`](super::auth::require_auth). Resolves the
//! caller's role and inserts the [`RoleAssignment`] into request extensions.

use crate::middleware::auth::AuthUser;
use crate::models::RoleAssignment;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Authenticated caller, cloned out of the request extensions.
fn caller(request: &Request) -> Result<AuthUser, StatusCode> {
    request
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or(StatusCode::UNAUTHORIZED)
}

async fn resolve_caller(state: &AppState, user: &AuthUser) -> Result<RoleAssignment, StatusCode> {
    let assignment = state.resolver.resolve(&user.identity()).await;
    if assignment.role.is_none() {
        tracing::warn!(uid = %user.uid, "Blocked request: role could not be resolved");
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(assignment)
}

/// Require an approved (`status = active`) account of any role.
pub async fn require_active(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let user = caller(&request)?;
    let assignment = resolve_caller(&state, &user).await?;

    if !assignment.is_active() {
        tracing::debug!(status = ?assignment.status, "Blocked request: account not active");
        return Err(StatusCode::FORBIDDEN);
    }

    request.extensions_mut().insert(assignment);
    Ok(next.run(request).await)
}

/// Require an active admin.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let user = caller(&request)?;
    let assignment = resolve_caller(&state, &user).await?;

    if !assignment.is_active_admin() {
        tracing::warn!(
            role = ?assignment.role,
            status = ?assignment.status,
            "Blocked admin request"
        );
        return Err(StatusCode::FORBIDDEN);
    }

    request.extensions_mut().insert(assignment);
    Ok(next.run(request).await)
}
