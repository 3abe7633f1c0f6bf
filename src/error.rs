// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use crate::services::identity::AuthError;
use crate::services::navigation::NavigationError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Sign-in failed: {0}")]
    AuthFailed(String),

    #[error("Identity provider error: {0}")]
    IdentityProvider(String),

    #[error("Routing API error: {0}")]
    Routing(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", Some(msg.clone())),
            AppError::AuthFailed(msg) => {
                (StatusCode::UNAUTHORIZED, "auth_failed", Some(msg.clone()))
            }
            AppError::IdentityProvider(msg) => {
                tracing::error!(error = %msg, "Identity provider error");
                (StatusCode::BAD_GATEWAY, "identity_provider_error", None)
            }
            AppError::Routing(msg) => (StatusCode::BAD_GATEWAY, "routing_error", Some(msg.clone())),
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Rejected(msg) => AppError::AuthFailed(msg),
            AuthError::AlreadyRegistered(msg) => AppError::Conflict(msg),
            AuthError::InvalidInput(msg) => AppError::BadRequest(msg),
            AuthError::Transport(msg) => AppError::IdentityProvider(msg),
        }
    }
}

impl From<NavigationError> for AppError {
    fn from(err: NavigationError) -> Self {
        match err {
            NavigationError::NotFound(address) => {
                AppError::NotFound(format!("Address not found: {}", address))
            }
            NavigationError::MissingCoordinates => AppError::BadRequest(
                "Start and destination coordinates required".to_string(),
            ),
            NavigationError::PermissionDenied => {
                AppError::Conflict("Location permission denied for this trip".to_string())
            }
            NavigationError::Superseded => AppError::Conflict(
                "Trip changed before the request completed".to_string(),
            ),
            NavigationError::Geocode(msg) | NavigationError::RouteFetch(msg) => {
                AppError::Routing(msg)
            }
        }
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
