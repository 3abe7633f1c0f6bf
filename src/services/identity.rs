// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity provider client (Firebase Authentication REST API).
//!
//! Handles:
//! - Email/password sign-in and sign-up
//! - Emulator support via FIREBASE_AUTH_EMULATOR_HOST
//! - Translating provider error codes into user-facing messages

use crate::models::Identity;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use validator::Validate;

const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Result of a successful sign-in or sign-up.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub identity: Identity,
}

/// Email/password pair submitted by the login form.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Credentials {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

impl Credentials {
    /// Trim both fields and validate them.
    pub fn normalized(self) -> Result<Self, AuthError> {
        let credentials = Self {
            email: self.email.trim().to_string(),
            password: self.password.trim().to_string(),
        };
        credentials
            .validate()
            .map_err(|e| AuthError::InvalidInput(e.to_string()))?;
        Ok(credentials)
    }
}

/// Identity provider errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthError {
    /// Credentials rejected; message is safe to show to the user
    #[error("{0}")]
    Rejected(String),

    /// Sign-up for an email that already has an account
    #[error("{0}")]
    AlreadyRegistered(String),

    #[error("{0}")]
    InvalidInput(String),

    /// Provider unreachable or returned an unexpected response
    #[error("Identity provider unavailable: {0}")]
    Transport(String),
}

/// Email/password identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError>;

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession, AuthError>;
}

/// Firebase Authentication client.
#[derive(Clone)]
pub struct FirebaseAuthClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl FirebaseAuthClient {
    /// Create a client for the given Web API key.
    ///
    /// For local development with the emulator, set FIREBASE_AUTH_EMULATOR_HOST.
    pub fn new(api_key: String) -> Self {
        let base_url = match std::env::var("FIREBASE_AUTH_EMULATOR_HOST") {
            Ok(host) => {
                tracing::info!(host = %host, "Using Firebase Auth emulator");
                format!("http://{}/identitytoolkit.googleapis.com/v1", host)
            }
            Err(_) => IDENTITY_TOOLKIT_URL.to_string(),
        };
        Self::with_base_url(api_key, base_url)
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            http,
            base_url,
            api_key,
        }
    }

    async fn password_request(
        &self,
        endpoint: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, AuthError> {
        let url = format!("{}/accounts:{}", self.base_url, endpoint);

        let body = serde_json::json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            // 4xx with an error code means the provider rejected the credentials
            if status.is_client_error() {
                if let Ok(err) = serde_json::from_str::<ProviderErrorBody>(&body) {
                    return Err(classify_auth_code(&err.error.message));
                }
            }

            return Err(AuthError::Transport(format!("HTTP {}: {}", status, body)));
        }

        let account: AccountResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Transport(format!("JSON parse error: {}", e)))?;

        Ok(AuthSession {
            identity: Identity {
                uid: account.local_id,
                email: account.email,
            },
        })
    }
}

#[async_trait]
impl IdentityProvider for FirebaseAuthClient {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        self.password_request("signInWithPassword", email, password)
            .await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let session = self.password_request("signUp", email, password).await?;
        tracing::info!(uid = %session.identity.uid, "New account created");
        Ok(session)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    error: ProviderError,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    message: String,
}

/// Map a provider rejection code to an [`AuthError`].
fn classify_auth_code(code: &str) -> AuthError {
    let message = humanize_auth_code(code);
    let code = code.trim();
    if code.starts_with("EMAIL_EXISTS") || code == "auth/email-already-in-use" {
        AuthError::AlreadyRegistered(message)
    } else {
        AuthError::Rejected(message)
    }
}

/// Turn a provider error code into a short message for the user.
///
/// `auth/invalid-credential` → `invalid credential`,
/// `WEAK_PASSWORD : Password should be at least 6 characters` → `weak password`.
pub fn humanize_auth_code(code: &str) -> String {
    let code = code.trim();
    let code = code.strip_prefix("auth/").unwrap_or(code);
    let code = code.split(" : ").next().unwrap_or(code);

    let message = code
        .replace(['-', '_'], " ")
        .trim()
        .to_lowercase();

    if message.is_empty() {
        "An error occurred.".to_string()
    } else {
        message
    }
}
