//! Application configuration loaded from environment variables.
//!
//! Secrets are injected as environment variables by the deployment and read
//! once at startup.

use crate::services::guard::LandingPolicy;
use std::env;

/// Which document store backs the fleet data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Firestore,
    /// Process-local store for local development and tests
    Memory,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Mobile/web client origin for CORS
    pub frontend_url: String,
    /// GCP project ID (Firestore and Firebase Authentication)
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// openrouteservice base URL
    pub ors_base_url: String,
    /// Where authenticated users land when they hit the login group
    pub landing_policy: LandingPolicy,
    pub store_backend: StoreBackend,

    // --- Secrets ---
    /// Firebase Web API key for the Identity Toolkit REST API
    pub firebase_api_key: String,
    /// openrouteservice API key
    pub ors_api_key: String,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:8081".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            ors_base_url: env::var("ORS_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "https://api.openrouteservice.org".to_string()),
            landing_policy: parse_landing_policy(env::var("ROLE_BASED_LANDING").ok().as_deref()),
            store_backend: parse_store_backend(env::var("FLEET_STORE").ok().as_deref())?,

            firebase_api_key: env::var("FIREBASE_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("FIREBASE_API_KEY"))?,
            ors_api_key: env::var("ORS_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("ORS_API_KEY"))?,
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
        })
    }

    /// Config for tests only.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:8081".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            ors_base_url: "http://127.0.0.1:9".to_string(),
            landing_policy: LandingPolicy::DriverHome,
            store_backend: StoreBackend::Memory,
            firebase_api_key: "test_api_key".to_string(),
            ors_api_key: "test_ors_key".to_string(),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
        }
    }
}

fn parse_landing_policy(raw: Option<&str>) -> LandingPolicy {
    match raw.map(|v| v.trim().to_ascii_lowercase()) {
        Some(v) if v == "true" || v == "1" => LandingPolicy::RoleBased,
        _ => LandingPolicy::DriverHome,
    }
}

fn parse_store_backend(raw: Option<&str>) -> Result<StoreBackend, ConfigError> {
    match raw.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        None | Some("") | Some("firestore") => Ok(StoreBackend::Firestore),
        Some("memory") => Ok(StoreBackend::Memory),
        Some(other) => Err(ConfigError::Invalid {
            name: "FLEET_STORE",
            value: other.to_string(),
        }),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}
