// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (profile, role and approval status)
//! - System (first-admin bootstrap claim)
//! - Vehicles (fleet registry)

use crate::db::{collections, FleetStore, BOOTSTRAP_DOC_ID};
use crate::error::AppError;
use crate::models::{BootstrapRecord, Role, Status, UserProfile, Vehicle};
use crate::time_utils::format_utc_rfc3339;
use async_trait::async_trait;
use firestore::errors::FirestoreError;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }
}

/// A create-only write lost to an existing document.
fn is_already_exists(err: &FirestoreError) -> bool {
    matches!(err, FirestoreError::DataConflictError(_))
}

#[async_trait]
impl FleetStore for FirestoreDb {
    // ─── User Operations ─────────────────────────────────────────

    async fn get_profile(&self, uid: &str) -> Result<Option<UserProfile>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(uid)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn create_profile(&self, profile: &UserProfile) -> Result<bool, AppError> {
        let result: Result<UserProfile, FirestoreError> = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::USERS)
            .document_id(&profile.uid)
            .object(profile)
            .execute()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(e) if is_already_exists(&e) => Ok(false),
            Err(e) => Err(AppError::Database(e.to_string())),
        }
    }

    async fn any_profile_exists(&self) -> Result<bool, AppError> {
        let docs = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .limit(1)
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(!docs.is_empty())
    }

    async fn claim_bootstrap(&self, uid: &str) -> Result<bool, AppError> {
        let record = BootstrapRecord {
            admin_uid: uid.to_string(),
            claimed_at: format_utc_rfc3339(chrono::Utc::now()),
        };

        let result: Result<BootstrapRecord, FirestoreError> = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::SYSTEM)
            .document_id(BOOTSTRAP_DOC_ID)
            .object(&record)
            .execute()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(e) if is_already_exists(&e) => {
                let holder: Option<BootstrapRecord> = self
                    .get_client()?
                    .fluent()
                    .select()
                    .by_id_in(collections::SYSTEM)
                    .obj()
                    .one(BOOTSTRAP_DOC_ID)
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                Ok(holder.is_some_and(|record| record.admin_uid == uid))
            }
            Err(e) => Err(AppError::Database(e.to_string())),
        }
    }

    async fn list_profiles(&self) -> Result<Vec<UserProfile>, AppError> {
        // Sorted in memory: ordering by createdAt in the query would drop
        // legacy documents that lack the field.
        let mut profiles: Vec<UserProfile> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        profiles.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(profiles)
    }

    async fn update_profile_access(
        &self,
        uid: &str,
        role: Role,
        status: Status,
    ) -> Result<Option<UserProfile>, AppError> {
        // Fetch-modify-write to preserve other fields
        let Some(mut profile) = self.get_profile(uid).await? else {
            return Ok(None);
        };
        profile.role = role;
        profile.status = status;

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(uid)
            .object(&profile)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(Some(profile))
    }

    // ─── Vehicle Operations ──────────────────────────────────────

    async fn list_vehicles(&self) -> Result<Vec<Vehicle>, AppError> {
        let mut vehicles: Vec<Vehicle> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::VEHICLES)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        vehicles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(vehicles)
    }

    async fn get_vehicle(&self, id: &str) -> Result<Option<Vehicle>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::VEHICLES)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn put_vehicle(&self, vehicle: &Vehicle) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::VEHICLES)
            .document_id(&vehicle.id)
            .object(vehicle)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
