// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session role resolution.
//!
//! Determines the role and approval status of an authenticated identity,
//! creating the profile on first sighting:
//! - The first profile ever created becomes `admin`/`active`
//! - Every later first-time profile is `driver`/`pending`

use crate::db::FleetStore;
use crate::error::AppError;
use crate::models::{Identity, Role, RoleAssignment, Status, UserProfile};
use crate::time_utils::format_utc_rfc3339;
use std::sync::Arc;

/// Resolves role/status for identities against the fleet store.
#[derive(Clone)]
pub struct RoleResolver {
    store: Arc<dyn FleetStore>,
}

impl RoleResolver {
    pub fn new(store: Arc<dyn FleetStore>) -> Self {
        Self { store }
    }

    /// Resolve the role and status for an identity.
    ///
    /// Never fails: store errors are logged and collapse to
    /// [`RoleAssignment::UNRESOLVED`], which must block authorization.
    pub async fn resolve(&self, identity: &Identity) -> RoleAssignment {
        let Some(email) = identity.usable_email() else {
            tracing::debug!(uid = %identity.uid, "Identity has no email, role unassigned");
            return RoleAssignment::UNASSIGNED;
        };

        match self.lookup_or_assign(&identity.uid, email).await {
            Ok(assignment) => assignment,
            Err(e) => {
                tracing::error!(uid = %identity.uid, error = %e, "Error fetching or assigning user role");
                RoleAssignment::UNRESOLVED
            }
        }
    }

    async fn lookup_or_assign(&self, uid: &str, email: &str) -> Result<RoleAssignment, AppError> {
        if let Some(profile) = self.store.get_profile(uid).await? {
            return Ok(RoleAssignment::new(profile.role, profile.status));
        }

        let (role, status) = if self.claims_fleet_ownership(uid).await? {
            (Role::Admin, Status::Active)
        } else {
            (Role::Driver, Status::Pending)
        };

        let profile = UserProfile {
            uid: uid.to_string(),
            email: Some(email.to_string()),
            role,
            status,
            created_at: format_utc_rfc3339(chrono::Utc::now()),
        };

        if !self.store.create_profile(&profile).await? {
            // A concurrent resolution for the same uid created it first
            let existing = self.store.get_profile(uid).await?.ok_or_else(|| {
                AppError::Database(format!("Profile {} vanished after create conflict", uid))
            })?;
            tracing::debug!(uid, "Profile created concurrently, using stored values");
            return Ok(RoleAssignment::new(existing.role, existing.status));
        }

        tracing::info!(uid, role = %role, status = %status, "Assigned initial role");
        Ok(RoleAssignment::new(role, status))
    }

    /// Whether this identity is the fleet's first user.
    ///
    /// The existence probe keeps fleets with pre-existing profiles from ever
    /// auto-assigning an admin; the bootstrap claim makes the assignment
    /// unique among concurrent first sign-ups.
    async fn claims_fleet_ownership(&self, uid: &str) -> Result<bool, AppError> {
        if self.store.any_profile_exists().await? {
            return Ok(false);
        }

        let claimed = self.store.claim_bootstrap(uid).await?;
        if claimed {
            tracing::info!(uid, "First user claimed fleet ownership");
        }
        Ok(claimed)
    }
}
