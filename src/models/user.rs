// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! User identity and profile models for storage and API.

use serde::{Deserialize, Serialize};
use std::fmt;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Authenticated identity as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Identity {
    /// Provider user ID (also used as the profile document ID)
    pub uid: String,
    /// Email address (None for anonymous or incomplete accounts)
    pub email: Option<String>,
}

impl Identity {
    pub fn new(uid: impl Into<String>, email: Option<&str>) -> Self {
        Self {
            uid: uid.into(),
            email: email.map(str::to_string),
        }
    }

    /// Email address if present and non-blank.
    pub fn usable_email(&self) -> Option<&str> {
        self.email.as_deref().filter(|e| !e.trim().is_empty())
    }
}

/// Authorization tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Role {
    Admin,
    Driver,
    Unassigned,
}

/// Approval state gating feature access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Status {
    Pending,
    Active,
    Unassigned,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Admin => "admin",
            Role::Driver => "driver",
            Role::Unassigned => "unassigned",
        };
        f.write_str(s)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Pending => "pending",
            Status::Active => "active",
            Status::Unassigned => "unassigned",
        };
        f.write_str(s)
    }
}

fn legacy_role() -> Role {
    Role::Driver
}

fn legacy_status() -> Status {
    Status::Pending
}

/// User profile stored in Firestore (`users/{uid}`).
///
/// Field names are camelCase to match documents written by the mobile client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserProfile {
    /// Provider user ID (also used as document ID)
    pub uid: String,
    /// Email address at time of first sign-in
    pub email: Option<String>,
    /// Records written before roles existed have no role field
    #[serde(default = "legacy_role")]
    pub role: Role,
    #[serde(default = "legacy_status")]
    pub status: Status,
    /// When the profile was first created (RFC 3339)
    #[serde(default)]
    pub created_at: String,
}

/// Singleton record claimed by the first user of the fleet (`system/bootstrap`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapRecord {
    /// UID of the user that became the fleet owner
    pub admin_uid: String,
    /// When the claim was made (RFC 3339)
    pub claimed_at: String,
}
