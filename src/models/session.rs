// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Process-local session state derived from the identity provider.

use crate::models::user::{Identity, Role, Status};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Role and status resolved for an identity.
///
/// Both fields are `None` when resolution failed; callers must treat that as
/// "cannot authorize".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RoleAssignment {
    pub role: Option<Role>,
    pub status: Option<Status>,
}

impl RoleAssignment {
    pub const UNASSIGNED: RoleAssignment = RoleAssignment {
        role: Some(Role::Unassigned),
        status: Some(Status::Unassigned),
    };

    pub const UNRESOLVED: RoleAssignment = RoleAssignment {
        role: None,
        status: None,
    };

    pub fn new(role: Role, status: Status) -> Self {
        Self {
            role: Some(role),
            status: Some(status),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == Some(Status::Active)
    }

    pub fn is_active_admin(&self) -> bool {
        self.role == Some(Role::Admin) && self.is_active()
    }
}

/// Snapshot of the current session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionState {
    pub identity: Option<Identity>,
    pub role: Option<Role>,
    pub status: Option<Status>,
    pub loading: bool,
}

impl SessionState {
    /// Initial state before the identity provider has reported anything.
    pub fn initial() -> Self {
        Self {
            identity: None,
            role: None,
            status: None,
            loading: true,
        }
    }

    /// Identity reported, role resolution in flight.
    pub fn resolving(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
            role: None,
            status: None,
            loading: true,
        }
    }

    pub fn resolved(identity: Identity, assignment: RoleAssignment) -> Self {
        Self {
            identity: Some(identity),
            role: assignment.role,
            status: assignment.status,
            loading: false,
        }
    }

    pub fn signed_out() -> Self {
        Self {
            identity: None,
            role: RoleAssignment::UNASSIGNED.role,
            status: RoleAssignment::UNASSIGNED.status,
            loading: false,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}
