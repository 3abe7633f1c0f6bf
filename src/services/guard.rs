// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Root navigation guard.
//!
//! Decides, from the session state and the route group the client is in,
//! whether to show the loading indicator, redirect, or render as requested.

use crate::models::{Role, SessionState};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub const LOGIN_ROUTE: &str = "/(auth)/login";
pub const DRIVER_HOME_ROUTE: &str = "/(user)/driver";
pub const ADMIN_HOME_ROUTE: &str = "/(user)/admin";

const AUTH_GROUP: &str = "(auth)";

/// Top-level navigation group the client is positioned in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteSegment {
    /// Login/signup flow
    Auth,
    /// Everything else (named by its first segment, possibly empty)
    App(String),
}

impl RouteSegment {
    /// Parse from a route path or a bare first segment (`"(auth)"`,
    /// `"/(user)/driver"`, `""`).
    pub fn parse(raw: &str) -> Self {
        let first = raw
            .trim()
            .trim_start_matches('/')
            .split('/')
            .next()
            .unwrap_or("");

        if first == AUTH_GROUP {
            RouteSegment::Auth
        } else {
            RouteSegment::App(first.to_string())
        }
    }

    pub fn is_auth_group(&self) -> bool {
        matches!(self, RouteSegment::Auth)
    }
}

/// Where authenticated users are sent when they land on the login group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LandingPolicy {
    /// Everyone goes to the driver dashboard
    #[default]
    DriverHome,
    /// Admins go to the admin dashboard, everyone else to the driver dashboard
    RoleBased,
}

impl LandingPolicy {
    pub fn landing_for(&self, role: Option<Role>) -> &'static str {
        match (self, role) {
            (LandingPolicy::RoleBased, Some(Role::Admin)) => ADMIN_HOME_ROUTE,
            _ => DRIVER_HOME_ROUTE,
        }
    }
}

/// Outcome of a guard evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum GuardDecision {
    /// Session resolution in flight; block with a progress indicator
    ShowLoading,
    RedirectToLogin { target: String },
    RedirectToHome { target: String },
    RenderCurrentTree,
}

/// Stateless guard configured with a landing policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct NavigationGuard {
    policy: LandingPolicy,
}

impl NavigationGuard {
    pub fn new(policy: LandingPolicy) -> Self {
        Self { policy }
    }

    pub fn decide(&self, session: &SessionState, segment: &RouteSegment) -> GuardDecision {
        if session.loading {
            return GuardDecision::ShowLoading;
        }

        match (session.is_authenticated(), segment.is_auth_group()) {
            (false, false) => GuardDecision::RedirectToLogin {
                target: LOGIN_ROUTE.to_string(),
            },
            (true, true) => GuardDecision::RedirectToHome {
                target: self.policy.landing_for(session.role).to_string(),
            },
            _ => GuardDecision::RenderCurrentTree,
        }
    }
}
