// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Middleware modules (authentication, authorization, security headers).

pub mod access;
pub mod auth;
pub mod security;

pub use access::{require_active, require_admin};
pub use auth::require_auth;
