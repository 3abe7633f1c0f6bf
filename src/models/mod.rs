// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod session;
pub mod trip;
pub mod user;
pub mod vehicle;

pub use session::{RoleAssignment, SessionState};
pub use trip::{Coordinates, Route, TripState, TripView};
pub use user::{BootstrapRecord, Identity, Role, Status, UserProfile};
pub use vehicle::{FuelType, Vehicle, VehicleStatus};
