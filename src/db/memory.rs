// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Process-local fleet store.
//!
//! Used for local development (`FLEET_STORE=memory`) and tests. Data is lost
//! when the process exits.

use crate::db::FleetStore;
use crate::error::AppError;
use crate::models::{Role, Status, UserProfile, Vehicle};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::OnceLock;

/// In-memory implementation of [`FleetStore`].
#[derive(Default)]
pub struct MemoryStore {
    profiles: DashMap<String, UserProfile>,
    vehicles: DashMap<String, Vehicle>,
    bootstrap_admin: OnceLock<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// UID that claimed the first-admin slot, if any.
    pub fn bootstrap_admin(&self) -> Option<&str> {
        self.bootstrap_admin.get().map(String::as_str)
    }
}

#[async_trait]
impl FleetStore for MemoryStore {
    async fn get_profile(&self, uid: &str) -> Result<Option<UserProfile>, AppError> {
        Ok(self.profiles.get(uid).map(|p| p.clone()))
    }

    async fn create_profile(&self, profile: &UserProfile) -> Result<bool, AppError> {
        match self.profiles.entry(profile.uid.clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(profile.clone());
                Ok(true)
            }
        }
    }

    async fn any_profile_exists(&self) -> Result<bool, AppError> {
        Ok(!self.profiles.is_empty())
    }

    async fn claim_bootstrap(&self, uid: &str) -> Result<bool, AppError> {
        let holder = self.bootstrap_admin.get_or_init(|| uid.to_string());
        Ok(holder == uid)
    }

    async fn list_profiles(&self) -> Result<Vec<UserProfile>, AppError> {
        let mut profiles: Vec<UserProfile> =
            self.profiles.iter().map(|p| p.value().clone()).collect();
        profiles.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(profiles)
    }

    async fn update_profile_access(
        &self,
        uid: &str,
        role: Role,
        status: Status,
    ) -> Result<Option<UserProfile>, AppError> {
        Ok(self.profiles.get_mut(uid).map(|mut profile| {
            profile.role = role;
            profile.status = status;
            profile.clone()
        }))
    }

    async fn list_vehicles(&self) -> Result<Vec<Vehicle>, AppError> {
        let mut vehicles: Vec<Vehicle> =
            self.vehicles.iter().map(|v| v.value().clone()).collect();
        vehicles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(vehicles)
    }

    async fn get_vehicle(&self, id: &str) -> Result<Option<Vehicle>, AppError> {
        Ok(self.vehicles.get(id).map(|v| v.clone()))
    }

    async fn put_vehicle(&self, vehicle: &Vehicle) -> Result<(), AppError> {
        self.vehicles.insert(vehicle.id.clone(), vehicle.clone());
        Ok(())
    }
}
