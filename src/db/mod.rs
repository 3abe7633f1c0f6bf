//! Database layer (Firestore, with an in-memory stand-in).

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryStore;

use crate::error::AppError;
use crate::models::{Role, Status, UserProfile, Vehicle};
use async_trait::async_trait;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const VEHICLES: &str = "vehicles";
    /// Singleton system records (bootstrap claim)
    pub const SYSTEM: &str = "system";
}

/// Document ID of the first-admin claim in the `system` collection.
pub const BOOTSTRAP_DOC_ID: &str = "bootstrap";

/// Persistence operations used by the fleet services.
#[async_trait]
pub trait FleetStore: Send + Sync {
    // ─── Profiles ────────────────────────────────────────────────

    /// Get the profile for a uid.
    async fn get_profile(&self, uid: &str) -> Result<Option<UserProfile>, AppError>;

    /// Create a profile only if none exists for its uid.
    ///
    /// Returns `false` when a profile already exists (nothing is written).
    async fn create_profile(&self, profile: &UserProfile) -> Result<bool, AppError>;

    /// Whether at least one profile exists (single-document probe).
    async fn any_profile_exists(&self) -> Result<bool, AppError>;

    /// Atomically claim the first-admin slot for `uid`.
    ///
    /// The first claim wins for the lifetime of the store. Returns `true` iff
    /// the slot is held by `uid`, so repeated claims by the winner agree.
    async fn claim_bootstrap(&self, uid: &str) -> Result<bool, AppError>;

    /// All profiles, oldest first.
    async fn list_profiles(&self) -> Result<Vec<UserProfile>, AppError>;

    /// Change role and status of an existing profile.
    ///
    /// Returns `None` if the profile does not exist.
    async fn update_profile_access(
        &self,
        uid: &str,
        role: Role,
        status: Status,
    ) -> Result<Option<UserProfile>, AppError>;

    // ─── Vehicles ────────────────────────────────────────────────

    /// All vehicles, newest first.
    async fn list_vehicles(&self) -> Result<Vec<Vehicle>, AppError>;

    async fn get_vehicle(&self, id: &str) -> Result<Option<Vehicle>, AppError>;

    /// Create or replace a vehicle.
    async fn put_vehicle(&self, vehicle: &Vehicle) -> Result<(), AppError>;
}
