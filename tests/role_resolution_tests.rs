// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Role resolution tests.
//!
//! These tests verify that:
//! 1. The first profile ever created is admin/active, later ones driver/pending
//! 2. Existing profiles are returned verbatim and nothing is rewritten
//! 3. Identities without an email never touch the store
//! 4. Store failures resolve to no role at all
//! 5. Concurrent first sign-ups produce exactly one admin

use async_trait::async_trait;
use greenroute::db::{FirestoreDb, FleetStore, MemoryStore};
use greenroute::error::AppError;
use greenroute::models::{Identity, Role, RoleAssignment, Status, UserProfile, Vehicle};
use greenroute::services::RoleResolver;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Wraps a store and counts every call.
#[derive(Default)]
struct CountingStore {
    inner: MemoryStore,
    calls: AtomicUsize,
    creates: AtomicUsize,
}

impl CountingStore {
    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl FleetStore for CountingStore {
    async fn get_profile(&self, uid: &str) -> Result<Option<UserProfile>, AppError> {
        self.hit();
        self.inner.get_profile(uid).await
    }

    async fn create_profile(&self, profile: &UserProfile) -> Result<bool, AppError> {
        self.hit();
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.inner.create_profile(profile).await
    }

    async fn any_profile_exists(&self) -> Result<bool, AppError> {
        self.hit();
        self.inner.any_profile_exists().await
    }

    async fn claim_bootstrap(&self, uid: &str) -> Result<bool, AppError> {
        self.hit();
        self.inner.claim_bootstrap(uid).await
    }

    async fn list_profiles(&self) -> Result<Vec<UserProfile>, AppError> {
        self.hit();
        self.inner.list_profiles().await
    }

    async fn update_profile_access(
        &self,
        uid: &str,
        role: Role,
        status: Status,
    ) -> Result<Option<UserProfile>, AppError> {
        self.hit();
        self.inner.update_profile_access(uid, role, status).await
    }

    async fn list_vehicles(&self) -> Result<Vec<Vehicle>, AppError> {
        self.hit();
        self.inner.list_vehicles().await
    }

    async fn get_vehicle(&self, id: &str) -> Result<Option<Vehicle>, AppError> {
        self.hit();
        self.inner.get_vehicle(id).await
    }

    async fn put_vehicle(&self, vehicle: &Vehicle) -> Result<(), AppError> {
        self.hit();
        self.inner.put_vehicle(vehicle).await
    }
}

#[tokio::test]
async fn test_first_user_admin_then_drivers() {
    let store = Arc::new(MemoryStore::new());
    let resolver = RoleResolver::new(store.clone());

    let a = resolver.resolve(&Identity::new("a", Some("a@x.com"))).await;
    let b = resolver.resolve(&Identity::new("b", Some("b@x.com"))).await;
    let c = resolver.resolve(&Identity::new("c", Some("c@x.com"))).await;

    assert_eq!(a, RoleAssignment::new(Role::Admin, Status::Active));
    assert_eq!(b, RoleAssignment::new(Role::Driver, Status::Pending));
    assert_eq!(c, RoleAssignment::new(Role::Driver, Status::Pending));

    // First profile unchanged by later sign-ups
    let first = store.get_profile("a").await.unwrap().unwrap();
    assert_eq!((first.role, first.status), (Role::Admin, Status::Active));
    assert_eq!(first.email.as_deref(), Some("a@x.com"));
    assert!(first.created_at.ends_with('Z'));

    assert_eq!(store.list_profiles().await.unwrap().len(), 3);
    assert_eq!(store.bootstrap_admin(), Some("a"));
}

#[tokio::test]
async fn test_existing_profile_is_returned_verbatim() {
    let store = Arc::new(CountingStore::default());
    let resolver = RoleResolver::new(store.clone());

    let approved = UserProfile {
        uid: "d1".to_string(),
        email: Some("d1@x.com".to_string()),
        role: Role::Driver,
        status: Status::Active,
        created_at: "2025-01-01T00:00:00Z".to_string(),
    };
    store.inner.create_profile(&approved).await.unwrap();

    for _ in 0..3 {
        let resolved = resolver.resolve(&Identity::new("d1", Some("d1@x.com"))).await;
        assert_eq!(resolved, RoleAssignment::new(Role::Driver, Status::Active));
    }

    assert_eq!(store.creates.load(Ordering::SeqCst), 0);
    assert_eq!(store.inner.get_profile("d1").await.unwrap().unwrap(), approved);
}

#[tokio::test]
async fn test_legacy_profile_defaults() {
    // A profile document written before roles existed
    let legacy: UserProfile =
        serde_json::from_value(serde_json::json!({ "uid": "old", "email": "old@x.com" })).unwrap();
    let store = Arc::new(MemoryStore::new());
    store.create_profile(&legacy).await.unwrap();

    let resolved = RoleResolver::new(store)
        .resolve(&Identity::new("old", Some("old@x.com")))
        .await;
    assert_eq!(resolved, RoleAssignment::new(Role::Driver, Status::Pending));
}

#[tokio::test]
async fn test_no_email_never_touches_store() {
    let store = Arc::new(CountingStore::default());
    let resolver = RoleResolver::new(store.clone());

    for email in [None, Some(""), Some("   ")] {
        let resolved = resolver.resolve(&Identity::new("anon", email)).await;
        assert_eq!(resolved, RoleAssignment::UNASSIGNED);
    }

    assert_eq!(store.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_store_failure_resolves_to_no_role() {
    // Offline client: every operation fails
    let resolver = RoleResolver::new(Arc::new(FirestoreDb::new_mock()));

    let resolved = resolver.resolve(&Identity::new("u", Some("u@x.com"))).await;
    assert_eq!(resolved, RoleAssignment::UNRESOLVED);
    assert_eq!(resolved.role, None);
    assert!(!resolved.is_active());
}

#[tokio::test]
async fn test_existing_fleet_never_auto_assigns_admin() {
    let store = Arc::new(MemoryStore::new());
    store
        .create_profile(&UserProfile {
            uid: "imported".to_string(),
            email: Some("imported@x.com".to_string()),
            role: Role::Driver,
            status: Status::Active,
            created_at: String::new(),
        })
        .await
        .unwrap();

    let resolved = RoleResolver::new(store.clone())
        .resolve(&Identity::new("new", Some("new@x.com")))
        .await;
    assert_eq!(resolved, RoleAssignment::new(Role::Driver, Status::Pending));
    assert_eq!(store.bootstrap_admin(), None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_first_signups_yield_one_admin() {
    let store = Arc::new(MemoryStore::new());
    let resolver = RoleResolver::new(store.clone());

    let mut handles = Vec::new();
    for i in 0..16 {
        let resolver = resolver.clone();
        handles.push(tokio::spawn(async move {
            let uid = format!("driver-{}", i);
            let email = format!("{}@x.com", uid);
            resolver.resolve(&Identity::new(uid, Some(&email))).await
        }));
    }

    let mut admins = 0;
    for handle in handles {
        let resolved = handle.await.unwrap();
        assert!(resolved.role.is_some());
        if resolved.role == Some(Role::Admin) {
            assert_eq!(resolved.status, Some(Status::Active));
            admins += 1;
        } else {
            assert_eq!(resolved, RoleAssignment::new(Role::Driver, Status::Pending));
        }
    }
    assert_eq!(admins, 1, "exactly one admin must be auto-assigned");

    let profiles = store.list_profiles().await.unwrap();
    assert_eq!(profiles.len(), 16);
    assert_eq!(profiles.iter().filter(|p| p.role == Role::Admin).count(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_resolution_of_same_uid_creates_one_profile() {
    let store = Arc::new(CountingStore::default());
    let resolver = RoleResolver::new(store.clone());

    let mut handles = Vec::new();
    for _ in 0..8 {
        let resolver = resolver.clone();
        handles.push(tokio::spawn(async move {
            resolver.resolve(&Identity::new("same", Some("same@x.com"))).await
        }));
    }

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap());
    }

    // Everyone agrees on the single stored profile
    assert!(results.iter().all(|r| *r == results[0]));
    assert_eq!(store.inner.list_profiles().await.unwrap().len(), 1);
}
