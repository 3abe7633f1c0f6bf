// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running
//! (FIRESTORE_EMULATOR_HOST). The emulator keeps state across tests in a run,
//! so every test uses unique uids and does not assume an empty fleet.

use greenroute::db::FleetStore;
use greenroute::models::{FuelType, Identity, Role, Status, UserProfile, Vehicle, VehicleStatus};
use greenroute::services::RoleResolver;
use std::sync::Arc;

mod common;
use common::test_db;

/// Generate a unique uid for test isolation.
fn unique_uid(prefix: &str) -> String {
    format!("{}-{}", prefix, uuid::Uuid::new_v4())
}

fn test_profile(uid: &str) -> UserProfile {
    UserProfile {
        uid: uid.to_string(),
        email: Some(format!("{}@example.com", uid)),
        role: Role::Driver,
        status: Status::Pending,
        created_at: chrono::Utc::now().to_rfc3339(),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// PROFILE TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_profile_create_only() {
    require_emulator!();

    let db = test_db().await;
    let uid = unique_uid("driver");

    assert!(db.get_profile(&uid).await.unwrap().is_none());

    let profile = test_profile(&uid);
    assert!(db.create_profile(&profile).await.unwrap());

    // Second create must not overwrite
    let mut promoted = profile.clone();
    promoted.role = Role::Admin;
    assert!(!db.create_profile(&promoted).await.unwrap());

    let stored = db.get_profile(&uid).await.unwrap().unwrap();
    assert_eq!(stored, profile);
    assert!(db.any_profile_exists().await.unwrap());
}

#[tokio::test]
async fn test_profile_access_update() {
    require_emulator!();

    let db = test_db().await;
    let uid = unique_uid("approve");
    db.create_profile(&test_profile(&uid)).await.unwrap();

    let updated = db
        .update_profile_access(&uid, Role::Driver, Status::Active)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.status, Status::Active);
    assert_eq!(
        db.get_profile(&uid).await.unwrap().unwrap().status,
        Status::Active
    );

    let missing = db
        .update_profile_access(&unique_uid("ghost"), Role::Driver, Status::Active)
        .await
        .unwrap();
    assert!(missing.is_none());

    let listed = db.list_profiles().await.unwrap();
    assert!(listed.iter().any(|p| p.uid == uid));
}

#[tokio::test]
async fn test_bootstrap_claim_is_single_winner() {
    require_emulator!();

    let db = test_db().await;
    let first = unique_uid("claim");
    let second = unique_uid("claim");

    // Some earlier run may already hold the claim; at most one of ours wins
    let a = db.claim_bootstrap(&first).await.unwrap();
    let b = db.claim_bootstrap(&second).await.unwrap();
    assert!(!(a && b));
    if a {
        assert!(db.claim_bootstrap(&first).await.unwrap());
    }
}

#[tokio::test]
async fn test_resolver_against_firestore() {
    require_emulator!();

    let db = Arc::new(test_db().await);
    let resolver = RoleResolver::new(db.clone());

    // Seed so this test never claims the fleet
    db.create_profile(&test_profile(&unique_uid("seed")))
        .await
        .unwrap();

    let uid = unique_uid("new");
    let email = format!("{}@example.com", uid);
    let resolved = resolver.resolve(&Identity::new(uid.clone(), Some(&email))).await;
    assert_eq!(resolved.role, Some(Role::Driver));
    assert_eq!(resolved.status, Some(Status::Pending));

    let stored = db.get_profile(&uid).await.unwrap().unwrap();
    assert_eq!(stored.email.as_deref(), Some(email.as_str()));
}

// ═══════════════════════════════════════════════════════════════════════════
// VEHICLE TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_vehicle_put_and_get() {
    require_emulator!();

    let db = test_db().await;
    let id = unique_uid("vehicle");
    let mut vehicle = Vehicle {
        id: id.clone(),
        name: "Ashok Leyland Dost".to_string(),
        license: "KA03CD5678".to_string(),
        fuel: FuelType::Diesel,
        co2_baseline: 0.24,
        assigned_driver: None,
        status: VehicleStatus::Active,
        created_at: chrono::Utc::now().to_rfc3339(),
    };
    db.put_vehicle(&vehicle).await.unwrap();
    assert_eq!(db.get_vehicle(&id).await.unwrap().unwrap(), vehicle);

    vehicle.status = VehicleStatus::Maintenance;
    vehicle.assigned_driver = Some("d1".to_string());
    db.put_vehicle(&vehicle).await.unwrap();

    let stored = db.get_vehicle(&id).await.unwrap().unwrap();
    assert_eq!(stored.status, VehicleStatus::Maintenance);
    assert_eq!(stored.assigned_driver.as_deref(), Some("d1"));

    let listed = db.list_vehicles().await.unwrap();
    assert!(listed.iter().any(|v| v.id == id));
}
