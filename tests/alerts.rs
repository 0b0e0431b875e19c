//! Piracy alert record tests.

mod common;

use common::*;

#[test]
fn test_create_alert() {
    let services = test_services();
    let user = create_test_user(&services, "owner@example.com");
    let license = create_test_license(&services, &user.id, 1);

    let alert = services
        .alerts
        .create(
            &license.id,
            AlertType::SuspiciousActivity,
            "Key shared on a forum",
            AlertSeverity::Low,
        )
        .expect("Failed to create alert");

    assert!(alert.id.starts_with("ll_alr_"));
    assert_eq!(alert.license_id, license.id);
    assert_eq!(alert.alert_type, AlertType::SuspiciousActivity);
    assert_eq!(alert.severity, AlertSeverity::Low);
    assert!(!alert.resolved);
}

#[test]
fn test_list_scopes_by_license_owner() {
    let services = test_services();
    let alice = create_test_user(&services, "alice@example.com");
    let bob = create_test_user(&services, "bob@example.com");
    let alices_license = create_test_license(&services, &alice.id, 1);
    let bobs_license = create_test_license(&services, &bob.id, 1);

    services
        .alerts
        .create(
            &alices_license.id,
            AlertType::RapidActivation,
            "Rapid activation attempts detected",
            AlertSeverity::Medium,
        )
        .expect("Failed to create alert");
    services
        .alerts
        .create(
            &bobs_license.id,
            AlertType::MultipleLocations,
            "License used in multiple locations",
            AlertSeverity::Medium,
        )
        .expect("Failed to create alert");

    let alices = services.alerts.list(&alice.id).expect("Failed to list");
    assert_eq!(alices.len(), 1);
    assert_eq!(alices[0].license_id, alices_license.id);
}

#[test]
fn test_resolve_is_one_way() {
    let services = test_services();
    let user = create_test_user(&services, "owner@example.com");
    let license = create_test_license(&services, &user.id, 1);
    let alert = services
        .alerts
        .create(
            &license.id,
            AlertType::MaxActivationsExceeded,
            "Attempted activation beyond limit (1 max)",
            AlertSeverity::High,
        )
        .expect("Failed to create alert");

    services.alerts.resolve(&alert.id).expect("Failed to resolve");

    let alerts = services.alerts.list(&user.id).expect("Failed to list");
    assert!(alerts[0].resolved);

    // Resolving again is a no-op, not an error.
    services
        .alerts
        .resolve(&alert.id)
        .expect("Second resolve should be a no-op");
    let alerts = services.alerts.list(&user.id).expect("Failed to list");
    assert!(alerts[0].resolved);
}

#[test]
fn test_resolve_unknown_alert_is_noop() {
    let services = test_services();

    services
        .alerts
        .resolve("ll_alr_missing")
        .expect("Resolving an unknown alert should not error");
}

#[test]
fn test_repeated_conditions_append_repeated_records() {
    let services = test_services();
    let user = create_test_user(&services, "owner@example.com");
    let license = create_test_license(&services, &user.id, 1);

    for _ in 0..2 {
        services
            .alerts
            .create(
                &license.id,
                AlertType::MaxActivationsExceeded,
                "Attempted activation beyond limit (1 max)",
                AlertSeverity::High,
            )
            .expect("Failed to create alert");
    }

    let alerts = services.alerts.list(&user.id).expect("Failed to list");
    assert_eq!(alerts.len(), 2);
    assert_ne!(alerts[0].id, alerts[1].id);
}
