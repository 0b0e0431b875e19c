//! API key issuance, revocation, and verification tests.

mod common;

use common::*;

#[test]
fn test_create_api_key() {
    let services = test_services();
    let user = create_test_user(&services, "owner@example.com");

    let key = services
        .api_keys
        .create(
            &user.id,
            "CI pipeline",
            vec!["licenses:read".to_string(), "devices:read".to_string()],
            None,
        )
        .expect("Failed to create key");

    assert!(key.id.starts_with("ll_key_"));
    assert!(key.key.starts_with(keygen::API_KEY_PREFIX));
    assert_eq!(key.key.len(), keygen::API_KEY_PREFIX.len() + 48);
    assert_eq!(key.status, ApiKeyStatus::Active);
    assert_eq!(key.last_used, None);
    assert_eq!(key.expires_at, None);
    assert_eq!(key.permissions.len(), 2);
}

#[test]
fn test_create_with_expiry_days() {
    let services = test_services();
    let user = create_test_user(&services, "owner@example.com");

    let key = services
        .api_keys
        .create(&user.id, "Short-lived", vec![], Some(30))
        .expect("Failed to create key");

    let expires_at = key.expires_at.expect("expiry should be set");
    assert!((expires_at - future_timestamp(30)).abs() <= 2);
}

#[test]
fn test_list_scopes_by_owner() {
    let services = test_services();
    let alice = create_test_user(&services, "alice@example.com");
    let bob = create_test_user(&services, "bob@example.com");

    services
        .api_keys
        .create(&alice.id, "Alice key", vec![], None)
        .expect("Failed to create key");
    services
        .api_keys
        .create(&bob.id, "Bob key", vec![], None)
        .expect("Failed to create key");

    let keys = services.api_keys.list(&alice.id).expect("Failed to list");
    assert_eq!(keys.len(), 1);
    assert_eq!(keys[0].name, "Alice key");
}

#[test]
fn test_verify_refreshes_last_used() {
    let services = test_services();
    let user = create_test_user(&services, "owner@example.com");
    let created = services
        .api_keys
        .create(&user.id, "Integration", vec![], None)
        .expect("Failed to create key");

    let verified = services
        .api_keys
        .verify(&created.key)
        .expect("Failed to verify");
    assert_eq!(verified.id, created.id);
    assert!(verified.last_used.is_some());

    let listed = services.api_keys.list(&user.id).expect("Failed to list");
    assert!(listed[0].last_used.is_some());
}

#[test]
fn test_verify_unknown_key() {
    let services = test_services();

    let result = services.api_keys.verify("llp_nonexistent");
    assert!(matches!(result, Err(AppError::TokenInvalid)));
}

#[test]
fn test_revoke_is_one_way() {
    let services = test_services();
    let user = create_test_user(&services, "owner@example.com");
    let created = services
        .api_keys
        .create(&user.id, "Doomed", vec![], None)
        .expect("Failed to create key");

    services
        .api_keys
        .revoke(&created.id)
        .expect("Failed to revoke");

    let listed = services.api_keys.list(&user.id).expect("Failed to list");
    assert_eq!(listed[0].status, ApiKeyStatus::Revoked);

    let result = services.api_keys.verify(&created.key);
    assert!(matches!(result, Err(AppError::InvalidState(_))));
}

#[test]
fn test_revoke_missing_key() {
    let services = test_services();

    let result = services.api_keys.revoke("ll_key_missing");
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[test]
fn test_verify_expired_key() {
    let services = test_services();
    let user = create_test_user(&services, "owner@example.com");
    let created = services
        .api_keys
        .create(&user.id, "Expired", vec![], Some(30))
        .expect("Failed to create key");

    // Age the expiry into the past.
    services
        .store()
        .update(keys::API_KEYS, |all: &mut Vec<ApiKey>| {
            for key in all.iter_mut() {
                key.expires_at = Some(past_timestamp(1));
            }
        })
        .expect("Failed to age key");

    let result = services.api_keys.verify(&created.key);
    assert!(matches!(result, Err(AppError::TokenExpired)));
}

#[test]
fn test_delete_removes_key() {
    let services = test_services();
    let user = create_test_user(&services, "owner@example.com");
    let created = services
        .api_keys
        .create(&user.id, "Doomed", vec![], None)
        .expect("Failed to create key");

    services
        .api_keys
        .delete(&created.id)
        .expect("Failed to delete");

    assert!(services.api_keys.list(&user.id).expect("list failed").is_empty());
    assert!(matches!(
        services.api_keys.verify(&created.key),
        Err(AppError::TokenInvalid)
    ));
    assert!(matches!(
        services.api_keys.delete(&created.id),
        Err(AppError::NotFound(_))
    ));
}
