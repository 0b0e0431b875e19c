//! Store accessor tests: defaults, durability, locking, backup/restore.

mod common;

use std::thread;

use common::*;
use licenselock::store::{SqliteBackend, create_pool, init_store};

#[test]
fn test_read_missing_collection_returns_default() {
    let store = Store::in_memory();

    let licenses: Vec<License> = store.read(keys::LICENSES).expect("Failed to read");
    assert!(licenses.is_empty());
}

#[test]
fn test_update_roundtrip() {
    let store = Store::in_memory();

    let inserted = store
        .update(keys::LICENSES, |values: &mut Vec<i64>| {
            values.push(42);
            values.len()
        })
        .expect("Failed to update");
    assert_eq!(inserted, 1);

    let values: Vec<i64> = store.read(keys::LICENSES).expect("Failed to read");
    assert_eq!(values, vec![42]);
}

#[test]
fn test_concurrent_updates_lose_nothing() {
    let store = Store::in_memory();
    const THREADS: usize = 8;
    const PUSHES: usize = 50;

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let store = store.clone();
            thread::spawn(move || {
                for i in 0..PUSHES {
                    store
                        .update("counter_collection", |values: &mut Vec<usize>| {
                            values.push(t * PUSHES + i);
                        })
                        .expect("Failed to update");
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("thread panicked");
    }

    let values: Vec<usize> = store.read("counter_collection").expect("Failed to read");
    assert_eq!(
        values.len(),
        THREADS * PUSHES,
        "interleaved read-modify-write cycles must not clobber each other"
    );
}

#[test]
fn test_sqlite_backend_persists_across_reopen() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir
        .path()
        .join("store.db")
        .to_string_lossy()
        .into_owned();

    let license_id;
    {
        let pool = create_pool(&path).expect("Failed to create pool");
        init_store(&pool.get().expect("Failed to get connection")).expect("init failed");
        let services = Services::new(Store::new(SqliteBackend::new(pool)), true);

        let user = create_test_user(&services, "owner@example.com");
        license_id = create_test_license(&services, &user.id, 1).id;
    }

    let pool = create_pool(&path).expect("Failed to reopen pool");
    init_store(&pool.get().expect("Failed to get connection")).expect("init failed");
    let services = Services::new(Store::new(SqliteBackend::new(pool)), true);

    let license = services
        .licenses
        .get(&license_id)
        .expect("Failed to get license")
        .expect("license should have survived the reopen");
    assert_eq!(license.id, license_id);
}

#[test]
fn test_backup_and_restore() {
    let services = test_services();
    let user = create_test_user(&services, "owner@example.com");
    let license = create_test_license(&services, &user.id, 1);
    activate_test_device(&services, &license.id, "HWID-A");

    services.store().backup().expect("Failed to back up");

    services
        .licenses
        .delete(&license.id)
        .expect("Failed to delete");
    assert!(services
        .licenses
        .list(&user.id)
        .expect("list failed")
        .is_empty());

    services.store().restore().expect("Failed to restore");

    let licenses = services.licenses.list(&user.id).expect("list failed");
    assert_eq!(licenses.len(), 1);
    assert_eq!(licenses[0].id, license.id);
    assert_eq!(
        services
            .devices
            .list_for_license(&license.id)
            .expect("list failed")
            .len(),
        1
    );
}

#[test]
fn test_restore_without_backup() {
    let store = Store::in_memory();

    let result = store.restore();
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[test]
fn test_backup_overwrites_previous_snapshot() {
    let services = test_services();
    let user = create_test_user(&services, "owner@example.com");

    create_test_license(&services, &user.id, 1);
    services.store().backup().expect("Failed to back up");

    create_test_license(&services, &user.id, 1);
    services.store().backup().expect("Failed to back up");

    services.store().restore().expect("Failed to restore");
    assert_eq!(
        services.licenses.list(&user.id).expect("list failed").len(),
        2,
        "the second snapshot should win"
    );
}
