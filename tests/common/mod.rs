//! Test utilities and fixtures for LicenseLock integration tests

#![allow(dead_code)]

pub use licenselock::error::AppError;
pub use licenselock::keygen;
pub use licenselock::models::*;
pub use licenselock::services::*;
pub use licenselock::store::{Store, keys};

/// License key placeholder with the required 23-character shape.
pub const TEST_LICENSE_KEY: &str = "AAAAA-BBBBB-CCCCC-DDDDD";

pub const TEST_PASSWORD: &str = "Sup3r-Secret!";

/// Services wired over a fresh in-memory store, audit log enabled.
pub fn test_services() -> Services {
    Services::new(Store::in_memory(), true)
}

/// Register a user with default values.
pub fn create_test_user(services: &Services, email: &str) -> User {
    services
        .auth
        .register(
            email,
            TEST_PASSWORD,
            &format!("Test User {}", email),
            TEST_LICENSE_KEY,
        )
        .expect("Failed to register test user")
}

/// Create a license with default name and no expiry.
pub fn create_test_license(services: &Services, user_id: &str, max_activations: u32) -> License {
    services
        .licenses
        .create(user_id, "Test License", max_activations, None)
        .expect("Failed to create test license")
}

/// Activate a device with a default name.
pub fn activate_test_device(services: &Services, license_id: &str, hwid: &str) -> Device {
    services
        .devices
        .activate(license_id, hwid, "Test Device")
        .expect("Failed to activate test device")
}

/// Get the current timestamp
pub fn now() -> i64 {
    licenselock::util::now()
}

/// Get a future timestamp (days from now)
pub fn future_timestamp(days: i64) -> i64 {
    now() + (days * 86400)
}

/// Get a past timestamp (days ago)
pub fn past_timestamp(days: i64) -> i64 {
    now() - (days * 86400)
}
