//! Random key and secret generation.
//!
//! Everything here is plain `rand` output with no server-side registration:
//! license keys, API keys, TOTP secrets, backup codes, and the mock hardware
//! and network identifiers the dashboard fabricates for devices.

use rand::Rng;

/// Alphabet for license keys: uppercase letters and digits.
const LICENSE_KEY_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Alphabet for API keys and hardware IDs: mixed-case letters and digits.
const ALNUM_CHARS: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Alphabet for TOTP secrets (RFC 4648 base32, no padding).
const BASE32_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// Alphabet for backup codes: uppercase letters and digits, matching the
/// base-36 codes the dashboard has always issued.
const BACKUP_CODE_CHARS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Length of a formatted license key: 4 groups of 5 chars plus 3 hyphens.
pub const LICENSE_KEY_LEN: usize = 23;

/// Prefix on every issued API key.
pub const API_KEY_PREFIX: &str = "llp_";

/// Number of random characters after the API key prefix.
const API_KEY_RANDOM_LEN: usize = 48;

const TOTP_SECRET_LEN: usize = 32;
const BACKUP_CODE_COUNT: usize = 10;
const BACKUP_CODE_LEN: usize = 8;
const HWID_LEN: usize = 32;

fn random_string(alphabet: &[u8], len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())] as char)
        .collect()
}

/// Generate a license key: `XXXXX-XXXXX-XXXXX-XXXXX` from `[A-Z0-9]`.
pub fn generate_license_key() -> String {
    (0..4)
        .map(|_| random_string(LICENSE_KEY_CHARS, 5))
        .collect::<Vec<_>>()
        .join("-")
}

/// Generate an API key: the `llp_` prefix followed by 48 alphanumerics.
pub fn generate_api_key() -> String {
    format!("{}{}", API_KEY_PREFIX, random_string(ALNUM_CHARS, API_KEY_RANDOM_LEN))
}

/// Generate a 32-character base32 TOTP secret.
pub fn generate_totp_secret() -> String {
    random_string(BASE32_CHARS, TOTP_SECRET_LEN)
}

/// Generate ten single-use backup codes, 8 characters each.
pub fn generate_backup_codes() -> Vec<String> {
    (0..BACKUP_CODE_COUNT)
        .map(|_| random_string(BACKUP_CODE_CHARS, BACKUP_CODE_LEN))
        .collect()
}

/// Generate a stand-in hardware fingerprint for a device.
pub fn generate_hwid() -> String {
    random_string(ALNUM_CHARS, HWID_LEN)
}

/// Fabricate a private-range IP address for a freshly activated device.
/// A real deployment would record the caller's observed address instead.
pub fn mock_ip_address() -> String {
    let mut rng = rand::thread_rng();
    format!("192.168.{}.{}", rng.gen_range(0..255), rng.gen_range(0..255))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_license_key_format() {
        let key = generate_license_key();
        assert_eq!(key.len(), LICENSE_KEY_LEN);

        let groups: Vec<&str> = key.split('-').collect();
        assert_eq!(groups.len(), 4);
        for group in groups {
            assert_eq!(group.len(), 5);
            assert!(group
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()));
        }
    }

    #[test]
    fn test_license_keys_are_unique() {
        let a = generate_license_key();
        let b = generate_license_key();
        assert_ne!(a, b);
    }

    #[test]
    fn test_api_key_format() {
        let key = generate_api_key();
        assert!(key.starts_with(API_KEY_PREFIX));
        assert_eq!(key.len(), API_KEY_PREFIX.len() + 48);
        assert!(key[API_KEY_PREFIX.len()..]
            .bytes()
            .all(|b| b.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_totp_secret_is_base32() {
        let secret = generate_totp_secret();
        assert_eq!(secret.len(), 32);
        assert!(secret
            .bytes()
            .all(|b| b.is_ascii_uppercase() || (b'2'..=b'7').contains(&b)));
    }

    #[test]
    fn test_backup_codes() {
        let codes = generate_backup_codes();
        assert_eq!(codes.len(), 10);
        for code in &codes {
            assert_eq!(code.len(), 8);
            assert!(code
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()));
        }
    }

    #[test]
    fn test_mock_ip_address_is_private() {
        let ip = mock_ip_address();
        assert!(ip.starts_with("192.168."));
        assert_eq!(ip.split('.').count(), 4);
    }
}
