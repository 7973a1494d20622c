// SPDX-License-Identifier: Apache-2.0

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine as _;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;

pub const PASSWORD_SCHEME: &str = "pbkdf2-sha256";
pub const DEFAULT_PASSWORD_ROUNDS: u32 = 100_000;
const SALT_BYTES: usize = 16;
const HASH_BYTES: usize = 32;

/// Stored form: `pbkdf2-sha256$<rounds>$<salt b64>$<hash b64>`.
#[must_use]
pub fn hash_password(password: &str, rounds: u32) -> String {
    let salt: [u8; SALT_BYTES] = rand::random();
    hash_password_with_salt(password, &salt, rounds)
}

#[must_use]
pub fn hash_password_with_salt(password: &str, salt: &[u8], rounds: u32) -> String {
    let rounds = rounds.max(1);
    let mut out = [0_u8; HASH_BYTES];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, rounds, &mut out);
    format!(
        "{PASSWORD_SCHEME}${rounds}${}${}",
        STANDARD_NO_PAD.encode(salt),
        STANDARD_NO_PAD.encode(out)
    )
}

/// False for any stored value that is not in the expected form.
#[must_use]
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.split('$');
    let (Some(scheme), Some(rounds), Some(salt), Some(hash), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return false;
    };
    if scheme != PASSWORD_SCHEME {
        return false;
    }
    let Ok(rounds) = rounds.parse::<u32>() else {
        return false;
    };
    let (Ok(salt), Ok(expected)) = (STANDARD_NO_PAD.decode(salt), STANDARD_NO_PAD.decode(hash))
    else {
        return false;
    };
    if rounds == 0 || expected.len() != HASH_BYTES {
        return false;
    }
    let mut actual = [0_u8; HASH_BYTES];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, rounds, &mut actual);
    constant_time_eq(&actual, &expected)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0_u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_round_trips_and_rejects_wrong_password() {
        let stored = hash_password("password", 1_000);
        assert!(stored.starts_with("pbkdf2-sha256$1000$"));
        assert!(verify_password("password", &stored));
        assert!(!verify_password("Password", &stored));
    }

    #[test]
    fn salts_differ_between_hashes() {
        assert_ne!(hash_password("password", 10), hash_password("password", 10));
    }

    #[test]
    fn foreign_formats_never_verify() {
        for stored in [
            "",
            "password",
            "bcrypt$10$abc$def",
            "pbkdf2-sha256$0$c2FsdA$aGFzaA",
            "pbkdf2-sha256$10$c2FsdA$aGFzaA",
            "pbkdf2-sha256$10$c2FsdA$aGFzaA$extra",
        ] {
            assert!(!verify_password("password", stored), "{stored}");
        }
    }

    #[test]
    fn known_vector_is_stable() {
        let stored = hash_password_with_salt("password", b"salt", 1);
        assert_eq!(stored, hash_password_with_salt("password", b"salt", 1));
        assert!(verify_password("password", &stored));
    }
}
