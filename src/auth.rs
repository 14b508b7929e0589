use base64::{engine::general_purpose::STANDARD, Engine};
use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};
use std::num::NonZeroU32;

use crate::shared::Credentials;

pub const MAX_USERNAME_LEN: usize = 64;

const HASH_SCHEME: &str = "pbkdf2-sha256";
const PBKDF2_ITERATIONS: u32 = 100_000;
const SALT_LENGTH: usize = 16;
const CREDENTIAL_LENGTH: usize = 32;

/// Checks a username/password pair before it reaches the store.
pub fn validate_credentials(credentials: &Credentials) -> Result<(), &'static str> {
    let username = credentials.username.trim();

    if username.is_empty() || credentials.password.is_empty() {
        return Err("username and password are required");
    }

    if username.len() > MAX_USERNAME_LEN {
        return Err("username is too long");
    }

    if username != credentials.username {
        return Err("username must not start or end with whitespace");
    }

    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == '.')
    {
        return Err("username may only contain letters, digits, '_', '-' and '.'");
    }

    Ok(())
}

/// Salted PBKDF2-HMAC-SHA256, stored as `pbkdf2-sha256$<iterations>$<salt>$<hash>`
/// with base64 salt and hash.
pub fn hash_password(password: &str) -> Result<String, ring::error::Unspecified> {
    let mut salt = [0u8; SALT_LENGTH];
    SystemRandom::new().fill(&mut salt)?;

    let mut hash = [0u8; CREDENTIAL_LENGTH];
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        pbkdf2_iterations(),
        &salt,
        password.as_bytes(),
        &mut hash,
    );

    Ok(format!(
        "{}${}${}${}",
        HASH_SCHEME,
        PBKDF2_ITERATIONS,
        STANDARD.encode(salt),
        STANDARD.encode(hash)
    ))
}

/// Checks `password` against a value produced by [`hash_password`].
/// Malformed stored values never match.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.split('$');
    let (Some(scheme), Some(iterations), Some(salt), Some(hash), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return false;
    };

    if scheme != HASH_SCHEME {
        return false;
    }

    let Some(iterations) = iterations.parse::<u32>().ok().and_then(NonZeroU32::new) else {
        return false;
    };

    let (Ok(salt), Ok(hash)) = (STANDARD.decode(salt), STANDARD.decode(hash)) else {
        return false;
    };

    // Constant-time comparison happens inside ring
    pbkdf2::verify(
        pbkdf2::PBKDF2_HMAC_SHA256,
        iterations,
        &salt,
        password.as_bytes(),
        &hash,
    )
    .is_ok()
}

fn pbkdf2_iterations() -> NonZeroU32 {
    NonZeroU32::new(PBKDF2_ITERATIONS).unwrap_or(NonZeroU32::MIN)
}
