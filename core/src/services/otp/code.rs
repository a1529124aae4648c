//! Code generation and at-rest protection

use constant_time_eq::constant_time_eq;
use rand::{rngs::OsRng, Rng, RngCore};
use sha2::{Digest, Sha256};

use crate::domain::entities::OtpRecord;

/// Number of digits in a delivery code
pub const CODE_LENGTH: usize = 4;

/// Smallest code handed out
pub const CODE_MIN: u32 = 1000;

/// Largest code handed out
pub const CODE_MAX: u32 = 9999;

const SALT_BYTES: usize = 16;

/// Draw a code uniformly from `[CODE_MIN, CODE_MAX]` using the OS CSPRNG
pub(crate) fn generate_code() -> String {
    OsRng.gen_range(CODE_MIN..=CODE_MAX).to_string()
}

/// Fresh random salt, hex encoded
pub(crate) fn generate_salt() -> String {
    let mut bytes = [0u8; SALT_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Hex SHA-256 of `salt || code`
pub(crate) fn hash_code(code: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(code.as_bytes());
    hex::encode(hasher.finalize())
}

/// Constant-time check of `input` against the record's stored digest
pub(crate) fn code_matches(record: &OtpRecord, input: &str) -> bool {
    let candidate = hash_code(input.trim(), &record.salt);
    constant_time_eq(candidate.as_bytes(), record.code_hash.as_bytes())
}
