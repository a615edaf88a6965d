//! Cryptographic Utilities

use rand::{Rng, RngCore, rngs::OsRng};

/// Generate cryptographically secure random bytes
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Generate a string of exactly `len` random decimal digits
///
/// Each digit is drawn uniformly and independently from `OsRng`.
/// No uniqueness guarantee across calls; deduplication, if wanted,
/// is the caller's concern.
pub fn random_digits(len: usize) -> String {
    let mut code = String::with_capacity(len);
    for _ in 0..len {
        let digit: u8 = OsRng.gen_range(0..10);
        code.push(char::from(b'0' + digit));
    }
    code
}
