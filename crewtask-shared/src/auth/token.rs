/// Session token utilities
///
/// Login hands out opaque bearer tokens; this module generates them and
/// derives the digest that actually gets persisted. These work in
/// conjunction with the `models::session` module for database operations.
///
/// # Token format
///
/// Tokens follow the pattern `crew_abcd1234efgh5678...` (37 chars total):
/// - Prefix: "crew_" (5 chars)
/// - Random part: 32 alphanumeric chars (base62: [A-Za-z0-9])
///
/// The raw token is returned to the client exactly once; only its SHA-256
/// hex digest is stored, so a leaked `sessions` table cannot be replayed.
///
/// # Example
///
/// ```
/// use crewtask_shared::auth::token::{generate_token, hash_token, validate_token_format};
///
/// let (token, hash) = generate_token();
/// assert!(token.starts_with("crew_"));
/// assert_eq!(token.len(), 37);
///
/// assert!(validate_token_format(&token));
/// assert_eq!(hash, hash_token(&token));
/// ```
use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of the random part of a session token (characters)
const TOKEN_RANDOM_LENGTH: usize = 32;

/// Session token prefix
const TOKEN_PREFIX: &str = "crew_";

/// Total length of a session token (prefix + random)
pub const TOKEN_LENGTH: usize = TOKEN_PREFIX.len() + TOKEN_RANDOM_LENGTH;

/// Generates a new session token
///
/// Returns the tuple `(raw_token, sha256_hash)`. The raw token goes to the
/// client; the hash goes to the `sessions` table. Key space is 62^32,
/// roughly 2^190 combinations, drawn from `rand::thread_rng()`.
pub fn generate_token() -> (String, String) {
    let random_part = generate_random_string(TOKEN_RANDOM_LENGTH);
    let token = format!("{}{}", TOKEN_PREFIX, random_part);
    let hash = hash_token(&token);

    (token, hash)
}

/// Generates a random alphanumeric string
///
/// Uses base62 encoding (A-Z, a-z, 0-9) so tokens stay header-safe.
fn generate_random_string(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();

    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Hashes a session token using SHA-256
///
/// Returns the hex-encoded digest (64 characters). Deterministic, so a
/// presented token can be looked up by recomputing this.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Validates session token format
///
/// Checks the prefix, the exact length, and that the random part is
/// alphanumeric. A malformed token can be rejected without a database
/// round trip.
pub fn validate_token_format(token: &str) -> bool {
    if token.len() != TOKEN_LENGTH {
        return false;
    }

    if !token.starts_with(TOKEN_PREFIX) {
        return false;
    }

    let random_part = &token[TOKEN_PREFIX.len()..];
    random_part.chars().all(|c| c.is_alphanumeric())
}

/// Constant-time string comparison
///
/// Always compares the full length and accumulates differences with
/// bitwise OR, so the comparison time does not depend on where the inputs
/// diverge. Session lookups go through the digest column; this exists for
/// any in-memory digest comparison.
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut result = 0u8;
    for i in 0..a_bytes.len() {
        result |= a_bytes[i] ^ b_bytes[i];
    }

    result == 0
}
