/// Authentication and authorization utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`token`]: opaque session token generation and digests
/// - [`session`]: signup, login, logout, and token resolution
/// - [`authorization`]: ownership and assignment guards
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations
/// - **Session Tokens**: opaque random bearer tokens, stored as SHA-256
///   digests, revocable and without built-in expiry
/// - **Constant-time Comparison**: in-memory digest comparison never
///   short-circuits
/// - **Uniform Refusals**: login failures and guard refusals do not leak
///   whether the target exists
///
/// # Example
///
/// ```no_run
/// use crewtask_shared::auth::password::{hash_password, verify_password};
/// use crewtask_shared::auth::token::generate_token;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password_123")?;
/// assert!(verify_password("user_password_123", &hash)?);
///
/// let (raw_token, digest) = generate_token();
/// # let _ = (raw_token, digest);
/// # Ok(())
/// # }
/// ```
pub mod authorization;
pub mod password;
pub mod session;
pub mod token;
