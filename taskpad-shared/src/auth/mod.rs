/// Authentication utilities
///
/// This module provides the authentication primitives for Taskpad:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: JWT access/refresh token generation and validation
/// - [`context`]: Per-request authenticated principal (`AuthContext`)
///
/// # Security
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations
/// - **JWT Tokens**: HS256 signing; short-lived access, longer-lived refresh
/// - **Verification**: constant-time comparison via the argon2 crate
///
/// # Example
///
/// ```
/// use taskpad_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
/// # Ok(())
/// # }
/// ```

pub mod context;
pub mod jwt;
pub mod password;
