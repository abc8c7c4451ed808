/// Database models for Taskpad
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: Authentication principals
/// - `task`: Per-user task records; every query is scoped to an owner
///
/// # Example
///
/// ```no_run
/// use taskpad_shared::models::user::{CreateUser, User};
/// use taskpad_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(
///     &pool,
///     CreateUser {
///         username: "alice".to_string(),
///         email: "alice@example.com".to_string(),
///         password_hash: "$argon2id$...".to_string(),
///     },
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```

pub mod task;
pub mod user;
