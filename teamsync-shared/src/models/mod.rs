/// Database models for TeamSync
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts and authentication
/// - `project`: Collaboration units with a single owner
/// - `member`: User-project associations with roles
/// - `task`: Tasks owned by a project
///
/// # Example
///
/// ```no_run
/// use teamsync_shared::models::user::{User, CreateUser};
/// use teamsync_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     email: "user@example.com".to_string(),
///     name: "John Doe".to_string(),
///     password_hash: "$argon2id$...".to_string(),
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod member;
pub mod project;
pub mod task;
pub mod user;
