/// Task model and ownership-scoped database operations
///
/// Tasks are the core entity of Taskpad. Every accessor on this model takes
/// the owner's user ID and folds it into the SQL predicate; there is no way
/// to read or mutate a task through this API without naming its owner. A
/// task that exists but belongs to someone else is therefore
/// indistinguishable from a task that does not exist.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title VARCHAR(100) NOT NULL CHECK (title <> ''),
///     description TEXT,
///     is_completed BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskpad_shared::models::task::{CreateTask, Task};
/// use taskpad_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example(owner: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create(
///     &pool,
///     owner,
///     CreateTask {
///         title: "Water the plants".to_string(),
///         description: None,
///         is_completed: false,
///     },
/// )
/// .await?;
///
/// // Only the owner sees it
/// let page = Task::list_for_user(&pool, owner, 10, 0).await?;
/// assert_eq!(page[0].id, task.id);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Task model representing a single to-do item
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID (UUID v4)
    pub id: Uuid,

    /// Owning user; set once at creation, never client-supplied
    pub user_id: Uuid,

    /// Title, non-empty and at most 100 characters
    pub title: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Completion flag (defaults to false)
    pub is_completed: bool,

    /// When the task was created (immutable)
    pub created_at: DateTime<Utc>,

    /// When the task was last mutated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
///
/// The owner is not part of this struct: it is always taken from the
/// authenticated principal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Task title (validated at the API boundary)
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Completion flag
    pub is_completed: bool,
}

/// Input for updating an existing task
///
/// All fields are optional; only supplied fields are written. For PATCH the
/// absent fields keep their prior values, for PUT the API layer fills in
/// every field before calling `update_for_user`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    /// New title
    pub title: Option<String>,

    /// New description (use Some(None) to clear)
    pub description: Option<Option<String>>,

    /// New completion flag
    pub is_completed: Option<bool>,
}

impl Task {
    /// Creates a new task owned by `user_id`
    ///
    /// # Errors
    ///
    /// Returns an error if the owner does not exist (foreign key violation)
    /// or the database is unreachable.
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        data: CreateTask,
    ) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (user_id, title, description, is_completed)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, title, description, is_completed, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.is_completed)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID, visible only to its owner
    ///
    /// Returns `None` both when no such task exists and when it belongs to a
    /// different user.
    pub async fn find_for_user(
        pool: &PgPool,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, description, is_completed, created_at, updated_at
            FROM tasks
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists a window of the owner's tasks, most recent first
    ///
    /// Ordering is `created_at DESC, id DESC` so pages are stable even when
    /// several tasks share a creation timestamp.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, description, is_completed, created_at, updated_at
            FROM tasks
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Counts the owner's tasks
    pub async fn count_for_user(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Updates a task, restricted to its owner
    ///
    /// Only non-None fields in `data` are written; `updated_at` is always
    /// refreshed. Returns `None` when the task is missing or owned by a
    /// different user.
    pub async fn update_for_user(
        pool: &PgPool,
        user_id: Uuid,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build the update dynamically based on which fields are present
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 2;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.is_completed.is_some() {
            bind_count += 1;
            query.push_str(&format!(", is_completed = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 AND user_id = $2 \
             RETURNING id, user_id, title, description, is_completed, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id).bind(user_id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(is_completed) = data.is_completed {
            q = q.bind(is_completed);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Deletes a task, restricted to its owner
    ///
    /// # Returns
    ///
    /// True if the task existed, was owned by `user_id`, and was deleted
    pub async fn delete_for_user(
        pool: &PgPool,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
