/// Owner-scoped task CRUD endpoints
///
/// Every handler extracts the authenticated principal from the request and
/// passes it to the model layer, which folds it into the SQL predicate. A
/// task that belongs to someone else yields the same 404 as a task that does
/// not exist; the error must not reveal whether the resource exists.
///
/// # Endpoints
///
/// - `GET    /api/tasks/`      - List (page size 10, newest first)
/// - `POST   /api/tasks/`      - Create (owner forced server-side)
/// - `GET    /api/tasks/:id/`  - Fetch one
/// - `PUT    /api/tasks/:id/`  - Full update (title required)
/// - `PATCH  /api/tasks/:id/`  - Partial update (only supplied fields)
/// - `DELETE /api/tasks/:id/`  - Delete
///
/// Write payloads are validated field by field so a single 400 response
/// names every invalid field. Unknown fields are silently ignored.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, FieldError},
    pagination::{page_offset, Page, PAGE_SIZE},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use taskpad_shared::{
    auth::context::AuthContext,
    models::task::{CreateTask, Task, UpdateTask},
};
use uuid::Uuid;

/// Maximum title length in characters
const TITLE_MAX_CHARS: usize = 100;

/// Public representation of a task
///
/// The owner is implied by the session and never echoed.
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskResponse {
    /// Task ID
    pub id: Uuid,

    /// Title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Completion flag
    pub is_completed: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last mutation timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            is_completed: task.is_completed,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

/// Validated fields extracted from a task write payload
#[derive(Debug, Default, PartialEq)]
struct TaskWrite {
    title: Option<String>,
    description: Option<Option<String>>,
    is_completed: Option<bool>,
}

/// Validates a task write payload field by field
///
/// With `require_title` set (create and PUT), a missing title is an error;
/// without it (PATCH), only supplied fields are validated. Errors accumulate
/// so every invalid field is reported at once. Unknown fields are ignored.
fn parse_task_payload(body: &Value, require_title: bool) -> Result<TaskWrite, ApiError> {
    let Some(object) = body.as_object() else {
        return Err(ApiError::BadRequest("Expected a JSON object".to_string()));
    };

    let mut errors = Vec::new();
    let mut write = TaskWrite::default();

    match object.get("title") {
        None | Some(Value::Null) => {
            if require_title {
                errors.push(FieldError::new("title", "This field is required."));
            }
        }
        Some(Value::String(s)) if s.is_empty() => {
            errors.push(FieldError::new("title", "This field may not be blank."));
        }
        Some(Value::String(s)) if s.chars().count() > TITLE_MAX_CHARS => {
            errors.push(FieldError::new(
                "title",
                "Ensure this field has no more than 100 characters.",
            ));
        }
        Some(Value::String(s)) => write.title = Some(s.clone()),
        Some(_) => errors.push(FieldError::new("title", "Not a valid string.")),
    }

    match object.get("description") {
        None => {}
        Some(Value::Null) => write.description = Some(None),
        Some(Value::String(s)) => write.description = Some(Some(s.clone())),
        Some(_) => errors.push(FieldError::new("description", "Not a valid string.")),
    }

    match object.get("is_completed") {
        None | Some(Value::Null) => {}
        Some(Value::Bool(b)) => write.is_completed = Some(*b),
        // A string like "true" is not a boolean
        Some(_) => errors.push(FieldError::new(
            "is_completed",
            "Must be a valid boolean.",
        )),
    }

    if errors.is_empty() {
        Ok(write)
    } else {
        Err(ApiError::Validation(errors))
    }
}

/// Query parameters for the list endpoint
#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// 1-based page number; the page size itself is fixed
    pub page: Option<String>,
}

/// Lists the authenticated user's tasks
///
/// Ordered by `created_at` descending, windowed at 10 per page. An
/// out-of-range or non-numeric page is a 404, matching the rest of the
/// pagination contract.
pub async fn list_tasks(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Page<TaskResponse>>> {
    let page: u64 = match params.page {
        None => 1,
        Some(raw) => raw.parse().map_err(|_| ApiError::NotFound)?,
    };

    let count = Task::count_for_user(&state.db, auth.user_id).await?;
    let offset = page_offset(page, count).ok_or(ApiError::NotFound)?;

    let tasks = Task::list_for_user(&state.db, auth.user_id, PAGE_SIZE, offset).await?;
    let results = tasks.into_iter().map(TaskResponse::from).collect();

    Ok(Json(Page::new("/api/tasks/", page, count, results)))
}

/// Creates a task owned by the authenticated user
///
/// The owner always comes from the access token; any owner field in the
/// payload is ignored along with all other unknown fields.
pub async fn create_task(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<TaskResponse>)> {
    let write = parse_task_payload(&body, true)?;
    let Some(title) = write.title else {
        return Err(ApiError::Internal(
            "title missing after create validation".to_string(),
        ));
    };

    let task = Task::create(
        &state.db,
        auth.user_id,
        CreateTask {
            title,
            description: write.description.flatten(),
            is_completed: write.is_completed.unwrap_or(false),
        },
    )
    .await?;

    tracing::debug!(task_id = %task.id, "Task created");

    Ok((StatusCode::CREATED, Json(TaskResponse::from(task))))
}

/// Fetches one of the authenticated user's tasks
///
/// 404 when the task does not exist or belongs to another user.
pub async fn get_task(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TaskResponse>> {
    let task = Task::find_for_user(&state.db, auth.user_id, id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(TaskResponse::from(task)))
}

/// Applies a validated write to a task, shared by PUT and PATCH
async fn apply_update(
    state: &AppState,
    auth: AuthContext,
    id: Uuid,
    write: TaskWrite,
) -> ApiResult<Json<TaskResponse>> {
    let task = Task::update_for_user(
        &state.db,
        auth.user_id,
        id,
        UpdateTask {
            title: write.title,
            description: write.description,
            is_completed: write.is_completed,
        },
    )
    .await?
    .ok_or(ApiError::NotFound)?;

    Ok(Json(TaskResponse::from(task)))
}

/// Full update (PUT): title must be present and valid
pub async fn update_task(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> ApiResult<Json<TaskResponse>> {
    let write = parse_task_payload(&body, true)?;
    apply_update(&state, auth, id, write).await
}

/// Partial update (PATCH): only supplied fields are validated and written
pub async fn patch_task(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> ApiResult<Json<TaskResponse>> {
    let write = parse_task_payload(&body, false)?;
    apply_update(&state, auth, id, write).await
}

/// Deletes one of the authenticated user's tasks
///
/// 204 on success; 404 when missing or owned by another user.
pub async fn delete_task(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let deleted = Task::delete_for_user(&state.db, auth.user_id, id).await?;

    if !deleted {
        return Err(ApiError::NotFound);
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field_names(err: ApiError) -> Vec<String> {
        match err {
            ApiError::Validation(errors) => errors.into_iter().map(|e| e.field).collect(),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_valid_create_payload() {
        let body = json!({
            "title": "Test Task",
            "description": "Test Description",
            "is_completed": false
        });

        let write = parse_task_payload(&body, true).unwrap();
        assert_eq!(write.title.as_deref(), Some("Test Task"));
        assert_eq!(
            write.description,
            Some(Some("Test Description".to_string()))
        );
        assert_eq!(write.is_completed, Some(false));
    }

    #[test]
    fn test_missing_title_rejected_on_create() {
        let body = json!({ "description": "Test Description" });

        let err = parse_task_payload(&body, true).unwrap_err();
        assert_eq!(field_names(err), vec!["title"]);
    }

    #[test]
    fn test_missing_title_allowed_on_partial() {
        let body = json!({ "is_completed": true });

        let write = parse_task_payload(&body, false).unwrap();
        assert!(write.title.is_none());
        assert_eq!(write.is_completed, Some(true));
    }

    #[test]
    fn test_empty_title_rejected() {
        let body = json!({ "title": "" });

        let err = parse_task_payload(&body, false).unwrap_err();
        assert_eq!(field_names(err), vec!["title"]);
    }

    #[test]
    fn test_title_over_100_chars_rejected() {
        let body = json!({ "title": "x".repeat(101) });
        assert!(parse_task_payload(&body, true).is_err());

        // Exactly 100 is fine
        let body = json!({ "title": "x".repeat(100) });
        assert!(parse_task_payload(&body, true).is_ok());
    }

    #[test]
    fn test_title_limit_counts_characters_not_bytes() {
        // 100 two-byte characters
        let body = json!({ "title": "é".repeat(100) });
        assert!(parse_task_payload(&body, true).is_ok());
    }

    #[test]
    fn test_non_boolean_is_completed_rejected() {
        let body = json!({ "title": "ok", "is_completed": "not_a_boolean" });

        let err = parse_task_payload(&body, true).unwrap_err();
        assert_eq!(field_names(err), vec!["is_completed"]);
    }

    #[test]
    fn test_all_invalid_fields_reported_together() {
        let body = json!({ "title": "", "is_completed": "not_a_boolean" });

        let mut fields = field_names(parse_task_payload(&body, true).unwrap_err());
        fields.sort();
        assert_eq!(fields, vec!["is_completed", "title"]);
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let body = json!({
            "title": "Test Task",
            "extra_field": "extra_value",
            "user_id": "not-yours-to-set",
            "created_at": "2020-01-01T00:00:00Z"
        });

        let write = parse_task_payload(&body, true).unwrap();
        assert_eq!(write.title.as_deref(), Some("Test Task"));
    }

    #[test]
    fn test_null_description_clears() {
        let body = json!({ "description": null });

        let write = parse_task_payload(&body, false).unwrap();
        assert_eq!(write.description, Some(None));
    }

    #[test]
    fn test_non_object_body_is_bad_request() {
        let body = json!(["not", "an", "object"]);
        assert!(matches!(
            parse_task_payload(&body, true),
            Err(ApiError::BadRequest(_))
        ));
    }
}
