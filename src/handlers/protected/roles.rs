// handlers/protected/roles.rs - /api/roles handlers, admin only
//
// The built-in `admin` and `regular` roles can be listed but never renamed
// or removed, since authorization and signup look them up by title.

use axum::extract::State;
use serde::Deserialize;

use crate::api::{Message, RoleList, RoleMessage};
use crate::database::models::Role;
use crate::error::ApiError;
use crate::handlers::utils::{reject_if_invalid, required_trimmed, FieldErrors};
use crate::middleware::{ApiResponse, ApiResult, JsonBody, PathParam};
use crate::state::AppState;
use crate::types::{ADMIN_ROLE, REGULAR_ROLE};

#[derive(Debug, Default, Deserialize)]
pub struct RolePayload {
    pub title: Option<String>,
}

/// POST /api/roles
pub async fn create(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RolePayload>,
) -> ApiResult<RoleMessage> {
    let title = validated_title(payload)?;

    if state.store.find_role_by_title(&title).await?.is_some() {
        return Err(ApiError::conflict(format!("Role '{}' already exists", title)));
    }

    let role = state.store.create_role(&title).await?;
    tracing::info!("Created role {} ({})", role.id, role.title);

    Ok(ApiResponse::created(RoleMessage {
        message: "Role created successfully".to_string(),
        role,
    }))
}

/// GET /api/roles
pub async fn list(State(state): State<AppState>) -> ApiResult<RoleList> {
    let roles = state.store.list_roles().await?;
    Ok(ApiResponse::success(RoleList { roles }))
}

/// PUT /api/roles/:id
pub async fn update(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
    JsonBody(payload): JsonBody<RolePayload>,
) -> ApiResult<RoleMessage> {
    let existing = find(&state, id).await?;
    ensure_not_builtin(&existing)?;

    let title = validated_title(payload)?;
    if let Some(other) = state.store.find_role_by_title(&title).await? {
        if other.id != id {
            return Err(ApiError::conflict(format!("Role '{}' already exists", title)));
        }
    }

    let role = state
        .store
        .update_role(id, &title)
        .await?
        .ok_or_else(|| ApiError::not_found("Role not found"))?;

    Ok(ApiResponse::success(RoleMessage {
        message: "Role updated successfully".to_string(),
        role,
    }))
}

/// DELETE /api/roles/:id - 409 while users still hold the role
pub async fn delete(State(state): State<AppState>, PathParam(id): PathParam<i32>) -> ApiResult<Message> {
    let existing = find(&state, id).await?;
    ensure_not_builtin(&existing)?;

    if !state.store.delete_role(id).await? {
        return Err(ApiError::not_found("Role not found"));
    }

    tracing::info!("Deleted role {} ({})", id, existing.title);
    Ok(ApiResponse::success(Message::new("Role successfully deleted")))
}

async fn find(state: &AppState, id: i32) -> Result<Role, ApiError> {
    state
        .store
        .find_role(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Role not found"))
}

fn validated_title(payload: RolePayload) -> Result<String, ApiError> {
    let mut errors = FieldErrors::new();
    let title = required_trimmed("title", payload.title, &mut errors);
    reject_if_invalid(errors)?;
    title.ok_or_else(|| ApiError::bad_request("Missing required fields"))
}

fn ensure_not_builtin(role: &Role) -> Result<(), ApiError> {
    if role.title == ADMIN_ROLE || role.title == REGULAR_ROLE {
        return Err(ApiError::forbidden(format!("Built-in role '{}' cannot be modified", role.title)));
    }
    Ok(())
}
