// handlers/protected/users.rs - /api/users handlers behind the JWT layer
//
// Route layers already enforce admin-only (list, get) and owner-or-admin
// (update, delete); the handlers only add the checks that depend on the body.

use axum::{extract::State, Extension};
use serde::Deserialize;

use crate::api::{Message, UserList, UserMessage};
use crate::auth::hash_password;
use crate::database::models::{User, UserChanges};
use crate::database::{Page, PageQuery};
use crate::error::ApiError;
use crate::handlers::utils::{email, optional_trimmed, reject_if_invalid, FieldErrors};
use crate::middleware::{ApiResponse, ApiResult, AuthUser, JsonBody, PathParam, QueryParams};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(rename = "roleID")]
    pub role_id: Option<i32>,
}

/// GET /api/users/logout - tokens are stateless; the client just drops its copy
pub async fn logout(Extension(user): Extension<AuthUser>) -> ApiResult<Message> {
    tracing::info!("User {} logged out", user.id);
    Ok(ApiResponse::success(Message::new("Successfully logged out")))
}

/// GET /api/users - admin only
pub async fn list(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<PageQuery>,
) -> ApiResult<UserList> {
    let page = Page::resolve(&query, &state.config.pagination);
    let (users, total) = state.store.list_users(page).await?;

    Ok(ApiResponse::success(UserList {
        users,
        meta_data: page.meta(total),
    }))
}

/// GET /api/users/:id - admin only
pub async fn get(State(state): State<AppState>, PathParam(id): PathParam<i32>) -> ApiResult<User> {
    let user = state
        .store
        .find_user(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(ApiResponse::success(user))
}

/// PUT /api/users/:id - owner or admin; only admins may move a user to another role
pub async fn update(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    PathParam(id): PathParam<i32>,
    JsonBody(body): JsonBody<UserUpdate>,
) -> ApiResult<UserMessage> {
    let existing = state
        .store
        .find_user(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    if let Some(role_id) = body.role_id {
        if role_id != existing.role_id && !caller.is_admin() {
            return Err(ApiError::forbidden("Only admins can change a user's role"));
        }
        if state.store.find_role(role_id).await?.is_none() {
            let mut errors = FieldErrors::new();
            errors.insert("roleID".to_string(), format!("Role {} does not exist", role_id));
            return Err(ApiError::validation_error("Missing or invalid fields", errors));
        }
    }

    let mut errors = FieldErrors::new();
    let first_name = optional_trimmed("firstName", body.first_name, &mut errors);
    let last_name = optional_trimmed("lastName", body.last_name, &mut errors);
    let new_email = match body.email {
        Some(value) => email("email", Some(value), &mut errors),
        None => None,
    };
    if matches!(body.password.as_deref(), Some("")) {
        errors.insert("password".to_string(), "This field is required".to_string());
    }
    reject_if_invalid(errors)?;

    if let Some(ref new_email) = new_email {
        if let Some(other) = state.store.find_user_by_email(new_email).await? {
            if other.id != id {
                return Err(ApiError::conflict("Email already exists"));
            }
        }
    }

    let password = match body.password {
        Some(p) => Some(hash_password(&p, state.config.security.bcrypt_cost).await?),
        None => None,
    };

    let changes = UserChanges {
        first_name,
        last_name,
        email: new_email,
        password,
        role_id: body.role_id,
    };

    let user = if changes.is_empty() {
        existing
    } else {
        state
            .store
            .update_user(id, changes)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))?
    };

    tracing::info!("User {} updated user {}", caller.id, id);
    Ok(ApiResponse::success(UserMessage {
        message: "User updated successfully".to_string(),
        user,
    }))
}

/// DELETE /api/users/:id - owner or admin; owned documents go with the user
pub async fn delete(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    PathParam(id): PathParam<i32>,
) -> ApiResult<Message> {
    if !state.store.delete_user(id).await? {
        return Err(ApiError::not_found("User not found"));
    }

    tracing::info!("User {} deleted user {}", caller.id, id);
    Ok(ApiResponse::success(Message::new("User successfully deleted")))
}
