// handlers/public/users.rs - POST /api/users and POST /api/users/login
//
// The only unauthenticated user endpoints. Both answer `{message, token, user}`
// so a client can start a session straight after signup.

use axum::extract::State;
use serde::Deserialize;

use crate::api::AuthResponse;
use crate::auth::{generate_jwt, hash_password, verify_password, Claims};
use crate::database::models::{NewUser, User};
use crate::error::ApiError;
use crate::handlers::utils::{email, reject_if_invalid, required_trimmed, FieldErrors};
use crate::middleware::{ApiResponse, ApiResult, JsonBody};
use crate::state::AppState;
use crate::types::REGULAR_ROLE;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /api/users - self registration, always with the regular role
pub async fn signup(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<SignupRequest>,
) -> ApiResult<AuthResponse> {
    let mut errors = FieldErrors::new();
    let first_name = required_trimmed("firstName", request.first_name, &mut errors);
    let last_name = required_trimmed("lastName", request.last_name, &mut errors);
    let email = email("email", request.email, &mut errors);
    let password = required_password(request.password, &mut errors);
    reject_if_invalid(errors)?;

    let (Some(first_name), Some(last_name), Some(email), Some(password)) =
        (first_name, last_name, email, password)
    else {
        return Err(ApiError::bad_request("Missing required fields"));
    };

    if state.store.find_user_by_email(&email).await?.is_some() {
        return Err(ApiError::conflict("Email already exists"));
    }

    let role = state
        .store
        .find_role_by_title(REGULAR_ROLE)
        .await?
        .ok_or_else(|| {
            tracing::error!("Role '{}' missing; was the store seeded?", REGULAR_ROLE);
            ApiError::internal_server_error("Default role is not configured")
        })?;

    let hash = hash_password(&password, state.config.security.bcrypt_cost).await?;
    let user = state
        .store
        .create_user(NewUser {
            first_name,
            last_name,
            email,
            password: hash,
            role_id: role.id,
        })
        .await?;

    tracing::info!("Registered user {} ({})", user.id, user.email);

    let token = issue_token(&state, &user, role.title)?;
    Ok(ApiResponse::created(AuthResponse {
        message: "User created successfully".to_string(),
        token,
        user,
    }))
}

/// POST /api/users/login
pub async fn login(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> ApiResult<AuthResponse> {
    let mut errors = FieldErrors::new();
    let email = required_trimmed("email", request.email, &mut errors).map(|e| e.to_lowercase());
    let password = required_password(request.password, &mut errors);
    reject_if_invalid(errors)?;

    let (Some(email), Some(password)) = (email, password) else {
        return Err(ApiError::bad_request("Missing required fields"));
    };

    let Some(user) = state.store.find_user_by_email(&email).await? else {
        tracing::info!("Login failed for unknown email {}", email);
        return Err(ApiError::unauthorized("Invalid credentials"));
    };

    if !verify_password(&password, &user.password).await? {
        tracing::info!("Login failed for user {}", user.id);
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let role = state
        .store
        .find_role(user.role_id)
        .await?
        .map(|r| r.title)
        .unwrap_or_default();

    let token = issue_token(&state, &user, role)?;
    tracing::info!("User {} logged in", user.id);

    Ok(ApiResponse::success(AuthResponse {
        message: "Login successful".to_string(),
        token,
        user,
    }))
}

fn issue_token(state: &AppState, user: &User, role: String) -> Result<String, ApiError> {
    let claims = Claims::new(
        user.id,
        user.email.clone(),
        user.role_id,
        role,
        &state.config.security,
    );
    Ok(generate_jwt(&claims, &state.config.security)?)
}

// Passwords are taken verbatim, never trimmed
fn required_password(value: Option<String>, errors: &mut FieldErrors) -> Option<String> {
    match value {
        Some(p) if !p.is_empty() => Some(p),
        _ => {
            errors.insert("password".to_string(), "This field is required".to_string());
            None
        }
    }
}
