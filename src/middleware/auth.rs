use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::{validate_jwt, Claims};
use crate::error::ApiError;
use crate::state::AppState;
use crate::types::ADMIN_ROLE;

/// Authenticated identity decoded from the bearer token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: i32,
    pub email: String,
    pub role_id: i32,
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }

    pub fn owns(&self, owner_id: i32) -> bool {
        self.id == owner_id
    }

    pub fn owns_or_admin(&self, owner_id: i32) -> bool {
        self.owns(owner_id) || self.is_admin()
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.id,
            email: claims.email,
            role_id: claims.role_id,
            role: claims.role,
        }
    }
}

/// JWT authentication middleware that validates tokens and injects [`AuthUser`]
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(request.headers()).map_err(ApiError::unauthorized)?;

    let claims = validate_jwt(token, &state.config.security).map_err(|e| {
        tracing::debug!("Rejected token: {}", e);
        ApiError::unauthorized("Invalid or expired token")
    })?;

    // Tokens outlive their accounts; a deleted user is no longer authenticated
    if state.store.find_user(claims.id).await?.is_none() {
        tracing::debug!("Rejected token for deleted user {}", claims.id);
        return Err(ApiError::unauthorized("Invalid or expired token"));
    }

    request.extensions_mut().insert(AuthUser::from(claims));

    Ok(next.run(request).await)
}

/// Accepts `Bearer <token>` as well as the bare token
fn extract_token(headers: &HeaderMap) -> Result<&str, &'static str> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or("Missing Authorization header")?
        .to_str()
        .map_err(|_| "Invalid Authorization header format")?
        .trim();

    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    if token.is_empty() {
        return Err("Empty token");
    }
    Ok(token)
}
