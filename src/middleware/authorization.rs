use axum::{
    extract::Request,
    middleware::Next,
    response::Response,
    Extension,
};

use super::auth::AuthUser;
use super::json::PathParam;
use crate::error::ApiError;

/// Only admins pass
pub async fn admin_check(
    Extension(user): Extension<AuthUser>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !user.is_admin() {
        tracing::warn!("User {} denied admin-only {}", user.id, request.uri().path());
        return Err(ApiError::forbidden("Admin access required"));
    }
    Ok(next.run(request).await)
}

/// The `:id` path segment must be the requester's own user id, unless they are admin
pub async fn owner_or_admin_check(
    Extension(user): Extension<AuthUser>,
    PathParam(id): PathParam<i32>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !user.owns_or_admin(id) {
        tracing::warn!("User {} denied access to user {}", user.id, id);
        return Err(ApiError::forbidden("You can only access your own account"));
    }
    Ok(next.run(request).await)
}
