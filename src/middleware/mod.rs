pub mod auth;
pub mod authorization;
pub mod json;
pub mod response;

pub use auth::{jwt_auth_middleware, AuthUser};
pub use authorization::{admin_check, owner_or_admin_check};
pub use json::{JsonBody, PathParam, QueryParams};
pub use response::{ApiResponse, ApiResult};
