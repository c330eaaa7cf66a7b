// handlers/protected/mod.rs - endpoints behind the JWT layer (/api/*)
//
// Handlers receive the caller as `Extension<AuthUser>`. Admin and
// owner checks that depend only on the path are applied as route layers
// in `routes.rs`; checks that depend on a stored row live in the handler.

pub mod documents;
pub mod roles;
pub mod search;
pub mod users;
