// routes.rs - route table
//
// Public routes are mounted bare. Everything under /api (except signup and
// login) passes the JWT layer first, then any admin/owner layer attached to
// the individual route, then the handler.

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{protected, public};
use crate::middleware::{admin_check, jwt_auth_middleware, owner_or_admin_check};
use crate::state::AppState;

/// Build the full application router
pub fn app(state: AppState) -> Router {
    let enable_cors = state.config.security.enable_cors;

    let router = Router::new()
        .merge(public_routes())
        .merge(
            Router::new()
                .merge(document_routes())
                .merge(search_routes())
                .merge(user_routes())
                .merge(role_routes())
                .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware)),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if enable_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

fn public_routes() -> Router<AppState> {
    use public::{system, users};

    Router::new()
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .route("/api/users", post(users::signup))
        .route("/api/users/login", post(users::login))
}

fn document_routes() -> Router<AppState> {
    use protected::documents;

    Router::new()
        .route(
            "/api/documents",
            post(documents::create).get(documents::list_public),
        )
        .route(
            "/api/documents/all",
            get(documents::list_all).route_layer(from_fn(admin_check)),
        )
        .route("/api/documents/roles", get(documents::list_roles))
        .route(
            "/api/documents/:id",
            get(documents::get_one)
                .put(documents::update)
                .delete(documents::delete),
        )
        .route(
            "/api/users/:id/documents",
            get(documents::list_for_user).route_layer(from_fn(owner_or_admin_check)),
        )
}

fn search_routes() -> Router<AppState> {
    use protected::search;

    // The trailing slash is optional on every search path
    let mut router = Router::new();
    for (path, handler) in [
        ("/api/search/documents", get(search::public_documents)),
        ("/api/search/myDocuments", get(search::my_documents)),
        ("/api/search/roleDocuments", get(search::role_documents)),
        ("/api/search/users", get(search::users)),
    ] {
        router = router
            .route(path, handler.clone())
            .route(&format!("{}/", path), handler);
    }
    router
}

fn user_routes() -> Router<AppState> {
    use protected::users;

    Router::new()
        .route("/api/users/logout", get(users::logout))
        .route(
            "/api/users",
            get(users::list).route_layer(from_fn(admin_check)),
        )
        .route(
            "/api/users/:id",
            get(users::get).route_layer(from_fn(admin_check)).merge(
                put(users::update)
                    .delete(users::delete)
                    .route_layer(from_fn(owner_or_admin_check)),
            ),
        )
}

fn role_routes() -> Router<AppState> {
    use protected::roles;

    Router::new()
        .route("/api/roles", post(roles::create).get(roles::list))
        .route("/api/roles/:id", put(roles::update).delete(roles::delete))
        .route_layer(from_fn(admin_check))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::config::AppConfig;
    use crate::database::MemoryStore;

    fn router() -> Router {
        app(AppState::new(Arc::new(MemoryStore::new()), AppConfig::development()))
    }

    async fn call(uri: &str, method: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).method(method).body(Body::empty()).unwrap();
        let response = router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn health_is_public() {
        let (status, body) = call("/health", "GET").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn protected_routes_need_a_token() {
        for (uri, method) in [
            ("/api/documents", "GET"),
            ("/api/documents", "POST"),
            ("/api/documents/all", "GET"),
            ("/api/documents/roles", "GET"),
            ("/api/documents/1", "DELETE"),
            ("/api/search/documents/", "GET"),
            ("/api/search/myDocuments", "GET"),
            ("/api/users", "GET"),
            ("/api/users/1", "PUT"),
            ("/api/users/1/documents", "GET"),
            ("/api/roles", "GET"),
        ] {
            let (status, body) = call(uri, method).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
            assert!(body["message"].is_string());
        }
    }

    #[tokio::test]
    async fn signup_is_reachable_without_a_token() {
        // an empty body is rejected by the handler, not by the JWT layer
        let (status, _) = call("/api/users", "POST").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
