// handlers/protected/documents.rs - /api/documents handlers
//
// Every handler here runs behind the JWT layer and receives the caller as
// an `AuthUser` extension. Visibility and ownership are decided here since
// they depend on the stored row.

use axum::{extract::State, Extension};
use serde::Deserialize;

use crate::api::{DocumentList, DocumentMessage, Message};
use crate::database::models::{Document, DocumentChanges, DocumentFilter, NewDocument};
use crate::database::{Page, PageQuery};
use crate::error::ApiError;
use crate::handlers::utils::{
    optional_access, optional_text, reject_if_invalid, required_access, required_text, FieldErrors,
};
use crate::middleware::{ApiResponse, ApiResult, AuthUser, JsonBody, PathParam, QueryParams};
use crate::state::AppState;
use crate::types::AccessLevel;

/// Body accepted by create and update. Any `userID` sent by the client is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct DocumentPayload {
    pub title: Option<String>,
    pub content: Option<String>,
    pub access: Option<String>,
}

/// POST /api/documents
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    JsonBody(payload): JsonBody<DocumentPayload>,
) -> ApiResult<DocumentMessage> {
    let mut errors = FieldErrors::new();
    let title = required_text("title", payload.title, &mut errors);
    let content = required_text("content", payload.content, &mut errors);
    let access = required_access(payload.access, &mut errors);
    reject_if_invalid(errors)?;

    let (Some(title), Some(content), Some(access)) = (title, content, access) else {
        return Err(ApiError::bad_request("Missing required fields"));
    };

    let document = state
        .store
        .create_document(NewDocument {
            title,
            content,
            access,
            user_id: user.id,
        })
        .await?;

    tracing::info!("User {} created document {}", user.id, document.id);

    Ok(ApiResponse::created(DocumentMessage {
        message: "Document created successfully".to_string(),
        document,
    }))
}

/// GET /api/documents - public documents
pub async fn list_public(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<PageQuery>,
) -> ApiResult<DocumentList> {
    list(&state, &DocumentFilter::public(), &query).await
}

/// GET /api/documents/all - every document, admin only
pub async fn list_all(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<PageQuery>,
) -> ApiResult<DocumentList> {
    list(&state, &DocumentFilter::default(), &query).await
}

/// GET /api/documents/roles - role documents owned by users sharing the caller's role
pub async fn list_roles(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    QueryParams(query): QueryParams<PageQuery>,
) -> ApiResult<DocumentList> {
    list(&state, &DocumentFilter::role_scoped(user.role_id), &query).await
}

/// GET /api/users/:id/documents - everything a user owns; owner or admin
pub async fn list_for_user(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
    QueryParams(query): QueryParams<PageQuery>,
) -> ApiResult<DocumentList> {
    if state.store.find_user(id).await?.is_none() {
        return Err(ApiError::not_found("User not found"));
    }
    list(&state, &DocumentFilter::owned_by(id), &query).await
}

/// GET /api/documents/:id
pub async fn get_one(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    PathParam(id): PathParam<i32>,
) -> ApiResult<Document> {
    let document = state
        .store
        .find_document(id)
        .await?
        .ok_or_else(|| ApiError::not_found("document not found"))?;

    if !can_view(&state, &user, &document).await? {
        tracing::warn!("User {} denied read of document {}", user.id, id);
        return Err(ApiError::forbidden("You are not allowed to view this document"));
    }

    Ok(ApiResponse::success(document))
}

/// PUT /api/documents/:id - owner only
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    PathParam(id): PathParam<i32>,
    JsonBody(payload): JsonBody<DocumentPayload>,
) -> ApiResult<DocumentMessage> {
    let existing = state
        .store
        .find_document(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Document not found"))?;

    if !user.owns(existing.user_id) {
        tracing::warn!("User {} denied update of document {}", user.id, id);
        return Err(ApiError::forbidden("You can only update your own documents"));
    }

    let mut errors = FieldErrors::new();
    let changes = DocumentChanges {
        title: optional_text("title", payload.title, &mut errors),
        content: optional_text("content", payload.content, &mut errors),
        access: optional_access(payload.access, &mut errors),
    };
    reject_if_invalid(errors)?;

    let document = if changes.is_empty() {
        existing
    } else {
        state
            .store
            .update_document(id, changes)
            .await?
            .ok_or_else(|| ApiError::not_found("Document not found"))?
    };

    Ok(ApiResponse::success(DocumentMessage {
        message: "Document updated successfully".to_string(),
        document,
    }))
}

/// DELETE /api/documents/:id - owner or admin
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    PathParam(id): PathParam<i32>,
) -> ApiResult<Message> {
    let existing = state
        .store
        .find_document(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Document not found"))?;

    if !user.owns_or_admin(existing.user_id) {
        tracing::warn!("User {} denied delete of document {}", user.id, id);
        return Err(ApiError::forbidden("You can only delete your own documents"));
    }

    if !state.store.delete_document(id).await? {
        return Err(ApiError::not_found("Document not found"));
    }

    tracing::info!("User {} deleted document {}", user.id, id);
    Ok(ApiResponse::success(Message::new("Document successfully deleted")))
}

/// Shared by every listing and search: resolve the page and wrap rows with `metaData`
pub(crate) async fn list(
    state: &AppState,
    filter: &DocumentFilter,
    query: &PageQuery,
) -> ApiResult<DocumentList> {
    let page = Page::resolve(query, &state.config.pagination);
    let (documents, total) = state.store.list_documents(filter, page).await?;

    Ok(ApiResponse::success(DocumentList {
        documents,
        meta_data: page.meta(total),
    }))
}

async fn can_view(state: &AppState, user: &AuthUser, document: &Document) -> Result<bool, ApiError> {
    if document.access == AccessLevel::Public || user.owns_or_admin(document.user_id) {
        return Ok(true);
    }
    match document.access {
        AccessLevel::Role => {
            let owner_role = state.store.find_user(document.user_id).await?.map(|u| u.role_id);
            Ok(owner_role == Some(user.role_id))
        }
        _ => Ok(false),
    }
}
