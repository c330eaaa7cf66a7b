// handlers/protected/search.rs - /api/search handlers
//
// Title search is a case-insensitive substring match. A missing or blank
// `title` matches every document in the scope.

use axum::{extract::State, Extension};
use serde::Deserialize;

use super::documents::list;
use crate::api::{DocumentList, UserList};
use crate::database::models::DocumentFilter;
use crate::database::{Page, PageQuery};
use crate::middleware::{ApiResponse, ApiResult, AuthUser, QueryParams};
use crate::state::AppState;

// serde_urlencoded cannot feed numbers through #[serde(flatten)], so paging is repeated here
#[derive(Debug, Default, Deserialize)]
pub struct TitleSearch {
    pub title: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl TitleSearch {
    fn page_query(&self) -> PageQuery {
        PageQuery {
            limit: self.limit,
            offset: self.offset,
        }
    }

    fn apply(&self, filter: DocumentFilter) -> DocumentFilter {
        match self.title.as_deref() {
            Some(title) if !title.trim().is_empty() => filter.with_title(title),
            _ => filter,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UserSearch {
    pub q: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/search/documents/?title=
pub async fn public_documents(
    State(state): State<AppState>,
    QueryParams(search): QueryParams<TitleSearch>,
) -> ApiResult<DocumentList> {
    let filter = search.apply(DocumentFilter::public());
    list(&state, &filter, &search.page_query()).await
}

/// GET /api/search/myDocuments/?title=
pub async fn my_documents(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    QueryParams(search): QueryParams<TitleSearch>,
) -> ApiResult<DocumentList> {
    let filter = search.apply(DocumentFilter::owned_by(user.id));
    list(&state, &filter, &search.page_query()).await
}

/// GET /api/search/roleDocuments/?title=
pub async fn role_documents(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    QueryParams(search): QueryParams<TitleSearch>,
) -> ApiResult<DocumentList> {
    let filter = search.apply(DocumentFilter::role_scoped(user.role_id));
    list(&state, &filter, &search.page_query()).await
}

/// GET /api/search/users/?q= - first name, last name or email
pub async fn users(
    State(state): State<AppState>,
    QueryParams(search): QueryParams<UserSearch>,
) -> ApiResult<UserList> {
    let page = Page::resolve(
        &PageQuery { limit: search.limit, offset: search.offset },
        &state.config.pagination,
    );

    let (users, total) = match search.q.as_deref().map(str::trim) {
        Some(q) if !q.is_empty() => state.store.search_users(q, page).await?,
        _ => state.store.list_users(page).await?,
    };

    Ok(ApiResponse::success(UserList {
        users,
        meta_data: page.meta(total),
    }))
}
