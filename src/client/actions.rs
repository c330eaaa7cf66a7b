//! Action creators: each one makes a single API call and, on success,
//! dispatches exactly one [`DocumentAction`]. Failures are logged and
//! nothing is dispatched.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

use super::{ApiClient, DocumentDraft};
use crate::api::{DocumentMessage, Message};
use crate::database::models::Document;

/// Result record handed to a [`Dispatch`] sink, serialized as `{type, payload}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentAction {
    GetUserDocument(Vec<Document>),
    DeleteUserDocument(Message),
    GetOneDocumentSuccess(Document),
    CreateDocumentSuccess(DocumentMessage),
    UpdateDocumentSuccess(DocumentMessage),
    GetAllPublicDocuments(Vec<Document>),
    DeleteUserSuccess(Message),
    SearchPublicDocuments(Vec<Document>),
    SearchMyDocuments(Vec<Document>),
}

impl DocumentAction {
    pub fn kind(&self) -> &'static str {
        match self {
            DocumentAction::GetUserDocument(_) => "GET_USER_DOCUMENT",
            DocumentAction::DeleteUserDocument(_) => "DELETE_USER_DOCUMENT",
            DocumentAction::GetOneDocumentSuccess(_) => "GET_ONE_DOCUMENT_SUCCESS",
            DocumentAction::CreateDocumentSuccess(_) => "CREATE_DOCUMENT_SUCCESS",
            DocumentAction::UpdateDocumentSuccess(_) => "UPDATE_DOCUMENT_SUCCESS",
            DocumentAction::GetAllPublicDocuments(_) => "GET_ALL_PUBLIC_DOCUMENTS",
            DocumentAction::DeleteUserSuccess(_) => "DELETE_USER_SUCCESS",
            DocumentAction::SearchPublicDocuments(_) => "SEARCH_PUBLIC_DOCUMENTS",
            DocumentAction::SearchMyDocuments(_) => "SEARCH_MY_DOCUMENTS",
        }
    }
}

/// Sink for dispatched actions
pub trait Dispatch {
    fn dispatch(&mut self, action: DocumentAction);
}

impl Dispatch for Vec<DocumentAction> {
    fn dispatch(&mut self, action: DocumentAction) {
        self.push(action);
    }
}

impl Dispatch for UnboundedSender<DocumentAction> {
    fn dispatch(&mut self, action: DocumentAction) {
        if let Err(e) = self.send(action) {
            tracing::warn!("Dropped {} action: receiver closed", e.0.kind());
        }
    }
}

/// GET /api/users/:id/documents
pub async fn get_user_documents(client: &ApiClient, user_id: i32, dispatch: &mut impl Dispatch) {
    match client.user_documents(user_id).await {
        Ok(list) => dispatch.dispatch(DocumentAction::GetUserDocument(list.documents)),
        Err(e) => tracing::error!("Failed to load documents of user {}: {}", user_id, e),
    }
}

/// DELETE /api/documents/:id
pub async fn delete_user_document(client: &ApiClient, document_id: i32, dispatch: &mut impl Dispatch) {
    match client.delete_document(document_id).await {
        Ok(message) => dispatch.dispatch(DocumentAction::DeleteUserDocument(message)),
        Err(e) => tracing::error!("Failed to delete document {}: {}", document_id, e),
    }
}

/// GET /api/documents/:id
pub async fn get_one_document(client: &ApiClient, document_id: i32, dispatch: &mut impl Dispatch) {
    match client.document(document_id).await {
        Ok(document) => dispatch.dispatch(DocumentAction::GetOneDocumentSuccess(document)),
        Err(e) => tracing::error!("Failed to load document {}: {}", document_id, e),
    }
}

/// POST /api/documents
pub async fn create_user_document(client: &ApiClient, draft: &DocumentDraft, dispatch: &mut impl Dispatch) {
    match client.create_document(draft).await {
        Ok(created) => dispatch.dispatch(DocumentAction::CreateDocumentSuccess(created)),
        Err(e) => tracing::error!("Failed to create document: {}", e),
    }
}

/// PUT /api/documents/:id
pub async fn update_user_document(
    client: &ApiClient,
    document_id: i32,
    draft: &DocumentDraft,
    dispatch: &mut impl Dispatch,
) {
    match client.update_document(document_id, draft).await {
        Ok(updated) => dispatch.dispatch(DocumentAction::UpdateDocumentSuccess(updated)),
        Err(e) => tracing::error!("Failed to update document {}: {}", document_id, e),
    }
}

/// GET /api/documents
pub async fn get_all_public_documents(client: &ApiClient, dispatch: &mut impl Dispatch) {
    match client.public_documents().await {
        Ok(list) => dispatch.dispatch(DocumentAction::GetAllPublicDocuments(list.documents)),
        Err(e) => tracing::error!("Failed to load public documents: {}", e),
    }
}

/// DELETE /api/users/:id
pub async fn delete_one_user(client: &ApiClient, user_id: i32, dispatch: &mut impl Dispatch) {
    match client.delete_user(user_id).await {
        Ok(message) => dispatch.dispatch(DocumentAction::DeleteUserSuccess(message)),
        Err(e) => tracing::error!("Failed to delete user {}: {}", user_id, e),
    }
}

/// GET /api/search/documents/?title=
pub async fn search_public_documents(client: &ApiClient, title: &str, dispatch: &mut impl Dispatch) {
    match client.search_public_documents(title).await {
        Ok(list) => dispatch.dispatch(DocumentAction::SearchPublicDocuments(list.documents)),
        Err(e) => tracing::error!("Public document search for '{}' failed: {}", title, e),
    }
}

/// GET /api/search/myDocuments/?title=
pub async fn search_own_documents(client: &ApiClient, title: &str, dispatch: &mut impl Dispatch) {
    match client.search_my_documents(title).await {
        Ok(list) => dispatch.dispatch(DocumentAction::SearchMyDocuments(list.documents)),
        Err(e) => tracing::error!("Own document search for '{}' failed: {}", title, e),
    }
}
