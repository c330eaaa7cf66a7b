use async_trait::async_trait;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    Document, DocumentChanges, DocumentFilter, NewDocument, NewUser, Role, User, UserChanges,
};
use crate::database::pagination::Page;

/// Persistence operations the controllers depend on.
///
/// Listing methods return the requested page together with the total
/// number of matching rows. Lookups by id return `Ok(None)` when the row
/// is absent; updates and deletes do the same so callers can answer 404.
/// Unique or foreign-key violations surface as [`DatabaseError::Conflict`].
#[async_trait]
pub trait Store: Send + Sync {
    async fn ping(&self) -> Result<(), DatabaseError>;

    // Roles
    async fn create_role(&self, title: &str) -> Result<Role, DatabaseError>;
    async fn list_roles(&self) -> Result<Vec<Role>, DatabaseError>;
    async fn find_role(&self, id: i32) -> Result<Option<Role>, DatabaseError>;
    async fn find_role_by_title(&self, title: &str) -> Result<Option<Role>, DatabaseError>;
    async fn update_role(&self, id: i32, title: &str) -> Result<Option<Role>, DatabaseError>;
    async fn delete_role(&self, id: i32) -> Result<bool, DatabaseError>;

    // Users
    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError>;
    async fn find_user(&self, id: i32) -> Result<Option<User>, DatabaseError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;
    async fn list_users(&self, page: Page) -> Result<(Vec<User>, i64), DatabaseError>;
    /// Case-insensitive substring match on first name, last name or email
    async fn search_users(&self, query: &str, page: Page) -> Result<(Vec<User>, i64), DatabaseError>;
    async fn update_user(&self, id: i32, changes: UserChanges) -> Result<Option<User>, DatabaseError>;
    /// Removes the user and, by cascade, every document they own
    async fn delete_user(&self, id: i32) -> Result<bool, DatabaseError>;

    // Documents
    async fn create_document(&self, document: NewDocument) -> Result<Document, DatabaseError>;
    async fn find_document(&self, id: i32) -> Result<Option<Document>, DatabaseError>;
    /// Ordered by id ascending
    async fn list_documents(
        &self,
        filter: &DocumentFilter,
        page: Page,
    ) -> Result<(Vec<Document>, i64), DatabaseError>;
    async fn update_document(
        &self,
        id: i32,
        changes: DocumentChanges,
    ) -> Result<Option<Document>, DatabaseError>;
    async fn delete_document(&self, id: i32) -> Result<bool, DatabaseError>;
}
