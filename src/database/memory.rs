use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    Document, DocumentChanges, DocumentFilter, NewDocument, NewUser, Role, User, UserChanges,
};
use crate::database::pagination::Page;
use crate::database::store::Store;

/// In-process [`Store`] with the same constraints as the SQL schema:
/// unique role titles and emails, restrict on role delete, cascade on user delete.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    roles: BTreeMap<i32, Role>,
    users: BTreeMap<i32, User>,
    documents: BTreeMap<i32, Document>,
    next_role_id: i32,
    next_user_id: i32,
    next_document_id: i32,
}

fn next_id(counter: &mut i32) -> i32 {
    *counter += 1;
    *counter
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn paginate<T: Clone>(rows: Vec<&T>, page: Page) -> (Vec<T>, i64) {
    let total = rows.len() as i64;
    let offset = usize::try_from(page.offset).unwrap_or(usize::MAX);
    let limit = usize::try_from(page.limit).unwrap_or(usize::MAX);
    let window = rows.into_iter().skip(offset).take(limit).cloned().collect();
    (window, total)
}

impl Tables {
    fn matches(&self, document: &Document, filter: &DocumentFilter) -> bool {
        if let Some(access) = filter.access {
            if document.access != access {
                return false;
            }
        }
        if let Some(owner_id) = filter.owner_id {
            if document.user_id != owner_id {
                return false;
            }
        }
        if let Some(role_id) = filter.owner_role_id {
            let owner_role = self.users.get(&document.user_id).map(|u| u.role_id);
            if owner_role != Some(role_id) {
                return false;
            }
        }
        if let Some(title) = &filter.title {
            if !contains_ignore_case(&document.title, title) {
                return false;
            }
        }
        true
    }

    fn email_taken(&self, email: &str, except: Option<i32>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn create_role(&self, title: &str) -> Result<Role, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.roles.values().any(|r| r.title == title) {
            return Err(DatabaseError::Conflict(format!("role '{}' already exists", title)));
        }
        let now = Utc::now();
        let role = Role {
            id: next_id(&mut tables.next_role_id),
            title: title.to_string(),
            created_at: now,
            updated_at: now,
        };
        tables.roles.insert(role.id, role.clone());
        Ok(role)
    }

    async fn list_roles(&self) -> Result<Vec<Role>, DatabaseError> {
        Ok(self.tables.read().await.roles.values().cloned().collect())
    }

    async fn find_role(&self, id: i32) -> Result<Option<Role>, DatabaseError> {
        Ok(self.tables.read().await.roles.get(&id).cloned())
    }

    async fn find_role_by_title(&self, title: &str) -> Result<Option<Role>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.roles.values().find(|r| r.title == title).cloned())
    }

    async fn update_role(&self, id: i32, title: &str) -> Result<Option<Role>, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.roles.values().any(|r| r.title == title && r.id != id) {
            return Err(DatabaseError::Conflict(format!("role '{}' already exists", title)));
        }
        Ok(tables.roles.get_mut(&id).map(|role| {
            role.title = title.to_string();
            role.updated_at = Utc::now();
            role.clone()
        }))
    }

    async fn delete_role(&self, id: i32) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.role_id == id) {
            return Err(DatabaseError::Conflict("record is still referenced".to_string()));
        }
        Ok(tables.roles.remove(&id).is_some())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.email_taken(&user.email, None) {
            return Err(DatabaseError::Conflict("duplicate value violates users_email_key".to_string()));
        }
        if !tables.roles.contains_key(&user.role_id) {
            return Err(DatabaseError::Conflict(format!("role {} does not exist", user.role_id)));
        }
        let now = Utc::now();
        let created = User {
            id: next_id(&mut tables.next_user_id),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            password: user.password,
            role_id: user.role_id,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_user(&self, id: i32) -> Result<Option<User>, DatabaseError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self, page: Page) -> Result<(Vec<User>, i64), DatabaseError> {
        let tables = self.tables.read().await;
        Ok(paginate(tables.users.values().collect(), page))
    }

    async fn search_users(&self, query: &str, page: Page) -> Result<(Vec<User>, i64), DatabaseError> {
        let tables = self.tables.read().await;
        let rows = tables
            .users
            .values()
            .filter(|u| {
                contains_ignore_case(&u.first_name, query)
                    || contains_ignore_case(&u.last_name, query)
                    || contains_ignore_case(&u.email, query)
            })
            .collect();
        Ok(paginate(rows, page))
    }

    async fn update_user(&self, id: i32, changes: UserChanges) -> Result<Option<User>, DatabaseError> {
        let mut tables = self.tables.write().await;
        if let Some(email) = &changes.email {
            if tables.email_taken(email, Some(id)) {
                return Err(DatabaseError::Conflict("duplicate value violates users_email_key".to_string()));
            }
        }
        if let Some(role_id) = changes.role_id {
            if !tables.roles.contains_key(&role_id) {
                return Err(DatabaseError::Conflict(format!("role {} does not exist", role_id)));
            }
        }
        Ok(tables.users.get_mut(&id).map(|user| {
            if let Some(v) = changes.first_name {
                user.first_name = v;
            }
            if let Some(v) = changes.last_name {
                user.last_name = v;
            }
            if let Some(v) = changes.email {
                user.email = v;
            }
            if let Some(v) = changes.password {
                user.password = v;
            }
            if let Some(v) = changes.role_id {
                user.role_id = v;
            }
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn delete_user(&self, id: i32) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }
        tables.documents.retain(|_, d| d.user_id != id);
        Ok(true)
    }

    async fn create_document(&self, document: NewDocument) -> Result<Document, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&document.user_id) {
            return Err(DatabaseError::Conflict(format!("user {} does not exist", document.user_id)));
        }
        let now = Utc::now();
        let created = Document {
            id: next_id(&mut tables.next_document_id),
            title: document.title,
            content: document.content,
            access: document.access,
            user_id: document.user_id,
            created_at: now,
            updated_at: now,
        };
        tables.documents.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_document(&self, id: i32) -> Result<Option<Document>, DatabaseError> {
        Ok(self.tables.read().await.documents.get(&id).cloned())
    }

    async fn list_documents(
        &self,
        filter: &DocumentFilter,
        page: Page,
    ) -> Result<(Vec<Document>, i64), DatabaseError> {
        let tables = self.tables.read().await;
        let rows = tables
            .documents
            .values()
            .filter(|d| tables.matches(d, filter))
            .collect();
        Ok(paginate(rows, page))
    }

    async fn update_document(
        &self,
        id: i32,
        changes: DocumentChanges,
    ) -> Result<Option<Document>, DatabaseError> {
        let mut tables = self.tables.write().await;
        Ok(tables.documents.get_mut(&id).map(|document| {
            if let Some(v) = changes.title {
                document.title = v;
            }
            if let Some(v) = changes.content {
                document.content = v;
            }
            if let Some(v) = changes.access {
                document.access = v;
            }
            document.updated_at = Utc::now();
            document.clone()
        }))
    }

    async fn delete_document(&self, id: i32) -> Result<bool, DatabaseError> {
        Ok(self.tables.write().await.documents.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AccessLevel;

    async fn seeded() -> (MemoryStore, User, User) {
        let store = MemoryStore::new();
        let admin_role = store.create_role("admin").await.unwrap();
        let regular_role = store.create_role("regular").await.unwrap();
        let admin = store
            .create_user(NewUser {
                first_name: "admin".into(),
                last_name: "admin".into(),
                email: "admin@admin.com".into(),
                password: "hash".into(),
                role_id: admin_role.id,
            })
            .await
            .unwrap();
        let ghost = store
            .create_user(NewUser {
                first_name: "ghost".into(),
                last_name: "ghost".into(),
                email: "ghost@ghost.com".into(),
                password: "hash".into(),
                role_id: regular_role.id,
            })
            .await
            .unwrap();
        (store, admin, ghost)
    }

    fn doc(title: &str, access: AccessLevel, user_id: i32) -> NewDocument {
        NewDocument {
            title: title.into(),
            content: format!("content of {}", title),
            access,
            user_id,
        }
    }

    fn first_page() -> Page {
        Page { limit: 100, offset: 0 }
    }

    #[tokio::test]
    async fn filters_public_documents() {
        let (store, admin, ghost) = seeded().await;
        store.create_document(doc("a", AccessLevel::Public, admin.id)).await.unwrap();
        store.create_document(doc("b", AccessLevel::Private, admin.id)).await.unwrap();
        store.create_document(doc("c", AccessLevel::Public, ghost.id)).await.unwrap();

        let (docs, total) = store.list_documents(&DocumentFilter::public(), first_page()).await.unwrap();
        assert_eq!(total, 2);
        assert!(docs.iter().all(|d| d.access == AccessLevel::Public));
    }

    #[tokio::test]
    async fn title_search_is_case_insensitive_and_literal() {
        let (store, admin, _) = seeded().await;
        store.create_document(doc("Quarterly Report", AccessLevel::Public, admin.id)).await.unwrap();
        store.create_document(doc("100% done", AccessLevel::Public, admin.id)).await.unwrap();

        let filter = DocumentFilter::public().with_title("REPORT");
        let (docs, _) = store.list_documents(&filter, first_page()).await.unwrap();
        assert_eq!(docs.len(), 1);

        let filter = DocumentFilter::public().with_title("%");
        let (docs, _) = store.list_documents(&filter, first_page()).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].title, "100% done");
    }

    #[tokio::test]
    async fn role_scope_follows_owner_role() {
        let (store, admin, ghost) = seeded().await;
        store.create_document(doc("admins", AccessLevel::Role, admin.id)).await.unwrap();
        store.create_document(doc("regulars", AccessLevel::Role, ghost.id)).await.unwrap();

        let (docs, total) = store
            .list_documents(&DocumentFilter::role_scoped(ghost.role_id), first_page())
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(docs[0].title, "regulars");
    }

    #[tokio::test]
    async fn paginates_with_total() {
        let (store, admin, _) = seeded().await;
        for i in 0..5 {
            store.create_document(doc(&format!("d{}", i), AccessLevel::Public, admin.id)).await.unwrap();
        }
        let (docs, total) = store
            .list_documents(&DocumentFilter::default(), Page { limit: 2, offset: 2 })
            .await
            .unwrap();
        assert_eq!(total, 5);
        assert_eq!(docs.iter().map(|d| d.title.as_str()).collect::<Vec<_>>(), vec!["d2", "d3"]);
    }

    #[tokio::test]
    async fn enforces_unique_email_and_role_restrict() {
        let (store, admin, _) = seeded().await;
        let err = store
            .create_user(NewUser {
                first_name: "x".into(),
                last_name: "y".into(),
                email: admin.email.clone(),
                password: "hash".into(),
                role_id: admin.role_id,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict(_)));

        let err = store.delete_role(admin.role_id).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict(_)));
    }

    #[tokio::test]
    async fn deleting_user_cascades_to_documents() {
        let (store, _, ghost) = seeded().await;
        let created = store.create_document(doc("mine", AccessLevel::Private, ghost.id)).await.unwrap();

        assert!(store.delete_user(ghost.id).await.unwrap());
        assert!(store.find_document(created.id).await.unwrap().is_none());
        assert!(!store.delete_user(ghost.id).await.unwrap());
    }

    #[tokio::test]
    async fn partial_update_keeps_other_fields() {
        let (store, admin, _) = seeded().await;
        let created = store.create_document(doc("draft", AccessLevel::Private, admin.id)).await.unwrap();

        let updated = store
            .update_document(
                created.id,
                DocumentChanges { access: Some(AccessLevel::Public), ..Default::default() },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "draft");
        assert_eq!(updated.access, AccessLevel::Public);

        assert!(store.update_document(999, DocumentChanges::default()).await.unwrap().is_none());
    }
}
