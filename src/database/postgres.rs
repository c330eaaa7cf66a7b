use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{
    Document, DocumentChanges, DocumentFilter, NewDocument, NewUser, Role, User, UserChanges,
};
use crate::database::pagination::Page;
use crate::database::query_builder::{
    bind_param_query, bind_param_query_as, contains_pattern, DocumentQuery, DOCUMENT_COLUMNS,
};
use crate::database::store::Store;

const USER_COLUMNS: &str = "id, first_name, last_name, email, password, role_id, created_at, updated_at";

/// [`Store`] backed by PostgreSQL through sqlx
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }

    async fn create_role(&self, title: &str) -> Result<Role, DatabaseError> {
        let role = sqlx::query_as::<_, Role>(
            "INSERT INTO roles (title) VALUES ($1) RETURNING id, title, created_at, updated_at",
        )
        .bind(title)
        .fetch_one(&self.pool)
        .await?;
        Ok(role)
    }

    async fn list_roles(&self) -> Result<Vec<Role>, DatabaseError> {
        let roles = sqlx::query_as::<_, Role>(
            "SELECT id, title, created_at, updated_at FROM roles ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(roles)
    }

    async fn find_role(&self, id: i32) -> Result<Option<Role>, DatabaseError> {
        let role = sqlx::query_as::<_, Role>(
            "SELECT id, title, created_at, updated_at FROM roles WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(role)
    }

    async fn find_role_by_title(&self, title: &str) -> Result<Option<Role>, DatabaseError> {
        let role = sqlx::query_as::<_, Role>(
            "SELECT id, title, created_at, updated_at FROM roles WHERE title = $1",
        )
        .bind(title)
        .fetch_optional(&self.pool)
        .await?;
        Ok(role)
    }

    async fn update_role(&self, id: i32, title: &str) -> Result<Option<Role>, DatabaseError> {
        let role = sqlx::query_as::<_, Role>(
            "UPDATE roles SET title = $2, updated_at = now() WHERE id = $1
             RETURNING id, title, created_at, updated_at",
        )
        .bind(id)
        .bind(title)
        .fetch_optional(&self.pool)
        .await?;
        Ok(role)
    }

    async fn delete_role(&self, id: i32) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let sql = format!(
            "INSERT INTO users (first_name, last_name, email, password, role_id)
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            USER_COLUMNS
        );
        let created = sqlx::query_as::<_, User>(&sql)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.email)
            .bind(&user.password)
            .bind(user.role_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn find_user(&self, id: i32) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn list_users(&self, page: Page) -> Result<(Vec<User>, i64), DatabaseError> {
        let sql = format!(
            "SELECT {} FROM users ORDER BY id ASC LIMIT $1 OFFSET $2",
            USER_COLUMNS
        );
        let users = sqlx::query_as::<_, User>(&sql)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await?;
        let total: i64 = sqlx::query("SELECT COUNT(*) AS count FROM users")
            .fetch_one(&self.pool)
            .await?
            .try_get("count")?;
        Ok((users, total))
    }

    async fn search_users(&self, query: &str, page: Page) -> Result<(Vec<User>, i64), DatabaseError> {
        let pattern = contains_pattern(query);
        let condition = r"first_name ILIKE $1 ESCAPE '\' OR last_name ILIKE $1 ESCAPE '\' OR email ILIKE $1 ESCAPE '\'";

        let sql = format!(
            "SELECT {} FROM users WHERE {} ORDER BY id ASC LIMIT $2 OFFSET $3",
            USER_COLUMNS, condition
        );
        let users = sqlx::query_as::<_, User>(&sql)
            .bind(&pattern)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await?;

        let count_sql = format!("SELECT COUNT(*) AS count FROM users WHERE {}", condition);
        let total: i64 = sqlx::query(&count_sql)
            .bind(&pattern)
            .fetch_one(&self.pool)
            .await?
            .try_get("count")?;
        Ok((users, total))
    }

    async fn update_user(&self, id: i32, changes: UserChanges) -> Result<Option<User>, DatabaseError> {
        // COALESCE keeps the stored value for every field left as NULL
        let sql = format!(
            "UPDATE users SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                password = COALESCE($5, password),
                role_id = COALESCE($6, role_id),
                updated_at = now()
             WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(changes.first_name)
            .bind(changes.last_name)
            .bind(changes.email)
            .bind(changes.password)
            .bind(changes.role_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn delete_user(&self, id: i32) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_document(&self, document: NewDocument) -> Result<Document, DatabaseError> {
        let sql = format!(
            "INSERT INTO documents (title, content, access, user_id)
             VALUES ($1, $2, $3, $4) RETURNING {}",
            DOCUMENT_COLUMNS
        );
        let created = sqlx::query_as::<_, Document>(&sql)
            .bind(&document.title)
            .bind(&document.content)
            .bind(document.access.as_str())
            .bind(document.user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn find_document(&self, id: i32) -> Result<Option<Document>, DatabaseError> {
        let sql = format!("SELECT {} FROM documents WHERE id = $1", DOCUMENT_COLUMNS);
        let document = sqlx::query_as::<_, Document>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(document)
    }

    async fn list_documents(
        &self,
        filter: &DocumentFilter,
        page: Page,
    ) -> Result<(Vec<Document>, i64), DatabaseError> {
        let query = DocumentQuery::new(filter);

        let select = query.select(page);
        let mut q = sqlx::query_as::<_, Document>(&select.query);
        for p in select.params.iter() {
            q = bind_param_query_as(q, p);
        }
        let documents = q.fetch_all(&self.pool).await?;

        let count = query.count();
        let mut q = sqlx::query(&count.query);
        for p in count.params.iter() {
            q = bind_param_query(q, p);
        }
        let total: i64 = q.fetch_one(&self.pool).await?.try_get("count")?;

        Ok((documents, total))
    }

    async fn update_document(
        &self,
        id: i32,
        changes: DocumentChanges,
    ) -> Result<Option<Document>, DatabaseError> {
        let sql = format!(
            "UPDATE documents SET
                title = COALESCE($2, title),
                content = COALESCE($3, content),
                access = COALESCE($4, access),
                updated_at = now()
             WHERE id = $1 RETURNING {}",
            DOCUMENT_COLUMNS
        );
        let document = sqlx::query_as::<_, Document>(&sql)
            .bind(id)
            .bind(changes.title)
            .bind(changes.content)
            .bind(changes.access.map(|a| a.as_str()))
            .fetch_optional(&self.pool)
            .await?;
        Ok(document)
    }

    async fn delete_document(&self, id: i32) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
