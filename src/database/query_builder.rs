use sqlx::{self, postgres::PgArguments, FromRow};

use crate::database::models::DocumentFilter;
use crate::database::pagination::Page;

/// A positional parameter for generated SQL
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Int(i32),
    BigInt(i64),
    Text(String),
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<SqlParam>,
}

pub const DOCUMENT_COLUMNS: &str = "id, title, content, access, user_id, created_at, updated_at";

/// Builds SELECT/COUNT statements over `documents` from a [`DocumentFilter`]
pub struct DocumentQuery<'a> {
    filter: &'a DocumentFilter,
}

impl<'a> DocumentQuery<'a> {
    pub fn new(filter: &'a DocumentFilter) -> Self {
        Self { filter }
    }

    pub fn select(&self, page: Page) -> SqlResult {
        let (where_sql, mut params) = self.where_clause();
        params.push(SqlParam::BigInt(page.limit));
        params.push(SqlParam::BigInt(page.offset));
        let query = format!(
            "SELECT {} FROM documents{} ORDER BY id ASC LIMIT ${} OFFSET ${}",
            DOCUMENT_COLUMNS,
            where_sql,
            params.len() - 1,
            params.len()
        );
        SqlResult { query, params }
    }

    pub fn count(&self) -> SqlResult {
        let (where_sql, params) = self.where_clause();
        SqlResult {
            query: format!("SELECT COUNT(*) AS count FROM documents{}", where_sql),
            params,
        }
    }

    fn where_clause(&self) -> (String, Vec<SqlParam>) {
        let mut conditions = Vec::new();
        let mut params = Vec::new();

        if let Some(access) = self.filter.access {
            params.push(SqlParam::Text(access.as_str().to_string()));
            conditions.push(format!("access = ${}", params.len()));
        }
        if let Some(owner_id) = self.filter.owner_id {
            params.push(SqlParam::Int(owner_id));
            conditions.push(format!("user_id = ${}", params.len()));
        }
        if let Some(role_id) = self.filter.owner_role_id {
            params.push(SqlParam::Int(role_id));
            conditions.push(format!(
                "user_id IN (SELECT id FROM users WHERE role_id = ${})",
                params.len()
            ));
        }
        if let Some(title) = &self.filter.title {
            params.push(SqlParam::Text(contains_pattern(title)));
            conditions.push(format!(r"title ILIKE ${} ESCAPE '\'", params.len()));
        }

        if conditions.is_empty() {
            (String::new(), params)
        } else {
            (format!(" WHERE {}", conditions.join(" AND ")), params)
        }
    }
}

/// `%term%` with LIKE wildcards in `term` escaped, so user input matches literally
pub fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

pub fn bind_param_query<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    p: &'q SqlParam,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match p {
        SqlParam::Int(i) => q.bind(*i),
        SqlParam::BigInt(i) => q.bind(*i),
        SqlParam::Text(s) => q.bind(s.as_str()),
    }
}

pub fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    p: &'q SqlParam,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    match p {
        SqlParam::Int(i) => q.bind(*i),
        SqlParam::BigInt(i) => q.bind(*i),
        SqlParam::Text(s) => q.bind(s.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AccessLevel;

    #[test]
    fn escapes_like_wildcards() {
        assert_eq!(contains_pattern("doc"), "%doc%");
        assert_eq!(contains_pattern("50%_off"), r"%50\%\_off%");
        assert_eq!(contains_pattern(r"a\b"), r"%a\\b%");
    }

    #[test]
    fn unfiltered_select_has_no_where() {
        let filter = DocumentFilter::default();
        let sql = DocumentQuery::new(&filter).select(Page { limit: 5, offset: 10 });
        assert_eq!(
            sql.query,
            "SELECT id, title, content, access, user_id, created_at, updated_at FROM documents ORDER BY id ASC LIMIT $1 OFFSET $2"
        );
        assert_eq!(sql.params, vec![SqlParam::BigInt(5), SqlParam::BigInt(10)]);
    }

    #[test]
    fn public_title_search_numbers_params_in_order() {
        let filter = DocumentFilter::public().with_title("Report");
        let sql = DocumentQuery::new(&filter).select(Page { limit: 20, offset: 0 });
        assert!(sql.query.contains(r"WHERE access = $1 AND title ILIKE $2 ESCAPE '\'"));
        assert!(sql.query.ends_with("LIMIT $3 OFFSET $4"));
        assert_eq!(sql.params[0], SqlParam::Text("public".to_string()));
        assert_eq!(sql.params[1], SqlParam::Text("%Report%".to_string()));
    }

    #[test]
    fn role_scope_uses_owner_role_subquery() {
        let filter = DocumentFilter::role_scoped(2);
        let sql = DocumentQuery::new(&filter).count();
        assert_eq!(
            sql.query,
            "SELECT COUNT(*) AS count FROM documents WHERE access = $1 AND user_id IN (SELECT id FROM users WHERE role_id = $2)"
        );
        assert_eq!(
            sql.params,
            vec![SqlParam::Text(AccessLevel::Role.as_str().to_string()), SqlParam::Int(2)]
        );
    }
}
