//! Store behaviour against a real PostgreSQL database.
//!
//! Ignored by default; run with `DATABASE_URL=postgres://... cargo test -- --ignored`.

use anyhow::{Context, Result};

use docman_api::config::AppConfig;
use docman_api::database::models::{DocumentChanges, DocumentFilter, NewDocument, NewUser};
use docman_api::database::{DatabaseError, DatabaseManager, Page, PgStore, Store};
use docman_api::types::AccessLevel;

async fn connect() -> Result<PgStore> {
    let mut config = AppConfig::development();
    config.database.url = Some(std::env::var("DATABASE_URL").context("DATABASE_URL not set")?);

    let pool = DatabaseManager::connect(&config.database).await?;
    DatabaseManager::migrate(&pool).await?;
    // Running the DDL twice must be harmless
    DatabaseManager::migrate(&pool).await?;
    Ok(PgStore::new(pool))
}

fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default())
}

#[tokio::test]
#[ignore = "needs DATABASE_URL"]
async fn postgres_store_enforces_schema_constraints() -> Result<()> {
    let store = connect().await?;
    store.ping().await?;

    let role = store.create_role(&unique("editor")).await?;
    let err = store.create_role(&role.title).await.unwrap_err();
    assert!(matches!(err, DatabaseError::Conflict(_)), "got {:?}", err);

    let email = format!("{}@docman.test", unique("pg"));
    let user = store
        .create_user(NewUser {
            first_name: "pg".into(),
            last_name: "user".into(),
            email: email.clone(),
            password: "not-a-real-hash".into(),
            role_id: role.id,
        })
        .await?;
    assert_eq!(store.find_user_by_email(&email).await?.map(|u| u.id), Some(user.id));

    // A role still held by a user cannot go away
    let err = store.delete_role(role.id).await.unwrap_err();
    assert!(matches!(err, DatabaseError::Conflict(_)), "got {:?}", err);

    let plain = store
        .create_document(NewDocument {
            title: "  quarterly plan ".into(),
            content: "    indented\n".into(),
            access: AccessLevel::Private,
            user_id: user.id,
        })
        .await?;
    assert_eq!(plain.title, "  quarterly plan ");
    assert_eq!(plain.content, "    indented\n");

    let percent = store
        .create_document(NewDocument {
            title: "50% done".into(),
            content: "x".into(),
            access: AccessLevel::Public,
            user_id: user.id,
        })
        .await?;

    // LIKE wildcards in the query are literal
    let (found, total) = store
        .list_documents(
            &DocumentFilter::owned_by(user.id).with_title("%"),
            Page { limit: 10, offset: 0 },
        )
        .await?;
    assert_eq!(total, 1);
    assert_eq!(found[0].id, percent.id);

    let (found, total) = store
        .list_documents(
            &DocumentFilter::owned_by(user.id).with_title("QUARTERLY"),
            Page { limit: 10, offset: 0 },
        )
        .await?;
    assert_eq!(total, 1);
    assert_eq!(found[0].id, plain.id);

    let (window, total) = store
        .list_documents(&DocumentFilter::owned_by(user.id), Page { limit: 1, offset: 1 })
        .await?;
    assert_eq!(total, 2);
    assert_eq!(window.iter().map(|d| d.id).collect::<Vec<_>>(), vec![percent.id]);

    let updated = store
        .update_document(
            plain.id,
            DocumentChanges { access: Some(AccessLevel::Role), ..Default::default() },
        )
        .await?
        .context("document vanished")?;
    assert_eq!(updated.access, AccessLevel::Role);
    assert_eq!(updated.title, plain.title);

    // Deleting the owner cascades to their documents
    assert!(store.delete_user(user.id).await?);
    assert!(store.find_document(plain.id).await?.is_none());
    assert!(store.find_document(percent.id).await?.is_none());
    assert!(store.delete_role(role.id).await?);
    Ok(())
}
