use thiserror::Error;
use tracing::info;

use crate::auth::{hash_password, PasswordError};
use crate::config::SecurityConfig;
use crate::database::models::NewUser;
use crate::database::{DatabaseError, Store};
use crate::types::{ADMIN_ROLE, REGULAR_ROLE};

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("Password error: {0}")]
    Password(#[from] PasswordError),
}

/// Ensure the built-in roles exist and, when configured, an admin account.
/// Safe to run on every start.
pub async fn seed(store: &dyn Store, security: &SecurityConfig) -> Result<(), BootstrapError> {
    for title in [ADMIN_ROLE, REGULAR_ROLE] {
        if store.find_role_by_title(title).await?.is_none() {
            store.create_role(title).await?;
            info!("Seeded role '{}'", title);
        }
    }

    let (Some(email), Some(password)) = (&security.admin_email, &security.admin_password) else {
        return Ok(());
    };
    let email = email.trim().to_lowercase();

    if store.find_user_by_email(&email).await?.is_some() {
        return Ok(());
    }

    let admin_role = store
        .find_role_by_title(ADMIN_ROLE)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("role '{}'", ADMIN_ROLE)))?;

    store
        .create_user(NewUser {
            first_name: "admin".to_string(),
            last_name: "admin".to_string(),
            email: email.clone(),
            password: hash_password(password, security.bcrypt_cost).await?,
            role_id: admin_role.id,
        })
        .await?;
    info!("Seeded admin account {}", email);

    Ok(())
}
