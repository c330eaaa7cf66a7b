use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SecurityConfig;

/// Identity carried inside every issued token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: i32,
    pub email: String,
    #[serde(rename = "roleID")]
    pub role_id: i32,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(id: i32, email: String, role_id: i32, role: String, security: &SecurityConfig) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(security.jwt_expiry_hours as i64)).timestamp();

        Self {
            id,
            email,
            role_id,
            role,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("JWT secret not configured")]
    InvalidSecret,
}

pub fn generate_jwt(claims: &Claims, security: &SecurityConfig) -> Result<String, JwtError> {
    if security.jwt_secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(security.jwt_secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

pub fn validate_jwt(token: &str, security: &SecurityConfig) -> Result<Claims, JwtError> {
    if security.jwt_secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(security.jwt_secret.as_bytes());
    let token_data = decode::<Claims>(token, &decoding_key, &Validation::default())
        .map_err(|e| JwtError::InvalidToken(e.to_string()))?;

    Ok(token_data.claims)
}

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error(transparent)]
    Bcrypt(#[from] bcrypt::BcryptError),

    #[error("password worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// bcrypt is CPU bound, so it runs off the async workers
pub async fn hash_password(password: &str, cost: u32) -> Result<String, PasswordError> {
    let password = password.to_string();
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
    Ok(hash)
}

pub async fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let password = password.to_string();
    let hash = hash.to_string();
    let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??;
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn token_round_trip() {
        let security = AppConfig::development().security;
        let claims = Claims::new(7, "ghost@ghost.com".into(), 2, "regular".into(), &security);

        let token = generate_jwt(&claims, &security).unwrap();
        let decoded = validate_jwt(&token, &security).unwrap();

        assert_eq!(decoded.id, 7);
        assert_eq!(decoded.role_id, 2);
        assert_eq!(decoded.role, "regular");
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let security = AppConfig::development().security;
        let mut other = security.clone();
        other.jwt_secret = "something-else".into();

        let claims = Claims::new(1, "a@b.c".into(), 1, "admin".into(), &other);
        let token = generate_jwt(&claims, &other).unwrap();

        assert!(matches!(validate_jwt(&token, &security), Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn refuses_empty_secret() {
        let mut security = AppConfig::development().security;
        security.jwt_secret.clear();
        let claims = Claims::new(1, "a@b.c".into(), 1, "admin".into(), &security);
        assert!(matches!(generate_jwt(&claims, &security), Err(JwtError::InvalidSecret)));
    }

    #[tokio::test]
    async fn password_hash_verifies() {
        let hash = hash_password("password", 4).await.unwrap();
        assert_ne!(hash, "password");
        assert!(verify_password("password", &hash).await.unwrap());
        assert!(!verify_password("wrong", &hash).await.unwrap());
    }
}
