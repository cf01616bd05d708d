pub mod password;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::SecurityConfig;
use crate::database::models::User;

/// Identity carried inside every token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenUser {
    pub id: Uuid,
    pub username: String,
    pub fullname: Option<String>,
}

impl From<&User> for TokenUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            fullname: user.fullname.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user: TokenUser,
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user: TokenUser, expiry_hours: u64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub: user.username.clone(),
            user,
            iat: now.timestamp(),
            exp,
        }
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("JWT secret not configured")]
    InvalidSecret,

    #[error("JWT token expired")]
    Expired,

    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),
}

/// Sign a fresh token for `user` using the configured secret and expiry
pub fn issue_token(user: TokenUser, security: &SecurityConfig) -> Result<String, JwtError> {
    generate_jwt(&Claims::new(user, security.jwt_expiry_hours), &security.jwt_secret)
}

pub fn generate_jwt(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::default();

    encode(&header, claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

pub fn validate_jwt(token: &str, secret: &str) -> Result<Claims, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => JwtError::Expired,
            _ => JwtError::InvalidToken(e.to_string()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_user() -> TokenUser {
        TokenUser {
            id: Uuid::new_v4(),
            username: "bobuser".into(),
            fullname: Some("Bob User".into()),
        }
    }

    #[test]
    fn round_trip_preserves_identity() {
        let claims = Claims::new(token_user(), 1);
        let token = generate_jwt(&claims, "secret").unwrap();
        let decoded = validate_jwt(&token, "secret").unwrap();

        assert_eq!(decoded.user, claims.user);
        assert_eq!(decoded.sub, "bobuser");
        assert_eq!(decoded.exp - decoded.iat, 3600);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = generate_jwt(&Claims::new(token_user(), 1), "secret").unwrap();
        let err = validate_jwt(&token, "other").unwrap_err();
        assert!(matches!(err, JwtError::InvalidToken(_)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let mut claims = Claims::new(token_user(), 1);
        claims.iat -= 7200;
        claims.exp = claims.iat + 60;
        let token = generate_jwt(&claims, "secret").unwrap();
        assert!(matches!(validate_jwt(&token, "secret"), Err(JwtError::Expired)));
    }

    #[test]
    fn empty_secret_never_signs() {
        let err = generate_jwt(&Claims::new(token_user(), 1), "").unwrap_err();
        assert!(matches!(err, JwtError::InvalidSecret));
    }

    #[test]
    fn garbage_is_not_a_token() {
        assert!(matches!(
            validate_jwt("not.a.token", "secret"),
            Err(JwtError::InvalidToken(_))
        ));
    }
}
