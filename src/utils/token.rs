use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{ErrorMessage, HttpError},
    models::usermodel::{Actor, UserRole},
};

/// What the session cookie carries: enough to authorize a request without a
/// user lookup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenClaims {
    pub sub: String,
    pub username: String,
    pub role: UserRole,
    pub iat: usize,
    pub exp: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionUser {
    pub id: Uuid,
    pub username: String,
    pub role: UserRole,
}

impl SessionUser {
    pub fn actor(&self) -> Actor {
        Actor::new(self.id, self.role)
    }
}

pub fn create_token(
    user_id: &str,
    username: &str,
    role: UserRole,
    secret: &[u8],
    expires_in_hours: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    if user_id.is_empty() {
        return Err(jsonwebtoken::errors::ErrorKind::InvalidSubject.into());
    }

    let now = Utc::now();
    let iat = now.timestamp() as usize;
    let exp = Duration::try_hours(expires_in_hours)
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .ok_or_else(|| jsonwebtoken::errors::ErrorKind::MissingRequiredClaim("exp".to_string()))?
        .timestamp() as usize;
    let claims = TokenClaims {
        sub: user_id.to_string(),
        username: username.to_string(),
        role,
        iat,
        exp,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )
}

pub fn decode_token<T: Into<String>>(token: T, secret: &[u8]) -> Result<SessionUser, HttpError> {
    let decoded = decode::<TokenClaims>(
        &token.into(),
        &DecodingKey::from_secret(secret),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|_| HttpError::unauthorized(ErrorMessage::InvalidToken.to_string()))?;

    let id = Uuid::parse_str(&decoded.claims.sub)
        .map_err(|_| HttpError::unauthorized(ErrorMessage::InvalidToken.to_string()))?;

    Ok(SessionUser {
        id,
        username: decoded.claims.username,
        role: decoded.claims.role,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret";

    #[test]
    fn test_token_carries_session_identity() {
        let id = Uuid::new_v4();
        let token = create_token(&id.to_string(), "ada", UserRole::Staff, SECRET, 24).unwrap();

        let session = decode_token(token, SECRET).unwrap();
        assert_eq!(session.id, id);
        assert_eq!(session.username, "ada");
        assert_eq!(session.role, UserRole::Staff);
        assert_eq!(session.actor(), Actor::new(id, UserRole::Staff));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = create_token(&Uuid::new_v4().to_string(), "ada", UserRole::Citizen, SECRET, 24).unwrap();
        let err = decode_token(token, b"other-secret").unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = create_token(&Uuid::new_v4().to_string(), "ada", UserRole::Citizen, SECRET, -2).unwrap();
        assert!(decode_token(token, SECRET).is_err());
    }

    #[test]
    fn test_unrepresentable_lifetime_is_an_error() {
        let id = Uuid::new_v4().to_string();
        assert!(create_token(&id, "ada", UserRole::Citizen, SECRET, 9_000_000_000_000_000).is_err());
        assert!(create_token(&id, "ada", UserRole::Citizen, SECRET, i64::MAX).is_err());
    }

    #[test]
    fn test_empty_subject_rejected() {
        assert!(create_token("", "ada", UserRole::Citizen, SECRET, 24).is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(decode_token("not.a.token", SECRET).is_err());
    }
}
