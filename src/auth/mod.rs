use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::UserRole;

pub mod password;
pub mod policy;

pub use password::PasswordHashing;
pub use policy::{AccessPolicy, Decision, OwnerOnly, OwnedResource};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: UserRole,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid, AuthError> {
        Uuid::parse_str(&self.sub).map_err(|_| AuthError::MalformedClaims)
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("JWT secret is not configured")]
    InvalidSecret,

    #[error("Invalid token lifetime: {0} minutes")]
    InvalidLifetime(i64),

    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Token has expired")]
    Expired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token claims are malformed")]
    MalformedClaims,

    #[error("Password hashing error: {0}")]
    Hashing(String),
}

/// A freshly signed access token.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

/// Issues and verifies HS256 bearer tokens.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl_minutes: i64) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::InvalidSecret);
        }

        let ttl = Duration::try_minutes(ttl_minutes)
            .filter(|ttl| *ttl > Duration::zero())
            .ok_or(AuthError::InvalidLifetime(ttl_minutes))?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        })
    }

    pub fn ttl_seconds(&self) -> i64 {
        self.ttl.num_seconds()
    }

    pub fn issue(&self, user_id: Uuid, email: &str, role: UserRole) -> Result<IssuedToken, AuthError> {
        self.issue_at(user_id, email, role, Utc::now())
    }

    fn issue_at(
        &self,
        user_id: Uuid,
        email: &str,
        role: UserRole,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, AuthError> {
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AuthError::TokenGeneration("token expiry is out of range".to_string()))?;

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            role,
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let access_token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::TokenGeneration(e.to_string()))?;

        Ok(IssuedToken {
            access_token,
            token_type: "bearer",
            expires_in: self.ttl_seconds(),
        })
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        use jsonwebtoken::errors::ErrorKind;

        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                ErrorKind::Json(_) | ErrorKind::MissingRequiredClaim(_) => AuthError::MalformedClaims,
                _ => AuthError::InvalidToken(e.to_string()),
            }
        })?;

        // sub must be a user id
        data.claims.user_id()?;
        Ok(data.claims)
    }
}
