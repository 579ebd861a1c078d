//! Bearer-token authentication.
//!
//! Access tokens are HS256 JWTs carrying the user id and email. Passwords are
//! stored as argon2 PHC strings.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::AppState;

/// Cookie consulted when no Authorization header is sent.
pub const TOKEN_COOKIE: &str = "token";

/// The authenticated caller, resolved from a request's credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i64,
    pub email: String,
}

/// Claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: uuid::Uuid,
}

/// Signing material and lifetime for access tokens.
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: u64,
}

impl TokenKeys {
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }

    /// Keys from the configured secret, or a random per-process one.
    pub fn from_config(secret: Option<&str>, ttl_secs: u64) -> Self {
        match secret {
            Some(secret) => Self::new(secret, ttl_secs),
            None => {
                let ephemeral = format!("{}{}", uuid::Uuid::new_v4(), uuid::Uuid::new_v4());
                Self::new(&ephemeral, ttl_secs)
            }
        }
    }

    /// Issue an access token for a user.
    pub fn issue(&self, user_id: i64, email: &str) -> Result<String, AppError> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            iat: now,
            exp: now + self.ttl_secs as i64,
            jti: uuid::Uuid::new_v4(),
        };
        encode(&Header::default(), &claims, &self.encoding).map_err(|e| {
            tracing::error!("Failed to sign token: {}", e);
            AppError::Unexpected("Failed to issue token".to_string())
        })
    }

    /// Validate an access token and return its claims.
    pub fn validate(&self, token: &str) -> Result<Claims, AppError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        Ok(data.claims)
    }
}

/// Hash a plaintext password on the blocking pool.
pub async fn hash_password(password: &str) -> Result<String, AppError> {
    let password = password.to_string();
    run_blocking(move || {
        let salt = SaltString::generate(&mut rand::thread_rng());
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)?
            .to_string();
        Ok(hash)
    })
    .await
}

/// Verify a password against a stored hash on the blocking pool.
pub async fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let password = password.to_string();
    let hash = hash.to_string();
    run_blocking(move || {
        let parsed = PasswordHash::new(&hash)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    })
    .await
}

async fn run_blocking<T, F>(work: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|e| {
        tracing::error!("Password task failed: {}", e);
        AppError::Unexpected("Password hashing failed".to_string())
    })?
}

/// Extract the bearer token from the Authorization header, then the token cookie.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    bearer.or_else(|| {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|s| s.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == TOKEN_COOKIE)
            .map(|(_, value)| value.to_string())
            .filter(|s| !s.is_empty())
    })
}

/// Authentication middleware.
///
/// Resolves the credential to a [`Principal`] and stores it in request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(request.headers())
        .ok_or_else(|| AppError::Unauthenticated("Missing authorization token".to_string()))?;

    let claims = state.auth.validate(&token)?;

    // The token may outlive its user.
    let principal = state
        .repo
        .find_principal(claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthenticated("User not found".to_string()))?;

    tracing::debug!(user_id = principal.user_id, "Authenticated request");
    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}
