//! Signup and login endpoints.

use axum::{
    extract::State,
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::{created, ok, ApiJson, ApiResult};
use crate::auth;
use crate::errors::AppError;
use crate::models::{LoginRequest, SignupRequest, UserAccount};
use crate::AppState;

pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub success: bool,
    pub message: String,
    pub user: UserAccount,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
}

/// A validated signup form.
#[derive(Debug, PartialEq, Eq)]
pub struct SignupForm {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Validate and normalize a signup request.
pub fn validate_signup(request: SignupRequest) -> Result<SignupForm, AppError> {
    let present = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
    let (Some(email), Some(password), Some(name)) = (
        present(request.email),
        present(request.password),
        present(request.name),
    ) else {
        return Err(AppError::invalid_input(
            "All fields (email, password, name) must be non-empty strings.",
        ));
    };

    let email = email.trim().to_lowercase();
    if !EMAIL_RE.is_match(&email) {
        return Err(AppError::invalid_input("Invalid email format."));
    }

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::invalid_input(
            "Password must be at least 6 characters long.",
        ));
    }

    Ok(SignupForm {
        email,
        password,
        name: name.trim().to_string(),
    })
}

/// POST /signup - Register a new account.
pub async fn signup(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SignupRequest>,
) -> ApiResult<SignupResponse> {
    let form = validate_signup(request)?;
    let password_hash = auth::hash_password(&form.password).await?;

    let user = state
        .repo
        .create_user(&form.email, &password_hash, &form.name)
        .await?;

    tracing::info!(user_id = user.user_id, "User registered");

    created(SignupResponse {
        success: true,
        message: "User registered successfully.".to_string(),
        user,
    })
}

/// POST /login - Exchange credentials for an access token.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Response, AppError> {
    let (Some(email), Some(password)) = (request.email, request.password) else {
        return Err(AppError::invalid_input(
            "Email and password are required and must be strings.",
        ));
    };

    let invalid = || AppError::Unauthenticated("Invalid email or password.".to_string());

    let credentials = state
        .repo
        .find_credentials(&email.trim().to_lowercase())
        .await?
        .ok_or_else(invalid)?;

    if !auth::verify_password(&password, &credentials.password_hash).await? {
        tracing::debug!(user_id = credentials.user_id, "Login with wrong password");
        return Err(invalid());
    }

    let token = state.auth.issue(credentials.user_id, &credentials.email)?;

    let mut response = ok(LoginResponse {
        success: true,
        message: "Login successful".to_string(),
        token: token.clone(),
    })?
    .into_response();

    if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
        response.headers_mut().insert(header::AUTHORIZATION, value);
    }

    Ok(response)
}
