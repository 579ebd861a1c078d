//! REST API module.
//!
//! Contains all API routes and handlers following the frontend contract.

mod accounts;
mod feedback;
mod profiles;
mod swaps;

pub use accounts::*;
pub use feedback::*;
pub use profiles::*;
pub use swaps::*;

use axum::{
    extract::{FromRequest, FromRequestParts},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;

/// JSON body extractor whose rejections use the application error envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Path extractor whose rejections use the application error envelope.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// Success response with an explicit status code.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub status: StatusCode,
    pub body: T,
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;

/// Create a 200 response.
pub fn ok<T: Serialize>(body: T) -> ApiResult<T> {
    Ok(ApiResponse {
        status: StatusCode::OK,
        body,
    })
}

/// Create a 201 response.
pub fn created<T: Serialize>(body: T) -> ApiResult<T> {
    Ok(ApiResponse {
        status: StatusCode::CREATED,
        body,
    })
}

/// Body of responses that only acknowledge an action.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
