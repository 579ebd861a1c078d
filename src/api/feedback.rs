//! Feedback endpoint.

use axum::{extract::State, Extension};

use super::{created, ApiJson, ApiResult, MessageResponse};
use crate::auth::Principal;
use crate::models::SubmitFeedbackRequest;
use crate::AppState;

/// POST /feedback - Rate the other party of an accepted swap.
pub async fn submit_feedback(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiJson(request): ApiJson<SubmitFeedbackRequest>,
) -> ApiResult<MessageResponse> {
    state
        .repo
        .submit_feedback(principal.user_id, request)
        .await?;

    created(MessageResponse::new("Feedback submitted successfully."))
}
