//! Swap request endpoints.

use axum::{
    extract::State,
    Extension,
};
use serde::Serialize;

use super::{created, ok, ApiJson, ApiPath, ApiResult, MessageResponse};
use crate::auth::Principal;
use crate::models::{
    MySwaps, ReceivedSwap, RespondSwapRequest, SendSwapRequest, SentSwap, SwapAction,
    SwapSkillOptions, SwapStatus,
};
use crate::swap;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct SwapCreated {
    pub success: bool,
    pub message: String,
    pub swap_id: i64,
}

/// GET /swap/data/{receiver_id} - Skills to pick from before sending a request.
pub async fn swap_data(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiPath(receiver_id): ApiPath<i64>,
) -> ApiResult<SwapSkillOptions> {
    ok(state
        .repo
        .swap_skill_options(principal.user_id, receiver_id)
        .await?)
}

/// POST /swap/send - Create a swap request.
pub async fn send_swap(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiJson(request): ApiJson<SendSwapRequest>,
) -> ApiResult<SwapCreated> {
    let swap = state.repo.send_swap(principal.user_id, request).await?;

    created(SwapCreated {
        success: true,
        message: "Swap request sent successfully.".to_string(),
        swap_id: swap.id,
    })
}

/// GET /myswaps - Sent and received requests with relative ages.
pub async fn my_swaps(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<MySwaps> {
    ok(state
        .repo
        .list_my_swaps(principal.user_id, chrono::Utc::now())
        .await?)
}

/// GET /myswaps/sent - Sent requests in full detail.
pub async fn sent_swaps(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Vec<SentSwap>> {
    ok(state.repo.list_sent_swaps(principal.user_id).await?)
}

/// GET /myswaps/received - Received requests in full detail.
pub async fn received_swaps(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Vec<ReceivedSwap>> {
    ok(state.repo.list_received_swaps(principal.user_id).await?)
}

/// PUT /myswaps/{id}/accept
pub async fn accept_swap(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiPath(swap_id): ApiPath<i64>,
) -> ApiResult<MessageResponse> {
    answer(&state, &principal, swap_id, SwapAction::Accept).await
}

/// PUT /myswaps/{id}/reject
pub async fn reject_swap(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiPath(swap_id): ApiPath<i64>,
) -> ApiResult<MessageResponse> {
    answer(&state, &principal, swap_id, SwapAction::Reject).await
}

/// PATCH /myswaps/respond - Accept or reject via `{swap_id, action}`.
pub async fn respond_swap(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiJson(request): ApiJson<RespondSwapRequest>,
) -> ApiResult<MessageResponse> {
    let (swap_id, action) = swap::parse_respond(&request)?;
    answer(&state, &principal, swap_id, action).await
}

/// DELETE /myswaps/cancel/{id}
pub async fn cancel_swap(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiPath(swap_id): ApiPath<i64>,
) -> ApiResult<MessageResponse> {
    state.repo.cancel_swap(principal.user_id, swap_id).await?;
    ok(MessageResponse::new("Swap request cancelled successfully."))
}

async fn answer(
    state: &AppState,
    principal: &Principal,
    swap_id: i64,
    action: SwapAction,
) -> ApiResult<MessageResponse> {
    let status: SwapStatus = state
        .repo
        .respond_to_swap(principal.user_id, swap_id, action)
        .await?;

    ok(MessageResponse::new(format!("Swap request {}.", status)))
}
