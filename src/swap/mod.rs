//! Swap request lifecycle rules.
//!
//! A swap starts `pending` and moves exactly once, to `accepted` or `rejected` by
//! its receiver or to `cancelled` by its creator. The functions here are the
//! guards for those transitions and for the feedback gate; they do no I/O; the
//! repository runs them against freshly read rows and then applies the write
//! with a `status = 'pending'` compare-and-swap.

mod time_ago;

pub use time_ago::*;

use crate::errors::AppError;
use crate::models::{
    NewFeedback, NewSwap, ReceiverFlags, RespondSwapRequest, SendSwapRequest,
    SubmitFeedbackRequest, SwapAction, SwapRequest, SwapStatus,
};

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

/// Check that a send request carries every id and does not target its creator.
pub fn validate_send(creator_id: i64, request: SendSwapRequest) -> Result<NewSwap, AppError> {
    let (Some(receiver_id), Some(offered_skill_id), Some(requested_skill_id)) = (
        request.receiver_id,
        request.offered_skill_id,
        request.requested_skill_id,
    ) else {
        return Err(AppError::invalid_input("Missing required fields."));
    };

    if receiver_id == creator_id {
        return Err(AppError::invalid_input(
            "Cannot send a swap request to yourself.",
        ));
    }

    Ok(NewSwap {
        creator_id,
        receiver_id,
        offered_skill_id,
        requested_skill_id,
        message: request.message.filter(|m| !m.trim().is_empty()),
    })
}

/// A receiver must exist and have a complete, public profile.
pub fn ensure_receiver_eligible(receiver: Option<ReceiverFlags>) -> Result<(), AppError> {
    match receiver {
        Some(flags) if flags.is_eligible() => Ok(()),
        _ => Err(AppError::NotEligible(
            "Cannot send request. Receiver profile is not eligible.".to_string(),
        )),
    }
}

/// The offered skill must be listed by the creator and the requested skill by the receiver.
pub fn ensure_skills_listed(creator_offers: bool, receiver_offers: bool) -> Result<(), AppError> {
    if !creator_offers {
        return Err(AppError::invalid_input(
            "Offered skill must be one of your offered skills.",
        ));
    }
    if !receiver_offers {
        return Err(AppError::invalid_input(
            "Requested skill must be one of the receiver's offered skills.",
        ));
    }
    Ok(())
}

/// Parse the body of the combined respond operation.
pub fn parse_respond(request: &RespondSwapRequest) -> Result<(i64, SwapAction), AppError> {
    let action = request.action.as_deref().and_then(SwapAction::from_str);
    match (request.swap_id, action) {
        (Some(swap_id), Some(action)) => Ok((swap_id, action)),
        _ => Err(AppError::invalid_input("Invalid swap_id or action.")),
    }
}

/// The error reported when a swap is no longer pending.
pub fn already_in(status: SwapStatus) -> AppError {
    AppError::InvalidState(format!("Swap is already {}.", status))
}

/// Guard an accept or reject, in order: existence, receiver identity, pending status.
pub fn ensure_can_respond(swap: Option<&SwapRequest>, actor_id: i64) -> Result<(), AppError> {
    let swap = swap.ok_or_else(|| AppError::not_found("Swap request not found."))?;

    if swap.receiver_id != actor_id {
        return Err(AppError::Forbidden(
            "You are not authorized to respond to this request.".to_string(),
        ));
    }

    if swap.status.is_terminal() {
        return Err(already_in(swap.status));
    }

    Ok(())
}

/// Cancel collapses not-found, not-yours and not-pending into one answer.
pub fn cancel_refused() -> AppError {
    AppError::not_found("Swap not found or cannot be cancelled.")
}

/// Check the shape of a feedback submission.
pub fn validate_feedback(
    from_user_id: i64,
    request: SubmitFeedbackRequest,
) -> Result<NewFeedback, AppError> {
    let invalid = || AppError::invalid_input("Invalid data provided.");

    let swap_id = request.swap_id.ok_or_else(invalid)?;
    let to_user_id = request.to_user_id.ok_or_else(invalid)?;
    let rating = request
        .rating
        .filter(|r| (MIN_RATING..=MAX_RATING).contains(r))
        .ok_or_else(invalid)?;

    Ok(NewFeedback {
        swap_id,
        from_user_id,
        to_user_id,
        rating,
        comment: request.comment,
    })
}

/// Gate feedback on the parent swap, in order: existence, accepted status,
/// rater participation, ratee being the other party.
pub fn ensure_feedback_allowed(
    swap: Option<&SwapRequest>,
    feedback: &NewFeedback,
) -> Result<(), AppError> {
    let swap = swap.ok_or_else(|| AppError::not_found("Swap not found."))?;

    if swap.status != SwapStatus::Accepted {
        return Err(AppError::InvalidState(
            "Swap must be accepted to leave feedback.".to_string(),
        ));
    }

    let parties = [swap.creator_id, swap.receiver_id];

    if !parties.contains(&feedback.from_user_id) {
        return Err(AppError::Forbidden(
            "You are not a participant of this swap.".to_string(),
        ));
    }

    if !parties.contains(&feedback.to_user_id) {
        return Err(AppError::invalid_input("Invalid recipient for feedback."));
    }

    if feedback.to_user_id == feedback.from_user_id {
        return Err(AppError::invalid_input("Cannot give feedback to yourself."));
    }

    Ok(())
}

pub fn duplicate_feedback() -> AppError {
    AppError::Conflict("Feedback already submitted.".to_string())
}
