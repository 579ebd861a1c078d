//! Feedback ledger models.

use serde::Deserialize;

/// Request body for `POST /feedback`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitFeedbackRequest {
    #[serde(default)]
    pub swap_id: Option<i64>,
    #[serde(default)]
    pub to_user_id: Option<i64>,
    #[serde(default)]
    pub rating: Option<i64>,
    #[serde(default)]
    pub comment: Option<String>,
}

/// A validated feedback entry ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFeedback {
    pub swap_id: i64,
    pub from_user_id: i64,
    pub to_user_id: i64,
    pub rating: i64,
    pub comment: Option<String>,
}
