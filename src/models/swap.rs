//! Swap request models.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a swap request.
///
/// `Pending` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwapStatus {
    Pending,
    Accepted,
    Rejected,
    Cancelled,
}

impl SwapStatus {
    pub const ALL: [SwapStatus; 4] = [
        SwapStatus::Pending,
        SwapStatus::Accepted,
        SwapStatus::Rejected,
        SwapStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SwapStatus::Pending => "pending",
            SwapStatus::Accepted => "accepted",
            SwapStatus::Rejected => "rejected",
            SwapStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(SwapStatus::Pending),
            "accepted" => Some(SwapStatus::Accepted),
            "rejected" => Some(SwapStatus::Rejected),
            "cancelled" => Some(SwapStatus::Cancelled),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, SwapStatus::Pending)
    }
}

impl std::fmt::Display for SwapStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A receiver's response to a pending swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapAction {
    Accept,
    Reject,
}

impl SwapAction {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "accept" => Some(SwapAction::Accept),
            "reject" => Some(SwapAction::Reject),
            _ => None,
        }
    }

    /// The status a pending swap moves to under this action.
    pub fn target_status(&self) -> SwapStatus {
        match self {
            SwapAction::Accept => SwapStatus::Accepted,
            SwapAction::Reject => SwapStatus::Rejected,
        }
    }
}

/// A stored swap request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapRequest {
    pub id: i64,
    pub creator_id: i64,
    pub receiver_id: i64,
    pub offered_skill_id: i64,
    pub requested_skill_id: i64,
    pub message: Option<String>,
    pub status: SwapStatus,
    pub created_at: String,
    pub updated_at: String,
}

/// Request body for `POST /swap/send`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SendSwapRequest {
    #[serde(default)]
    pub receiver_id: Option<i64>,
    #[serde(default)]
    pub offered_skill_id: Option<i64>,
    #[serde(default)]
    pub requested_skill_id: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A send request whose required ids are all present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSwap {
    pub creator_id: i64,
    pub receiver_id: i64,
    pub offered_skill_id: i64,
    pub requested_skill_id: i64,
    pub message: Option<String>,
}

/// Request body for `PATCH /myswaps/respond`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RespondSwapRequest {
    #[serde(default)]
    pub swap_id: Option<i64>,
    #[serde(default)]
    pub action: Option<String>,
}

/// Compact listing row for `GET /myswaps`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapSummary {
    pub swap_id: i64,
    /// Display name of the other party
    pub name: String,
    pub offered_skill: Option<String>,
    pub requested_skill: Option<String>,
    pub status: SwapStatus,
    pub time_ago: String,
}

/// Response body for `GET /myswaps`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MySwaps {
    pub sent_requests: Vec<SwapSummary>,
    pub received_requests: Vec<SwapSummary>,
}

/// The other party of a swap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapParty {
    pub user_id: i64,
    pub name: String,
    pub profile_pic: Option<String>,
}

/// A skill reference that may dangle if the catalog row is missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillRef {
    pub skill_id: i64,
    pub skill_name: Option<String>,
}

/// Full-detail row for `GET /myswaps/sent`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentSwap {
    pub id: i64,
    pub receiver: SwapParty,
    pub offered_skill: SkillRef,
    pub requested_skill: SkillRef,
    pub message: String,
    pub status: SwapStatus,
    pub created_at: String,
    pub updated_at: String,
}

/// Full-detail row for `GET /myswaps/received`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceivedSwap {
    pub id: i64,
    pub sender: SwapParty,
    pub offered_skill: SkillRef,
    pub requested_skill: SkillRef,
    pub message: String,
    pub status: SwapStatus,
    pub created_at: String,
    pub updated_at: String,
}

/// Skill choices offered to a user about to send a swap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapSkillOptions {
    pub sender_offered_skills: Vec<super::Skill>,
    pub receiver_offered_skills: Vec<super::Skill>,
    pub receiver_wanted_skills: Vec<super::Skill>,
}
