//! User account and profile models.

use serde::{Deserialize, Serialize};

use super::Skill;

/// Request body for `POST /signup`.
#[derive(Debug, Clone, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Request body for `POST /login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Public account identity returned after signup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub user_id: i64,
    pub email: String,
    pub name: String,
}

/// A stored user row with its credential hash.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user_id: i64,
    pub email: String,
    pub password_hash: String,
}

/// The caller's own profile, as shown on `GET /myprofile`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub location: Option<String>,
    pub availability: Option<String>,
    pub public_profile: bool,
    pub profile_completed: bool,
    pub skills_offered: Vec<Skill>,
    pub skills_wanted: Vec<Skill>,
}

/// Request body for `PUT /myprofile`.
///
/// Skill lists are replaced wholesale: `skills_*` carry existing catalog ids and
/// `new_skills_*` are comma-separated names resolved (or created) case-insensitively.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub availability: Option<String>,
    #[serde(default)]
    pub public_profile: bool,
    #[serde(default)]
    pub skills_offered: Vec<i64>,
    #[serde(default)]
    pub skills_wanted: Vec<i64>,
    #[serde(default)]
    pub new_skills_offered: String,
    #[serde(default)]
    pub new_skills_wanted: String,
}

/// Outcome of a profile update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileStatus {
    pub profile_completed: bool,
    pub public_profile: bool,
}

/// Eligibility flags of a user who may receive swap requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiverFlags {
    pub profile_completed: bool,
    pub public_profile: bool,
}

impl ReceiverFlags {
    pub fn is_eligible(&self) -> bool {
        self.profile_completed && self.public_profile
    }
}

/// A profile is complete once it has a location, an availability, and at least
/// one offered and one wanted skill.
pub fn is_profile_complete(
    location: Option<&str>,
    availability: Option<&str>,
    offered_count: usize,
    wanted_count: usize,
) -> bool {
    let filled = |v: Option<&str>| v.is_some_and(|s| !s.trim().is_empty());
    filled(location) && filled(availability) && offered_count > 0 && wanted_count > 0
}

/// A card on the public home listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicUserSummary {
    pub user_id: i64,
    pub name: String,
    pub location: Option<String>,
    pub skills_offered: Vec<String>,
    pub skills_wanted: Vec<String>,
    pub rating: Option<f64>,
}

/// Query parameters accepted by `GET /home`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HomeQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub skill: Option<String>,
}

/// A feedback line shown on a public profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceivedFeedback {
    pub rating: i64,
    pub comment: Option<String>,
    pub from_user: String,
}

/// Another user's public profile, as shown on `GET /profile/{user_id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicProfile {
    pub user_id: i64,
    pub name: String,
    pub location: Option<String>,
    pub availability: Option<String>,
    pub average_rating: Option<f64>,
    pub skills_offered: Vec<Skill>,
    pub skills_wanted: Vec<Skill>,
    pub feedback: Vec<ReceivedFeedback>,
}
