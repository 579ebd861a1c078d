//! Skill catalog, own-profile and public discovery endpoints.

use axum::{
    extract::{Query, State},
    Extension,
};
use serde::Serialize;

use super::{ok, ApiJson, ApiPath, ApiResult};
use crate::auth::Principal;
use crate::errors::AppError;
use crate::models::{
    HomeQuery, Profile, PublicProfile, PublicUserSummary, Skill, UpdateProfileRequest,
};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ProfileEnvelope {
    pub profile: Profile,
}

#[derive(Debug, Serialize)]
pub struct ProfileUpdated {
    pub success: bool,
    pub message: String,
    pub profile_completed: bool,
    pub public_profile: bool,
}

#[derive(Debug, Serialize)]
pub struct HomeListing {
    pub users: Vec<PublicUserSummary>,
}

/// GET /skills - List the skill catalog.
pub async fn list_skills(State(state): State<AppState>) -> ApiResult<Vec<Skill>> {
    ok(state.repo.list_skills().await?)
}

/// GET /myprofile - The caller's own profile.
pub async fn get_my_profile(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<ProfileEnvelope> {
    let profile = state
        .repo
        .get_profile(principal.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found."))?;

    ok(ProfileEnvelope { profile })
}

/// PUT /myprofile - Replace the caller's profile fields and skills.
pub async fn update_my_profile(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiJson(request): ApiJson<UpdateProfileRequest>,
) -> ApiResult<ProfileUpdated> {
    let status = state
        .repo
        .update_profile(principal.user_id, &request)
        .await?;

    ok(ProfileUpdated {
        success: true,
        message: "Profile updated successfully.".to_string(),
        profile_completed: status.profile_completed,
        public_profile: status.public_profile,
    })
}

/// GET /home - Complete, public profiles, best rated first.
pub async fn home(
    State(state): State<AppState>,
    Query(query): Query<HomeQuery>,
) -> ApiResult<HomeListing> {
    let users = state.repo.list_public_users(&query).await?;
    tracing::debug!(count = users.len(), "Listed public profiles");
    ok(HomeListing { users })
}

/// GET /profile/{user_id} - Another user's public profile.
pub async fn view_profile(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiPath(user_id): ApiPath<i64>,
) -> ApiResult<PublicProfile> {
    ok(state
        .repo
        .get_public_profile(principal.user_id, user_id)
        .await?)
}
