//! Database repository for accounts, the skill catalog and profiles.
//!
//! Uses prepared statements and transactions for data integrity. Swap lifecycle
//! and feedback operations live in `swaps.rs`.

use std::collections::HashMap;

use sqlx::{Row, SqliteConnection, SqlitePool};

use super::now_timestamp;
use crate::auth::Principal;
use crate::errors::{is_unique_violation, AppError};
use crate::models::{
    is_profile_complete, split_skill_names, HomeQuery, Profile, ProfileStatus, PublicProfile,
    PublicUserSummary, ReceivedFeedback, ReceiverFlags, Skill, SkillType, SwapSkillOptions,
    UpdateProfileRequest, UserAccount, UserCredentials,
};

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pub(super) pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Close the connection pool, waiting for checked-out connections.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    // ==================== ACCOUNT OPERATIONS ====================

    /// Create a user. The email must already be normalized.
    pub async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        name: &str,
    ) -> Result<UserAccount, AppError> {
        let result = sqlx::query(
            "INSERT INTO users (email, password_hash, name, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(email)
        .bind(password_hash)
        .bind(name)
        .bind(now_timestamp())
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => Ok(UserAccount {
                user_id: done.last_insert_rowid(),
                email: email.to_string(),
                name: name.to_string(),
            }),
            Err(e) if is_unique_violation(&e) => {
                Err(AppError::Conflict("Email is already registered.".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Look up login credentials by normalized email.
    pub async fn find_credentials(&self, email: &str) -> Result<Option<UserCredentials>, AppError> {
        let row = sqlx::query("SELECT id, email, password_hash FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| UserCredentials {
            user_id: row.get("id"),
            email: row.get("email"),
            password_hash: row.get("password_hash"),
        }))
    }

    /// Resolve a token subject to a principal, if the user still exists.
    pub async fn find_principal(&self, user_id: i64) -> Result<Option<Principal>, AppError> {
        let row = sqlx::query("SELECT id, email FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| Principal {
            user_id: row.get("id"),
            email: row.get("email"),
        }))
    }

    // ==================== SKILL OPERATIONS ====================

    /// List the whole skill catalog.
    pub async fn list_skills(&self) -> Result<Vec<Skill>, AppError> {
        let rows = sqlx::query("SELECT id, name FROM skills ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(skill_from_row).collect())
    }

    /// Skills a user lists with the given type, in the order they were listed.
    pub async fn user_skills(
        &self,
        user_id: i64,
        skill_type: SkillType,
    ) -> Result<Vec<Skill>, AppError> {
        let rows = sqlx::query(
            "SELECT s.id, s.name FROM user_skills us JOIN skills s ON s.id = us.skill_id WHERE us.user_id = ? AND us.skill_type = ? ORDER BY us.rowid",
        )
        .bind(user_id)
        .bind(skill_type.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(skill_from_row).collect())
    }

    /// Whether a user lists a skill with the given type.
    pub async fn user_has_skill(
        &self,
        user_id: i64,
        skill_id: i64,
        skill_type: SkillType,
    ) -> Result<bool, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM user_skills WHERE user_id = ? AND skill_id = ? AND skill_type = ?",
        )
        .bind(user_id)
        .bind(skill_id)
        .bind(skill_type.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    /// Skills a sender can choose between when proposing a swap to `receiver_id`.
    pub async fn swap_skill_options(
        &self,
        sender_id: i64,
        receiver_id: i64,
    ) -> Result<SwapSkillOptions, AppError> {
        Ok(SwapSkillOptions {
            sender_offered_skills: self.user_skills(sender_id, SkillType::Offered).await?,
            receiver_offered_skills: self.user_skills(receiver_id, SkillType::Offered).await?,
            receiver_wanted_skills: self.user_skills(receiver_id, SkillType::Wanted).await?,
        })
    }

    // ==================== PROFILE OPERATIONS ====================

    /// Get the caller's own profile.
    pub async fn get_profile(&self, user_id: i64) -> Result<Option<Profile>, AppError> {
        let row = sqlx::query(
            "SELECT id, name, email, location, availability, public_profile, profile_completed FROM users WHERE id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let public_profile: i64 = row.get("public_profile");
        let profile_completed: i64 = row.get("profile_completed");

        Ok(Some(Profile {
            user_id: row.get("id"),
            name: row.get("name"),
            email: row.get("email"),
            location: row.get("location"),
            availability: row.get("availability"),
            public_profile: public_profile != 0,
            profile_completed: profile_completed != 0,
            skills_offered: self.user_skills(user_id, SkillType::Offered).await?,
            skills_wanted: self.user_skills(user_id, SkillType::Wanted).await?,
        }))
    }

    /// Eligibility flags of a prospective swap receiver.
    pub async fn receiver_flags(&self, user_id: i64) -> Result<Option<ReceiverFlags>, AppError> {
        let row = sqlx::query("SELECT public_profile, profile_completed FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| {
            let public_profile: i64 = row.get("public_profile");
            let profile_completed: i64 = row.get("profile_completed");
            ReceiverFlags {
                profile_completed: profile_completed != 0,
                public_profile: public_profile != 0,
            }
        }))
    }

    /// Replace a user's profile fields and skill lists.
    ///
    /// Skill names are resolved (or created) case-insensitively, every id is
    /// checked against the catalog, and the user's skill rows are deleted and
    /// reinserted. A public profile must be complete; otherwise nothing is written.
    pub async fn update_profile(
        &self,
        user_id: i64,
        request: &UpdateProfileRequest,
    ) -> Result<ProfileStatus, AppError> {
        // Take the write lock up front so concurrent updates wait on busy_timeout
        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;

        let new_offered =
            resolve_skill_names(&mut tx, &split_skill_names(&request.new_skills_offered)).await?;
        let new_wanted =
            resolve_skill_names(&mut tx, &split_skill_names(&request.new_skills_wanted)).await?;

        let offered = merge_ids(&request.skills_offered, &new_offered);
        let wanted = merge_ids(&request.skills_wanted, &new_wanted);

        for skill_id in offered.iter().chain(wanted.iter()) {
            let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM skills WHERE id = ?")
                .bind(skill_id)
                .fetch_one(&mut *tx)
                .await?;
            if exists == 0 {
                return Err(AppError::invalid_input("One or more skill IDs are invalid."));
            }
        }

        let location = non_blank(request.location.as_deref());
        let availability = non_blank(request.availability.as_deref());
        let profile_completed = is_profile_complete(
            location.as_deref(),
            availability.as_deref(),
            offered.len(),
            wanted.len(),
        );

        if request.public_profile && !profile_completed {
            return Err(AppError::invalid_input(
                "Profile must be complete before it can be made public.",
            ));
        }

        let result = sqlx::query(
            "UPDATE users SET location = ?, availability = ?, public_profile = ?, profile_completed = ? WHERE id = ?",
        )
        .bind(&location)
        .bind(&availability)
        .bind(request.public_profile as i32)
        .bind(profile_completed as i32)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("User not found."));
        }

        sqlx::query("DELETE FROM user_skills WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        for (ids, skill_type) in [(&offered, SkillType::Offered), (&wanted, SkillType::Wanted)] {
            for skill_id in ids {
                sqlx::query(
                    "INSERT INTO user_skills (user_id, skill_id, skill_type) VALUES (?, ?, ?)",
                )
                .bind(user_id)
                .bind(skill_id)
                .bind(skill_type.as_str())
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        tracing::info!(
            user_id,
            profile_completed,
            public_profile = request.public_profile,
            offered = offered.len(),
            wanted = wanted.len(),
            "Profile updated"
        );

        Ok(ProfileStatus {
            profile_completed,
            public_profile: request.public_profile,
        })
    }

    // ==================== DISCOVERY OPERATIONS ====================

    /// List complete, public profiles, best rated first.
    pub async fn list_public_users(
        &self,
        query: &HomeQuery,
    ) -> Result<Vec<PublicUserSummary>, AppError> {
        let rows = sqlx::query(
            r#"
            SELECT u.id, u.name, u.location,
                   (SELECT ROUND(AVG(f.rating), 2) FROM feedback f WHERE f.to_user_id = u.id) AS rating
            FROM users u
            WHERE u.public_profile = 1 AND u.profile_completed = 1
            ORDER BY rating DESC, u.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let skill_rows = sqlx::query(
            r#"
            SELECT us.user_id, us.skill_type, s.name
            FROM user_skills us
            JOIN skills s ON s.id = us.skill_id
            JOIN users u ON u.id = us.user_id
            WHERE u.public_profile = 1 AND u.profile_completed = 1
            ORDER BY us.rowid
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut skills: HashMap<i64, (Vec<String>, Vec<String>)> = HashMap::new();
        for row in &skill_rows {
            let entry = skills.entry(row.get("user_id")).or_default();
            let skill_type: String = row.get("skill_type");
            if skill_type == SkillType::Offered.as_str() {
                entry.0.push(row.get("name"));
            } else {
                entry.1.push(row.get("name"));
            }
        }

        let users = rows
            .iter()
            .map(|row| {
                let user_id: i64 = row.get("id");
                let (skills_offered, skills_wanted) = skills.remove(&user_id).unwrap_or_default();
                PublicUserSummary {
                    user_id,
                    name: row.get("name"),
                    location: row.get("location"),
                    skills_offered,
                    skills_wanted,
                    rating: row.get("rating"),
                }
            })
            .filter(|user| matches_home_query(user, query))
            .collect();

        Ok(users)
    }

    /// Another user's public profile with received feedback.
    pub async fn get_public_profile(
        &self,
        viewer_id: i64,
        user_id: i64,
    ) -> Result<PublicProfile, AppError> {
        if viewer_id == user_id {
            return Err(AppError::invalid_input(
                "Use your own profile route for personal profile.",
            ));
        }

        let row = sqlx::query(
            "SELECT id, name, location, availability FROM users WHERE id = ? AND public_profile = 1 AND profile_completed = 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found("Profile not found or not public."))?;

        let feedback_rows = sqlx::query(
            r#"
            SELECT f.rating, f.comment, u.name AS from_user
            FROM feedback f
            JOIN users u ON u.id = f.from_user_id
            WHERE f.to_user_id = ?
            ORDER BY f.created_at DESC, f.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let average_rating: Option<f64> = sqlx::query_scalar(
            "SELECT ROUND(AVG(rating), 2) FROM feedback WHERE to_user_id = ?",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(PublicProfile {
            user_id: row.get("id"),
            name: row.get("name"),
            location: row.get("location"),
            availability: row.get("availability"),
            average_rating,
            skills_offered: self.user_skills(user_id, SkillType::Offered).await?,
            skills_wanted: self.user_skills(user_id, SkillType::Wanted).await?,
            feedback: feedback_rows
                .iter()
                .map(|row| ReceivedFeedback {
                    rating: row.get("rating"),
                    comment: row.get("comment"),
                    from_user: row.get("from_user"),
                })
                .collect(),
        })
    }
}

// Helper functions

/// Resolve skill names to catalog ids, inserting unknown names.
async fn resolve_skill_names(
    conn: &mut SqliteConnection,
    names: &[String],
) -> Result<Vec<i64>, AppError> {
    let mut ids = Vec::with_capacity(names.len());

    for name in names {
        let existing: Option<i64> =
            sqlx::query_scalar("SELECT id FROM skills WHERE name = ? COLLATE NOCASE")
                .bind(name)
                .fetch_optional(&mut *conn)
                .await?;

        let id = match existing {
            Some(id) => id,
            None => {
                let done = sqlx::query("INSERT INTO skills (name) VALUES (?)")
                    .bind(name)
                    .execute(&mut *conn)
                    .await?;
                tracing::debug!(skill = %name, "Added skill to catalog");
                done.last_insert_rowid()
            }
        };
        ids.push(id);
    }

    Ok(ids)
}

/// Concatenate id lists, keeping the first occurrence of each id.
fn merge_ids(existing: &[i64], resolved: &[i64]) -> Vec<i64> {
    let mut merged = Vec::with_capacity(existing.len() + resolved.len());
    for id in existing.iter().chain(resolved) {
        if !merged.contains(id) {
            merged.push(*id);
        }
    }
    merged
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn matches_home_query(user: &PublicUserSummary, query: &HomeQuery) -> bool {
    let search = query
        .search
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());
    if let Some(term) = search {
        let in_name = user.name.to_lowercase().contains(&term);
        let in_location = user
            .location
            .as_deref()
            .is_some_and(|l| l.to_lowercase().contains(&term));
        if !in_name && !in_location {
            return false;
        }
    }

    let skill = query
        .skill
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    if let Some(skill) = skill {
        let listed = user
            .skills_offered
            .iter()
            .chain(&user.skills_wanted)
            .any(|s| s.eq_ignore_ascii_case(skill));
        if !listed {
            return false;
        }
    }

    true
}

fn skill_from_row(row: &sqlx::sqlite::SqliteRow) -> Skill {
    Skill {
        skill_id: row.get("id"),
        skill_name: row.get("name"),
    }
}
