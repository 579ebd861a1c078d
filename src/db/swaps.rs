//! Swap lifecycle and feedback persistence.
//!
//! Every transition is a single `UPDATE … WHERE status = 'pending'`; the
//! affected-row count decides whether this caller won the transition.

use chrono::{DateTime, Utc};
use sqlx::Row;

use super::{now_timestamp, Repository};
use crate::errors::{is_unique_violation, AppError};
use crate::models::{
    MySwaps, NewFeedback, ReceivedSwap, SendSwapRequest, SentSwap, SkillRef, SkillType,
    SubmitFeedbackRequest, SwapAction, SwapParty, SwapRequest, SwapStatus, SwapSummary,
};
use crate::swap;

/// Which side of a swap a listing is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Sent,
    Received,
}

/// A swap joined with the counterparty's name and both skill names.
struct SwapListingRow {
    id: i64,
    party_id: i64,
    party_name: String,
    offered_skill_id: i64,
    offered_skill_name: Option<String>,
    requested_skill_id: i64,
    requested_skill_name: Option<String>,
    message: Option<String>,
    status: SwapStatus,
    created_at: String,
    updated_at: String,
}

impl SwapListingRow {
    fn summary(self, now: DateTime<Utc>) -> SwapSummary {
        SwapSummary {
            swap_id: self.id,
            name: self.party_name,
            offered_skill: self.offered_skill_name,
            requested_skill: self.requested_skill_name,
            status: self.status,
            time_ago: swap::time_ago_label(&self.created_at, now),
        }
    }

    fn party(&self) -> SwapParty {
        SwapParty {
            user_id: self.party_id,
            name: self.party_name.clone(),
            profile_pic: None,
        }
    }

    fn skills(&self) -> (SkillRef, SkillRef) {
        (
            SkillRef {
                skill_id: self.offered_skill_id,
                skill_name: self.offered_skill_name.clone(),
            },
            SkillRef {
                skill_id: self.requested_skill_id,
                skill_name: self.requested_skill_name.clone(),
            },
        )
    }
}

impl Repository {
    /// Get a swap request by ID.
    pub async fn get_swap(&self, swap_id: i64) -> Result<Option<SwapRequest>, AppError> {
        let row = sqlx::query(
            "SELECT id, creator_id, receiver_id, offered_skill_id, requested_skill_id, message, status, created_at, updated_at FROM swap_requests WHERE id = ?",
        )
        .bind(swap_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(swap_from_row).transpose()
    }

    /// Create a pending swap request from `creator_id`.
    ///
    /// The receiver must be eligible, and the two skills must be listed as offered
    /// by the creator and by the receiver respectively.
    pub async fn send_swap(
        &self,
        creator_id: i64,
        request: SendSwapRequest,
    ) -> Result<SwapRequest, AppError> {
        let new = swap::validate_send(creator_id, request)?;

        swap::ensure_receiver_eligible(self.receiver_flags(new.receiver_id).await?)?;

        let creator_offers = self
            .user_has_skill(creator_id, new.offered_skill_id, SkillType::Offered)
            .await?;
        let receiver_offers = self
            .user_has_skill(new.receiver_id, new.requested_skill_id, SkillType::Offered)
            .await?;
        swap::ensure_skills_listed(creator_offers, receiver_offers)?;

        let now = now_timestamp();
        let result = sqlx::query(
            "INSERT INTO swap_requests (creator_id, receiver_id, offered_skill_id, requested_skill_id, message, status, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(new.creator_id)
        .bind(new.receiver_id)
        .bind(new.offered_skill_id)
        .bind(new.requested_skill_id)
        .bind(&new.message)
        .bind(SwapStatus::Pending.as_str())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        let swap = SwapRequest {
            id: result.last_insert_rowid(),
            creator_id: new.creator_id,
            receiver_id: new.receiver_id,
            offered_skill_id: new.offered_skill_id,
            requested_skill_id: new.requested_skill_id,
            message: new.message,
            status: SwapStatus::Pending,
            created_at: now.clone(),
            updated_at: now,
        };

        tracing::info!(
            swap_id = swap.id,
            creator_id,
            receiver_id = swap.receiver_id,
            "Swap request created"
        );

        Ok(swap)
    }

    /// Accept or reject a pending swap as its receiver.
    pub async fn respond_to_swap(
        &self,
        actor_id: i64,
        swap_id: i64,
        action: SwapAction,
    ) -> Result<SwapStatus, AppError> {
        let existing = self.get_swap(swap_id).await?;
        if let Err(e) = swap::ensure_can_respond(existing.as_ref(), actor_id) {
            tracing::debug!(swap_id, actor_id, error = %e, "Swap response refused");
            return Err(e);
        }

        let target = action.target_status();
        if !self.transition_pending(swap_id, actor_id, target).await? {
            // Lost a race with another transition between read and write
            let current = self
                .get_swap(swap_id)
                .await?
                .ok_or_else(|| AppError::not_found("Swap request not found."))?;
            tracing::debug!(swap_id, status = %current.status, "Concurrent swap transition");
            return Err(swap::already_in(current.status));
        }

        tracing::info!(swap_id, actor_id, status = %target, "Swap request answered");
        Ok(target)
    }

    /// Move a pending swap to `target` on behalf of its receiver.
    ///
    /// Returns false when the row was not pending (or not theirs) at write time.
    async fn transition_pending(
        &self,
        swap_id: i64,
        receiver_id: i64,
        target: SwapStatus,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE swap_requests SET status = ?, updated_at = ? WHERE id = ? AND receiver_id = ? AND status = ?",
        )
        .bind(target.as_str())
        .bind(now_timestamp())
        .bind(swap_id)
        .bind(receiver_id)
        .bind(SwapStatus::Pending.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Cancel a pending swap as its creator.
    pub async fn cancel_swap(&self, actor_id: i64, swap_id: i64) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE swap_requests SET status = ?, updated_at = ? WHERE id = ? AND creator_id = ? AND status = ?",
        )
        .bind(SwapStatus::Cancelled.as_str())
        .bind(now_timestamp())
        .bind(swap_id)
        .bind(actor_id)
        .bind(SwapStatus::Pending.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            tracing::debug!(swap_id, actor_id, "Swap cancel refused");
            return Err(swap::cancel_refused());
        }

        tracing::info!(swap_id, actor_id, "Swap request cancelled");
        Ok(())
    }

    /// Sent and received requests with relative-age labels, newest first.
    pub async fn list_my_swaps(&self, user_id: i64, now: DateTime<Utc>) -> Result<MySwaps, AppError> {
        let sent = self.swap_listing(user_id, Direction::Sent).await?;
        let received = self.swap_listing(user_id, Direction::Received).await?;

        Ok(MySwaps {
            sent_requests: sent.into_iter().map(|r| r.summary(now)).collect(),
            received_requests: received.into_iter().map(|r| r.summary(now)).collect(),
        })
    }

    /// Requests the user created, newest first.
    pub async fn list_sent_swaps(&self, user_id: i64) -> Result<Vec<SentSwap>, AppError> {
        let rows = self.swap_listing(user_id, Direction::Sent).await?;

        Ok(rows
            .into_iter()
            .map(|r| {
                let (offered_skill, requested_skill) = r.skills();
                SentSwap {
                    id: r.id,
                    receiver: r.party(),
                    offered_skill,
                    requested_skill,
                    message: r.message.unwrap_or_default(),
                    status: r.status,
                    created_at: r.created_at,
                    updated_at: r.updated_at,
                }
            })
            .collect())
    }

    /// Requests addressed to the user, newest first.
    pub async fn list_received_swaps(&self, user_id: i64) -> Result<Vec<ReceivedSwap>, AppError> {
        let rows = self.swap_listing(user_id, Direction::Received).await?;

        Ok(rows
            .into_iter()
            .map(|r| {
                let (offered_skill, requested_skill) = r.skills();
                ReceivedSwap {
                    id: r.id,
                    sender: r.party(),
                    offered_skill,
                    requested_skill,
                    message: r.message.unwrap_or_default(),
                    status: r.status,
                    created_at: r.created_at,
                    updated_at: r.updated_at,
                }
            })
            .collect())
    }

    async fn swap_listing(
        &self,
        user_id: i64,
        direction: Direction,
    ) -> Result<Vec<SwapListingRow>, AppError> {
        let sql = match direction {
            Direction::Sent => {
                r#"
                SELECT sr.id, sr.receiver_id AS party_id, u.name AS party_name,
                       sr.offered_skill_id, s1.name AS offered_skill_name,
                       sr.requested_skill_id, s2.name AS requested_skill_name,
                       sr.message, sr.status, sr.created_at, sr.updated_at
                FROM swap_requests sr
                JOIN users u ON u.id = sr.receiver_id
                LEFT JOIN skills s1 ON s1.id = sr.offered_skill_id
                LEFT JOIN skills s2 ON s2.id = sr.requested_skill_id
                WHERE sr.creator_id = ?
                ORDER BY sr.created_at DESC, sr.id DESC
                "#
            }
            Direction::Received => {
                r#"
                SELECT sr.id, sr.creator_id AS party_id, u.name AS party_name,
                       sr.offered_skill_id, s1.name AS offered_skill_name,
                       sr.requested_skill_id, s2.name AS requested_skill_name,
                       sr.message, sr.status, sr.created_at, sr.updated_at
                FROM swap_requests sr
                JOIN users u ON u.id = sr.creator_id
                LEFT JOIN skills s1 ON s1.id = sr.offered_skill_id
                LEFT JOIN skills s2 ON s2.id = sr.requested_skill_id
                WHERE sr.receiver_id = ?
                ORDER BY sr.created_at DESC, sr.id DESC
                "#
            }
        };

        let rows = sqlx::query(sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| {
                let status: String = row.get("status");
                Ok::<_, AppError>(SwapListingRow {
                    id: row.get("id"),
                    party_id: row.get("party_id"),
                    party_name: row.get("party_name"),
                    offered_skill_id: row.get("offered_skill_id"),
                    offered_skill_name: row.get("offered_skill_name"),
                    requested_skill_id: row.get("requested_skill_id"),
                    requested_skill_name: row.get("requested_skill_name"),
                    message: row.get("message"),
                    status: parse_status(&status)?,
                    created_at: row.get("created_at"),
                    updated_at: row.get("updated_at"),
                })
            })
            .collect()
    }

    // ==================== FEEDBACK OPERATIONS ====================

    /// Record feedback from `from_user_id` on an accepted swap.
    pub async fn submit_feedback(
        &self,
        from_user_id: i64,
        request: SubmitFeedbackRequest,
    ) -> Result<NewFeedback, AppError> {
        let feedback = swap::validate_feedback(from_user_id, request)?;

        let parent = self.get_swap(feedback.swap_id).await?;
        swap::ensure_feedback_allowed(parent.as_ref(), &feedback)?;

        let existing: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM feedback WHERE swap_id = ? AND from_user_id = ? AND to_user_id = ?",
        )
        .bind(feedback.swap_id)
        .bind(feedback.from_user_id)
        .bind(feedback.to_user_id)
        .fetch_one(&self.pool)
        .await?;

        if existing > 0 {
            return Err(swap::duplicate_feedback());
        }

        let result = sqlx::query(
            "INSERT INTO feedback (swap_id, from_user_id, to_user_id, rating, comment, created_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(feedback.swap_id)
        .bind(feedback.from_user_id)
        .bind(feedback.to_user_id)
        .bind(feedback.rating)
        .bind(&feedback.comment)
        .bind(now_timestamp())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {
                tracing::info!(
                    swap_id = feedback.swap_id,
                    from_user_id,
                    to_user_id = feedback.to_user_id,
                    rating = feedback.rating,
                    "Feedback recorded"
                );
                Ok(feedback)
            }
            // A concurrent submission got in after the check above
            Err(e) if is_unique_violation(&e) => Err(swap::duplicate_feedback()),
            Err(e) => Err(e.into()),
        }
    }
}

// Helper functions for row conversion

fn parse_status(raw: &str) -> Result<SwapStatus, AppError> {
    SwapStatus::from_str(raw)
        .ok_or_else(|| AppError::Unexpected(format!("Unknown swap status '{}'", raw)))
}

fn swap_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<SwapRequest, AppError> {
    let status: String = row.get("status");
    Ok(SwapRequest {
        id: row.get("id"),
        creator_id: row.get("creator_id"),
        receiver_id: row.get("receiver_id"),
        offered_skill_id: row.get("offered_skill_id"),
        requested_skill_id: row.get("requested_skill_id"),
        message: row.get("message"),
        status: parse_status(&status)?,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
