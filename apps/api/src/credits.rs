//! Credit Ledger — metering around paid humanization operations.
//!
//! Credits are checked before a submission and committed only after the job
//! reaches a successful terminal state. The commit is a single conditional
//! UPDATE so two operations finishing concurrently for the same user cannot
//! lose updates or overshoot the plan ceiling.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::User;

/// Credits required to humanize `text`: 1 credit per 100 characters,
/// rounded up, minimum 1 for any non-empty text.
pub fn required_credits(text: &str) -> u32 {
    let chars = text.chars().count() as u32;
    if chars == 0 {
        return 0;
    }
    chars.div_ceil(100).max(1)
}

/// Server-authoritative credit accounting for a user.
///
/// `commit` must be called at most once per logical humanize operation —
/// the ledger does not deduplicate; the orchestrator's document-id probe
/// provides the idempotency.
#[async_trait]
pub trait CreditLedger: Send + Sync {
    async fn get(&self, user_id: Uuid) -> Result<User, AppError>;

    /// Atomically charges `credits` against the user's allowance and returns
    /// the updated row. Fails with `InsufficientCredits` if a concurrent
    /// commit consumed the headroom since the pre-check.
    async fn commit(&self, user_id: Uuid, credits: u32) -> Result<User, AppError>;
}

pub struct PgCreditLedger {
    db: PgPool,
}

impl PgCreditLedger {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CreditLedger for PgCreditLedger {
    async fn get(&self, user_id: Uuid) -> Result<User, AppError> {
        let user: Option<User> = sqlx::query_as("SELECT * FROM profiles WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?;

        user.ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))
    }

    async fn commit(&self, user_id: Uuid, credits: u32) -> Result<User, AppError> {
        // Conditional check-and-deduct in one statement: the WHERE clause
        // re-verifies the allowance against the current row, not the value
        // read at pre-check time.
        let updated: Option<User> = sqlx::query_as(
            r#"
            UPDATE profiles
            SET credits_used = credits_used + $2
            WHERE id = $1 AND credits_used + $2 <= max_credits
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(credits as i32)
        .fetch_optional(&self.db)
        .await?;

        match updated {
            Some(user) => Ok(user),
            None => {
                let user = self.get(user_id).await?;
                Err(AppError::InsufficientCredits {
                    required: credits,
                    available: user.credits_available(),
                })
            }
        }
    }
}
