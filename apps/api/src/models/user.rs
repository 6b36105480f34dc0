use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A user profile row from the `profiles` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub credits_used: i32,
    pub subscription_tier: SubscriptionTier,
    pub max_credits: i32,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// True iff this user can afford `required` more credits.
    pub fn has_credits_for(&self, required: u32) -> bool {
        i64::from(self.credits_used) + i64::from(required) <= i64::from(self.max_credits)
    }

    /// Credits still available before hitting the plan ceiling.
    pub fn credits_available(&self) -> u32 {
        (self.max_credits - self.credits_used).max(0) as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "subscription_tier", rename_all = "lowercase")]
pub enum SubscriptionTier {
    Free,
    Basic,
    Premium,
    Enterprise,
}

impl SubscriptionTier {
    /// Monthly credit allowance for each plan.
    pub fn credit_allowance(self) -> i32 {
        match self {
            SubscriptionTier::Free => 100,
            SubscriptionTier::Basic => 1_000,
            SubscriptionTier::Premium => 5_000,
            SubscriptionTier::Enterprise => 20_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(credits_used: i32, max_credits: i32) -> User {
        User {
            id: Uuid::new_v4(),
            username: "tester".to_string(),
            full_name: None,
            avatar_url: None,
            credits_used,
            subscription_tier: SubscriptionTier::Free,
            max_credits,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_has_credits_for_exact_boundary() {
        assert!(user(95, 100).has_credits_for(5));
        assert!(!user(96, 100).has_credits_for(5));
    }

    #[test]
    fn test_has_credits_for_zero_usage() {
        assert!(user(0, 100).has_credits_for(100));
        assert!(!user(0, 100).has_credits_for(101));
    }

    #[test]
    fn test_credits_available_never_negative() {
        // Downgrade can leave credits_used above the new ceiling.
        assert_eq!(user(150, 100).credits_available(), 0);
        assert_eq!(user(8, 10).credits_available(), 2);
    }

    #[test]
    fn test_tier_allowances() {
        assert_eq!(SubscriptionTier::Free.credit_allowance(), 100);
        assert_eq!(SubscriptionTier::Basic.credit_allowance(), 1_000);
        assert_eq!(SubscriptionTier::Premium.credit_allowance(), 5_000);
        assert_eq!(SubscriptionTier::Enterprise.credit_allowance(), 20_000);
    }
}
