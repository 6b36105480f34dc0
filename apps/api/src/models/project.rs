use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A saved text-transformation project from the `projects` table.
///
/// `humanized_content` is non-NULL only after a successful humanization job
/// has been recorded against the project; `humanization_document_id` is the
/// remote job id of that run.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProjectRow {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub humanized_content: Option<String>,
    pub credits_used: i32,
    pub mode: Option<Mode>,
    pub humanization_strength: Option<i16>,
    pub personality: Option<Personality>,
    pub length_adjustment: Option<LengthAdjustment>,
    pub humanization_document_id: Option<String>,
}

/// Humanization mode selected by the user; drives the remote
/// readability/purpose parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "project_mode", rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Standard,
    Casual,
    Academic,
    Creative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "personality", rename_all = "lowercase")]
pub enum Personality {
    Neutral,
    Friendly,
    Professional,
    Casual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "length_adjustment", rename_all = "lowercase")]
pub enum LengthAdjustment {
    Maintain,
    Shorter,
    Longer,
}
