//! Project Repository — persistence for a user's text-transformation
//! projects. No business validation happens here; callers supply complete,
//! correct patches and any persistence error is reported verbatim.

use async_trait::async_trait;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::project::{LengthAdjustment, Mode, Personality, ProjectRow};

pub mod handlers;

/// Partial update for a project. `None` fields are left untouched remotely.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub humanized_content: Option<String>,
    pub credits_used: Option<i32>,
    pub mode: Option<Mode>,
    pub humanization_strength: Option<i16>,
    pub personality: Option<Personality>,
    pub length_adjustment: Option<LengthAdjustment>,
    pub humanization_document_id: Option<String>,
}

#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// All projects owned by `user_id`, newest first.
    async fn list(&self, user_id: Uuid) -> Result<Vec<ProjectRow>, AppError>;

    async fn get(&self, id: Uuid) -> Result<ProjectRow, AppError>;

    /// Creates a fresh project with no humanized content and zero credits.
    async fn create(
        &self,
        user_id: Uuid,
        title: &str,
        content: &str,
    ) -> Result<ProjectRow, AppError>;

    /// Applies a partial merge and returns the updated row.
    async fn update(&self, id: Uuid, patch: &ProjectPatch) -> Result<ProjectRow, AppError>;

    async fn delete(&self, id: Uuid) -> Result<(), AppError>;

    /// Looks up a project by its remote humanization document id — the
    /// idempotency probe for a retried commit+persist step.
    async fn find_by_document_id(
        &self,
        document_id: &str,
    ) -> Result<Option<ProjectRow>, AppError>;
}

pub struct PgProjectStore {
    db: PgPool,
}

impl PgProjectStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProjectStore for PgProjectStore {
    async fn list(&self, user_id: Uuid) -> Result<Vec<ProjectRow>, AppError> {
        let rows: Vec<ProjectRow> =
            sqlx::query_as("SELECT * FROM projects WHERE user_id = $1 ORDER BY created_at DESC")
                .bind(user_id)
                .fetch_all(&self.db)
                .await?;
        Ok(rows)
    }

    async fn get(&self, id: Uuid) -> Result<ProjectRow, AppError> {
        let row: Option<ProjectRow> = sqlx::query_as("SELECT * FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        row.ok_or_else(|| AppError::NotFound(format!("Project {id} not found")))
    }

    async fn create(
        &self,
        user_id: Uuid,
        title: &str,
        content: &str,
    ) -> Result<ProjectRow, AppError> {
        let row: ProjectRow = sqlx::query_as(
            r#"
            INSERT INTO projects (user_id, title, content, credits_used)
            VALUES ($1, $2, $3, 0)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(title)
        .bind(content)
        .fetch_one(&self.db)
        .await?;

        Ok(row)
    }

    async fn update(&self, id: Uuid, patch: &ProjectPatch) -> Result<ProjectRow, AppError> {
        // COALESCE keeps the stored value for every field the patch omits.
        let row: Option<ProjectRow> = sqlx::query_as(
            r#"
            UPDATE projects
            SET title = COALESCE($2, title),
                content = COALESCE($3, content),
                humanized_content = COALESCE($4, humanized_content),
                credits_used = COALESCE($5, credits_used),
                mode = COALESCE($6, mode),
                humanization_strength = COALESCE($7, humanization_strength),
                personality = COALESCE($8, personality),
                length_adjustment = COALESCE($9, length_adjustment),
                humanization_document_id = COALESCE($10, humanization_document_id)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&patch.title)
        .bind(&patch.content)
        .bind(&patch.humanized_content)
        .bind(patch.credits_used)
        .bind(patch.mode)
        .bind(patch.humanization_strength)
        .bind(patch.personality)
        .bind(patch.length_adjustment)
        .bind(&patch.humanization_document_id)
        .fetch_optional(&self.db)
        .await?;

        row.ok_or_else(|| AppError::NotFound(format!("Project {id} not found")))
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Project {id} not found")));
        }
        Ok(())
    }

    async fn find_by_document_id(
        &self,
        document_id: &str,
    ) -> Result<Option<ProjectRow>, AppError> {
        let row: Option<ProjectRow> =
            sqlx::query_as("SELECT * FROM projects WHERE humanization_document_id = $1")
                .bind(document_id)
                .fetch_optional(&self.db)
                .await?;
        Ok(row)
    }
}
