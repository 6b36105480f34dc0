//! Humanization Orchestrator — coordinates one humanize request end to end.
//!
//! Flow: validate → credit check → submit → poll → commit ledger →
//!       persist project → return outcome.
//!
//! Credits are committed only after the remote job reaches a successful
//! terminal state; no failure path (validation, submit, job error, poll
//! timeout) touches the ledger. The remote document id is stored on the
//! project and doubles as the idempotency key for a retried commit+persist.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::credits::{required_credits, CreditLedger};
use crate::errors::AppError;
use crate::humanizer::poll::{poll_until_done, PollError, PollPolicy};
use crate::humanizer::{HumanizeOptions, HumanizerApi};
use crate::models::project::{LengthAdjustment, Mode, Personality, ProjectRow};
use crate::models::user::User;
use crate::projects::{ProjectPatch, ProjectStore};

pub mod handlers;

/// The remote rejects documents shorter than this.
pub const MIN_TEXT_CHARS: usize = 50;

fn default_title() -> String {
    "Untitled Project".to_string()
}

/// One humanize request. `project_id` absent means create-if-needed on
/// success; present means update that project in place.
#[derive(Debug, Clone, Deserialize)]
pub struct HumanizeRequest {
    pub user_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    #[serde(default = "default_title")]
    pub title: String,
    pub text: String,
    #[serde(default)]
    pub mode: Mode,
    pub humanization_strength: Option<u8>,
    pub personality: Option<Personality>,
    pub length_adjustment: Option<LengthAdjustment>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HumanizeOutcome {
    pub project: ProjectRow,
    pub humanized_text: String,
    pub document_id: String,
    /// Credits charged by this operation; 0 when the document id was
    /// already applied by an earlier attempt.
    pub credits_charged: u32,
    pub user: Option<User>,
}

/// The orchestrator service. Constructed once at startup with its
/// collaborators injected; callers hold an `Arc`, not a global.
pub struct Humanizer {
    api: Arc<dyn HumanizerApi>,
    ledger: Arc<dyn CreditLedger>,
    projects: Arc<dyn ProjectStore>,
    policy: PollPolicy,
}

impl Humanizer {
    pub fn new(
        api: Arc<dyn HumanizerApi>,
        ledger: Arc<dyn CreditLedger>,
        projects: Arc<dyn ProjectStore>,
        policy: PollPolicy,
    ) -> Self {
        Self {
            api,
            ledger,
            projects,
            policy,
        }
    }

    /// Runs the full humanize lifecycle for one request.
    pub async fn humanize(&self, req: HumanizeRequest) -> Result<HumanizeOutcome, AppError> {
        // Validating
        let user_id = req.user_id.ok_or(AppError::Unauthorized)?;

        if req.text.trim().is_empty() {
            return Err(AppError::Validation(
                "Please enter some text to humanize".to_string(),
            ));
        }
        if req.text.chars().count() < MIN_TEXT_CHARS {
            return Err(AppError::Validation(format!(
                "Text must be at least {MIN_TEXT_CHARS} characters long to be humanized"
            )));
        }

        // CreditCheck — no remote call until this passes
        let required = required_credits(&req.text);
        let user = self.ledger.get(user_id).await?;
        if !user.has_credits_for(required) {
            return Err(AppError::InsufficientCredits {
                required,
                available: user.credits_available(),
            });
        }

        // Submitted
        let options = HumanizeOptions::for_mode(req.mode, req.humanization_strength);
        let submit = self.api.submit(&req.text, &options).await?;
        info!(
            "Document {} submitted for user {user_id} ({required} credits pending)",
            submit.id
        );

        // Polling — timeout and job errors terminate without charging
        let doc = poll_until_done(self.api.as_ref(), &submit.id, &self.policy)
            .await
            .map_err(|e| match e {
                PollError::Timeout { document_id, .. } => {
                    warn!("Poll budget exhausted for document {document_id}; no charge");
                    AppError::PollTimeout { document_id }
                }
                PollError::Client(e) => AppError::Humanizer(e),
            })?;

        if let Some(err) = doc.error {
            return Err(AppError::JobFailed(err));
        }

        // Succeeded. If an earlier attempt already recorded this document id,
        // the charge and persist both happened — return the stored state
        // instead of applying them again.
        if let Some(existing) = self.projects.find_by_document_id(&doc.id).await? {
            info!("Document {} already applied to project {}", doc.id, existing.id);
            let humanized_text = existing.humanized_content.clone().unwrap_or_default();
            return Ok(HumanizeOutcome {
                humanized_text,
                document_id: doc.id,
                credits_charged: 0,
                user: None,
                project: existing,
            });
        }

        // Commit the ledger, at-least-once: one retry on a transient
        // database failure rather than silently dropping the charge.
        let user = match self.ledger.commit(user_id, required).await {
            Ok(user) => user,
            Err(AppError::Database(e)) => {
                warn!("Ledger commit failed ({e}), retrying once");
                self.ledger.commit(user_id, required).await?
            }
            Err(e) => return Err(e),
        };
        info!(
            "Charged {required} credits to user {user_id} ({}/{} used)",
            user.credits_used, user.max_credits
        );

        // Persist the project. The humanized text only exists in memory at
        // this point — a failure here is a save failure, not a humanization
        // failure, and must hand the text back to the caller.
        let patch = ProjectPatch {
            title: Some(req.title.clone()),
            content: Some(req.text.clone()),
            humanized_content: Some(doc.output.clone()),
            credits_used: Some(required as i32),
            mode: Some(req.mode),
            humanization_strength: req.humanization_strength.map(i16::from),
            personality: req.personality,
            length_adjustment: req.length_adjustment,
            humanization_document_id: Some(doc.id.clone()),
        };

        let project = self
            .persist(user_id, req.project_id, &req.title, &req.text, &patch)
            .await
            .map_err(|e| AppError::SaveFailed {
                message: e.to_string(),
                humanized_content: doc.output.clone(),
                document_id: doc.id.clone(),
            })?;

        Ok(HumanizeOutcome {
            humanized_text: doc.output,
            document_id: doc.id,
            credits_charged: required,
            user: Some(user),
            project,
        })
    }

    /// Create-if-absent, else update, then apply the humanization patch.
    async fn persist(
        &self,
        user_id: Uuid,
        project_id: Option<Uuid>,
        title: &str,
        content: &str,
        patch: &ProjectPatch,
    ) -> Result<ProjectRow, AppError> {
        let id = match project_id {
            Some(id) => id,
            None => self.projects.create(user_id, title, content).await?.id,
        };
        self.projects.update(id, patch).await
    }
}
