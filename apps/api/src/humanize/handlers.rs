use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::humanize::{HumanizeOutcome, HumanizeRequest};
use crate::state::AppState;

/// POST /api/v1/humanize
///
/// Runs the full humanize lifecycle: validate, credit check, submit, poll,
/// commit, persist. Blocks for the duration of the poll loop; dropping the
/// connection cancels the in-flight poll without affecting other requests.
pub async fn handle_humanize(
    State(state): State<AppState>,
    Json(req): Json<HumanizeRequest>,
) -> Result<Json<HumanizeOutcome>, AppError> {
    let outcome = state.humanizer.humanize(req).await?;
    Ok(Json(outcome))
}
