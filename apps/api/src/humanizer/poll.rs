//! Job Poller — waits for a submitted document to turn terminal.
//!
//! The loop fetches, inspects, sleeps, and repeats up to `max_attempts`
//! times. It holds no state shared with other polls, so concurrent
//! humanize requests run independently, and it is cancelled by simply
//! dropping the future (the pending `sleep` is released with it).

use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use crate::humanizer::{DocumentResponse, HumanizerApi, HumanizerError};

/// Retry policy for the poll loop. Defaults match the remote's guidance:
/// 5-second interval, 30 attempts (~2.5 minutes).
#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_attempts: 30,
        }
    }
}

#[derive(Debug, Error)]
pub enum PollError {
    /// The budget ran out with the job still pending. The remote outcome is
    /// unknown — the job may yet complete with no local record of it.
    #[error("Document {document_id} still processing after {attempts} attempts")]
    Timeout { document_id: String, attempts: u32 },

    #[error(transparent)]
    Client(#[from] HumanizerError),
}

/// Polls until the document is terminal (output or error present) or the
/// attempt budget is exhausted.
///
/// A terminal response is returned as-is; the caller decides whether a
/// populated `error` field means job failure. A fetch-level error aborts
/// immediately.
pub async fn poll_until_done(
    api: &dyn HumanizerApi,
    document_id: &str,
    policy: &PollPolicy,
) -> Result<DocumentResponse, PollError> {
    for attempt in 1..=policy.max_attempts {
        let doc = api.fetch(document_id).await?;

        if doc.is_terminal() {
            debug!("Document {document_id} terminal after {attempt} attempt(s)");
            return Ok(doc);
        }

        debug!(
            "Document {document_id} pending (attempt {attempt}/{})",
            policy.max_attempts
        );

        if attempt < policy.max_attempts {
            tokio::time::sleep(policy.interval).await;
        }
    }

    Err(PollError::Timeout {
        document_id: document_id.to_string(),
        attempts: policy.max_attempts,
    })
}
