/// Humanizer Client — the single point of entry for all remote humanization
/// calls in this service.
///
/// ARCHITECTURAL RULE: No other module may call the undetectable.ai API
/// directly. All humanization traffic MUST go through this module.
///
/// The remote API is asynchronous: `/submit` returns a document id, and the
/// result is fetched from `/document` until it turns terminal (output or
/// error present). Pending responses are a normal, recurring state — never
/// an error.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::models::project::Mode;

pub mod poll;

pub const DEFAULT_API_URL: &str = "https://humanize.undetectable.ai";
/// The engine version sent with every submission.
/// Intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "v11";

const HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum HumanizerError {
    #[error("Humanizer API key not found")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP 400 from the remote — commonly insufficient remote-side credits
    /// or malformed parameters. The raw diagnostic is preserved verbatim.
    #[error("Bad request: {0}")]
    Rejected(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

// ────────────────────────────────────────────────────────────────────────────
// Wire parameter enums — serde renames carry the exact remote strings
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Readability {
    #[serde(rename = "High School")]
    HighSchool,
    University,
    Doctorate,
    Journalist,
    Marketing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Purpose {
    #[serde(rename = "General Writing")]
    GeneralWriting,
    Essay,
    Article,
    #[serde(rename = "Marketing Material")]
    MarketingMaterial,
    Story,
    #[serde(rename = "Cover Letter")]
    CoverLetter,
    Report,
    #[serde(rename = "Business Material")]
    BusinessMaterial,
    #[serde(rename = "Legal Material")]
    LegalMaterial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strength {
    Quality,
    Balanced,
    #[serde(rename = "More Human")]
    MoreHuman,
}

impl Readability {
    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Casual => Readability::HighSchool,
            Mode::Standard => Readability::University,
            Mode::Academic => Readability::Doctorate,
            Mode::Creative => Readability::Marketing,
        }
    }
}

impl Purpose {
    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Casual => Purpose::GeneralWriting,
            Mode::Standard => Purpose::Article,
            Mode::Academic => Purpose::Essay,
            Mode::Creative => Purpose::Story,
        }
    }
}

impl Strength {
    /// Maps the app's 1–10 humanization strength onto the remote's three
    /// levels. Unset defaults to Balanced.
    pub fn from_level(level: Option<u8>) -> Self {
        match level {
            None => Strength::Balanced,
            Some(n) if n <= 3 => Strength::Quality,
            Some(n) if n <= 7 => Strength::Balanced,
            Some(_) => Strength::MoreHuman,
        }
    }
}

/// Remote tuning parameters for one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HumanizeOptions {
    pub readability: Readability,
    pub purpose: Purpose,
    pub strength: Strength,
}

impl HumanizeOptions {
    pub fn for_mode(mode: Mode, strength_level: Option<u8>) -> Self {
        Self {
            readability: Readability::for_mode(mode),
            purpose: Purpose::for_mode(mode),
            strength: Strength::from_level(strength_level),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Wire request/response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct SubmitBody<'a> {
    content: &'a str,
    readability: Readability,
    purpose: Purpose,
    strength: Strength,
    model: &'a str,
}

#[derive(Debug, Serialize)]
struct DocumentBody<'a> {
    id: &'a str,
}

/// Response from `/submit` — the job handle for a queued document.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponse {
    pub status: String,
    pub id: String,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response from `/document`. Pending until `output` or `error` is set.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentResponse {
    pub id: String,
    #[serde(default)]
    pub output: String,
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub readability: String,
    #[serde(default, rename = "createdDate")]
    pub created_date: String,
    #[serde(default)]
    pub purpose: String,
    #[serde(default)]
    pub error: Option<String>,
}

impl DocumentResponse {
    /// Terminal iff the remote has produced output or reported an error.
    pub fn is_terminal(&self) -> bool {
        !self.output.is_empty() || self.error.is_some()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Client trait + reqwest implementation
// ────────────────────────────────────────────────────────────────────────────

/// The remote humanization API. Implement this to swap backends (or to test
/// the poller and orchestrator without network access).
///
/// Carried in the orchestrator as `Arc<dyn HumanizerApi>`.
#[async_trait]
pub trait HumanizerApi: Send + Sync {
    /// Submits text for humanization, returning the remote document handle.
    async fn submit(
        &self,
        text: &str,
        options: &HumanizeOptions,
    ) -> Result<SubmitResponse, HumanizerError>;

    /// Retrieves a document by id. A pending document is an `Ok` response,
    /// not an error; a populated `error` field means the job itself failed.
    async fn fetch(&self, document_id: &str) -> Result<DocumentResponse, HumanizerError>;
}

/// reqwest-backed client for the undetectable.ai humanization API.
/// Stateless between calls.
#[derive(Clone)]
pub struct UndetectableClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl UndetectableClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(HTTP_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            base_url,
            api_key,
        }
    }

    fn key(&self) -> Result<&str, HumanizerError> {
        if self.api_key.is_empty() {
            return Err(HumanizerError::MissingApiKey);
        }
        Ok(&self.api_key)
    }
}

#[async_trait]
impl HumanizerApi for UndetectableClient {
    async fn submit(
        &self,
        text: &str,
        options: &HumanizeOptions,
    ) -> Result<SubmitResponse, HumanizerError> {
        let key = self.key()?;

        debug!(
            "Submitting document: readability={:?}, purpose={:?}, strength={:?}, model={MODEL}",
            options.readability, options.purpose, options.strength
        );

        let response = self
            .client
            .post(format!("{}/submit", self.base_url))
            .header("apikey", key)
            .json(&SubmitBody {
                content: text,
                readability: options.readability,
                purpose: options.purpose,
                strength: options.strength,
                model: MODEL,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status.as_u16() == 400 {
                // Likely insufficient remote credits or an invalid API key.
                return Err(HumanizerError::Rejected(if body.is_empty() {
                    "No error details available".to_string()
                } else {
                    body
                }));
            }
            return Err(HumanizerError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let submit: SubmitResponse = response.json().await?;
        if let Some(err) = submit.error {
            return Err(HumanizerError::Rejected(err));
        }

        debug!("Document submitted: id={}", submit.id);
        Ok(submit)
    }

    async fn fetch(&self, document_id: &str) -> Result<DocumentResponse, HumanizerError> {
        let key = self.key()?;

        let response = self
            .client
            .post(format!("{}/document", self.base_url))
            .header("apikey", key)
            .json(&DocumentBody { id: document_id })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HumanizerError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mode_to_readability_table() {
        assert_eq!(Readability::for_mode(Mode::Standard), Readability::University);
        assert_eq!(Readability::for_mode(Mode::Casual), Readability::HighSchool);
        assert_eq!(Readability::for_mode(Mode::Academic), Readability::Doctorate);
        assert_eq!(Readability::for_mode(Mode::Creative), Readability::Marketing);
    }

    #[test]
    fn test_mode_to_purpose_table() {
        assert_eq!(Purpose::for_mode(Mode::Standard), Purpose::Article);
        assert_eq!(Purpose::for_mode(Mode::Casual), Purpose::GeneralWriting);
        assert_eq!(Purpose::for_mode(Mode::Academic), Purpose::Essay);
        assert_eq!(Purpose::for_mode(Mode::Creative), Purpose::Story);
    }

    #[test]
    fn test_strength_thresholds() {
        assert_eq!(Strength::from_level(None), Strength::Balanced);
        assert_eq!(Strength::from_level(Some(1)), Strength::Quality);
        assert_eq!(Strength::from_level(Some(3)), Strength::Quality);
        assert_eq!(Strength::from_level(Some(4)), Strength::Balanced);
        assert_eq!(Strength::from_level(Some(7)), Strength::Balanced);
        assert_eq!(Strength::from_level(Some(8)), Strength::MoreHuman);
        assert_eq!(Strength::from_level(Some(10)), Strength::MoreHuman);
    }

    #[test]
    fn test_wire_enums_serialize_exact_remote_strings() {
        assert_eq!(
            serde_json::to_value(Readability::HighSchool).unwrap(),
            json!("High School")
        );
        assert_eq!(
            serde_json::to_value(Purpose::GeneralWriting).unwrap(),
            json!("General Writing")
        );
        assert_eq!(
            serde_json::to_value(Strength::MoreHuman).unwrap(),
            json!("More Human")
        );
        assert_eq!(
            serde_json::to_value(Readability::University).unwrap(),
            json!("University")
        );
    }

    #[test]
    fn test_submit_body_wire_shape() {
        let body = SubmitBody {
            content: "some text",
            readability: Readability::University,
            purpose: Purpose::Article,
            strength: Strength::Balanced,
            model: MODEL,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "content": "some text",
                "readability": "University",
                "purpose": "Article",
                "strength": "Balanced",
                "model": "v11"
            })
        );
    }

    #[test]
    fn test_document_pending_is_not_terminal() {
        let doc: DocumentResponse =
            serde_json::from_value(json!({ "id": "abc" })).unwrap();
        assert!(!doc.is_terminal());
    }

    #[test]
    fn test_document_with_output_is_terminal() {
        let doc: DocumentResponse = serde_json::from_value(json!({
            "id": "abc",
            "output": "humanized text",
            "input": "robot text",
            "createdDate": "2025-01-01T00:00:00Z"
        }))
        .unwrap();
        assert!(doc.is_terminal());
        assert_eq!(doc.created_date, "2025-01-01T00:00:00Z");
    }

    #[test]
    fn test_document_with_error_is_terminal() {
        let doc: DocumentResponse = serde_json::from_value(json!({
            "id": "abc",
            "error": "document failed"
        }))
        .unwrap();
        assert!(doc.is_terminal());
    }
}
