//! Stack Exchange API client
//!
//! Wraps the two read-only endpoints stackfetch needs: title search and the
//! answer listing for a single question.

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;
use tracing::debug;

use super::{Answer, Question};

/// Base URL for the Stack Exchange API
pub const STACK_EXCHANGE_BASE_URL: &str = "https://api.stackexchange.com/2.3";

/// Site queried when none is configured
pub const DEFAULT_SITE: &str = "stackoverflow";

/// Errors that can occur when talking to the Stack Exchange API
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The request could not be sent or the response could not be read
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("API returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// Failed to parse JSON response
    #[error("Failed to parse API response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Common envelope around every API response
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

/// Body returned alongside error statuses
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error_message: Option<String>,
}

/// Client for the Stack Exchange API
#[derive(Debug, Clone)]
pub struct StackExchangeClient {
    /// HTTP client for making requests
    http_client: Client,
    /// Base URL for the API (allows override for testing)
    base_url: String,
    /// Site parameter, e.g. `stackoverflow` or `superuser`
    site: String,
}

impl Default for StackExchangeClient {
    fn default() -> Self {
        Self::new(DEFAULT_SITE)
    }
}

impl StackExchangeClient {
    /// Creates a client for the given site against the public API
    pub fn new(site: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            base_url: STACK_EXCHANGE_BASE_URL.to_string(),
            site: site.into(),
        }
    }

    /// Overrides the API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// The site this client queries
    pub fn site(&self) -> &str {
        &self.site
    }

    /// Searches questions whose title matches `query`, highest voted first
    pub async fn search_questions(&self, query: &str) -> Result<Vec<Question>, RemoteError> {
        self.get_items(
            "/search",
            &[
                ("order", "desc"),
                ("sort", "votes"),
                ("intitle", query),
                ("site", self.site.as_str()),
            ],
        )
        .await
    }

    /// Lists every answer of a question with full bodies, highest voted first
    ///
    /// An empty list is a valid result (the question has no answers yet).
    pub async fn list_answers(&self, question_id: &str) -> Result<Vec<Answer>, RemoteError> {
        let path = format!("/questions/{}/answers", question_id);
        self.get_items(
            &path,
            &[
                ("order", "desc"),
                ("sort", "votes"),
                ("site", self.site.as_str()),
                ("filter", "withbody"),
            ],
        )
        .await
    }

    /// Performs a GET and unwraps the `items` list of the response
    async fn get_items<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<T>, RemoteError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, ?params, "sending API request");

        let response = self.http_client.get(&url).query(params).send().await?;
        let status = response.status();
        let text = response.text().await?;
        debug!(status = status.as_u16(), body = %text, "raw API response");

        if !status.is_success() {
            return Err(RemoteError::Status {
                status: status.as_u16(),
                message: error_message(&text, status.canonical_reason()),
            });
        }

        let envelope: ApiResponse<T> = serde_json::from_str(&text)?;
        Ok(envelope.items)
    }
}

/// Picks the most useful message out of an error response body
fn error_message(body: &str, reason: Option<&str>) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|e| e.error_message)
        .or_else(|| reason.map(str::to_string))
        .unwrap_or_else(|| "unknown error".to_string())
}
