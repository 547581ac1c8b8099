//! Answer fetching pipeline
//!
//! Resolves a question URL to ranked, readable answers. The cache is checked
//! first; only a miss or an expired entry reaches the network.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::cache::CacheStore;
use crate::clean::clean;
use crate::data::{Answer, RemoteError, StackExchangeClient};
use crate::rank::rank;

static QUESTION_PATH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/questions/(\d+)").expect("valid question path regex"));
static DIGITS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid digits regex"));

/// Errors that can occur while fetching answers
#[derive(Debug, Error)]
pub enum FetchError {
    /// The input could not be used (e.g. a URL without a question id)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The remote API call failed
    #[error("Could not fetch answers: {0}")]
    Remote(#[from] RemoteError),
}

/// Extracts the question id from a question URL
///
/// Prefers the number following `/questions/`; otherwise takes the first run
/// of digits anywhere in the input.
pub fn extract_question_id(url: &str) -> Option<String> {
    QUESTION_PATH_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .or_else(|| DIGITS_RE.find(url))
        .map(|m| m.as_str().to_string())
}

/// Cache key for a question
///
/// Question ids are only unique within one Stack Exchange site, so the site
/// is part of the key.
pub fn cache_key(site: &str, question_id: &str) -> String {
    format!("{}:{}", site, question_id)
}

/// Fetches answers for questions, going through the cache
#[derive(Debug)]
pub struct AnswerFetcher {
    client: StackExchangeClient,
    cache: CacheStore,
}

impl AnswerFetcher {
    pub fn new(client: StackExchangeClient, cache: CacheStore) -> Self {
        Self { client, cache }
    }

    /// The API client, shared with the question search
    pub fn client(&self) -> &StackExchangeClient {
        &self.client
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Returns up to `count` of the best answers for the question at
    /// `question_url`, with bodies converted to plain text
    ///
    /// # Behavior
    /// - A URL without a question id fails before touching cache or network
    /// - A fresh cache entry is used as-is
    /// - Otherwise all answers are fetched, ranked and cached, so later calls
    ///   with a different `count` are served from the cache
    /// - A question without answers yields an empty list
    pub async fn fetch_answers(
        &mut self,
        question_url: &str,
        count: usize,
    ) -> Result<Vec<Answer>, FetchError> {
        let question_id = extract_question_id(question_url).ok_or_else(|| {
            FetchError::InvalidInput(format!("no question id in URL '{}'", question_url))
        })?;

        let key = cache_key(self.client.site(), &question_id);
        let ranked = match self.cache.get(&key) {
            Some(entry) => {
                debug!(%key, answers = entry.answers.len(), "cache hit");
                entry.answers.clone()
            }
            None => self.refresh(&question_id, &key).await?,
        };

        Ok(ranked
            .into_iter()
            .take(count)
            .map(|answer| Answer {
                body: clean(&answer.body),
                ..answer
            })
            .collect())
    }

    /// Fetches, ranks and caches every answer of a question
    async fn refresh(&mut self, question_id: &str, key: &str) -> Result<Vec<Answer>, FetchError> {
        info!(%question_id, site = self.client.site(), "fetching answers");
        let ranked = rank(self.client.list_answers(question_id).await?);

        if ranked.is_empty() {
            debug!(%question_id, "question has no answers, not caching");
        } else if let Err(e) = self.cache.put(key, ranked.clone()) {
            warn!(%key, error = %e, "failed to write answer cache");
        }

        Ok(ranked)
    }
}
