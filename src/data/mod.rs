//! Core data models for stackfetch
//!
//! This module contains the data types returned by the Stack Exchange API
//! and the client used to fetch them.

pub mod stack_exchange;

pub use stack_exchange::{RemoteError, StackExchangeClient};

use serde::{Deserialize, Serialize};

/// A single answer to a question
///
/// Answers are stored in the cache exactly as fetched; the body is raw markup
/// until it is passed through [`crate::clean::clean`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    /// Net vote count
    pub score: i64,
    /// Whether the question author accepted this answer
    pub is_accepted: bool,
    /// Answer body as HTML
    #[serde(default)]
    pub body: String,
}

/// A question returned by a title search
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Question {
    /// Question title, HTML-entity encoded as returned by the API
    pub title: String,
    /// Canonical link to the question page
    pub link: String,
    /// Net vote count
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub answer_count: u32,
}

impl Question {
    /// Returns the title with markup stripped and entities decoded
    pub fn display_title(&self) -> String {
        crate::clean::plain_text(&self.title)
    }
}
