//! Interactive session
//!
//! Drives one search: read a query, list matching questions, let the user
//! pick one and print its best answers. Input and output are generic so the
//! whole flow can run against in-memory buffers.

use std::io::{self, BufRead, Write};

use crossterm::style::Stylize;
use thiserror::Error;
use tracing::info;

use crate::cli::StartupConfig;
use crate::data::{Answer, Question, RemoteError};
use crate::fetch::{AnswerFetcher, FetchError};

/// Answers shown when the count prompt is left blank
pub const DEFAULT_COUNT: usize = 3;

/// Width of the rule printed between answers
const RULE_WIDTH: usize = 60;

/// Errors that end a session
#[derive(Debug, Error)]
pub enum AppError {
    /// The user typed something unusable
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The question search failed
    #[error("Search failed: {0}")]
    Remote(#[from] RemoteError),

    /// Fetching answers failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Reading from or writing to the terminal failed
    #[error("Terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// A single interactive search session
pub struct App {
    fetcher: AnswerFetcher,
    /// Query given on the command line, if any
    query: Option<String>,
    /// Answer count given on the command line, if any
    count: Option<usize>,
    /// How many questions to list
    results: usize,
    color: bool,
}

impl App {
    pub fn new(config: &StartupConfig, fetcher: AnswerFetcher) -> Self {
        Self {
            fetcher,
            query: config.query.clone(),
            count: config.count,
            results: config.results,
            color: config.color,
        }
    }

    /// Runs the session to completion
    ///
    /// Nothing of the answers is printed unless fetching them succeeded.
    pub async fn run<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        out: &mut W,
    ) -> Result<(), AppError> {
        let query = match &self.query {
            Some(query) => query.clone(),
            None => prompt(input, out, "Enter your search query: ")?,
        };
        if query.is_empty() {
            return Err(AppError::InvalidInput(
                "search query cannot be empty".to_string(),
            ));
        }

        info!(%query, "searching questions");
        let questions = self.fetcher.client().search_questions(&query).await?;
        if questions.is_empty() {
            writeln!(out, "No questions found. Try a different search term.")?;
            return Ok(());
        }

        let shown = &questions[..questions.len().min(self.results)];
        self.print_questions(out, shown)?;

        let line = prompt(
            input,
            out,
            &format!("\nSelect a question (1-{}): ", shown.len()),
        )?;
        let question = &shown[parse_selection(&line, shown.len())? - 1];

        let count = match self.count {
            Some(count) => count,
            None => {
                let line = prompt(
                    input,
                    out,
                    &format!("How many answers would you like to see? [{}] ", DEFAULT_COUNT),
                )?;
                parse_count(&line)?
            }
        };

        let answers = self.fetcher.fetch_answers(&question.link, count).await?;
        if answers.is_empty() {
            writeln!(out, "No answers found for this question.")?;
            return Ok(());
        }

        writeln!(out, "\n{}", self.style_heading(&question.display_title()))?;
        for (idx, answer) in answers.iter().enumerate() {
            self.print_answer(out, idx + 1, answer)?;
        }
        Ok(())
    }

    fn print_questions<W: Write>(&self, out: &mut W, questions: &[Question]) -> io::Result<()> {
        let site = self.fetcher.client().site();
        let heading = if site == "stackoverflow" {
            "🔍 Top Stack Overflow Questions:".to_string()
        } else {
            format!("🔍 Top questions on {}:", site)
        };

        writeln!(out, "\n{}", self.style_heading(&heading))?;
        for (idx, question) in questions.iter().enumerate() {
            writeln!(
                out,
                "{}. {} - {} [score {}, {} answers]",
                idx + 1,
                question.display_title(),
                question.link,
                question.score,
                question.answer_count
            )?;
        }
        Ok(())
    }

    fn print_answer<W: Write>(&self, out: &mut W, rank: usize, answer: &Answer) -> io::Result<()> {
        let accepted = if answer.is_accepted { ", ✔ accepted" } else { "" };
        let title = format!("Answer {} (score: {}{})", rank, answer.score, accepted);

        writeln!(out, "\n{}", self.style_heading(&title))?;
        writeln!(out, "{}", answer.body)?;
        writeln!(out, "{}", "─".repeat(RULE_WIDTH))
    }

    fn style_heading(&self, text: &str) -> String {
        if self.color {
            text.bold().cyan().to_string()
        } else {
            text.to_string()
        }
    }
}

/// Prints `message`, then reads one trimmed line
///
/// End of input is reported as invalid input rather than an empty answer.
fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, message: &str) -> Result<String, AppError> {
    write!(out, "{}", message)?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(AppError::InvalidInput("unexpected end of input".to_string()));
    }
    Ok(line.trim().to_string())
}

/// Parses a 1-based selection among `available` questions
pub fn parse_selection(text: &str, available: usize) -> Result<usize, AppError> {
    match text.trim().parse::<usize>() {
        Ok(n) if (1..=available).contains(&n) => Ok(n),
        _ => Err(AppError::InvalidInput(format!(
            "'{}' is not a number between 1 and {}",
            text.trim(),
            available
        ))),
    }
}

/// Parses the requested answer count; blank means [`DEFAULT_COUNT`]
pub fn parse_count(text: &str) -> Result<usize, AppError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(DEFAULT_COUNT);
    }
    match text.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(AppError::InvalidInput(format!(
            "'{}' is not a positive number of answers",
            text
        ))),
    }
}
