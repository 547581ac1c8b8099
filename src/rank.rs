//! Answer ranking
//!
//! Accepted answers always come first; within each group answers are ordered
//! by score, highest first.

use std::cmp::Reverse;

use crate::data::Answer;

/// Orders answers by `(is_accepted, score)`, both descending
///
/// The sort is stable, so answers with equal keys keep their incoming order
/// (the API already returns them by votes).
pub fn rank(mut answers: Vec<Answer>) -> Vec<Answer> {
    answers.sort_by_key(|a| Reverse((a.is_accepted, a.score)));
    answers
}
