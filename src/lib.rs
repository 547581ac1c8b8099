//! stackfetch library
//!
//! Search Stack Overflow, pick a question and read its best answers as plain
//! text. Answers are ranked (accepted first, then by score) and cached on disk
//! for a day. The modules are public so the binary and integration tests share
//! them.

pub mod app;
pub mod cache;
pub mod clean;
pub mod cli;
pub mod data;
pub mod fetch;
pub mod rank;
