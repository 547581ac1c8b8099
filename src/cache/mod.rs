//! Cache module for storing fetched answers on disk
//!
//! Answers are kept per question in one JSON file with the time they were
//! fetched. Entries older than the TTL are ignored and refreshed on the next
//! lookup, and a corrupt file is treated as an empty cache.

mod store;

pub use store::{CacheEntry, CacheError, CacheMap, CacheStore, CACHE_TTL_HOURS};
