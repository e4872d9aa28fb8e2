//! Google web search with a Custom Search API fallback.
pub mod client;
pub mod types;

pub use client::{get_google_entries, SearchError, USER_AGENT};
pub use types::{CustomSearchItem, CustomSearchResponse, SearchOutcome};
