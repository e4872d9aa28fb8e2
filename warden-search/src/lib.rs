//! Web search helpers for bot commands.
//!
//! - Google results-page search with a Custom Search API fallback (`google`)
//! - Organic-result link extraction from a parsed page (`extract`)
//!
//! HTML is parsed with `scraper`; there is no alternate parser.
pub mod extract;
pub mod google;

pub use extract::{extract_entries, parse_redirect};
pub use google::{get_google_entries, SearchError, SearchOutcome};
