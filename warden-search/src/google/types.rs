//! Result models for web search.
use scraper::Html;
use serde::Deserialize;

/// Subset of the Custom Search JSON API response that is actually read.
#[derive(Debug, Deserialize)]
pub struct CustomSearchResponse {
    #[serde(default)]
    pub items: Vec<CustomSearchItem>,
}

#[derive(Debug, Deserialize)]
pub struct CustomSearchItem {
    pub link: String,
    #[serde(default)]
    pub title: Option<String>,
}

/// What a search produced.
#[derive(Debug)]
pub enum SearchOutcome {
    /// The results page was fetched; `entries` are its organic result URLs.
    Page { entries: Vec<String>, document: Html },
    /// The results page was refused and the JSON API answered instead.
    Fallback { link: String },
}

impl SearchOutcome {
    /// Every URL in the outcome, in order.
    pub fn links(&self) -> Vec<&str> {
        match self {
            SearchOutcome::Page { entries, .. } => entries.iter().map(String::as_str).collect(),
            SearchOutcome::Fallback { link } => vec![link.as_str()],
        }
    }

    pub fn first_link(&self) -> Option<&str> {
        match self {
            SearchOutcome::Page { entries, .. } => entries.first().map(String::as_str),
            SearchOutcome::Fallback { link } => Some(link),
        }
    }

    /// The parsed results page, absent on the fallback path.
    pub fn document(&self) -> Option<&Html> {
        match self {
            SearchOutcome::Page { document, .. } => Some(document),
            SearchOutcome::Fallback { .. } => None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, SearchOutcome::Fallback { .. })
    }
}
