//! Fetches a results page and falls back to the JSON API when it is refused.
//!
//! The page request mimics a desktop browser so the engine serves the plain
//! HTML layout. Any status other than 200 (typically 429 or a captcha
//! redirect) switches to the Custom Search API, whose failures are returned to
//! the caller as-is: there is no third source and nothing is retried.
use super::types::{CustomSearchResponse, SearchOutcome};
use crate::extract::extract_entries;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT as USER_AGENT_HEADER};
use scraper::Html;
use std::borrow::Cow;
use std::ops::Deref;
use warden_config::SearchSettings;
use warden_http::{Auth, HttpClient, HttpError, RequestOpts};

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 6.3; Win64; x64)";

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error("search API credentials (api_key, engine_id) are not configured")]
    MissingCredentials,
    #[error("search API returned no items for {query:?}")]
    NoResults { query: String },
}

/// HTTP session used for one search.
///
/// A caller-supplied client is only borrowed. A client created here is owned
/// by the search and dropped on every return path, errors included.
enum Session<'a> {
    Shared(&'a HttpClient),
    Owned(HttpClient),
}

impl<'a> Session<'a> {
    fn acquire(shared: Option<&'a HttpClient>, settings: &SearchSettings) -> Result<Self, HttpError> {
        match shared {
            Some(client) => Ok(Session::Shared(client)),
            None => {
                tracing::debug!("search.session.owned");
                HttpClient::new(&settings.web_endpoint).map(Session::Owned)
            }
        }
    }
}

impl Deref for Session<'_> {
    type Target = HttpClient;

    fn deref(&self) -> &HttpClient {
        match self {
            Session::Shared(client) => client,
            Session::Owned(client) => client,
        }
    }
}

/// Search the web for `query`.
///
/// Returns the organic result URLs of the results page together with the
/// parsed page, or, when the page is refused, the first link reported by the
/// Custom Search API.
///
/// ```no_run
/// # async fn demo() -> Result<(), warden_search::SearchError> {
/// use warden_config::SearchSettings;
/// use warden_search::{get_google_entries, SearchOutcome};
///
/// let settings = SearchSettings::default();
/// match get_google_entries("rust borrow checker", None, &settings).await? {
///     SearchOutcome::Page { entries, .. } => println!("{} results", entries.len()),
///     SearchOutcome::Fallback { link } => println!("top result: {link}"),
/// }
/// # Ok(()) }
/// ```
pub async fn get_google_entries(
    query: &str,
    session: Option<&HttpClient>,
    settings: &SearchSettings,
) -> Result<SearchOutcome, SearchError> {
    let session = Session::acquire(session, settings)?;

    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT_HEADER, HeaderValue::from_static(USER_AGENT));

    tracing::debug!(%query, endpoint=%settings.web_endpoint, "search.page.start");
    let page = session
        .get_text(
            &settings.web_endpoint,
            RequestOpts {
                headers: Some(headers),
                query: Some(vec![
                    ("q", Cow::Borrowed(query)),
                    ("safe", "off".into()),
                    ("lr", "lang_en".into()),
                    ("h1", "en".into()),
                ]),
                allow_absolute: true,
                ..Default::default()
            },
        )
        .await?;

    if !page.is_ok() {
        tracing::info!(%query, status=%page.status, "search.page.refused_fallback");
        let link = custom_search_first_link(&session, query, settings).await?;
        return Ok(SearchOutcome::Fallback { link });
    }

    let document = Html::parse_document(&page.body);
    let entries = extract_entries(&document);
    tracing::debug!(%query, entries = entries.len(), "search.page.parsed");
    Ok(SearchOutcome::Page { entries, document })
}

async fn custom_search_first_link(
    client: &HttpClient,
    query: &str,
    settings: &SearchSettings,
) -> Result<String, SearchError> {
    let (key, cx) = settings
        .credentials()
        .ok_or(SearchError::MissingCredentials)?;

    let resp: CustomSearchResponse = client
        .get_json(
            &settings.api_endpoint,
            RequestOpts {
                query: Some(vec![
                    ("q", Cow::Borrowed(query)),
                    ("start", "1".into()),
                    ("cx", Cow::Borrowed(cx)),
                ]),
                auth: Some(Auth::Query {
                    name: "key",
                    value: Cow::Borrowed(key),
                }),
                allow_absolute: true,
                ..Default::default()
            },
        )
        .await?;

    let first = resp
        .items
        .into_iter()
        .next()
        .ok_or_else(|| SearchError::NoResults {
            query: query.to_string(),
        })?;
    tracing::debug!(%query, link=%first.link, title=?first.title, "search.api.first_link");
    Ok(first.link)
}
