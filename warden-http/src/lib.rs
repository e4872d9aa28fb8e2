//! Minimal HTTP client with safe logging and flexible auth.
//!
//! - Request options: headers, `Auth`, query params
//! - Redacts sensitive query params and never logs secret values
//! - JSON helpers (`get_json`) and raw page fetches (`get_text`)
//! - Optional *raw* request/response logging via `WARDEN_HTTP_RAW=1`
//!
//! Requests are sent exactly once with `reqwest`'s default timeouts. Callers
//! that want a second attempt (or a different endpoint) decide that
//! themselves from the returned status.
//!
//! Example (no_run):
//! ```rust
//! # async fn demo() -> Result<(), warden_http::HttpError> {
//! let client = warden_http::HttpClient::new("https://api.example.com")?;
//! let got: serde_json::Value = client
//!     .get_json("v1/items", warden_http::RequestOpts::default())
//!     .await?;
//! # Ok(()) }
//! ```
//!
//! Observability: structured `tracing` events are emitted for request start,
//! response status, body snippets (truncated) and final errors, plus raw
//! request/response lines (target `http.raw`) when `WARDEN_HTTP_RAW=1`.

use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::borrow::Cow;
use std::env;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use thiserror::Error;

// ==============================
// Raw logging toggles
// ==============================

const RAW_ENV: &str = "WARDEN_HTTP_RAW";
const RAW_MAX_BODY: usize = 64 * 1024;
const SNIPPET_MAX: usize = 500;

static REQUEST_SEQ: AtomicU64 = AtomicU64::new(1);

fn raw_enabled() -> bool {
    matches!(
        env::var(RAW_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

fn is_secret_param(name: &str) -> bool {
    matches!(
        name.to_ascii_lowercase().as_str(),
        "access_token"
            | "authorization"
            | "auth"
            | "key"
            | "api_key"
            | "token"
            | "secret"
            | "client_secret"
            | "bearer"
    )
}

// ==============================
// Errors
// ==============================

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("request build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("decode error: {0}, body_snippet: {1}")]
    Decode(String, String),
    #[error("server returned error {status}: {message}")]
    Api { status: StatusCode, message: String },
}

// ==============================
// Auth & Request Options
// ==============================

/// Authentication strategies supported by the request helpers.
///
/// ```
/// use warden_http::Auth;
/// use std::borrow::Cow;
///
/// let auth = Auth::Query { name: "key", value: Cow::Borrowed("secret") };
/// assert!(matches!(auth, Auth::Query { name: "key", .. }));
/// ```
#[derive(Clone, Debug)]
pub enum Auth<'a> {
    /// Auth via query param; the value is redacted in every log line.
    Query {
        name: &'a str,
        value: Cow<'a, str>,
    },
}

/// Per-request tuning knobs.
///
/// ```
/// use warden_http::RequestOpts;
///
/// let opts = RequestOpts {
///     query: Some(vec![("q", "rust".into())]),
///     ..Default::default()
/// };
/// assert!(opts.auth.is_none());
/// assert!(!opts.allow_absolute);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOpts<'a> {
    pub auth: Option<Auth<'a>>,
    pub headers: Option<HeaderMap>,
    pub query: Option<Vec<(&'a str, Cow<'a, str>)>>,
    /// If true and `path` is an absolute URL, use it as-is (ignore base).
    pub allow_absolute: bool,
}

impl<'a> RequestOpts<'a> {
    /// Query pairs including a query-param `Auth`, in send order.
    fn query_pairs(&self) -> Vec<(&str, &str)> {
        let mut pairs: Vec<(&str, &str)> = self
            .query
            .iter()
            .flatten()
            .map(|(k, v)| (*k, v.as_ref()))
            .collect();
        if let Some(Auth::Query { name, value }) = &self.auth {
            pairs.push((*name, value.as_ref()));
        }
        pairs
    }

    fn auth_kind(&self) -> &'static str {
        match &self.auth {
            Some(Auth::Query { .. }) => "query",
            None => "none",
        }
    }
}

/// Status and body of a request whose status the caller wants to inspect.
#[derive(Debug, Clone)]
pub struct TextResponse {
    pub status: StatusCode,
    pub body: String,
}

impl TextResponse {
    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK
    }
}

// ==============================
// Client
// ==============================

/// `reqwest` client anchored to a base URL.
///
/// Cloning is cheap and clones share one connection pool, so a single client
/// can serve as the long-lived session of a bot.
#[derive(Clone, Debug)]
pub struct HttpClient {
    base: Url,
    inner: Client,
}

struct RawResponse {
    req_id: String,
    status: StatusCode,
    bytes: Bytes,
}

impl HttpClient {
    /// Construct a client anchored to a base URL.
    ///
    /// ```no_run
    /// use warden_http::{HttpClient, HttpError};
    ///
    /// let client = HttpClient::new("https://api.example.com")?;
    /// # let _ = client;
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new(base: &str) -> Result<Self, HttpError> {
        let base = Url::parse(base).map_err(|e| HttpError::Url(e.to_string()))?;
        let inner = Client::builder()
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self { base, inner })
    }

    /// GET and decode a JSON body. Non-success statuses become [`HttpError::Api`].
    pub async fn get_json<T>(&self, path: &str, opts: RequestOpts<'_>) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        let raw = self.send(Method::GET, path, &opts).await?;
        let snippet = snip_body(&raw.bytes);

        if !raw.status.is_success() {
            let message = extract_error_message(&raw.bytes);
            tracing::warn!(
                req_id=%raw.req_id,
                status=%raw.status,
                message=%message,
                body_snippet=%snippet,
                "http.error"
            );
            return Err(HttpError::Api {
                status: raw.status,
                message,
            });
        }

        serde_json::from_slice::<T>(&raw.bytes).map_err(|e| {
            tracing::warn!(
                req_id=%raw.req_id,
                serde_line=%e.line(),
                serde_col=%e.column(),
                serde_err=%e,
                body_snippet=%snippet,
                "http.response.decode_error"
            );
            HttpError::Decode(e.to_string(), snippet)
        })
    }

    /// GET a body as text without judging the status.
    pub async fn get_text(
        &self,
        path: &str,
        opts: RequestOpts<'_>,
    ) -> Result<TextResponse, HttpError> {
        let raw = self.send(Method::GET, path, &opts).await?;
        Ok(TextResponse {
            status: raw.status,
            body: String::from_utf8_lossy(&raw.bytes).into_owned(),
        })
    }

    fn resolve(&self, path: &str, allow_absolute: bool) -> Result<Url, HttpError> {
        if allow_absolute {
            if let Ok(abs) = Url::parse(path) {
                return Ok(abs);
            }
        }
        self.base
            .join(path)
            .map_err(|e| HttpError::Url(e.to_string()))
    }

    /// No per-request timeout is set; the client's defaults apply.
    fn request_builder(
        &self,
        method: &Method,
        url: &Url,
        pairs: &[(&str, &str)],
        headers: Option<&HeaderMap>,
    ) -> RequestBuilder {
        let rb = self.inner.request(method.clone(), url.clone()).query(pairs);
        match headers {
            Some(hdrs) => rb.headers(hdrs.clone()),
            None => rb,
        }
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        opts: &RequestOpts<'_>,
    ) -> Result<RawResponse, HttpError> {
        let url = self.resolve(path, opts.allow_absolute)?;
        let pairs = opts.query_pairs();

        let rb = self.request_builder(&method, &url, &pairs, opts.headers.as_ref());
        let req_id = format!("r{:x}", REQUEST_SEQ.fetch_add(1, Ordering::Relaxed));
        let redacted_q = redact_pairs(&pairs);

        tracing::debug!(
            req_id=%req_id,
            method=%method,
            host_path=%format!("{}{}", url.host_str().unwrap_or("-"), url.path()),
            query=?redacted_q,
            auth_kind=opts.auth_kind(),
            "http.request.start"
        );

        if raw_enabled() {
            let curl = make_curl(&method, &url, &redacted_q, opts.headers.as_ref());
            tracing::debug!(target: "http.raw", %req_id, %curl, "request");
        }

        let t0 = Instant::now();
        let resp = rb.send().await.map_err(|err| {
            tracing::warn!(req_id=%req_id, message=%err, "http.network_error.send");
            HttpError::Network(err.to_string())
        })?;
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = resp.bytes().await.map_err(|err| {
            tracing::warn!(req_id=%req_id, message=%err, "http.network_error.body");
            HttpError::Network(err.to_string())
        })?;
        let duration_ms = t0.elapsed().as_millis() as u64;

        tracing::debug!(
            req_id=%req_id,
            %status,
            duration_ms,
            body_len=bytes.len(),
            "http.response.headers"
        );

        if raw_enabled() {
            let truncated = bytes.len() > RAW_MAX_BODY;
            let text = String::from_utf8_lossy(&bytes[..bytes.len().min(RAW_MAX_BODY)]);
            tracing::info!(
                target: "http.raw",
                %req_id,
                %status,
                duration_ms,
                headers=?redact_headers(&headers),
                body=%text,
                truncated
            );
        }

        tracing::trace!(req_id=%req_id, body_snippet=%snip_body(&bytes), "http.response.body_snippet");

        Ok(RawResponse {
            req_id,
            status,
            bytes,
        })
    }
}

// ==============================
// Helpers
// ==============================

/// Render a best-effort curl command for repro/debug from already redacted
/// query pairs.
fn make_curl(
    method: &Method,
    url: &Url,
    redacted_query: &[(String, String)],
    headers: Option<&HeaderMap>,
) -> String {
    let mut shown = url.clone();
    shown.set_query(None);
    if !redacted_query.is_empty() {
        shown.query_pairs_mut().extend_pairs(redacted_query);
    }

    let mut parts = vec!["curl".to_string(), format!("-X{}", method)];
    if let Some(headers) = headers {
        for (name, val) in redact_headers(headers) {
            parts.push(format!("-H '{}: {}'", name, val.replace('\'', r"'\''")));
        }
    }
    parts.push(format!("'{}'", shown.as_str()));
    parts.join(" ")
}

fn redact_pairs(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| {
            let value = if is_secret_param(k) { "<redacted>" } else { *v };
            ((*k).to_string(), value.to_string())
        })
        .collect()
}

fn redact_headers(h: &HeaderMap) -> Vec<(String, String)> {
    h.iter()
        .map(|(k, v)| {
            let key = k.as_str().to_string();
            let val = if key.eq_ignore_ascii_case("authorization") || is_secret_param(&key) {
                "<redacted>".to_string()
            } else {
                v.to_str().unwrap_or("").to_string()
            };
            (key, val)
        })
        .collect()
}

/// Pull a human readable message out of common JSON error envelopes.
fn extract_error_message(body: &[u8]) -> String {
    // Google style: {"error":{"code":403,"message":"..."}}
    #[derive(Deserialize)]
    struct Envelope {
        error: Detail,
    }
    #[derive(Deserialize)]
    struct Detail {
        message: String,
    }

    // Generic: {"message":"..."} or {"error":"..."}
    #[derive(Deserialize)]
    struct Flat {
        #[serde(default)]
        message: String,
        #[serde(default)]
        error: String,
    }

    if let Ok(env) = serde_json::from_slice::<Envelope>(body) {
        return env.error.message;
    }
    if let Ok(flat) = serde_json::from_slice::<Flat>(body) {
        if !flat.message.is_empty() {
            return flat.message;
        }
        if !flat.error.is_empty() {
            return flat.error;
        }
    }
    snip_body(body)
}

fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(body).into_owned();
    if snip.len() > SNIPPET_MAX {
        let mut cut = SNIPPET_MAX;
        while !snip.is_char_boundary(cut) {
            cut -= 1;
        }
        snip.truncate(cut);
        snip.push_str("...");
    }
    snip
}
