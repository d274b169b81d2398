//! Small JSON-over-HTTP client with retries, bearer auth and redacted logging.
//!
//! - Request options: `Auth`, query params, timeout, retries
//! - Never logs secret values; auth is reported by kind only
//! - Retries network failures, 429 and 5xx with exponential backoff and
//!   `Retry-After` support
//!
//! Example (no_run):
//! ```no_run
//! # async fn demo() -> Result<(), dormant_http::HttpError> {
//! let client = dormant_http::HttpClient::new("https://api.example.com")?;
//! let got: serde_json::Value = client
//!     .get_json("v1/items", dormant_http::RequestOpts::default())
//!     .await?;
//! # Ok(()) }
//! ```
//!
//! Observability: `tracing` events `http.request.start`, `http.response`,
//! `http.retrying` and `http.error` carry a per-process request id.

use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::time::sleep;

const BACKOFF_BASE_MS: u64 = 200;
const RATE_LIMIT_FLOOR: Duration = Duration::from_millis(1100);
const BODY_SNIPPET_MAX: usize = 500;

static REQUEST_SEQ: AtomicU64 = AtomicU64::new(1);

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
    #[error("server returned error {status}: {message}, request_id={request_id}")]
    Api {
        status: StatusCode,
        message: String,
        request_id: String,
    },
}

impl HttpError {
    /// HTTP status for API errors, `None` for transport/decode failures.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            HttpError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Authentication strategies supported by [`HttpClient`].
///
/// ```
/// use dormant_http::Auth;
///
/// let bearer = Auth::Bearer("token");
/// assert!(matches!(bearer, Auth::Bearer("token")));
/// ```
#[derive(Clone, Debug)]
pub enum Auth<'a> {
    /// Authorization: Bearer <token>
    Bearer(&'a str),
    None,
}

impl Auth<'_> {
    fn kind(&self) -> &'static str {
        match self {
            Auth::Bearer(_) => "bearer",
            Auth::None => "none",
        }
    }
}

/// Per-request tuning knobs.
///
/// ```
/// use dormant_http::{Auth, RequestOpts};
/// use std::time::Duration;
///
/// let opts = RequestOpts {
///     timeout: Some(Duration::from_secs(30)),
///     auth: Some(Auth::Bearer("secret")),
///     query: Some(vec![("max_results", "5".into())]),
///     ..Default::default()
/// };
/// assert_eq!(opts.timeout.unwrap().as_secs(), 30);
/// assert!(opts.retries.is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOpts<'a> {
    pub timeout: Option<Duration>,
    pub retries: Option<usize>,
    pub auth: Option<Auth<'a>>,
    pub query: Option<Vec<(&'a str, Cow<'a, str>)>>,
}

#[derive(Clone)]
pub struct HttpClient {
    base: Url,
    inner: Client,
    pub default_timeout: Duration,
    pub max_retries: usize,
}

impl HttpClient {
    /// Construct a client anchored to a base URL.
    ///
    /// ```no_run
    /// use dormant_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new("https://api.example.com")?;
    /// assert_eq!(client.default_timeout, Duration::from_secs(15));
    /// assert_eq!(client.max_retries, 2);
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new(base: &str) -> Result<Self, HttpError> {
        let base = Url::parse(base).map_err(|e| HttpError::Url(e.to_string()))?;
        let inner = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .user_agent(concat!("dormant/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            base,
            inner,
            default_timeout: Duration::from_secs(15),
            max_retries: 2,
        })
    }

    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = dur;
        self
    }

    pub fn with_retries(mut self, n: usize) -> Self {
        self.max_retries = n;
        self
    }

    /// GET `path` (relative to the base URL) and decode the JSON body.
    pub async fn get_json<T>(&self, path: &str, opts: RequestOpts<'_>) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        let url = self
            .base
            .join(path)
            .map_err(|e| HttpError::Url(e.to_string()))?;

        let bearer = match &opts.auth {
            Some(Auth::Bearer(tok)) => Some(sanitize_bearer(tok)?),
            _ => None,
        };
        let auth_kind = opts.auth.as_ref().map(Auth::kind).unwrap_or("none");
        let query: Vec<(&str, &str)> = opts
            .query
            .as_ref()
            .map(|q| q.iter().map(|(k, v)| (*k, v.as_ref())).collect())
            .unwrap_or_default();
        let timeout = opts.timeout.unwrap_or(self.default_timeout);
        let max_retries = opts.retries.unwrap_or(self.max_retries);
        let req_id = format!("r{}", REQUEST_SEQ.fetch_add(1, Ordering::Relaxed));

        let mut attempt = 0usize;
        loop {
            tracing::debug!(
                req_id = %req_id,
                attempt = attempt + 1,
                max_retries,
                path = %url.path(),
                query = ?redacted_query(&query),
                timeout_ms = timeout.as_millis() as u64,
                auth_kind,
                "http.request.start"
            );

            let mut rb = self.inner.get(url.clone()).timeout(timeout).query(&query);
            if let Some(tok) = &bearer {
                rb = rb.bearer_auth(tok);
            }

            let started = Instant::now();
            let sent = match rb.send().await {
                Ok(resp) => {
                    let status = resp.status();
                    let headers = resp.headers().clone();
                    resp.bytes().await.map(|body| (status, headers, body))
                }
                Err(err) => Err(err),
            };
            let (status, headers, body) = match sent {
                Ok(parts) => parts,
                Err(err) => {
                    let message = err.to_string();
                    if attempt < max_retries {
                        attempt += 1;
                        let delay = backoff_delay(attempt, None, false);
                        tracing::warn!(
                            req_id = %req_id,
                            attempt,
                            max_retries,
                            backoff_ms = delay.as_millis() as u64,
                            message = %message,
                            "http.retrying.network"
                        );
                        sleep(delay).await;
                        continue;
                    }
                    tracing::warn!(req_id = %req_id, attempt, message = %message, "http.network_error");
                    return Err(HttpError::Network(message));
                }
            };

            let request_id = header_str(&headers, "x-request-id")
                .or_else(|| header_str(&headers, "x-transaction-id"))
                .unwrap_or("-")
                .to_string();
            tracing::debug!(
                req_id = %req_id,
                %status,
                duration_ms = started.elapsed().as_millis() as u64,
                body_len = body.len(),
                x_request_id = %request_id,
                rate_limit.remaining = ?header_str(&headers, "x-rate-limit-remaining"),
                rate_limit.reset = ?header_str(&headers, "x-rate-limit-reset"),
                "http.response"
            );

            let snippet = snip_body(&body);
            if status.is_success() {
                return serde_json::from_slice::<T>(&body).map_err(|e| {
                    tracing::warn!(
                        req_id = %req_id,
                        serde_err = %e,
                        body_snippet = %snippet,
                        "http.response.decode_error"
                    );
                    HttpError::Decode(e.to_string(), snippet)
                });
            }

            let message = extract_error_message(&body);
            let is_429 = status == StatusCode::TOO_MANY_REQUESTS;
            if (is_429 || status.is_server_error()) && attempt < max_retries {
                attempt += 1;
                let retry_after = retry_after_secs(&headers);
                let delay = backoff_delay(attempt, retry_after, is_429);
                tracing::warn!(
                    req_id = %req_id,
                    %status,
                    attempt,
                    max_retries,
                    backoff_ms = delay.as_millis() as u64,
                    retry_after_secs = ?retry_after,
                    message = %message,
                    "http.retrying"
                );
                sleep(delay).await;
                continue;
            }

            tracing::warn!(
                req_id = %req_id,
                %status,
                message = %message,
                x_request_id = %request_id,
                body_snippet = %snippet,
                "http.error"
            );
            return Err(HttpError::Api {
                status,
                message,
                request_id,
            });
        }
    }
}

/// Delay before retry number `attempt` (1-based).
fn backoff_delay(attempt: usize, retry_after: Option<u64>, rate_limited: bool) -> Duration {
    if let Some(secs) = retry_after {
        return Duration::from_secs(secs);
    }
    let shift = attempt.saturating_sub(1).min(16) as u32;
    let exp = Duration::from_millis(BACKOFF_BASE_MS.saturating_mul(1u64 << shift));
    if rate_limited {
        exp.max(RATE_LIMIT_FLOOR)
    } else {
        exp
    }
}

fn header_str<'h>(headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn retry_after_secs(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())?
        .trim()
        .parse()
        .ok()
}

fn redacted_query(query: &[(&str, &str)]) -> Vec<(String, String)> {
    query
        .iter()
        .map(|(k, v)| {
            let secret = matches!(
                k.to_ascii_lowercase().as_str(),
                "access_token" | "authorization" | "api_key" | "token" | "secret" | "bearer"
            );
            let v = if secret { "<redacted>" } else { v };
            (k.to_string(), v.to_string())
        })
        .collect()
}

/// Pull a human-readable message out of an error body.
///
/// Understands Twitter's `{"errors":[{"message"|"detail"|"title"}]}`, the
/// problem-details shape `{"title","detail"}`, and `{"message"}`.
fn extract_error_message(body: &[u8]) -> String {
    #[derive(Deserialize)]
    struct Envelope {
        #[serde(default)]
        errors: Vec<Problem>,
        #[serde(flatten)]
        top: Problem,
    }
    #[derive(Deserialize, Default)]
    struct Problem {
        #[serde(default)]
        message: String,
        #[serde(default)]
        detail: String,
        #[serde(default)]
        title: String,
    }

    fn first_non_empty(p: &Problem) -> Option<&str> {
        [&p.detail, &p.message, &p.title]
            .into_iter()
            .find(|s| !s.is_empty())
            .map(String::as_str)
    }

    if let Ok(env) = serde_json::from_slice::<Envelope>(body) {
        let found = env
            .errors
            .iter()
            .find_map(first_non_empty)
            .or_else(|| first_non_empty(&env.top));
        if let Some(msg) = found {
            return msg.to_string();
        }
    }
    snip_body(body)
}

fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(body).to_string();
    if snip.len() > BODY_SNIPPET_MAX {
        let mut cut = BODY_SNIPPET_MAX;
        while !snip.is_char_boundary(cut) {
            cut -= 1;
        }
        snip.truncate(cut);
        snip.push_str("...");
    }
    snip
}

fn sanitize_bearer(raw: &str) -> Result<String, HttpError> {
    let mut s = raw
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .to_string();
    s.retain(|ch| !ch.is_ascii_whitespace());

    if s.is_empty() {
        return Err(HttpError::Build("bearer token is empty".into()));
    }
    if !s.is_ascii() {
        return Err(HttpError::Build("bearer token contains non-ASCII bytes".into()));
    }
    HeaderValue::from_str(&format!("Bearer {s}"))
        .map_err(|e| HttpError::Build(format!("invalid Authorization header: {e}")))?;
    Ok(s)
}
