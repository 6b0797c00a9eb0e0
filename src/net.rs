// /src/net.rs
// Blocking client for the v2 games endpoint. One request per page,
// bounded retries, no streaming.

use std::thread;
use std::time::Duration;

use log::{debug, warn};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde_json::Value;

use crate::config::consts::{
    API_BASE, API_KEY_HEADER, GAMES_PATH, MAX_RETRIES, REQUEST_BUDGET, RETRY_WAIT_SECS,
    TIMEOUT_SECS,
};
use crate::config::options::FetchOptions;
use crate::error::FetchError;
use crate::specs::wire::MatchWire;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

pub struct ApiClient {
    http: Client,
    api_key: String,
    base_url: String,
    requests_made: u64,
}

impl ApiClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, FetchError> {
        Self::with_base_url(api_key, API_BASE)
    }

    /// Point the client somewhere other than the public API, e.g. a proxy.
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, FetchError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build()
            .map_err(|e| FetchError::Request {
                attempts: 0,
                last: e.to_string(),
            })?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            base_url: base_url.into(),
            requests_made: 0,
        })
    }

    /// Requests sent over this client's lifetime, counting retries.
    pub fn requests_made(&self) -> u64 {
        self.requests_made
    }

    /// Fetch one page of games.
    ///
    /// Transport failures and unexpected statuses retry after a pause,
    /// up to the retry cap. API-level rejections (bad key, bad
    /// parameter, exhausted window, rate limit) surface immediately.
    pub fn get_games(&mut self, options: &FetchOptions) -> Result<Vec<MatchWire>, FetchError> {
        let url = format!("{}{}", self.base_url, GAMES_PATH);
        let query = options.query_pairs();

        let mut last = String::new();
        for attempt in 1..=MAX_RETRIES {
            if attempt > 1 {
                thread::sleep(Duration::from_secs(RETRY_WAIT_SECS));
            }
            self.requests_made += 1;
            debug!("GET {url} offset={} (attempt {attempt})", options.offset);

            let response = match self
                .http
                .get(&url)
                .header(API_KEY_HEADER, &self.api_key)
                .query(&query)
                .send()
            {
                Ok(r) => r,
                Err(e) => {
                    warn!("request failed: {e}");
                    last = e.to_string();
                    continue;
                }
            };

            let status = response.status();
            let body = match response.text() {
                Ok(b) => b,
                Err(e) => {
                    warn!("failed to read response body: {e}");
                    last = e.to_string();
                    continue;
                }
            };

            match serde_json::from_str::<Value>(&body) {
                Ok(value) => {
                    // rejection bodies take precedence over the status line
                    if let Some(err) = classify_rejection(&value) {
                        return Err(err);
                    }
                    if status == StatusCode::TOO_MANY_REQUESTS {
                        return Err(classify_throttle(self.requests_made));
                    }
                    if status.is_success() {
                        return Ok(serde_json::from_value(value)?);
                    }
                    warn!("response status {status}, retrying");
                    last = format!("status {status}");
                }
                Err(e) if status.is_success() => return Err(FetchError::Decode(e)),
                Err(e) => {
                    warn!("unparseable {status} response, retrying");
                    last = format!("status {status}: {e}");
                }
            }
        }
        Err(FetchError::Request {
            attempts: MAX_RETRIES,
            last,
        })
    }
}

/// The server answers 429 both for pacing and once the session's request
/// budget runs out. Which one it was follows from our own counter.
fn classify_throttle(requests_made: u64) -> FetchError {
    if requests_made < REQUEST_BUDGET {
        FetchError::LimitExceeded
    } else {
        FetchError::TooManyRequests
    }
}

/// API-level rejections arrive as a JSON object where a page would be an
/// array. Shapes seen in the wild:
///
/// ```text
/// {"message": "Forbidden"}
/// {"err": "Entry not found."}
/// {"err": [{"keyword": "type", "message": "...", "instancePath": "/limit"}]}
/// ```
fn classify_rejection(body: &Value) -> Option<FetchError> {
    let obj = body.as_object()?;

    if obj.get("message").and_then(Value::as_str) == Some("Forbidden") {
        return Some(FetchError::Forbidden);
    }

    match obj.get("err") {
        Some(Value::String(s)) if s == "Entry not found." => Some(FetchError::EntryNotFound),
        Some(Value::Array(items)) => {
            let first = items.first()?;
            let message = first.get("message").and_then(Value::as_str).unwrap_or("");
            if message.to_lowercase().contains("exceeded") {
                return Some(FetchError::LimitExceeded);
            }
            if first.get("keyword").and_then(Value::as_str) == Some("type") {
                let param = first
                    .get("instancePath")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .rsplit('/')
                    .next()
                    .unwrap_or("")
                    .to_string();
                return Some(FetchError::InvalidParameter { param });
            }
            None
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn arrays_are_not_rejections() {
        assert!(classify_rejection(&json!([{"_id": "m1"}])).is_none());
        assert!(classify_rejection(&json!({})).is_none());
    }

    #[test]
    fn forbidden_body() {
        assert!(matches!(
            classify_rejection(&json!({"message": "Forbidden"})),
            Some(FetchError::Forbidden)
        ));
    }

    #[test]
    fn entry_not_found_body() {
        assert!(matches!(
            classify_rejection(&json!({"err": "Entry not found."})),
            Some(FetchError::EntryNotFound)
        ));
    }

    #[test]
    fn limit_exceeded_wins_over_parameter_type() {
        let body = json!({"err": [{
            "keyword": "type",
            "message": "Request limit exceeded",
            "instancePath": "/limit",
        }]});
        assert!(matches!(
            classify_rejection(&body),
            Some(FetchError::LimitExceeded)
        ));
    }

    #[test]
    fn bad_parameter_names_the_offender() {
        let body = json!({"err": [{
            "keyword": "type",
            "message": "must be integer",
            "instancePath": "/queryLimit/limit",
        }]});
        match classify_rejection(&body) {
            Some(FetchError::InvalidParameter { param }) => assert_eq!(param, "limit"),
            other => panic!("unexpected classification: {other:?}"),
        }
    }

    #[test]
    fn unknown_error_arrays_fall_through() {
        let body = json!({"err": [{"keyword": "required", "message": "missing"}]});
        assert!(classify_rejection(&body).is_none());
    }

    #[test]
    fn throttle_splits_on_the_session_counter() {
        let counter: u64 = REQUEST_BUDGET - 1;
        assert!(matches!(
            classify_throttle(counter),
            FetchError::LimitExceeded
        ));
        assert!(matches!(
            classify_throttle(REQUEST_BUDGET),
            FetchError::TooManyRequests
        ));
    }
}
