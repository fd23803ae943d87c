//! HTTP client for the Attio REST API

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{header, Client, Method, RequestBuilder, StatusCode};
use serde_json::Value;
use tracing::{debug, trace, warn};
use url::Url;

use crate::api::error::ApiError;
use crate::api::pagination::CursorPage;
use crate::api::response::{unwrap_data, CursorEnvelope};
use crate::config::Config;

pub const ATTIO_API_BASE: &str = "https://api.attio.com";

/// Attempts per request when the API answers 429
const MAX_ATTEMPTS: u32 = 3;

/// First backoff delay; doubles on each retry
const RETRY_BASE_DELAY: Duration = Duration::from_millis(1000);

/// Longest wait between attempts, whatever `Retry-After` asks for
const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Query string pairs appended to a path
pub type Query<'a> = [(&'a str, String)];

/// Attio API client
pub struct AttioClient {
    client: Client,
    base_url: String,
    api_key: String,
    retry_delay: Duration,
}

impl AttioClient {
    /// Create a client from the resolved configuration
    pub fn new(config: &Config) -> Result<Self> {
        let api_key = config.require_api_key()?;
        let base_url = config.base_url.as_deref().unwrap_or(ATTIO_API_BASE);
        Self::with_base_url(base_url, api_key)
    }

    /// Create a client against an explicit base URL
    pub fn with_base_url(base_url: &str, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("attio-cli/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            retry_delay: RETRY_BASE_DELAY,
        })
    }

    /// Override the base backoff delay
    #[cfg(test)]
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Build an absolute URL from an API path and query pairs
    pub fn url(&self, path: &str, query: &Query<'_>) -> Result<Url> {
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };
        let mut url = Url::parse(&format!("{}{}", self.base_url, path))
            .with_context(|| format!("invalid API path: {}", path))?;

        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    /// Build request with authentication headers
    fn build_request(&self, method: Method, url: Url, body: Option<&Value>) -> RequestBuilder {
        let mut req = self
            .client
            .request(method, url)
            .bearer_auth(&self.api_key)
            .header(header::ACCEPT, "application/json");

        if let Some(body) = body {
            req = req.json(body);
        }

        req
    }

    /// Send a request, retrying 429s. Returns the parsed body, or `None` when empty.
    async fn send(&self, method: Method, url: Url, body: Option<&Value>) -> Result<Option<Value>> {
        let mut attempt = 1;

        loop {
            match body {
                Some(b) => debug!("{} {} with body: {}", method, url, b),
                None => debug!("{} {}", method, url),
            }

            let response = self
                .build_request(method.clone(), url.clone(), body)
                .send()
                .await?;
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                if attempt >= MAX_ATTEMPTS {
                    return Err(ApiError::RateLimited { attempts: attempt }.into());
                }

                let retry_after = response
                    .headers()
                    .get(header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok());
                let delay = backoff(retry_after, self.retry_delay, attempt);

                warn!(
                    "Rate limited, retrying in {:?} (attempt {}/{})",
                    delay, attempt, MAX_ATTEMPTS
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
                continue;
            }

            let text = response.text().await?;
            trace!("Response ({}): {}", status, text);

            if !status.is_success() {
                return Err(ApiError::from_response(status.as_u16(), &text).into());
            }

            if status == StatusCode::NO_CONTENT || text.trim().is_empty() {
                return Ok(None);
            }

            let value = serde_json::from_str(&text).context("API returned invalid JSON")?;
            return Ok(Some(value));
        }
    }

    /// Send any method and unwrap the `data` envelope
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: &Query<'_>,
        body: Option<Value>,
    ) -> Result<Option<Value>> {
        let url = self.url(path, query)?;
        let value = self.send(method, url, body.as_ref()).await?;
        Ok(value.map(unwrap_data))
    }

    /// Make a GET request to the API
    pub async fn get(&self, path: &str) -> Result<Value> {
        self.get_query(path, &[]).await
    }

    /// Make a GET request with query parameters
    pub async fn get_query(&self, path: &str, query: &Query<'_>) -> Result<Value> {
        let value = self.request(Method::GET, path, query, None).await?;
        Ok(value.unwrap_or(Value::Null))
    }

    /// Make a GET request and keep the whole body (no envelope unwrapping)
    pub async fn get_raw(&self, path: &str, query: &Query<'_>) -> Result<Value> {
        let url = self.url(path, query)?;
        let value = self.send(Method::GET, url, None).await?;
        Ok(value.unwrap_or(Value::Null))
    }

    /// Make a POST request to the API
    pub async fn post(&self, path: &str, body: Value) -> Result<Value> {
        let value = self.request(Method::POST, path, &[], Some(body)).await?;
        Ok(value.unwrap_or(Value::Null))
    }

    /// Make a PUT request to the API
    pub async fn put(&self, path: &str, query: &Query<'_>, body: Value) -> Result<Value> {
        let value = self.request(Method::PUT, path, query, Some(body)).await?;
        Ok(value.unwrap_or(Value::Null))
    }

    /// Make a PATCH request to the API
    pub async fn patch(&self, path: &str, body: Value) -> Result<Value> {
        let value = self.request(Method::PATCH, path, &[], Some(body)).await?;
        Ok(value.unwrap_or(Value::Null))
    }

    /// Make a DELETE request to the API. 204 resolves to `None`.
    pub async fn delete(&self, path: &str) -> Result<Option<Value>> {
        self.request(Method::DELETE, path, &[], None).await
    }

    /// Fetch one page from a cursor-paginated endpoint
    pub async fn get_cursor_page(&self, path: &str, query: &Query<'_>) -> Result<CursorPage<Value>> {
        let body = self.get_raw(path, query).await?;
        let envelope: CursorEnvelope<Value> =
            serde_json::from_value(body).context("unexpected cursor page shape")?;

        Ok(CursorPage {
            items: envelope.data,
            next_cursor: envelope.pagination.and_then(|p| p.next_cursor),
        })
    }
}

/// Delay before retry `attempt`: a numeric `Retry-After` if present,
/// otherwise `base * 2^(attempt - 1)`, never above [`MAX_RETRY_DELAY`]
fn backoff(retry_after: Option<&str>, base: Duration, attempt: u32) -> Duration {
    retry_after
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or_else(|| base * 2u32.pow(attempt.saturating_sub(1)))
        .min(MAX_RETRY_DELAY)
}

/// Return the array inside a payload, or an empty list
pub fn into_items(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => vec![other],
    }
}
