// HTTP client for the paginated data API.
// Builds request URLs from the configured base and converts error statuses.

use reqwest::{
    Client, Response, StatusCode,
    header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT},
};
use serde_json::Value;

use crate::error::{Result, WrangleError};

use super::PageSource;

/// API client bound to one base URL.
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for `base_url` (scheme and host, no trailing path).
    pub fn new(base_url: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("superstore/", env!("CARGO_PKG_VERSION"))),
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(WrangleError::Api)?;

        Ok(Self::with_client(client, base_url))
    }

    /// Wrap an already configured reqwest client.
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for a server-relative path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Make a GET request for a server-relative path.
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = self.url(path);
        tracing::debug!(%url, "GET");
        let response = self.client.get(&url).send().await.map_err(WrangleError::Api)?;

        check_response(response).await
    }
}

impl PageSource for ApiClient {
    async fn get_json(&mut self, path: &str) -> Result<Value> {
        let response = self.get(path).await?;
        let body: Value = response.json().await?;
        Ok(body)
    }
}

/// Check response status and convert errors.
async fn check_response(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().to_string();
    match status {
        StatusCode::NOT_FOUND => Err(WrangleError::NotFound(url)),
        status => Err(WrangleError::Status {
            status: status.as_u16(),
            url,
            body: response.text().await.unwrap_or_default(),
        }),
    }
}
