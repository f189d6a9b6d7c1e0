// Remote API module.
// HTTP client, page parsing, and the pagination loop.

pub mod client;
pub mod page;

#[cfg(test)]
pub(crate) mod fake;

use serde_json::Value;

use crate::error::Result;

pub use client::ApiClient;
pub use page::{Page, endpoint_path, fetch_all};

/// Something that can answer a GET for a server-relative path with JSON.
///
/// Implemented by [`ApiClient`] for the real service.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    async fn get_json(&mut self, path: &str) -> Result<Value>;
}
