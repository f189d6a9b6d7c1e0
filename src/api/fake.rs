// In-memory page source for tests.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::{Result, WrangleError};

use super::PageSource;

/// Serves canned JSON bodies by path and records every request.
#[derive(Debug, Default)]
pub struct FakeSource {
    pages: HashMap<String, Value>,
    requests: Vec<String>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: &str, body: Value) -> Self {
        self.pages.insert(path.to_string(), body);
        self
    }

    pub fn requests(&self) -> &[String] {
        &self.requests
    }
}

impl PageSource for FakeSource {
    async fn get_json(&mut self, path: &str) -> Result<Value> {
        self.requests.push(path.to_string());
        self.pages
            .get(path)
            .cloned()
            .ok_or_else(|| WrangleError::NotFound(path.to_string()))
    }
}
