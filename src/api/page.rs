// Page format and the pagination loop.
// Each response carries a batch of records and a pointer to the next page.

use serde_json::Value;

use crate::error::{Result, WrangleError};
use crate::table::{Record, Table};

use super::PageSource;

const API_PREFIX: &str = "/api/v1/";

/// One decoded page of an endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub records: Vec<Record>,
    /// Server-relative path of the next page; None on the last page.
    pub next_page: Option<String>,
}

impl Page {
    /// Decode `{"payload": {"<endpoint>": [...], "next_page": ...}}`.
    ///
    /// `next_page` must be present; null marks the last page. Other payload
    /// keys are ignored.
    pub fn parse(endpoint: &str, body: Value) -> Result<Self> {
        let Value::Object(mut root) = body else {
            return Err(WrangleError::schema(endpoint, "response is not a JSON object"));
        };
        let Some(Value::Object(mut payload)) = root.remove("payload") else {
            return Err(WrangleError::schema(endpoint, "missing 'payload' object"));
        };

        let records = match payload.remove(endpoint) {
            Some(Value::Array(items)) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| match item {
                    Value::Object(record) => Ok(record),
                    _ => Err(WrangleError::schema(
                        endpoint,
                        format!("record {i} is not a JSON object"),
                    )),
                })
                .collect::<Result<Vec<_>>>()?,
            Some(_) => {
                return Err(WrangleError::schema(
                    endpoint,
                    format!("'payload.{endpoint}' is not a list"),
                ));
            }
            None => {
                return Err(WrangleError::schema(
                    endpoint,
                    format!("missing 'payload.{endpoint}'"),
                ));
            }
        };

        let next_page = match payload.remove("next_page") {
            Some(Value::Null) => None,
            Some(Value::String(path)) => Some(path),
            Some(_) => {
                return Err(WrangleError::schema(
                    endpoint,
                    "'payload.next_page' is neither a string nor null",
                ));
            }
            None => return Err(WrangleError::schema(endpoint, "missing 'payload.next_page'")),
        };

        Ok(Self { records, next_page })
    }
}

/// Server-relative path of an endpoint's first page.
pub fn endpoint_path(endpoint: &str) -> Result<String> {
    if endpoint.is_empty() || endpoint.contains(['/', '?', '#']) || endpoint.trim() != endpoint {
        return Err(WrangleError::InvalidEndpoint(endpoint.to_string()));
    }
    Ok(format!("{API_PREFIX}{endpoint}"))
}

/// Fetch every page of `endpoint` and concatenate the records in arrival order.
///
/// Pages are requested one at a time, following `next_page` until it is null.
/// With `max_pages` set, a chain longer than that fails with
/// [`WrangleError::PageLimit`] instead of continuing.
pub async fn fetch_all<S: PageSource>(
    source: &mut S,
    endpoint: &str,
    max_pages: Option<u32>,
) -> Result<Table> {
    let first = endpoint_path(endpoint)?;

    let page = Page::parse(endpoint, source.get_json(&first).await?)?;
    let mut table = Table::from_records(page.records);
    let mut next_page = page.next_page;
    let mut pages: u32 = 1;
    tracing::debug!(endpoint, pages, rows = table.len(), "fetched page");

    while let Some(path) = next_page {
        if let Some(limit) = max_pages
            && pages >= limit
        {
            return Err(WrangleError::PageLimit {
                endpoint: endpoint.to_string(),
                limit,
            });
        }

        let page = Page::parse(endpoint, source.get_json(&path).await?)?;
        table.append(Table::from_records(page.records));
        next_page = page.next_page;
        pages += 1;
        tracing::debug!(endpoint, pages, rows = table.len(), "fetched page");
    }

    tracing::debug!(endpoint, pages, rows = table.len(), "fetched all pages");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeSource;
    use serde_json::json;

    fn paged(endpoint: &str, ids: &[u64], next: Option<&str>) -> Value {
        let records: Vec<Value> = ids
            .iter()
            .map(|id| json!({"id": id, "v": id * 10}))
            .collect();
        json!({"payload": {endpoint: records, "next_page": next, "page": 1}, "status": "ok"})
    }

    #[test]
    fn test_parse_page() {
        let body = paged("items", &[1, 2], Some("/api/v1/items?page=2"));
        let page = Page::parse("items", body).unwrap();
        assert_eq!(page.records.len(), 2);
        assert_eq!(page.next_page.as_deref(), Some("/api/v1/items?page=2"));
    }

    #[test]
    fn test_parse_last_page() {
        let page = Page::parse("items", paged("items", &[1], None)).unwrap();
        assert!(page.next_page.is_none());
    }

    #[test]
    fn test_parse_missing_payload() {
        let err = Page::parse("items", json!({"items": []})).unwrap_err();
        assert!(matches!(err, WrangleError::Schema { .. }));
    }

    #[test]
    fn test_parse_missing_endpoint_key() {
        let err = Page::parse("items", json!({"payload": {"next_page": null}})).unwrap_err();
        assert!(matches!(err, WrangleError::Schema { endpoint, .. } if endpoint == "items"));
    }

    #[test]
    fn test_parse_missing_next_page() {
        let err = Page::parse("items", json!({"payload": {"items": []}})).unwrap_err();
        assert!(matches!(err, WrangleError::Schema { .. }));
    }

    #[test]
    fn test_parse_rejects_non_object_records() {
        let body = json!({"payload": {"items": [1, 2], "next_page": null}});
        assert!(Page::parse("items", body).is_err());
    }

    #[test]
    fn test_endpoint_path() {
        assert_eq!(endpoint_path("sales").unwrap(), "/api/v1/sales");
        assert!(matches!(
            endpoint_path(""),
            Err(WrangleError::InvalidEndpoint(_))
        ));
        assert!(endpoint_path("a/b").is_err());
        assert!(endpoint_path(" items").is_err());
    }

    #[tokio::test]
    async fn test_fetch_single_page() {
        let mut source = FakeSource::new().with("/api/v1/items", paged("items", &[1, 2, 3], None));

        let table = fetch_all(&mut source, "items", None).await.unwrap();

        assert_eq!(table.columns(), ["id", "v"]);
        assert_eq!(table.len(), 3);
        for (i, id) in [1, 2, 3].iter().enumerate() {
            assert_eq!(table.get(i, "id"), Some(&json!(id)));
        }
        assert_eq!(source.requests(), ["/api/v1/items"]);
    }

    #[tokio::test]
    async fn test_fetch_follows_next_page_chain() {
        let mut source = FakeSource::new()
            .with("/api/v1/sales", paged("sales", &[0, 1], Some("/api/v1/sales?page=2")))
            .with("/api/v1/sales?page=2", paged("sales", &[2, 3], Some("/api/v1/sales?page=3")))
            .with("/api/v1/sales?page=3", paged("sales", &[4, 5], None));

        let table = fetch_all(&mut source, "sales", None).await.unwrap();

        assert_eq!(table.len(), 6);
        for i in 0..6 {
            assert_eq!(table.get(i, "id"), Some(&json!(i)));
        }
        assert_eq!(
            source.requests(),
            ["/api/v1/sales", "/api/v1/sales?page=2", "/api/v1/sales?page=3"]
        );
    }

    #[tokio::test]
    async fn test_fetch_page_limit() {
        let mut source = FakeSource::new()
            .with("/api/v1/sales", paged("sales", &[0], Some("/api/v1/sales?page=2")))
            .with("/api/v1/sales?page=2", paged("sales", &[1], Some("/api/v1/sales?page=2")));

        let err = fetch_all(&mut source, "sales", Some(3)).await.unwrap_err();

        assert!(matches!(err, WrangleError::PageLimit { limit: 3, .. }));
        assert_eq!(source.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_fetch_propagates_source_error() {
        let mut source = FakeSource::new()
            .with("/api/v1/items", paged("items", &[1], Some("/api/v1/items?page=2")));

        let err = fetch_all(&mut source, "items", None).await.unwrap_err();
        assert!(matches!(err, WrangleError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_fetch_rejects_empty_endpoint_without_request() {
        let mut source = FakeSource::new();
        assert!(fetch_all(&mut source, "", None).await.is_err());
        assert!(source.requests().is_empty());
    }
}
