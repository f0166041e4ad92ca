//! Request-scoped memoized accessor.
//!
//! Wraps a [`RestClient`] and remembers each query's rows for the lifetime
//! of one run. Every stored snapshot gets a fresh generation number, so a
//! refetched result can be told apart from the one a caller already holds.

use crate::backend::client::{FetchError, RestClient};
use crate::backend::query::QueryKey;
use crate::models::{Company, SatelliteKind, SatelliteRecord};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// Rows of one query as stored in the cache.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub rows: Arc<Vec<Value>>,
    /// Increases every time any entry is stored.
    pub generation: u64,
}

#[derive(Default)]
struct Entries {
    map: HashMap<QueryKey, Snapshot>,
    generation: u64,
}

/// Memoizing front for the backend. Errors are never cached.
pub struct QueryCache {
    client: RestClient,
    entries: Mutex<Entries>,
}

impl QueryCache {
    pub fn new(client: RestClient) -> Self {
        Self {
            client,
            entries: Mutex::new(Entries::default()),
        }
    }

    pub fn client(&self) -> &RestClient {
        &self.client
    }

    fn entries(&self) -> MutexGuard<'_, Entries> {
        // A panic while holding the lock cannot leave the map half-written.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Cached rows for `key`, fetching them on a miss.
    pub async fn fetch(&self, key: &QueryKey) -> Result<Snapshot, FetchError> {
        if let Some(hit) = self.peek(key) {
            debug!("cache hit {} (generation {})", key, hit.generation);
            return Ok(hit);
        }

        let rows = self.client.fetch_rows(key).await?;
        Ok(self.store(key, rows))
    }

    /// Drop `key` and fetch it again.
    #[allow(dead_code)] // A single CLI run reads each key once
    pub async fn refetch(&self, key: &QueryKey) -> Result<Snapshot, FetchError> {
        self.invalidate(key);
        self.fetch(key).await
    }

    /// Forget the stored rows for `key`. Returns whether anything was stored.
    pub fn invalidate(&self, key: &QueryKey) -> bool {
        self.entries().map.remove(key).is_some()
    }

    pub fn peek(&self, key: &QueryKey) -> Option<Snapshot> {
        self.entries().map.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries().map.len()
    }

    fn store(&self, key: &QueryKey, rows: Vec<Value>) -> Snapshot {
        let mut entries = self.entries();
        entries.generation += 1;

        let snapshot = Snapshot {
            rows: Arc::new(rows),
            generation: entries.generation,
        };
        entries.map.insert(key.clone(), snapshot.clone());
        snapshot
    }

    /// All companies, newest first.
    pub async fn list_companies(&self) -> Result<Vec<Company>, FetchError> {
        let key = QueryKey::Companies;
        let snapshot = self.fetch(&key).await?;
        decode_rows(key.table(), &snapshot.rows)
    }

    /// One company; `Ok(None)` when the id does not resolve to a row.
    pub async fn get_company(&self, id: &str) -> Result<Option<Company>, FetchError> {
        let key = QueryKey::Company(id.to_string());
        let snapshot = self.fetch(&key).await?;
        Ok(decode_rows(key.table(), &snapshot.rows)?.into_iter().next())
    }

    /// One satellite record; `Ok(None)` when the company has no row of this variant.
    pub async fn get_satellite(
        &self,
        kind: SatelliteKind,
        company_id: &str,
    ) -> Result<Option<SatelliteRecord>, FetchError> {
        let key = QueryKey::Satellite(kind, company_id.to_string());
        let snapshot = self.fetch(&key).await?;

        match snapshot.rows.first() {
            None => Ok(None),
            Some(row) => SatelliteRecord::decode(kind, row.clone())
                .map(Some)
                .map_err(|e| FetchError::Decode {
                    table: kind.table().to_string(),
                    message: e.to_string(),
                }),
        }
    }

    /// Every row of a satellite table, for cross-company aggregation.
    pub async fn list_all<T: DeserializeOwned>(
        &self,
        kind: SatelliteKind,
    ) -> Result<Vec<T>, FetchError> {
        let key = QueryKey::Collection(kind);
        let snapshot = self.fetch(&key).await?;
        decode_rows(key.table(), &snapshot.rows)
    }
}

fn decode_rows<T: DeserializeOwned>(table: &str, rows: &[Value]) -> Result<Vec<T>, FetchError> {
    rows.iter()
        .map(|row| {
            serde_json::from_value(row.clone()).map_err(|e| FetchError::Decode {
                table: table.to_string(),
                message: e.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::client::ClientConfig;
    use crate::models::TechnologiesRecord;
    use mockito::{Matcher, Server, ServerGuard};

    const COMPANY_ROW: &str = r#"{
        "id": "c1",
        "name": "Acme Corp",
        "company_type": "Startup",
        "created_at": "2024-01-15T10:30:00+00:00",
        "updated_at": "2024-01-15T10:30:00+00:00"
    }"#;

    fn cache_for(server: &ServerGuard) -> QueryCache {
        let client = RestClient::new(ClientConfig {
            base_url: server.url(),
            api_key: "anon-key".to_string(),
            timeout_seconds: 5,
            retries: 0,
        })
        .unwrap();
        QueryCache::new(client)
    }

    #[tokio::test]
    async fn test_fetch_is_memoized() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/v1/companies")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!("[{}]", COMPANY_ROW))
            .expect(1)
            .create_async()
            .await;

        let cache = cache_for(&server);
        let first = cache.list_companies().await.unwrap();
        let second = cache.list_companies().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_refetch_bumps_generation() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/v1/companies")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .expect(2)
            .create_async()
            .await;

        let cache = cache_for(&server);
        let first = cache.fetch(&QueryKey::Companies).await.unwrap();
        let second = cache.refetch(&QueryKey::Companies).await.unwrap();

        assert!(second.generation > first.generation);
        assert!(!Arc::ptr_eq(&first.rows, &second.rows));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/rest/v1/companies")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let cache = cache_for(&server);

        assert!(cache.fetch(&QueryKey::Companies).await.is_err());
        assert!(cache.peek(&QueryKey::Companies).is_none());
        assert!(!cache.invalidate(&QueryKey::Companies));
    }

    #[tokio::test]
    async fn test_get_company_not_found() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/rest/v1/companies")
            .match_query(Matcher::UrlEncoded("id".into(), "eq.missing".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let cache = cache_for(&server);

        assert_eq!(cache.get_company("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_get_company_found() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/rest/v1/companies")
            .match_query(Matcher::UrlEncoded("id".into(), "eq.c1".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!("[{}]", COMPANY_ROW))
            .create_async()
            .await;

        let cache = cache_for(&server);
        let company = cache.get_company("c1").await.unwrap().unwrap();

        assert_eq!(company.name, "Acme Corp");
    }

    #[tokio::test]
    async fn test_absent_satellite_is_not_an_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/rest/v1/company_culture")
            .match_query(Matcher::UrlEncoded("company_id".into(), "eq.c1".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let cache = cache_for(&server);
        let record = cache.get_satellite(SatelliteKind::Culture, "c1").await;

        assert!(matches!(record, Ok(None)));
    }

    #[tokio::test]
    async fn test_list_all_decodes_collection() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/rest/v1/company_technologies")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"id": "t1", "company_id": "c1", "created_at": "2024-01-15T10:30:00Z", "tech_stack": ["Rust"]},
                    {"id": "t2", "company_id": "c2", "created_at": "2024-01-15T10:30:00Z", "tech_stack": null}
                ]"#,
            )
            .create_async()
            .await;

        let cache = cache_for(&server);
        let rows: Vec<TechnologiesRecord> =
            cache.list_all(SatelliteKind::Technologies).await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].tech_stack.as_deref(), Some(&["Rust".to_string()][..]));
        assert!(rows[1].tech_stack.is_none());
    }

    #[tokio::test]
    async fn test_malformed_row_is_decode_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/rest/v1/companies")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id": "c1"}]"#)
            .create_async()
            .await;

        let cache = cache_for(&server);
        let err = cache.list_companies().await.unwrap_err();

        assert!(matches!(err, FetchError::Decode { .. }));
    }
}
