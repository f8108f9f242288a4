//! ArangoDB HTTP backend.
//!
//! Talks to the collection, document, and cursor endpoints of the ArangoDB
//! REST API with basic auth. Transport failures map to
//! `StoreError::Unavailable`; HTTP 409 on a document insert maps to
//! `StoreError::Conflict` so the loader can treat it as row-scoped.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::store::{CollectionInfo, CollectionKind, GraphStore, JsonMap, StoreError};

/// Connection settings for the target store.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub endpoint: String,
    pub username: String,
    pub password: String,
    pub database: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8529".to_string(),
            username: "root".to_string(),
            password: String::new(),
            database: "Gdelt_DB".to_string(),
        }
    }
}

/// Client for one ArangoDB database.
#[derive(Clone)]
pub struct ArangoStore {
    http: reqwest::Client,
    config: StoreConfig,
}

#[derive(Deserialize)]
struct ArangoError {
    #[serde(rename = "errorMessage", default)]
    error_message: Option<String>,
}

#[derive(Deserialize)]
struct ListResponse<T> {
    result: Vec<T>,
}

#[derive(Deserialize)]
struct CollectionEntry {
    name: String,
    #[serde(rename = "isSystem", default)]
    is_system: bool,
}

#[derive(Deserialize)]
struct CountResponse {
    count: u64,
}

#[derive(Deserialize)]
struct CursorResponse {
    #[serde(default)]
    result: Vec<Value>,
    #[serde(rename = "hasMore", default)]
    has_more: bool,
    #[serde(default)]
    id: Option<String>,
}

impl ArangoStore {
    /// Connect to the store and make sure the target database exists.
    ///
    /// Creating the database goes through `_system`; afterwards a version
    /// ping against the target database verifies reachability and
    /// credentials so callers fail fast instead of on the first insert.
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let http = reqwest::Client::new();
        let store = Self {
            http,
            config: config.clone(),
        };

        store.ensure_database().await?;

        store
            .request(reqwest::Method::GET, "/_api/version")
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?
            .error_for_status()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        info!(endpoint = %config.endpoint, database = %config.database, "Connected to ArangoDB");
        Ok(store)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!(
            "{}/_db/{}{}",
            self.config.endpoint, self.config.database, path
        );
        self.http
            .request(method, url)
            .basic_auth(&self.config.username, Some(&self.config.password))
    }

    async fn ensure_database(&self) -> Result<(), StoreError> {
        let url = format!("{}/_db/_system/_api/database", self.config.endpoint);
        let response = self
            .http
            .get(&url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let names: ListResponse<String> = response
            .error_for_status()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))?;

        if names.result.iter().any(|n| n == &self.config.database) {
            return Ok(());
        }

        debug!(database = %self.config.database, "Creating database");
        self.http
            .post(&url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .json(&json!({ "name": self.config.database }))
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?
            .error_for_status()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(())
    }

    async fn error_reason(response: reqwest::Response) -> String {
        match response.json::<ArangoError>().await {
            Ok(body) => body
                .error_message
                .unwrap_or_else(|| "unknown store error".to_string()),
            Err(e) => e.to_string(),
        }
    }
}

#[async_trait]
impl GraphStore for ArangoStore {
    async fn list_collections(&self) -> Result<Vec<CollectionInfo>, StoreError> {
        let response = self
            .request(reqwest::Method::GET, "/_api/collection")
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?
            .error_for_status()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let body: ListResponse<CollectionEntry> = response
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))?;

        Ok(body
            .result
            .into_iter()
            .map(|c| CollectionInfo {
                is_system: c.is_system || c.name.starts_with('_'),
                name: c.name,
            })
            .collect())
    }

    async fn has_collection(&self, name: &str) -> Result<bool, StoreError> {
        let response = self
            .request(reqwest::Method::GET, &format!("/_api/collection/{name}"))
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        match response.status() {
            reqwest::StatusCode::NOT_FOUND => Ok(false),
            s if s.is_success() => Ok(true),
            _ => Err(StoreError::Unavailable(Self::error_reason(response).await)),
        }
    }

    async fn create_collection(
        &self,
        name: &str,
        kind: CollectionKind,
    ) -> Result<(), StoreError> {
        // ArangoDB collection type: 2 = document, 3 = edge
        let collection_type = match kind {
            CollectionKind::Vertex => 2,
            CollectionKind::Edge => 3,
        };
        let response = self
            .request(reqwest::Method::POST, "/_api/collection")
            .json(&json!({ "name": name, "type": collection_type }))
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        if response.status().is_success() {
            debug!(collection = name, ?kind, "Created collection");
            Ok(())
        } else {
            Err(StoreError::Rejected {
                collection: name.to_string(),
                reason: Self::error_reason(response).await,
            })
        }
    }

    async fn truncate_collection(&self, name: &str) -> Result<(), StoreError> {
        let response = self
            .request(
                reqwest::Method::PUT,
                &format!("/_api/collection/{name}/truncate"),
            )
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        match response.status() {
            reqwest::StatusCode::NOT_FOUND => {
                Err(StoreError::CollectionNotFound(name.to_string()))
            }
            s if s.is_success() => Ok(()),
            _ => Err(StoreError::Unavailable(Self::error_reason(response).await)),
        }
    }

    async fn delete_collection(&self, name: &str) -> Result<(), StoreError> {
        let response = self
            .request(reqwest::Method::DELETE, &format!("/_api/collection/{name}"))
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        match response.status() {
            reqwest::StatusCode::NOT_FOUND => {
                Err(StoreError::CollectionNotFound(name.to_string()))
            }
            s if s.is_success() => Ok(()),
            _ => Err(StoreError::Unavailable(Self::error_reason(response).await)),
        }
    }

    async fn document_count(&self, name: &str) -> Result<u64, StoreError> {
        let response = self
            .request(
                reqwest::Method::GET,
                &format!("/_api/collection/{name}/count"),
            )
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        match response.status() {
            reqwest::StatusCode::NOT_FOUND => {
                Err(StoreError::CollectionNotFound(name.to_string()))
            }
            s if s.is_success() => {
                let body: CountResponse = response
                    .json()
                    .await
                    .map_err(|e| StoreError::InvalidResponse(e.to_string()))?;
                Ok(body.count)
            }
            _ => Err(StoreError::Unavailable(Self::error_reason(response).await)),
        }
    }

    async fn insert_document(
        &self,
        collection: &str,
        document: &JsonMap,
    ) -> Result<(), StoreError> {
        let response = self
            .request(
                reqwest::Method::POST,
                &format!("/_api/document/{collection}"),
            )
            .json(document)
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        match response.status() {
            s if s.is_success() => Ok(()),
            reqwest::StatusCode::CONFLICT => Err(StoreError::Conflict {
                collection: collection.to_string(),
                key: document
                    .get("_key")
                    .and_then(Value::as_str)
                    .unwrap_or("<unknown>")
                    .to_string(),
            }),
            s if s.is_client_error() => Err(StoreError::Rejected {
                collection: collection.to_string(),
                reason: Self::error_reason(response).await,
            }),
            _ => Err(StoreError::Unavailable(Self::error_reason(response).await)),
        }
    }

    async fn query(&self, aql: &str, bind_vars: JsonMap) -> Result<Vec<Value>, StoreError> {
        let response = self
            .request(reqwest::Method::POST, "/_api/cursor")
            .json(&json!({
                "query": aql,
                "bindVars": bind_vars,
                "batchSize": 1000,
            }))
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StoreError::Rejected {
                collection: "<cursor>".to_string(),
                reason: Self::error_reason(response).await,
            });
        }

        let mut cursor: CursorResponse = response
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))?;
        let mut rows = std::mem::take(&mut cursor.result);

        while cursor.has_more {
            let id = cursor
                .id
                .clone()
                .ok_or_else(|| StoreError::InvalidResponse("cursor without id".to_string()))?;
            cursor = self
                .request(reqwest::Method::PUT, &format!("/_api/cursor/{id}"))
                .send()
                .await
                .map_err(|e| StoreError::Unavailable(e.to_string()))?
                .error_for_status()
                .map_err(|e| StoreError::Unavailable(e.to_string()))?
                .json()
                .await
                .map_err(|e| StoreError::InvalidResponse(e.to_string()))?;
            rows.append(&mut cursor.result);
        }

        Ok(rows)
    }
}
