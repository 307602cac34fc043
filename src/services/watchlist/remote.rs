use serde::Serialize;
use uuid::Uuid;

use super::{RemoteWatchlist, MAX_ENTRIES};
use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{DocumentList, DocumentRef, WatchlistDocument, WatchlistEntry},
    services::{
        appwrite::{owner_permissions, AppwriteClient, Query},
        retry::execute_with_retry,
    },
};

/// Body of `POST .../documents`
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateDocumentRequest<'a> {
    document_id: String,
    data: &'a WatchlistDocument,
    permissions: Vec<String>,
}

/// Watchlist stored in an Appwrite collection, one document per entry
///
/// The collection carries a unique index on `(userId, mediaId)`, which is what
/// makes concurrent and repeated `add` calls idempotent.
#[derive(Clone)]
pub struct AppwriteWatchlist {
    client: AppwriteClient,
    database_id: String,
    collection_id: String,
}

impl AppwriteWatchlist {
    pub fn new(
        client: AppwriteClient,
        database_id: impl Into<String>,
        collection_id: impl Into<String>,
    ) -> Self {
        Self {
            client,
            database_id: database_id.into(),
            collection_id: collection_id.into(),
        }
    }

    pub fn from_config(client: AppwriteClient, config: &Config) -> Self {
        Self::new(
            client,
            &config.appwrite_database_id,
            &config.appwrite_collection_id,
        )
    }

    fn documents_path(&self) -> String {
        format!(
            "/databases/{}/collections/{}/documents",
            self.database_id, self.collection_id
        )
    }

    fn document_path(&self, document_id: &str) -> String {
        format!("{}/{}", self.documents_path(), document_id)
    }

    fn validate(owner_id: &str, entry: &WatchlistEntry) -> AppResult<()> {
        if owner_id.trim().is_empty() {
            return Err(AppError::Validation("Missing owner id".to_string()));
        }
        if entry.media_id == 0 {
            return Err(AppError::Validation(
                "Invalid media object: missing id".to_string(),
            ));
        }
        Ok(())
    }

    async fn list_refs(&self, queries: &[Query]) -> AppResult<Vec<DocumentRef>> {
        let path = self.documents_path();
        let list: DocumentList<DocumentRef> =
            execute_with_retry(self.client.retry_policy(), || self.client.get(&path, queries))
                .await?;
        Ok(list.documents)
    }

    async fn delete_document(&self, document_id: &str) -> AppResult<()> {
        let path = self.document_path(document_id);
        execute_with_retry(self.client.retry_policy(), || self.client.delete(&path)).await
    }
}

#[async_trait::async_trait]
impl RemoteWatchlist for AppwriteWatchlist {
    async fn try_load(&self, owner_id: &str) -> AppResult<Vec<WatchlistEntry>> {
        let path = self.documents_path();
        let queries = [
            Query::equal("userId", owner_id),
            Query::order_desc("addedAt"),
            Query::limit(MAX_ENTRIES),
        ];

        let list: DocumentList<WatchlistDocument> =
            execute_with_retry(self.client.retry_policy(), || {
                self.client.get(&path, &queries)
            })
            .await?;

        tracing::info!(
            owner_id = %owner_id,
            entries = list.documents.len(),
            total = list.total,
            "Remote watchlist loaded"
        );

        Ok(list.documents.into_iter().map(WatchlistEntry::from).collect())
    }

    async fn add(&self, owner_id: &str, entry: &WatchlistEntry) -> AppResult<WatchlistEntry> {
        Self::validate(owner_id, entry)?;

        let path = self.documents_path();
        let document = WatchlistDocument::from_entry(owner_id, entry);
        // One id for every attempt so a retried create cannot leave two rows
        let request = CreateDocumentRequest {
            document_id: Uuid::new_v4().simple().to_string(),
            data: &document,
            permissions: owner_permissions(owner_id),
        };

        let created: AppResult<WatchlistDocument> =
            execute_with_retry(self.client.retry_policy(), || {
                self.client.post(&path, &request)
            })
            .await;

        match created {
            Ok(doc) => {
                tracing::debug!(
                    owner_id = %owner_id,
                    media = %entry.key(),
                    document_id = %doc.id,
                    "Added to remote watchlist"
                );
                Ok(WatchlistEntry::from(doc))
            }
            Err(e) if e.is_conflict() => {
                tracing::warn!(
                    owner_id = %owner_id,
                    media = %entry.key(),
                    "Item already in watchlist, skipping duplicate"
                );
                Ok(entry.clone())
            }
            Err(e) => Err(e),
        }
    }

    async fn remove(&self, owner_id: &str, media_id: u64) -> AppResult<bool> {
        let existing = self
            .list_refs(&[
                Query::equal("userId", owner_id),
                Query::equal("mediaId", media_id),
                Query::limit(1),
            ])
            .await?;

        let Some(doc) = existing.first() else {
            tracing::warn!(owner_id = %owner_id, media_id, "Item not found in watchlist");
            return Ok(false);
        };

        self.delete_document(&doc.id).await?;
        tracing::debug!(owner_id = %owner_id, media_id, "Removed from remote watchlist");
        Ok(true)
    }

    async fn clear(&self, owner_id: &str) -> AppResult<usize> {
        let docs = self
            .list_refs(&[Query::equal("userId", owner_id), Query::limit(MAX_ENTRIES)])
            .await?;

        let mut deleted = 0;
        for doc in &docs {
            match self.delete_document(&doc.id).await {
                Ok(()) => deleted += 1,
                Err(e) => {
                    tracing::warn!(error = %e, document_id = %doc.id, "Failed to delete document");
                }
            }
        }

        tracing::info!(
            owner_id = %owner_id,
            deleted,
            failed = docs.len() - deleted,
            "Watchlist cleared"
        );

        Ok(deleted)
    }

    fn name(&self) -> &'static str {
        "appwrite"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaType;
    use crate::services::appwrite::query::query_param_matcher;
    use crate::services::retry::RetryPolicy;
    use mockito::{Matcher, Server, ServerGuard};
    use serde_json::json;
    use std::time::Duration;

    const DOCS: &str = "/databases/csmss-prod/collections/watchlist/documents";

    fn create_test_store(server: &ServerGuard) -> AppwriteWatchlist {
        let client = AppwriteClient::new(server.url(), "csmss")
            .with_session("secret")
            .with_retry(RetryPolicy::new(3, Duration::from_millis(1)));
        AppwriteWatchlist::new(client, "csmss-prod", "watchlist")
    }

    fn document_json(id: &str, media_id: u64, media_type: &str, title: &str) -> serde_json::Value {
        json!({
            "$id": id,
            "userId": "user_123",
            "mediaId": media_id,
            "mediaType": media_type,
            "title": title,
            "posterPath": "/poster.jpg",
            "addedAt": "2024-05-01T10:00:00.000+00:00"
        })
    }

    #[tokio::test]
    async fn test_load_parses_documents() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", DOCS)
            .match_query(Matcher::AllOf(vec![
                query_param_matcher(&Query::equal("userId", "user_123")),
                query_param_matcher(&Query::order_desc("addedAt")),
                query_param_matcher(&Query::limit(1000)),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "total": 2,
                    "documents": [
                        document_json("d2", 1396, "tv", "Breaking Bad"),
                        document_json("d1", 27205, "movie", "Inception"),
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let store = create_test_store(&server);
        let entries = store.load("user_123").await;

        mock.assert_async().await;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].media_type, MediaType::Series);
        assert_eq!(entries[1].title, "Inception");
        assert_eq!(entries[1].owner_id.as_deref(), Some("user_123"));
    }

    #[tokio::test]
    async fn test_load_failure_returns_empty() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", DOCS)
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body(r#"{"message":"no","code":403,"type":"user_unauthorized"}"#)
            .create_async()
            .await;

        let store = create_test_store(&server);
        assert!(store.load("user_123").await.is_empty());
        assert!(store.try_load("user_123").await.is_err());
    }

    #[tokio::test]
    async fn test_add_sends_owner_permissions() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", DOCS)
            .match_body(Matcher::PartialJson(json!({
                "data": {
                    "userId": "user_123",
                    "mediaId": 27205,
                    "mediaType": "movie",
                    "title": "Inception"
                },
                "permissions": [
                    "read(\"user:user_123\")",
                    "update(\"user:user_123\")",
                    "delete(\"user:user_123\")"
                ]
            })))
            .with_status(201)
            .with_body(document_json("d1", 27205, "movie", "Inception").to_string())
            .create_async()
            .await;

        let store = create_test_store(&server);
        let entry = WatchlistEntry::new(27205, MediaType::Movie, "Inception");
        let saved = store.add("user_123", &entry).await.unwrap();

        mock.assert_async().await;
        assert_eq!(saved.media_id, 27205);
        assert_eq!(saved.owner_id.as_deref(), Some("user_123"));
    }

    #[tokio::test]
    async fn test_add_conflict_returns_input() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", DOCS)
            .with_status(409)
            .with_body(
                r#"{"message":"Document already exists","code":409,"type":"document_already_exists"}"#,
            )
            .create_async()
            .await;

        let store = create_test_store(&server);
        let entry = WatchlistEntry::new(27205, MediaType::Movie, "Inception");
        let saved = store.add("user_123", &entry).await.unwrap();

        assert_eq!(saved, entry);
    }

    #[tokio::test]
    async fn test_add_rejects_missing_id_without_request() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", DOCS)
            .expect(0)
            .create_async()
            .await;

        let store = create_test_store(&server);
        let entry = WatchlistEntry::new(0, MediaType::Movie, "Nothing");
        let err = store.add("user_123", &entry).await.unwrap_err();

        mock.assert_async().await;
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_remove_missing_returns_false() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", DOCS)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"total":0,"documents":[]}"#)
            .create_async()
            .await;
        let delete = server
            .mock("DELETE", Matcher::Regex(format!("^{}/", DOCS)))
            .expect(0)
            .create_async()
            .await;

        let store = create_test_store(&server);
        assert!(!store.remove("user_123", 27205).await.unwrap());
        delete.assert_async().await;
    }

    #[tokio::test]
    async fn test_remove_deletes_matching_document() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", DOCS)
            .match_query(Matcher::AllOf(vec![
                query_param_matcher(&Query::equal("userId", "user_123")),
                query_param_matcher(&Query::equal("mediaId", 27205u64)),
                query_param_matcher(&Query::limit(1)),
            ]))
            .with_status(200)
            .with_body(r#"{"total":1,"documents":[{"$id":"d1"}]}"#)
            .create_async()
            .await;
        let delete = server
            .mock("DELETE", format!("{}/d1", DOCS).as_str())
            .with_status(204)
            .create_async()
            .await;

        let store = create_test_store(&server);
        assert!(store.remove("user_123", 27205).await.unwrap());
        delete.assert_async().await;
    }

    #[tokio::test]
    async fn test_clear_skips_failed_deletes() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", DOCS)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"total":3,"documents":[{"$id":"d1"},{"$id":"d2"},{"$id":"d3"}]}"#,
            )
            .create_async()
            .await;
        for id in ["d1", "d3"] {
            server
                .mock("DELETE", format!("{}/{}", DOCS, id).as_str())
                .with_status(204)
                .create_async()
                .await;
        }
        server
            .mock("DELETE", format!("{}/d2", DOCS).as_str())
            .with_status(404)
            .with_body(r#"{"message":"gone","code":404,"type":"document_not_found"}"#)
            .create_async()
            .await;

        let store = create_test_store(&server);
        assert_eq!(store.clear("user_123").await.unwrap(), 2);
    }
}
