//! Appwrite REST client
//!
//! Thin wrapper over the Appwrite HTTP API shared by the account (identity and
//! preferences) and databases (watchlist documents) integrations. Every call is
//! a single round trip; callers wrap them in the retry executor.
//!
//! Non-2xx responses are decoded from Appwrite's `{ message, code, type }`
//! error body into `AppError::Backend` so the classifier can translate them.
use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::ApiErrorBody,
    services::retry::RetryPolicy,
};
use reqwest::{Client as HttpClient, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;

pub mod account;
pub mod permissions;
pub mod query;

pub use permissions::owner_permissions;
pub use query::Query;

const PROJECT_HEADER: &str = "X-Appwrite-Project";
const SESSION_HEADER: &str = "X-Appwrite-Session";
const RESPONSE_FORMAT_HEADER: &str = "X-Appwrite-Response-Format";
const RESPONSE_FORMAT: &str = "1.5.0";

#[derive(Clone)]
pub struct AppwriteClient {
    http_client: HttpClient,
    endpoint: String,
    project_id: String,
    session: Option<String>,
    retry: RetryPolicy,
}

impl AppwriteClient {
    pub fn new(endpoint: impl Into<String>, project_id: impl Into<String>) -> Self {
        let http_client = HttpClient::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .user_agent(format!("watchlist-sync/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();

        Self {
            http_client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            project_id: project_id.into(),
            session: None,
            retry: RetryPolicy::default(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let client = Self::new(&config.appwrite_endpoint, &config.appwrite_project_id)
            .with_retry(config.retry_policy());

        match &config.appwrite_session {
            Some(secret) if !secret.is_empty() => client.with_session(secret.clone()),
            _ => client,
        }
    }

    /// Authenticates requests as the user owning this session secret
    pub fn with_session(mut self, secret: impl Into<String>) -> Self {
        self.session = Some(secret.into());
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.endpoint, path);
        let builder = self
            .http_client
            .request(method, url)
            .header(PROJECT_HEADER, &self.project_id)
            .header(RESPONSE_FORMAT_HEADER, RESPONSE_FORMAT);

        match &self.session {
            Some(secret) => builder.header(SESSION_HEADER, secret),
            None => builder,
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, queries: &[Query]) -> AppResult<T> {
        let params: Vec<(&str, &str)> = queries.iter().map(|q| ("queries[]", q.as_str())).collect();
        let response = self.request(Method::GET, path).query(&params).send().await?;
        Self::decode(response).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.request(Method::POST, path).json(body).send().await?;
        Self::decode(response).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.request(Method::PATCH, path).json(body).send().await?;
        Self::decode(response).await
    }

    pub async fn delete(&self, path: &str) -> AppResult<()> {
        let response = self.request(Method::DELETE, path).send().await?;
        if response.status().is_success() {
            return Ok(());
        }
        Err(Self::error_from(response).await)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> AppResult<T> {
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, "Failed to deserialize Appwrite response");
            AppError::Internal(format!("Failed to parse Appwrite response: {}", e))
        })
    }

    async fn error_from(response: Response) -> AppError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        match serde_json::from_str::<ApiErrorBody>(&body) {
            Ok(err) => {
                let code = if err.code == 0 { status } else { err.code };
                let kind = if err.kind.is_empty() {
                    "unknown".to_string()
                } else {
                    err.kind
                };
                AppError::Backend {
                    code,
                    kind,
                    message: err.message,
                }
            }
            Err(_) => AppError::Backend {
                code: status,
                kind: "unknown".to_string(),
                message: body,
            },
        }
    }
}
