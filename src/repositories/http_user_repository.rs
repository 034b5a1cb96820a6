//! REST-backed [`UserRepository`].

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{Instrument, debug, info_span, warn};
use url::Url;
use uuid::Uuid;

use crate::config::ApiConfig;
use crate::constants::USERS_PATH;
use crate::domain::{Pagination, UserId};
use crate::models::user::{CreateUserInput, UpdateUserInput, User};
use crate::repositories::user_repository::{RepositoryError, UserRepository};

/// Maps each repository call onto one request against `{base_url}/users`.
#[derive(Debug, Clone)]
pub struct HttpUserRepository {
    client: Client,
    base_url: Url,
}

impl HttpUserRepository {
    pub fn new(config: &ApiConfig) -> Result<Self, RepositoryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.as_str())
            .build()?;
        let base_url = Url::parse(&config.base_url)?;
        Ok(Self::with_client(client, base_url))
    }

    /// Uses an existing client. The base URL is treated as a directory, so
    /// `http://host/api/v1` and `http://host/api/v1/` are equivalent.
    #[must_use]
    pub fn with_client(client: Client, mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self { client, base_url }
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn collection_url(&self) -> Result<Url, RepositoryError> {
        Ok(self.base_url.join(USERS_PATH)?)
    }

    fn user_url(&self, id: UserId) -> Result<Url, RepositoryError> {
        Ok(self.base_url.join(&format!("{USERS_PATH}/{id}"))?)
    }

    async fn execute(
        &self,
        request: RequestBuilder,
        method: &'static str,
        path: &str,
    ) -> Result<Response, RepositoryError> {
        let start = Instant::now();
        let request_id = Uuid::new_v4().to_string();

        let span = info_span!(
            "users_api",
            request_id = %request_id,
            method = method,
            path = %path,
        );

        async move {
            let result = request.header("x-request-id", &request_id).send().await;

            let outcome = match &result {
                Ok(response) if response.status().is_success() => "success",
                Ok(response) if response.status().is_client_error() => "client_error",
                Ok(_) => "error",
                Err(_) => "transport_error",
            };

            let labels = [
                ("method", method.to_string()),
                ("outcome", outcome.to_string()),
            ];
            metrics::counter!("users_api_requests_total", &labels).increment(1);
            metrics::histogram!("users_api_request_duration_seconds", &labels)
                .record(start.elapsed().as_secs_f64());

            match &result {
                Ok(response) => debug!(
                    status = response.status().as_u16(),
                    duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
                    outcome,
                    "Request finished"
                ),
                Err(e) => warn!(error = %e, "Request failed"),
            }

            Ok(result?)
        }
        .instrument(span)
        .await
    }

    async fn ensure_success(response: Response) -> Result<Response, RepositoryError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(RepositoryError::Status { status, body })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, RepositoryError> {
        let bytes = Self::ensure_success(response).await?.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl UserRepository for HttpUserRepository {
    async fn get_all(&self, pagination: Pagination) -> Result<Vec<User>, RepositoryError> {
        let mut url = self.collection_url()?;
        url.query_pairs_mut()
            .append_pair("skip", &pagination.skip.to_string())
            .append_pair("limit", &pagination.limit.to_string());

        let response = self
            .execute(self.client.get(url.clone()), "GET", url.path())
            .await?;
        Self::decode(response).await
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let url = self.user_url(id)?;
        let response = self
            .execute(self.client.get(url.clone()), "GET", url.path())
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(user_id = %id, "User not found");
            return Ok(None);
        }

        Self::decode(response).await.map(Some)
    }

    async fn create(&self, input: &CreateUserInput) -> Result<User, RepositoryError> {
        let url = self.collection_url()?;
        let response = self
            .execute(self.client.post(url.clone()).json(input), "POST", url.path())
            .await?;
        Self::decode(response).await
    }

    async fn update(&self, id: UserId, input: &UpdateUserInput) -> Result<User, RepositoryError> {
        let url = self.user_url(id)?;
        let response = self
            .execute(self.client.put(url.clone()).json(input), "PUT", url.path())
            .await?;
        Self::decode(response).await
    }

    async fn delete(&self, id: UserId) -> Result<(), RepositoryError> {
        let url = self.user_url(id)?;
        let response = self
            .execute(self.client.delete(url.clone()), "DELETE", url.path())
            .await?;
        Self::ensure_success(response).await?;
        Ok(())
    }
}
