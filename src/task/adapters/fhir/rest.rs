//! REST repository client for the CarePlan endpoint.

use super::codec;
use super::models::{Bundle, CarePlan};
use crate::task::{
    domain::{PatientId, Task, TaskId},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors raised while constructing a [`FhirTaskRepository`].
#[derive(Debug, Error)]
pub enum FhirClientError {
    /// The base URL is not an absolute http(s) URL.
    #[error("invalid base URL '{0}': must be an absolute http(s) URL")]
    InvalidBaseUrl(String),

    /// The underlying HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[from] reqwest::Error),
}

/// CarePlan-backed task repository over REST.
///
/// Issues one HTTP request per operation with no retries and no
/// client-side timeout; cancellation is the caller's concern (dropping
/// the future abandons the request). Mutations are full-resource
/// replaces with no optimistic concurrency, so the last writer wins.
#[derive(Debug, Clone)]
pub struct FhirTaskRepository {
    http: reqwest::Client,
    base_url: String,
    bearer_token: Option<String>,
}

impl FhirTaskRepository {
    /// Creates a repository client for the given API base URL.
    ///
    /// # Errors
    ///
    /// Returns [`FhirClientError::InvalidBaseUrl`] when the URL is not
    /// absolute http(s), or [`FhirClientError::ClientBuild`] when the
    /// HTTP client cannot be constructed.
    pub fn new(base_url: impl Into<String>) -> Result<Self, FhirClientError> {
        let raw = base_url.into();
        let cleaned = raw.trim_end_matches('/');
        let parsed =
            Url::parse(cleaned).map_err(|_| FhirClientError::InvalidBaseUrl(raw.clone()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FhirClientError::InvalidBaseUrl(raw));
        }

        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: cleaned.to_owned(),
            bearer_token: None,
        })
    }

    /// Attaches a bearer token sent with every request.
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.bearer_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn careplan_url(&self) -> String {
        format!("{}/tasks/careplan", self.base_url)
    }

    fn careplan_item_url(&self, id: TaskId) -> String {
        format!("{}/tasks/careplan/{id}", self.base_url)
    }
}

/// Reads a success body as JSON, mapping a non-success status to
/// [`TaskRepositoryError::Rejected`].
async fn read_body<T: DeserializeOwned>(response: reqwest::Response) -> TaskRepositoryResult<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(TaskRepositoryError::Rejected {
            status: status.as_u16(),
            body,
        });
    }
    response
        .json()
        .await
        .map_err(|err| TaskRepositoryError::malformed(err.to_string()))
}

#[async_trait]
impl TaskRepository for FhirTaskRepository {
    async fn list_for_patient(&self, patient: &PatientId) -> TaskRepositoryResult<Vec<Task>> {
        let response = self
            .request(Method::GET, self.careplan_url())
            .query(&[("subject", format!("Patient/{patient}"))])
            .send()
            .await?;
        let bundle: Bundle = read_body(response).await?;

        // Entries without a usable identifier are dropped here (the
        // codec logs them); list ordering is applied by the service.
        Ok(bundle
            .entry
            .into_iter()
            .filter_map(|entry| entry.resource)
            .filter_map(|resource| codec::decode(&resource))
            .collect())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let response = self
            .request(Method::GET, self.careplan_item_url(id))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let resource: CarePlan = read_body(response).await?;
        Ok(codec::decode(&resource))
    }

    async fn create(&self, patient: &PatientId, task: &Task) -> TaskRepositoryResult<Task> {
        let body = codec::encode(task, patient);
        let response = self
            .request(Method::POST, self.careplan_url())
            .json(&body)
            .send()
            .await?;
        let created: CarePlan = read_body(response).await?;
        codec::decode(&created).ok_or_else(|| {
            TaskRepositoryError::malformed("created resource carried no usable id")
        })
    }

    async fn replace(&self, patient: &PatientId, task: &Task) -> TaskRepositoryResult<Task> {
        let id = task.id().ok_or(TaskRepositoryError::MissingTaskId)?;
        let body = codec::encode(task, patient);
        let response = self
            .request(Method::PUT, self.careplan_item_url(id))
            .json(&body)
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(TaskRepositoryError::NotFound(id));
        }
        let replaced: CarePlan = read_body(response).await?;
        codec::decode(&replaced).ok_or_else(|| {
            TaskRepositoryError::malformed("replaced resource carried no usable id")
        })
    }
}
