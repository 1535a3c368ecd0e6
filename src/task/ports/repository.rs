//! Repository port for task persistence against the CarePlan backend.

use crate::task::domain::{PatientId, Task, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
///
/// Implementations translate between the domain [`Task`] and whatever
/// the backend stores. Lists are returned unordered and unfiltered;
/// display ordering and cancelled-task exclusion are service policy.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Returns every decodable task attached to the given patient.
    ///
    /// Entries that fail to yield a usable identifier are discarded
    /// rather than failing the whole listing.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError`] when the backend cannot be
    /// reached or rejects the request.
    async fn list_for_patient(&self, patient: &PatientId) -> TaskRepositoryResult<Vec<Task>>;

    /// Finds a task by identifier.
    ///
    /// Returns `Ok(None)` when the task does not exist; backend and
    /// transport failures are errors, kept distinct from not-found.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Stores a new task for the given patient and returns it with its
    /// backend-assigned identity.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError`] when the backend rejects the
    /// resource or the response carries no usable identity.
    async fn create(&self, patient: &PatientId, task: &Task) -> TaskRepositoryResult<Task>;

    /// Replaces the stored task with the given full representation,
    /// keyed by the task's identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::MissingTaskId`] when the task has
    /// no identifier yet, or [`TaskRepositoryError::NotFound`] when the
    /// backend has no resource under that identifier.
    async fn replace(&self, patient: &PatientId, task: &Task) -> TaskRepositoryResult<Task>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// The task carries no identifier, so it cannot be addressed.
    #[error("task has no identifier; create it before replacing it")]
    MissingTaskId,

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The backend answered with a non-success status.
    #[error("backend rejected the request with status {status}: {body}")]
    Rejected {
        /// HTTP status code of the response.
        status: u16,
        /// Response body, as far as it could be read.
        body: String,
    },

    /// A success response carried a body that could not be used.
    #[error("malformed resource in response: {0}")]
    MalformedResource(String),

    /// Transport-layer failure.
    #[error("transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }

    /// Creates a malformed-resource error.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResource(message.into())
    }
}

impl From<reqwest::Error> for TaskRepositoryError {
    fn from(err: reqwest::Error) -> Self {
        // Status-coded responses are mapped to Rejected by the adapter
        // before this conversion applies; whatever reaches here is a
        // connection, body, or protocol failure.
        Self::transport(err)
    }
}
