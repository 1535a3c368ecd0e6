//! Visit lookup port for resolving visit-relative due dates.

use crate::task::domain::{PatientId, VisitId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for visit lookup operations.
pub type VisitLookupResult<T> = Result<T, VisitLookupError>;

/// Read-only access to a patient's visit history.
///
/// Used at task-creation time to stamp a "this visit" due date with the
/// visit it refers to. The backend resolves the concrete due date when
/// that visit ends; this port never computes dates.
#[async_trait]
pub trait VisitDirectory: Send + Sync {
    /// Returns the patient's currently open visit, if there is one.
    ///
    /// # Errors
    ///
    /// Returns [`VisitLookupError`] when the lookup backend fails.
    async fn active_visit(&self, patient: &PatientId) -> VisitLookupResult<Option<VisitId>>;
}

/// Errors returned by visit directory implementations.
#[derive(Debug, Clone, Error)]
#[error("visit lookup failed: {0}")]
pub struct VisitLookupError(Arc<dyn std::error::Error + Send + Sync>);

impl VisitLookupError {
    /// Wraps a lookup backend error.
    pub fn new(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self(Arc::new(err))
    }
}
