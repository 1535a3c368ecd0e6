//! In-memory visit directory for tests and local development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{PatientId, VisitId},
    ports::{VisitDirectory, VisitLookupError, VisitLookupResult},
};

/// Thread-safe in-memory map of each patient's active visit.
#[derive(Debug, Clone, Default)]
pub struct InMemoryVisitDirectory {
    visits: Arc<RwLock<HashMap<PatientId, VisitId>>>,
}

impl InMemoryVisitDirectory {
    /// Creates an empty directory with no active visits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the given visit as the patient's active visit.
    pub fn set_active_visit(&self, patient: PatientId, visit: VisitId) {
        if let Ok(mut visits) = self.visits.write() {
            visits.insert(patient, visit);
        }
    }

    /// Removes the patient's active visit, if any.
    pub fn clear_active_visit(&self, patient: &PatientId) {
        if let Ok(mut visits) = self.visits.write() {
            visits.remove(patient);
        }
    }
}

#[async_trait]
impl VisitDirectory for InMemoryVisitDirectory {
    async fn active_visit(&self, patient: &PatientId) -> VisitLookupResult<Option<VisitId>> {
        let visits = self
            .visits
            .read()
            .map_err(|err| VisitLookupError::new(std::io::Error::other(err.to_string())))?;
        Ok(visits.get(patient).copied())
    }
}
