//! Port contracts for patient task tracking.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod repository;
pub mod visits;

pub use repository::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};
pub use visits::{VisitDirectory, VisitLookupError, VisitLookupResult};
