//! Patient follow-up task tracking.
//!
//! Tasks are follow-up actions attached to a patient (for example "draw
//! labs before the next visit"). They are persisted remotely as FHIR
//! CarePlan resources; this module owns the domain model, the CarePlan
//! codec, the REST repository client, and the orchestration service the
//! UI layer consumes. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Form-input validation in [`validation`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
pub mod validation;

#[cfg(test)]
mod tests;
