//! Patient-tasks: a client library for clinician follow-up tasks.
//!
//! This crate implements the task-tracking feature of a hospital
//! information system as a headless library: a typed domain model for
//! patient follow-up tasks, a lossless bidirectional mapping to the FHIR
//! CarePlan wire representation, and a repository client for the REST
//! endpoint that persists those resources.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (FHIR REST, in-memory)
//!
//! # Modules
//!
//! - [`task`]: the patient follow-up task model, codec, and client

pub mod task;
