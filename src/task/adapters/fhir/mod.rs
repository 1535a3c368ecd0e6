//! FHIR adapters: CarePlan wire models, the Task ⇄ CarePlan codec, and
//! the REST repository client.

pub mod codec;
mod models;
mod rest;

pub use models::{
    ActivityDetail, Bundle, BundleEntry, CarePlan, CarePlanActivity, Extension, Period, Reference,
    ASSOCIATED_ENCOUNTER_EXTENSION_URL, DUE_KIND_EXTENSION_URL, PRIORITY_EXTENSION_URL,
};
pub use rest::{FhirClientError, FhirTaskRepository};
