//! JSON wire models for the CarePlan endpoint.
//!
//! These models are not complete representations of the FHIR R4
//! resources; they carry exactly the fields this feature reads and
//! writes. Every field is optional or defaulted so that partial or
//! loosely-structured payloads still deserialize; leniency decisions
//! live in the codec, not here. Timestamps stay as strings on the wire
//! and are parsed when translated to the domain.

use serde::{Deserialize, Serialize};

/// Extension URL carrying the due-kind code (`date`, `this-visit`,
/// `next-visit`).
pub const DUE_KIND_EXTENSION_URL: &str = "https://fhir.openmrs.org/ext/careplan/activity-dueKind";

/// Standard FHIR extension URL referencing the visit encounter a
/// visit-relative due date is tied to.
pub const ASSOCIATED_ENCOUNTER_EXTENSION_URL: &str =
    "http://hl7.org/fhir/StructureDefinition/encounter-associatedEncounter";

/// Extension URL carrying the priority code (`high`, `medium`, `low`).
pub const PRIORITY_EXTENSION_URL: &str =
    "https://fhir.openmrs.org/ext/careplan/activity-priority";

/// [Reference](<https://hl7.org/fhir/references.html>) to another
/// resource, e.g. `Patient/{uuid}` or `Practitioner/{uuid}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Reference {
    /// Literal reference string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Human-readable label for the referenced resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl Reference {
    /// Creates a reference to the given resource path.
    #[must_use]
    pub fn to(reference: impl Into<String>) -> Self {
        Self {
            reference: Some(reference.into()),
            display: None,
        }
    }
}

/// [Period](<https://hl7.org/fhir/datatypes.html#Period>) with string
/// instants.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Period {
    /// Start instant, RFC 3339.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    /// End instant, RFC 3339.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

/// [Extension](<https://hl7.org/fhir/extensibility.html>) restricted to
/// the value types this feature uses. Unrecognized URLs are ignored by
/// the codec.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Extension {
    /// Identifying URL of the extension.
    #[serde(default)]
    pub url: String,
    /// Code-valued payload.
    #[serde(rename = "valueCode", skip_serializing_if = "Option::is_none")]
    pub value_code: Option<String>,
    /// Reference-valued payload.
    #[serde(rename = "valueReference", skip_serializing_if = "Option::is_none")]
    pub value_reference: Option<Reference>,
}

impl Extension {
    /// Creates a code-valued extension.
    #[must_use]
    pub fn code(url: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            value_code: Some(code.into()),
            value_reference: None,
        }
    }

    /// Creates a reference-valued extension.
    #[must_use]
    pub fn reference(url: impl Into<String>, reference: Reference) -> Self {
        Self {
            url: url.into(),
            value_code: None,
            value_reference: Some(reference),
        }
    }
}

/// The scheduled action inside a CarePlan activity.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDetail {
    /// What the task asks for; maps to the task name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Activity lifecycle status code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Who is responsible; at most one entry is ever written.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub performer: Vec<Reference>,
    /// Scheduling window; `end` carries the resolved due date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_period: Option<Period>,
    /// Due-kind, associated-encounter, and priority markers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
}

/// One planned activity. This feature uses exactly one per CarePlan.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CarePlanActivity {
    /// In-line activity detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<ActivityDetail>,
}

/// [CarePlan](<https://hl7.org/fhir/careplan.html>): the wire and
/// storage representation of a task.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarePlan {
    /// Always `"CarePlan"` on resources this crate writes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    /// Backend-assigned resource id; omitted on create.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Top-level plan status (`active` or `completed` when written).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Always `"plan"` on resources this crate writes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    /// Free-text justification; maps to the task rationale.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The patient the plan belongs to (`Patient/{uuid}`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<Reference>,
    /// Creation instant, backend-assigned, RFC 3339.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    /// Who created the plan; only the display name is used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Reference>,
    /// Planned activities; this feature reads and writes `activity[0]`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub activity: Vec<CarePlanActivity>,
}

/// One entry of a search-result bundle.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BundleEntry {
    /// The carried resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<CarePlan>,
}

/// [Bundle](<https://hl7.org/fhir/bundle.html>) envelope returned by
/// list queries.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Bundle {
    /// Matched resources.
    #[serde(default)]
    pub entry: Vec<BundleEntry>,
}
