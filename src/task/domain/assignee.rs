//! Assignee sub-model: the person or role responsible for a task.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Whether a task is assigned to an individual provider or to a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssigneeKind {
    /// An individual provider (FHIR Practitioner).
    Person,
    /// A provider role (FHIR PractitionerRole).
    Role,
}

/// Who is responsible for carrying out a task.
///
/// A task carries at most one assignee; whether a free-form input naming
/// both a person and a role is rejected is a validation-boundary
/// concern, not a property of this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
    id: Uuid,
    display: Option<String>,
    kind: AssigneeKind,
}

impl Assignee {
    /// Creates a person assignee.
    #[must_use]
    pub const fn person(id: Uuid) -> Self {
        Self {
            id,
            display: None,
            kind: AssigneeKind::Person,
        }
    }

    /// Creates a role assignee.
    #[must_use]
    pub const fn role(id: Uuid) -> Self {
        Self {
            id,
            display: None,
            kind: AssigneeKind::Role,
        }
    }

    /// Sets the human-readable display name.
    #[must_use]
    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    /// Returns the assignee identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the display name, if known.
    #[must_use]
    pub fn display(&self) -> Option<&str> {
        self.display.as_deref()
    }

    /// Returns whether the assignee is a person or a role.
    #[must_use]
    pub const fn kind(&self) -> AssigneeKind {
        self.kind
    }
}

impl fmt::Display for Assignee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.display.as_deref() {
            Some(display) => write!(f, "{display}"),
            None => write!(f, "{}", self.id),
        }
    }
}
