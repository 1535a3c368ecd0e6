//! Due-date sub-model: concrete dates and visit-relative deadlines.

use super::{ParseDueKindError, VisitId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tag distinguishing a fixed calendar date from a visit-relative due
/// date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DueKind {
    /// Due on a concrete calendar date.
    Date,
    /// Due when the referenced (current) visit ends.
    ThisVisit,
    /// Due when the patient's next visit ends.
    NextVisit,
}

impl DueKind {
    /// Returns the canonical wire code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::ThisVisit => "this-visit",
            Self::NextVisit => "next-visit",
        }
    }
}

impl TryFrom<&str> for DueKind {
    type Error = ParseDueKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "date" => Ok(Self::Date),
            "this-visit" => Ok(Self::ThisVisit),
            "next-visit" => Ok(Self::NextVisit),
            _ => Err(ParseDueKindError(value.to_owned())),
        }
    }
}

/// A due date tied to a visit rather than a calendar date.
///
/// The concrete date is not known until the referenced visit has ended;
/// the backend resolves it then. The client never computes `resolved`
/// itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitRelativeDueDate {
    visit: Option<VisitId>,
    resolved: Option<DateTime<Utc>>,
}

impl VisitRelativeDueDate {
    /// Creates an unresolved visit-relative due date with no visit
    /// reference yet.
    #[must_use]
    pub const fn unresolved() -> Self {
        Self {
            visit: None,
            resolved: None,
        }
    }

    /// Creates a visit-relative due date from its parts.
    #[must_use]
    pub const fn from_parts(visit: Option<VisitId>, resolved: Option<DateTime<Utc>>) -> Self {
        Self { visit, resolved }
    }

    /// Returns the referenced visit, if known.
    #[must_use]
    pub const fn visit(&self) -> Option<VisitId> {
        self.visit
    }

    /// Returns the backend-resolved concrete date, if the visit has
    /// already ended.
    #[must_use]
    pub const fn resolved(&self) -> Option<DateTime<Utc>> {
        self.resolved
    }

    /// Returns a copy referencing the given visit.
    #[must_use]
    pub const fn with_visit(mut self, visit: VisitId) -> Self {
        self.visit = Some(visit);
        self
    }
}

/// Tagged union describing when a task is due.
///
/// The tag determines which fields are meaningful: a `Date` due date is
/// always resolvable at creation time, while the visit-relative variants
/// carry an optional visit reference and a concrete date only once the
/// backend has resolved one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum TaskDueDate {
    /// Due on the given calendar date.
    Date(DateTime<Utc>),
    /// Due when the current visit ends.
    ThisVisit(VisitRelativeDueDate),
    /// Due when the next visit ends.
    NextVisit(VisitRelativeDueDate),
}

impl TaskDueDate {
    /// Returns the due-kind tag.
    #[must_use]
    pub const fn kind(&self) -> DueKind {
        match self {
            Self::Date(_) => DueKind::Date,
            Self::ThisVisit(_) => DueKind::ThisVisit,
            Self::NextVisit(_) => DueKind::NextVisit,
        }
    }

    /// Returns the concrete due date, when one is known.
    ///
    /// Always present for [`DueKind::Date`]; present for visit-relative
    /// kinds only after the backend has resolved the visit end.
    #[must_use]
    pub const fn resolved_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Date(date) => Some(*date),
            Self::ThisVisit(inner) | Self::NextVisit(inner) => inner.resolved(),
        }
    }

    /// Returns the referenced visit for visit-relative kinds.
    #[must_use]
    pub const fn visit(&self) -> Option<VisitId> {
        match self {
            Self::Date(_) => None,
            Self::ThisVisit(inner) | Self::NextVisit(inner) => inner.visit(),
        }
    }
}
