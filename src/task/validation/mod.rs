//! Boundary validation for task form input.
//!
//! The UI submits a loose [`TaskDraft`]; [`validate`] either upgrades it
//! to a well-typed [`TaskInput`] or reports every violated constraint at
//! once, labelled per field, so a form can surface each problem next to
//! the offending control. Validation runs before any wire request is
//! built.

use crate::task::domain::{
    Assignee, DueKind, TaskDueDate, TaskPriority, VisitId, VisitRelativeDueDate,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Loose due-date input as a form submits it.
///
/// The kind and the concrete date travel separately; whether the
/// combination is coherent is decided by [`validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueDateDraft {
    /// Chosen due-date kind.
    pub kind: DueKind,
    /// Concrete date, required when `kind` is [`DueKind::Date`].
    pub date: Option<DateTime<Utc>>,
    /// Referenced visit for visit-relative kinds, when already known.
    pub visit: Option<VisitId>,
}

impl DueDateDraft {
    /// Creates a draft for a concrete calendar date.
    #[must_use]
    pub const fn on_date(date: DateTime<Utc>) -> Self {
        Self {
            kind: DueKind::Date,
            date: Some(date),
            visit: None,
        }
    }

    /// Creates a draft due at the end of the current visit.
    #[must_use]
    pub const fn this_visit() -> Self {
        Self {
            kind: DueKind::ThisVisit,
            date: None,
            visit: None,
        }
    }

    /// Creates a draft due at the end of the next visit.
    #[must_use]
    pub const fn next_visit() -> Self {
        Self {
            kind: DueKind::NextVisit,
            date: None,
            visit: None,
        }
    }
}

/// Loose task input as a form submits it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskDraft {
    /// Display name describing the action.
    pub name: String,
    /// Due-date input, if the user picked one.
    pub due: Option<DueDateDraft>,
    /// Free-text justification.
    pub rationale: Option<String>,
    /// Individual provider to assign, mutually exclusive with `role`.
    pub person: Option<Uuid>,
    /// Provider role to assign, mutually exclusive with `person`.
    pub role: Option<Uuid>,
    /// Relative urgency.
    pub priority: Option<TaskPriority>,
}

impl TaskDraft {
    /// Creates a draft with the given name and no optional fields.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Validated task input, ready to be turned into a wire request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskInput {
    /// Trimmed, non-empty display name.
    pub name: String,
    /// Well-formed due date, if one was requested.
    pub due_date: Option<TaskDueDate>,
    /// Free-text justification.
    pub rationale: Option<String>,
    /// At most one assignee.
    pub assignee: Option<Assignee>,
    /// Relative urgency.
    pub priority: Option<TaskPriority>,
}

/// Violations raised while validating a [`TaskDraft`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskValidationError {
    /// The task name is empty after trimming.
    #[error("task name must not be empty")]
    EmptyName,

    /// The due kind is `date` but no concrete date was supplied.
    #[error("a concrete date is required when the due kind is 'date'")]
    MissingDueDate,

    /// Both a person and a role were named as assignee.
    #[error("a task may be assigned to a person or a role, not both")]
    ConflictingAssignees,

    /// Multiple constraints were violated.
    #[error("multiple validation errors: {}", format_errors(.0))]
    Multiple(Vec<Self>),
}

fn format_errors(errors: &[TaskValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl TaskValidationError {
    /// Combines violations into a single error.
    ///
    /// A single violation is returned directly rather than wrapped.
    ///
    /// # Panics
    ///
    /// Panics in debug builds when called with no violations, as that
    /// indicates a logic error in the caller.
    #[must_use]
    pub fn multiple(errors: Vec<Self>) -> Self {
        match errors.len() {
            0 => {
                debug_assert!(false, "multiple() called with empty errors vector");
                Self::EmptyName
            }
            1 => errors.into_iter().next().unwrap_or(Self::EmptyName),
            _ => Self::Multiple(errors),
        }
    }

    /// Returns the form field this violation belongs to.
    ///
    /// [`TaskValidationError::Multiple`] has no single field; callers
    /// iterate [`TaskValidationError::errors`] instead.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyName => "name",
            Self::MissingDueDate => "dueDate",
            Self::ConflictingAssignees => "assignee",
            Self::Multiple(_) => "",
        }
    }

    /// Returns the individual violations if this is a `Multiple`
    /// variant.
    #[must_use]
    pub fn errors(&self) -> Option<&[Self]> {
        match self {
            Self::Multiple(errors) => Some(errors),
            _ => None,
        }
    }
}

/// Validates a draft, collecting every violated constraint.
///
/// # Errors
///
/// Returns a [`TaskValidationError`] carrying each violation: an empty
/// name, a `date` due kind without a date, or both a person and a role
/// named as assignee.
pub fn validate(draft: &TaskDraft) -> Result<TaskInput, TaskValidationError> {
    let mut errors = Vec::new();

    let name = draft.name.trim();
    if name.is_empty() {
        errors.push(TaskValidationError::EmptyName);
    }

    let due_date = match draft.due {
        Some(due) => match build_due_date(due) {
            Ok(built) => Some(built),
            Err(err) => {
                errors.push(err);
                None
            }
        },
        None => None,
    };

    let assignee = match (draft.person, draft.role) {
        (Some(_), Some(_)) => {
            errors.push(TaskValidationError::ConflictingAssignees);
            None
        }
        (Some(person), None) => Some(Assignee::person(person)),
        (None, Some(role)) => Some(Assignee::role(role)),
        (None, None) => None,
    };

    if !errors.is_empty() {
        return Err(TaskValidationError::multiple(errors));
    }

    Ok(TaskInput {
        name: name.to_owned(),
        due_date,
        rationale: draft.rationale.clone(),
        assignee,
        priority: draft.priority,
    })
}

fn build_due_date(draft: DueDateDraft) -> Result<TaskDueDate, TaskValidationError> {
    match draft.kind {
        DueKind::Date => draft
            .date
            .map(TaskDueDate::Date)
            .ok_or(TaskValidationError::MissingDueDate),
        DueKind::ThisVisit => Ok(TaskDueDate::ThisVisit(VisitRelativeDueDate::from_parts(
            draft.visit,
            None,
        ))),
        DueKind::NextVisit => Ok(TaskDueDate::NextVisit(VisitRelativeDueDate::from_parts(
            draft.visit,
            None,
        ))),
    }
}
