//! Task aggregate root and related lifecycle types.

use super::{
    Assignee, ParseTaskPriorityError, ParseTaskStatusError, TaskDueDate, TaskId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Task lifecycle status.
///
/// The backend owns the lifecycle; the client only ever requests the
/// transitions exposed by the service layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Work on the task has not started.
    NotStarted,
    /// The task is being worked on.
    InProgress,
    /// The task has been carried out.
    Completed,
    /// The task was retracted; cancelled tasks are hidden from lists.
    Cancelled,
}

impl TaskStatus {
    /// Returns the canonical wire code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not-started",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns the status after toggling completion.
    ///
    /// Marking complete always yields [`TaskStatus::Completed`].
    /// Unmarking a completed task resumes it as
    /// [`TaskStatus::InProgress`] rather than resetting it to
    /// [`TaskStatus::NotStarted`]; unmarking a task that was never
    /// completed preserves its current status.
    #[must_use]
    pub const fn completion_toggle(self, completed: bool) -> Self {
        match (self, completed) {
            (_, true) => Self::Completed,
            (Self::Completed, false) => Self::InProgress,
            (current, false) => current,
        }
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "not-started" => Ok(Self::NotStarted),
            "in-progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// Relative urgency of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    /// Needs attention before routine work.
    High,
    /// Routine urgency.
    Medium,
    /// Can wait.
    Low,
}

impl TaskPriority {
    /// Returns the canonical wire code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl TryFrom<&str> for TaskPriority {
    type Error = ParseTaskPriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(ParseTaskPriorityError(value.to_owned())),
        }
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: Option<TaskId>,
    name: String,
    status: TaskStatus,
    due_date: Option<TaskDueDate>,
    rationale: Option<String>,
    assignee: Option<Assignee>,
    priority: Option<TaskPriority>,
    created_date: Option<DateTime<Utc>>,
    created_by: Option<String>,
}

/// Parameter object for assembling a task aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskData {
    /// Backend-assigned identifier, absent for not-yet-created tasks.
    pub id: Option<TaskId>,
    /// Display name describing the action.
    pub name: String,
    /// Lifecycle status.
    pub status: Option<TaskStatus>,
    /// When the task is due, if a due date was set.
    pub due_date: Option<TaskDueDate>,
    /// Free-text justification.
    pub rationale: Option<String>,
    /// Responsible person or role.
    pub assignee: Option<Assignee>,
    /// Relative urgency.
    pub priority: Option<TaskPriority>,
    /// Creation timestamp, backend-assigned.
    pub created_date: Option<DateTime<Utc>>,
    /// Display name of the creator, backend-assigned.
    pub created_by: Option<String>,
}

impl Task {
    /// Assembles a task from its parts.
    ///
    /// A missing status defaults to [`TaskStatus::NotStarted`], the
    /// status every task starts its life in.
    #[must_use]
    pub fn from_parts(data: TaskData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            status: data.status.unwrap_or(TaskStatus::NotStarted),
            due_date: data.due_date,
            rationale: data.rationale,
            assignee: data.assignee,
            priority: data.priority,
            created_date: data.created_date,
            created_by: data.created_by,
        }
    }

    /// Returns the backend-assigned identifier, if the task has been
    /// created.
    #[must_use]
    pub const fn id(&self) -> Option<TaskId> {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the due date, if one was set.
    #[must_use]
    pub const fn due_date(&self) -> Option<&TaskDueDate> {
        self.due_date.as_ref()
    }

    /// Returns the free-text justification, if any.
    #[must_use]
    pub fn rationale(&self) -> Option<&str> {
        self.rationale.as_deref()
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub const fn assignee(&self) -> Option<&Assignee> {
        self.assignee.as_ref()
    }

    /// Returns the priority, if set.
    #[must_use]
    pub const fn priority(&self) -> Option<TaskPriority> {
        self.priority
    }

    /// Returns the creation timestamp, if the backend reported one.
    #[must_use]
    pub const fn created_date(&self) -> Option<DateTime<Utc>> {
        self.created_date
    }

    /// Returns the creator's display name, if the backend reported one.
    #[must_use]
    pub fn created_by(&self) -> Option<&str> {
        self.created_by.as_deref()
    }

    /// Returns `true` when the task has been carried out.
    #[must_use]
    pub fn completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Returns `true` when the task was retracted.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.status == TaskStatus::Cancelled
    }

    /// Returns `true` when the task's resolved due date has passed
    /// without the task being completed.
    ///
    /// Visit-relative due dates that the backend has not resolved yet
    /// are never overdue.
    #[must_use]
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        if self.completed() || self.is_cancelled() {
            return false;
        }
        self.due_date
            .as_ref()
            .and_then(TaskDueDate::resolved_date)
            .is_some_and(|due| due < now)
    }

    /// Returns a copy carrying the given backend-assigned identifier.
    #[must_use]
    pub fn with_id(mut self, id: TaskId) -> Self {
        self.id = Some(id);
        self
    }

    /// Replaces the display name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Replaces the lifecycle status.
    pub fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
    }

    /// Replaces the due date.
    pub fn set_due_date(&mut self, due_date: Option<TaskDueDate>) {
        self.due_date = due_date;
    }

    /// Replaces the free-text justification.
    pub fn set_rationale(&mut self, rationale: Option<String>) {
        self.rationale = rationale;
    }

    /// Replaces the assignee.
    pub fn set_assignee(&mut self, assignee: Option<Assignee>) {
        self.assignee = assignee;
    }

    /// Replaces the priority.
    pub fn set_priority(&mut self, priority: Option<TaskPriority>) {
        self.priority = priority;
    }
}
