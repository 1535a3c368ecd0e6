//! Service layer for listing, creating, and mutating patient tasks.

use crate::task::{
    domain::{
        PatientId, Task, TaskData, TaskDomainError, TaskDueDate, TaskId, TaskStatus,
        VisitRelativeDueDate,
    },
    ports::{TaskRepository, TaskRepositoryError, VisitDirectory},
    validation::{validate, TaskDraft, TaskValidationError},
};
use chrono::DateTime;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tracing::warn;

/// Service-level errors for task operations.
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// Input validation failed; inspect the per-field violations.
    #[error(transparent)]
    Validation(#[from] TaskValidationError),
    /// A domain invariant was violated.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

/// Result type for task service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Task orchestration service.
///
/// Wraps a [`TaskRepository`] with the policies the UI relies on:
/// display ordering, cancelled-task exclusion, validation before any
/// wire request, visit stamping on creation, and the status
/// compositions for completion toggling and soft deletion.
///
/// # Consistency
///
/// The service keeps the last fetched list per patient as a snapshot
/// ([`TaskService::cached_list`]) and exposes an explicit
/// [`TaskService::invalidate`] trigger. Mutations never update or
/// invalidate snapshots on their own; callers re-fetch with
/// [`TaskService::list`] after a mutation, and readers may observe
/// stale data until that happens. There is no client-side serialization
/// of concurrent mutations: each is one HTTP request and the last
/// full-replace wins.
#[derive(Clone)]
pub struct TaskService<R, V>
where
    R: TaskRepository,
    V: VisitDirectory,
{
    repository: Arc<R>,
    visits: Arc<V>,
    snapshots: Arc<RwLock<HashMap<PatientId, Vec<Task>>>>,
}

impl<R, V> TaskService<R, V>
where
    R: TaskRepository,
    V: VisitDirectory,
{
    /// Creates a new task service.
    #[must_use]
    pub fn new(repository: Arc<R>, visits: Arc<V>) -> Self {
        Self {
            repository,
            visits,
            snapshots: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Returns the patient's tasks in display order.
    ///
    /// Cancelled tasks are excluded. Incomplete tasks precede completed
    /// ones; within each group tasks are ordered by ascending resolved
    /// due date, with unresolved due dates sorting first. The ordering
    /// is stable for tasks with equal keys. The fetched list replaces
    /// the patient's cached snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Repository`] when the backend cannot
    /// be reached or rejects the request.
    pub async fn list(&self, patient: &PatientId) -> TaskServiceResult<Vec<Task>> {
        let mut tasks = self.repository.list_for_patient(patient).await?;
        tasks.retain(|task| !task.is_cancelled());
        order_for_display(&mut tasks);

        if let Ok(mut snapshots) = self.snapshots.write() {
            snapshots.insert(*patient, tasks.clone());
        }
        Ok(tasks)
    }

    /// Returns the last fetched list for the patient, if any.
    ///
    /// The snapshot reflects the most recent [`TaskService::list`] call
    /// and may be stale with respect to mutations made since.
    #[must_use]
    pub fn cached_list(&self, patient: &PatientId) -> Option<Vec<Task>> {
        self.snapshots
            .read()
            .ok()
            .and_then(|snapshots| snapshots.get(patient).cloned())
    }

    /// Drops the patient's cached snapshot, forcing the next reader to
    /// fetch.
    pub fn invalidate(&self, patient: &PatientId) {
        if let Ok(mut snapshots) = self.snapshots.write() {
            snapshots.remove(patient);
        }
    }

    /// Retrieves a task by identifier.
    ///
    /// Returns `Ok(None)` when no such task exists, distinct from
    /// backend failures.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Repository`] when the backend cannot
    /// be reached or rejects the request.
    pub async fn get(&self, id: TaskId) -> TaskServiceResult<Option<Task>> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Validates a draft and creates the task for the given patient.
    ///
    /// New tasks start as [`TaskStatus::NotStarted`]; identity and
    /// creation provenance are assigned by the backend. A "this visit"
    /// due date with no visit reference is stamped with the patient's
    /// active visit when one is known; a failed visit lookup is logged
    /// and creation proceeds without a reference.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Validation`] before any wire request
    /// when the draft violates input constraints, or
    /// [`TaskServiceError::Repository`] when the backend rejects the
    /// create.
    pub async fn create(&self, patient: &PatientId, draft: &TaskDraft) -> TaskServiceResult<Task> {
        let input = validate(draft)?;

        let due_date = match input.due_date {
            Some(TaskDueDate::ThisVisit(inner)) if inner.visit().is_none() => Some(
                TaskDueDate::ThisVisit(self.stamp_active_visit(patient, inner).await),
            ),
            other => other,
        };

        let task = Task::from_parts(TaskData {
            id: None,
            name: input.name,
            status: Some(TaskStatus::NotStarted),
            due_date,
            rationale: input.rationale,
            assignee: input.assignee,
            priority: input.priority,
            created_date: None,
            created_by: None,
        });
        Ok(self.repository.create(patient, &task).await?)
    }

    /// Replaces the stored task with the given full representation.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Domain`] when the task has no
    /// identifier yet, [`TaskServiceError::Validation`] when the name
    /// is empty, or [`TaskServiceError::Repository`] when the backend
    /// rejects the replace.
    pub async fn update(&self, patient: &PatientId, task: &Task) -> TaskServiceResult<Task> {
        if task.id().is_none() {
            return Err(TaskDomainError::MissingTaskId.into());
        }
        if task.name().trim().is_empty() {
            return Err(TaskValidationError::EmptyName.into());
        }
        Ok(self.repository.replace(patient, task).await?)
    }

    /// Marks the task complete or resumes it.
    ///
    /// Marking complete sets [`TaskStatus::Completed`]; unmarking a
    /// completed task resumes it as [`TaskStatus::InProgress`], and
    /// unmarking a task that was never completed preserves its current
    /// status. Delegates to [`TaskService::update`].
    ///
    /// # Errors
    ///
    /// As for [`TaskService::update`].
    pub async fn set_completion(
        &self,
        patient: &PatientId,
        task: &Task,
        completed: bool,
    ) -> TaskServiceResult<Task> {
        let mut next = task.clone();
        next.set_status(task.status().completion_toggle(completed));
        self.update(patient, &next).await
    }

    /// Retracts the task by transitioning it to
    /// [`TaskStatus::Cancelled`].
    ///
    /// Cancelled tasks remain stored but are excluded from
    /// [`TaskService::list`] output; nothing is ever physically
    /// deleted.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Domain`] when the task has no
    /// identifier yet, or [`TaskServiceError::Repository`] when the
    /// backend rejects the replace.
    pub async fn soft_delete(&self, patient: &PatientId, task: &Task) -> TaskServiceResult<Task> {
        if task.id().is_none() {
            return Err(TaskDomainError::MissingTaskId.into());
        }
        let mut next = task.clone();
        next.set_status(TaskStatus::Cancelled);
        Ok(self.repository.replace(patient, &next).await?)
    }

    async fn stamp_active_visit(
        &self,
        patient: &PatientId,
        inner: VisitRelativeDueDate,
    ) -> VisitRelativeDueDate {
        match self.visits.active_visit(patient).await {
            Ok(Some(visit)) => inner.with_visit(visit),
            Ok(None) => inner,
            Err(err) => {
                warn!(%err, "visit lookup failed; creating task without a visit reference");
                inner
            }
        }
    }
}

/// Sorts tasks for display: incomplete before complete, then ascending
/// resolved due date with unresolved dates treated as the epoch. The
/// underlying sort is stable.
fn order_for_display(tasks: &mut [Task]) {
    tasks.sort_by_key(|task| {
        (
            task.completed(),
            task.due_date()
                .and_then(TaskDueDate::resolved_date)
                .unwrap_or(DateTime::UNIX_EPOCH),
        )
    });
}
