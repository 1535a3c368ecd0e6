//! In-memory task repository simulating the CarePlan backend.

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::task::{
    domain::{PatientId, Task, TaskData, TaskId},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
///
/// Mirrors the backend's observable behaviour where the service layer
/// depends on it: identity is assigned here rather than by the caller,
/// creation provenance (`created_date`, `created_by`) is stamped on
/// create and preserved across replaces, and listings come back in
/// creation order so the service's stable sort is deterministic.
#[derive(Clone)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
    clock: Arc<dyn Clock + Send + Sync>,
    author: Option<String>,
}

#[derive(Debug, Clone)]
struct StoredTask {
    patient: PatientId,
    task: Task,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, StoredTask>,
    creation_order: Vec<TaskId>,
}

impl InMemoryTaskRepository {
    /// Creates an empty repository using the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }

    /// Creates an empty repository stamping provenance from the given
    /// clock.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryTaskState::default())),
            clock,
            author: None,
        }
    }

    /// Sets the display name recorded as creator of new tasks.
    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }
}

impl Default for InMemoryTaskRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_error(err: impl std::fmt::Display) -> TaskRepositoryError {
    TaskRepositoryError::transport(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn list_for_patient(&self, patient: &PatientId) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .creation_order
            .iter()
            .filter_map(|id| state.tasks.get(id))
            .filter(|stored| stored.patient == *patient)
            .map(|stored| stored.task.clone())
            .collect())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.tasks.get(&id).map(|stored| stored.task.clone()))
    }

    async fn create(&self, patient: &PatientId, task: &Task) -> TaskRepositoryResult<Task> {
        let mut state = self.state.write().map_err(lock_error)?;
        let id = TaskId::from_uuid(Uuid::new_v4());
        let created = Task::from_parts(TaskData {
            id: Some(id),
            name: task.name().to_owned(),
            status: Some(task.status()),
            due_date: task.due_date().copied(),
            rationale: task.rationale().map(str::to_owned),
            assignee: task.assignee().cloned(),
            priority: task.priority(),
            created_date: Some(self.clock.utc()),
            created_by: self.author.clone(),
        });
        state.creation_order.push(id);
        state.tasks.insert(
            id,
            StoredTask {
                patient: *patient,
                task: created.clone(),
            },
        );
        Ok(created)
    }

    async fn replace(&self, patient: &PatientId, task: &Task) -> TaskRepositoryResult<Task> {
        let id = task.id().ok_or(TaskRepositoryError::MissingTaskId)?;
        let mut state = self.state.write().map_err(lock_error)?;
        let existing = state.tasks.get(&id).ok_or(TaskRepositoryError::NotFound(id))?;

        // Creation provenance survives a full replace, as it does on
        // the real backend.
        let replaced = Task::from_parts(TaskData {
            id: Some(id),
            name: task.name().to_owned(),
            status: Some(task.status()),
            due_date: task.due_date().copied(),
            rationale: task.rationale().map(str::to_owned),
            assignee: task.assignee().cloned(),
            priority: task.priority(),
            created_date: task.created_date().or(existing.task.created_date()),
            created_by: task
                .created_by()
                .map(str::to_owned)
                .or_else(|| existing.task.created_by().map(str::to_owned)),
        });
        state.tasks.insert(
            id,
            StoredTask {
                patient: *patient,
                task: replaced.clone(),
            },
        );
        Ok(replaced)
    }
}
