//! Error types for task domain invariants and parsing.

use thiserror::Error;

/// Errors raised by domain-level task invariants.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// A mutation was requested for a task the backend has not yet
    /// assigned an identifier to.
    #[error("task has no identifier; it has not been created yet")]
    MissingTaskId,
}

/// Error returned while parsing task status codes from the wire.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing task priority codes from the wire.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task priority: {0}")]
pub struct ParseTaskPriorityError(pub String);

/// Error returned while parsing due-kind codes from the wire.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown due kind: {0}")]
pub struct ParseDueKindError(pub String);
