//! Application services for patient task orchestration.

mod tasks;

pub use tasks::{TaskService, TaskServiceError, TaskServiceResult};
