//! Unit and orchestration tests for the task module.

mod codec_tests;
mod service_tests;
