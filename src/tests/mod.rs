//! Integration tests for contestops.
//!
//! End-to-end cases drive the orchestrator and the HTTP router against a
//! temporary deployment root with a recording executor, so no container
//! runtime is needed.

mod cases_env_test;
mod cases_restart_test;

pub mod support;
