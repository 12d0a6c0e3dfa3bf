// Shared test support code.
// Provides a fake executor, a temporary deployment root and HTTP helpers.

pub mod common;
pub mod executor;
pub mod workspace;

pub use common::*;
pub use executor::RecordingExecutor;
pub use workspace::{Workspace, CONTEST_ENV, POLICY};
