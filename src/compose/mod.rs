//! Service groups and command construction for the container orchestration tool.

pub mod builder;
pub mod sanitize;
pub mod stack;


pub use builder::{CommandBuilder, CommandLine, RestartRequest};
pub use sanitize::{filter_service_ids, is_config_key, is_service_id};
pub use stack::{ComposeAction, ContainerAction, StackKind};
