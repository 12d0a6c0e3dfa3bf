// Service groups known to the orchestration tool.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named service group, backed by one service-group definition file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StackKind {
    Core,
    Admin,
    Contest,
    Worker,
}

impl StackKind {
    /// Every known group, in the order their files are passed to the tool.
    pub const ALL: [StackKind; 4] = [
        StackKind::Core,
        StackKind::Admin,
        StackKind::Contest,
        StackKind::Worker,
    ];

    /// Foundational groups restarted by an "all services" request.
    pub const FOUNDATIONAL: [StackKind; 3] = [StackKind::Core, StackKind::Contest, StackKind::Worker];

    pub fn as_str(&self) -> &'static str {
        match self {
            StackKind::Core => "core",
            StackKind::Admin => "admin",
            StackKind::Contest => "contest",
            StackKind::Worker => "worker",
        }
    }

    /// Conventional definition file name for this group.
    pub fn default_file(&self) -> &'static str {
        match self {
            StackKind::Core => "docker-compose.core.yml",
            StackKind::Admin => "docker-compose.admin.yml",
            StackKind::Contest => "docker-compose.contest.yml",
            StackKind::Worker => "docker-compose.worker.yml",
        }
    }
}

impl fmt::Display for StackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StackKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "core" => Ok(StackKind::Core),
            "admin" => Ok(StackKind::Admin),
            "contest" => Ok(StackKind::Contest),
            "worker" => Ok(StackKind::Worker),
            other => Err(format!("unknown service group {:?}", other)),
        }
    }
}

/// Lifecycle action for a group, as exposed by the maintenance screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComposeAction {
    Up,
    Down,
    Restart,
    Build,
}

impl ComposeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComposeAction::Up => "up",
            ComposeAction::Down => "down",
            ComposeAction::Restart => "restart",
            ComposeAction::Build => "build",
        }
    }

    /// Flags appended after the action verb.
    pub fn flags(&self) -> &'static [&'static str] {
        match self {
            ComposeAction::Up => &["-d"],
            ComposeAction::Build => &["--no-cache"],
            ComposeAction::Down | ComposeAction::Restart => &[],
        }
    }
}

impl fmt::Display for ComposeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComposeAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(ComposeAction::Up),
            "down" => Ok(ComposeAction::Down),
            "restart" => Ok(ComposeAction::Restart),
            "build" => Ok(ComposeAction::Build),
            other => Err(format!("unknown compose action {:?}", other)),
        }
    }
}

/// Lifecycle action for a single container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerAction {
    Start,
    Stop,
    Restart,
}

impl ContainerAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerAction::Start => "start",
            ContainerAction::Stop => "stop",
            ContainerAction::Restart => "restart",
        }
    }
}

impl fmt::Display for ContainerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContainerAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(ContainerAction::Start),
            "stop" => Ok(ContainerAction::Stop),
            "restart" => Ok(ContainerAction::Restart),
            other => Err(format!("unknown container action {:?}", other)),
        }
    }
}
