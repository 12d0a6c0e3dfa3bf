// Container listing as reported by `docker ps --format {{json .}}`.

use serde::Deserialize;
use tracing::debug;

use super::ContainerInfo;

/// One line of `ps` output. Field names follow the engine's JSON template.
#[derive(Debug, Deserialize)]
struct PsLine {
    #[serde(rename = "ID", default)]
    id: String,
    #[serde(rename = "Names", default)]
    names: String,
    #[serde(rename = "Image", default)]
    image: String,
    #[serde(rename = "Status", default)]
    status: String,
    #[serde(rename = "State", default)]
    state: String,
    #[serde(rename = "CreatedAt", default)]
    created_at: String,
}

impl From<PsLine> for ContainerInfo {
    fn from(line: PsLine) -> Self {
        Self {
            id: line.id,
            name: line.names,
            image: line.image,
            status: line.status,
            state: line.state,
            created: line.created_at,
        }
    }
}

/// Parses `ps` output. Blank lines are skipped, a malformed line fails the
/// whole listing.
pub fn parse_ps(output: &str) -> serde_json::Result<Vec<ContainerInfo>> {
    let containers = output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| serde_json::from_str::<PsLine>(line).map(ContainerInfo::from))
        .collect::<serde_json::Result<Vec<_>>>()?;

    debug!(
        component = "orchestrator",
        event = "containers_parsed",
        count = containers.len(),
        "container listing parsed"
    );
    Ok(containers)
}
