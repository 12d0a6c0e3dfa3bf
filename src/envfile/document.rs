// Key-value document storage.

use async_trait::async_trait;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Whole-document access to a persisted configuration file.
#[async_trait]
pub trait KvDocument: Send + Sync {
    async fn read(&self) -> io::Result<String>;

    /// Replaces the full content. Readers see either the old or the new document.
    async fn write_all(&self, content: &str) -> io::Result<()>;
}

/// A document stored as a file on the host filesystem.
#[derive(Debug, Clone)]
pub struct FileDocument {
    path: PathBuf,
}

impl FileDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Writes `content` to a fresh temp file next to `path`, flushes it to disk
/// and renames it over `path`. The temp file is removed on any failure.
fn replace_file(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(content)?;
    if let Ok(meta) = std::fs::metadata(path) {
        temp.as_file().set_permissions(meta.permissions())?;
    }
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|err| err.error)?;

    #[cfg(unix)]
    {
        if let Ok(dir) = std::fs::File::open(dir) {
            let _ = dir.sync_all();
        }
    }
    Ok(())
}

#[async_trait]
impl KvDocument for FileDocument {
    async fn read(&self) -> io::Result<String> {
        tokio::fs::read_to_string(&self.path).await
    }

    async fn write_all(&self, content: &str) -> io::Result<()> {
        let path = self.path.clone();
        let bytes = content.as_bytes().to_vec();
        tokio::task::spawn_blocking(move || replace_file(&path, &bytes))
            .await
            .map_err(io::Error::other)??;

        debug!(
            component = "envfile",
            event = "written",
            path = %self.path.display(),
            bytes = content.len(),
            "document replaced"
        );
        Ok(())
    }
}
