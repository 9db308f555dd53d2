use std::path::PathBuf;

/// Errors from asset resolution and file writes.
#[derive(Debug, thiserror::Error)]
pub enum FileOpsError {
    #[error("{action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),
}

impl FileOpsError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}
