//! Save-dialog file writes.

use std::path::Path;

use tracing::info;

use crate::error::FileOpsError;

/// Writes `bytes` to `path`, replacing any existing file.
///
/// The parent directory must exist; the save dialog only returns paths in
/// existing directories.
pub async fn write_file(path: &Path, bytes: &[u8]) -> Result<(), FileOpsError> {
    tokio::fs::write(path, bytes)
        .await
        .map_err(|e| FileOpsError::io("write", path, e))?;
    info!(path = %path.display(), size = bytes.len(), "file saved");
    Ok(())
}
