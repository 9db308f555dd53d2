/// Errors reported by an [`UpdateChecker`](crate::UpdateChecker).
#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    #[error("update check failed: {0}")]
    Check(String),

    #[error("update download failed: {0}")]
    Download(String),

    #[error("update install failed: {0}")]
    Install(String),
}
