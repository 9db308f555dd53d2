use std::future::Future;
use std::pin::Pin;

use infinity_protocol::UpdateInfo;

use crate::error::UpdateError;

/// A boxed future returned by [`UpdateChecker`] methods.
pub type UpdateFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, UpdateError>> + Send + 'a>>;

/// Host update mechanism.
///
/// The desktop app implements this on top of the Tauri updater plugin; tests
/// use in-memory fakes.
pub trait UpdateChecker: Send + Sync + 'static {
    /// Asks the update server for a newer version.
    fn check(&self) -> UpdateFuture<'_, Option<UpdateInfo>>;

    /// Downloads `info` and keeps it ready for [`install`](Self::install).
    fn download<'a>(&'a self, info: &'a UpdateInfo) -> UpdateFuture<'a, ()>;

    /// Installs the downloaded update, if any. Returns whether an update was
    /// installed. Called while the application exits.
    fn install(&self) -> Result<bool, UpdateError>;
}
