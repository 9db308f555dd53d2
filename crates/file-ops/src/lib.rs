//! File operations for the Infinity desktop shell.
//!
//! - [`AssetResolver`] serves the packaged single-page application with an
//!   `index.html` fallback for client-side routes.
//! - [`write_file`] persists bytes chosen through the save dialog.

mod assets;
mod error;
mod save;

pub use assets::{Asset, AssetResolver, INDEX_DOCUMENT};
pub use error::FileOpsError;
pub use save::write_file;
