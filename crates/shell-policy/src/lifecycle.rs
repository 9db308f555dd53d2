//! Close and quit behavior of the main window.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::info;

/// Set once the application is really quitting (tray Quit, OS shutdown,
/// last window closed). Never cleared.
#[derive(Debug, Default)]
pub struct QuitFlag(AtomicBool);

impl QuitFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the application as quitting. Returns `true` the first time.
    pub fn set(&self) -> bool {
        let first = !self.0.swap(true, Ordering::SeqCst);
        if first {
            info!("quit requested");
        }
        first
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// What a close request on the main window should do.
    pub fn on_close_requested(&self) -> CloseDecision {
        if self.is_set() {
            CloseDecision::Close
        } else {
            CloseDecision::Hide
        }
    }
}

/// Outcome of a close request on the main window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseDecision {
    /// Cancel the close and hide the window to the tray.
    Hide,
    /// Let the window close.
    Close,
}

/// Whether closing the last window quits the app on `os`
/// (as in `std::env::consts::OS`). macOS apps stay alive until Cmd+Q.
pub fn quit_on_all_windows_closed(os: &str) -> bool {
    os != "macos"
}
