//! Host tray capability.

use infinity_protocol::{APP_NAME, CallState};

use crate::menu::MenuItem;

/// Identifier of the single tray icon owned by the shell.
pub const TRAY_ID: &str = "infinity-tray";

/// The native tray icon as seen by [`CallPresence`](crate::CallPresence).
pub trait TrayHandle {
    /// Replaces the whole context menu.
    fn set_menu(&self, items: &[MenuItem]);
    /// Replaces the hover tooltip.
    fn set_tooltip(&self, tooltip: &str);
}

/// Tooltip shown for `state`.
pub fn tooltip_for(state: CallState) -> String {
    match state {
        CallState::Idle => APP_NAME.to_string(),
        CallState::Ringing => format!("{APP_NAME} - Incoming call"),
        CallState::InCall => format!("{APP_NAME} - In call"),
    }
}
