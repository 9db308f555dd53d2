//! System tray model for the Infinity desktop shell.
//!
//! The tray mirrors the call state reported by the web content:
//! - [`build_menu`] turns a [`CallState`] into the ordered context menu
//! - [`CallPresence`] holds the current state and reinstalls menu and
//!   tooltip on every transition
//! - [`TrayHandle`] is the host capability that actually draws the tray
//!
//! Nothing here depends on a GUI backend; the desktop app implements
//! [`TrayHandle`] and [`MenuHandlers`] on top of Tauri.

mod menu;
mod presence;
mod tray;

pub use infinity_protocol::CallState;
pub use menu::{MenuAction, MenuHandlers, MenuItem, build_menu, dispatch};
pub use presence::CallPresence;
pub use tray::{TRAY_ID, TrayHandle, tooltip_for};
