//! Decisions the shell makes about the embedded content.
//!
//! Everything here is pure: the desktop app asks for a decision and applies
//! it through the host framework.

pub mod lifecycle;
pub mod navigation;
pub mod permissions;

pub use lifecycle::{CloseDecision, QuitFlag, quit_on_all_windows_closed};
pub use navigation::{NavigationDecision, NavigationPolicy};
pub use permissions::Permission;
