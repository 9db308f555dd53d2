//! Message contract between the Infinity desktop shell and the embedded web content.
//!
//! The contract is a set of named channels ([`ChannelName`]) with fixed
//! argument shapes. Requests flow content → shell and resolve once; notifies
//! flow either way with no response.

pub mod constants;
pub mod envelope;
pub mod types;

// Re-export primary types for convenience.
pub use constants::{APP_NAME, ChannelName, Direction, Pattern, UnknownChannel};
pub use envelope::{Args, ArgsError};
pub use types::{
    CallState, FileFilter, NotificationOptions, ParseTrayActionError, SaveFileResult, TrayAction,
    UpdateInfo,
};
