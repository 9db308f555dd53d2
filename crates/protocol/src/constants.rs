use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Product name shown in window titles, the tray tooltip and menu labels.
pub const APP_NAME: &str = "Infinity";

/// Which side of the boundary originates messages on a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Embedded content → native shell.
    ContentToShell,
    /// Native shell → embedded content.
    ShellToContent,
}

/// Delivery pattern of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// Request with a single response (invoke).
    Request,
    /// Fire-and-forget event (send).
    Notify,
}

/// Named channel on the shell/content boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelName {
    // Requests from content to shell
    #[serde(rename = "show-notification")]
    ShowNotification,
    #[serde(rename = "save-file")]
    SaveFile,
    #[serde(rename = "get-auto-start")]
    GetAutoStart,
    #[serde(rename = "set-auto-start")]
    SetAutoStart,
    #[serde(rename = "get-app-version")]
    GetAppVersion,
    #[serde(rename = "is-electron")]
    IsElectron,

    // Notifies from content to shell
    #[serde(rename = "set-title")]
    SetTitle,
    #[serde(rename = "call-state-changed")]
    CallStateChanged,

    // Notifies from shell to content
    #[serde(rename = "tray-action")]
    TrayAction,
    #[serde(rename = "update-available")]
    UpdateAvailable,
    #[serde(rename = "update-downloaded")]
    UpdateDownloaded,
}

impl ChannelName {
    /// Every channel in the contract.
    pub const ALL: [ChannelName; 11] = [
        ChannelName::ShowNotification,
        ChannelName::SaveFile,
        ChannelName::GetAutoStart,
        ChannelName::SetAutoStart,
        ChannelName::GetAppVersion,
        ChannelName::IsElectron,
        ChannelName::SetTitle,
        ChannelName::CallStateChanged,
        ChannelName::TrayAction,
        ChannelName::UpdateAvailable,
        ChannelName::UpdateDownloaded,
    ];

    /// Wire name of the channel.
    pub fn as_str(self) -> &'static str {
        match self {
            ChannelName::ShowNotification => "show-notification",
            ChannelName::SaveFile => "save-file",
            ChannelName::GetAutoStart => "get-auto-start",
            ChannelName::SetAutoStart => "set-auto-start",
            ChannelName::GetAppVersion => "get-app-version",
            ChannelName::IsElectron => "is-electron",
            ChannelName::SetTitle => "set-title",
            ChannelName::CallStateChanged => "call-state-changed",
            ChannelName::TrayAction => "tray-action",
            ChannelName::UpdateAvailable => "update-available",
            ChannelName::UpdateDownloaded => "update-downloaded",
        }
    }

    pub fn direction(self) -> Direction {
        match self {
            ChannelName::TrayAction
            | ChannelName::UpdateAvailable
            | ChannelName::UpdateDownloaded => Direction::ShellToContent,
            _ => Direction::ContentToShell,
        }
    }

    pub fn pattern(self) -> Pattern {
        match self {
            ChannelName::SetTitle
            | ChannelName::CallStateChanged
            | ChannelName::TrayAction
            | ChannelName::UpdateAvailable
            | ChannelName::UpdateDownloaded => Pattern::Notify,
            _ => Pattern::Request,
        }
    }
}

impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a known channel.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown channel: {0}")]
pub struct UnknownChannel(pub String);

impl FromStr for ChannelName {
    type Err = UnknownChannel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChannelName::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownChannel(s.to_string()))
    }
}
