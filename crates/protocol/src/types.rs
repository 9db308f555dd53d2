use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Call presence reported by the embedded content.
///
/// The shell mirrors whatever the content last reported; it never infers
/// a state on its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CallState {
    #[default]
    Idle,
    Ringing,
    InCall,
}

impl fmt::Display for CallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallState::Idle => write!(f, "idle"),
            CallState::Ringing => write!(f, "ringing"),
            CallState::InCall => write!(f, "in-call"),
        }
    }
}

/// Control action sent from the tray (or a `tel:` link) to the content.
///
/// Travels as a plain string: `answer`, `reject`, `mute`, `hangup` or
/// `dial:<number>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TrayAction {
    Answer,
    Reject,
    Mute,
    Hangup,
    Dial(String),
}

impl fmt::Display for TrayAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrayAction::Answer => write!(f, "answer"),
            TrayAction::Reject => write!(f, "reject"),
            TrayAction::Mute => write!(f, "mute"),
            TrayAction::Hangup => write!(f, "hangup"),
            TrayAction::Dial(number) => write!(f, "dial:{number}"),
        }
    }
}

/// Returned when a string is not a valid tray action.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid tray action: {0}")]
pub struct ParseTrayActionError(pub String);

impl FromStr for TrayAction {
    type Err = ParseTrayActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "answer" => Ok(TrayAction::Answer),
            "reject" => Ok(TrayAction::Reject),
            "mute" => Ok(TrayAction::Mute),
            "hangup" => Ok(TrayAction::Hangup),
            other => other
                .strip_prefix("dial:")
                .map(|number| TrayAction::Dial(number.to_string()))
                .ok_or_else(|| ParseTrayActionError(other.to_string())),
        }
    }
}

impl Serialize for TrayAction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TrayAction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Options accepted by `show-notification`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub silent: Option<bool>,
}

impl NotificationOptions {
    /// Whether the notification should be shown without sound.
    pub fn is_silent(&self) -> bool {
        self.silent.unwrap_or(false)
    }
}

/// A named group of file extensions for the save dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFilter {
    pub name: String,
    pub extensions: Vec<String>,
}

impl FileFilter {
    /// The filter used when the content does not pass any.
    pub fn all_files() -> Self {
        Self {
            name: "All Files".into(),
            extensions: vec!["*".into()],
        }
    }
}

/// Outcome of a `save-file` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveFileResult {
    pub canceled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

impl SaveFileResult {
    pub fn canceled() -> Self {
        Self {
            canceled: true,
            file_path: None,
        }
    }

    pub fn saved(file_path: impl Into<String>) -> Self {
        Self {
            canceled: false,
            file_path: Some(file_path.into()),
        }
    }
}

/// Payload of `update-available` and `update-downloaded`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateInfo {
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_state_wire_names() {
        assert_eq!(serde_json::to_string(&CallState::Idle).unwrap(), "\"idle\"");
        assert_eq!(
            serde_json::to_string(&CallState::Ringing).unwrap(),
            "\"ringing\""
        );
        assert_eq!(
            serde_json::to_string(&CallState::InCall).unwrap(),
            "\"in-call\""
        );
        let parsed: CallState = serde_json::from_str("\"in-call\"").unwrap();
        assert_eq!(parsed, CallState::InCall);
    }

    #[test]
    fn call_state_defaults_to_idle() {
        assert_eq!(CallState::default(), CallState::Idle);
    }

    #[test]
    fn call_state_rejects_unknown() {
        assert!(serde_json::from_str::<CallState>("\"on-hold\"").is_err());
    }

    #[test]
    fn tray_action_strings() {
        assert_eq!(TrayAction::Answer.to_string(), "answer");
        assert_eq!(TrayAction::Hangup.to_string(), "hangup");
        assert_eq!(TrayAction::Dial("+5511999".into()).to_string(), "dial:+5511999");
    }

    #[test]
    fn tray_action_parse() {
        assert_eq!("reject".parse::<TrayAction>().unwrap(), TrayAction::Reject);
        assert_eq!(
            "dial:1234".parse::<TrayAction>().unwrap(),
            TrayAction::Dial("1234".into())
        );
        let err = "transfer".parse::<TrayAction>().unwrap_err();
        assert_eq!(err.0, "transfer");
    }

    #[test]
    fn tray_action_serializes_as_plain_string() {
        let json = serde_json::to_value(TrayAction::Mute).unwrap();
        assert_eq!(json, serde_json::json!("mute"));
        let dial: TrayAction = serde_json::from_value(serde_json::json!("dial:42")).unwrap();
        assert_eq!(dial, TrayAction::Dial("42".into()));
    }

    #[test]
    fn notification_options_default_not_silent() {
        let opts: NotificationOptions = serde_json::from_str("{}").unwrap();
        assert!(!opts.is_silent());
        let opts: NotificationOptions = serde_json::from_str(r#"{"silent":true}"#).unwrap();
        assert!(opts.is_silent());
    }

    #[test]
    fn save_file_result_shape() {
        let json = serde_json::to_value(SaveFileResult::canceled()).unwrap();
        assert_eq!(json, serde_json::json!({"canceled": true}));

        let json = serde_json::to_value(SaveFileResult::saved("/tmp/report.pdf")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"canceled": false, "filePath": "/tmp/report.pdf"})
        );
    }

    #[test]
    fn all_files_filter() {
        let filter = FileFilter::all_files();
        assert_eq!(filter.name, "All Files");
        assert_eq!(filter.extensions, vec!["*"]);
    }
}
