use infinity_channel::ChannelError;
use infinity_protocol::ChannelName;
use serde_json::{Value, json};
use tauri::{AppHandle, Manager};

use crate::state::ShellState;

/// Application version.
pub fn app_version() -> &'static str {
    env!("INFINITY_VERSION")
}

pub fn register(app: &AppHandle) {
    let channel = app.state::<ShellState>().channel.clone();
    let router = channel.router();

    router.handle_fn(ChannelName::GetAppVersion.as_str(), |_args| async {
        Ok::<Value, ChannelError>(json!(app_version()))
    });
    // The content detects the desktop shell through this channel.
    router.handle_fn(ChannelName::IsElectron.as_str(), |_args| async {
        Ok::<Value, ChannelError>(json!(true))
    });
}
