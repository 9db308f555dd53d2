//! Launch at login.

use infinity_channel::ChannelError;
use infinity_protocol::{Args, ArgsError, ChannelName};
use serde_json::{Value, json};
use tauri::{AppHandle, Manager};
use tauri_plugin_autostart::ManagerExt;
use tracing::info;

use crate::state::ShellState;

fn enabled_arg(args: &Args) -> Result<bool, ArgsError> {
    args.required(0, "enabled")
}

fn is_enabled(app: &AppHandle) -> Result<bool, ChannelError> {
    app.autolaunch()
        .is_enabled()
        .map_err(|e| ChannelError::Handler(format!("failed to read launch at login: {e}")))
}

fn set_enabled(app: &AppHandle, enabled: bool) -> Result<bool, ChannelError> {
    let launcher = app.autolaunch();
    let result = if enabled {
        launcher.enable()
    } else {
        launcher.disable()
    };
    result.map_err(|e| ChannelError::Handler(format!("failed to update launch at login: {e}")))?;
    info!(enabled, "launch at login updated");
    Ok(enabled)
}

pub fn register(app: &AppHandle) {
    let channel = app.state::<ShellState>().channel.clone();
    let router = channel.router();

    let handle = app.clone();
    router.handle_fn(ChannelName::GetAutoStart.as_str(), move |_args| {
        let app = handle.clone();
        async move { Ok::<Value, ChannelError>(json!(is_enabled(&app)?)) }
    });

    let handle = app.clone();
    router.handle_fn(ChannelName::SetAutoStart.as_str(), move |args: Args| {
        let app = handle.clone();
        async move {
            let enabled = enabled_arg(&args)?;
            Ok::<Value, ChannelError>(json!(set_enabled(&app, enabled)?))
        }
    });
}
