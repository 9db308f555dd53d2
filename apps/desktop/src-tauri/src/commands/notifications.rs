//! `show-notification`.

use infinity_channel::ChannelError;
use infinity_protocol::{Args, ArgsError, ChannelName, NotificationOptions};
use serde_json::Value;
use tauri::plugin::PermissionState;
use tauri::{AppHandle, Manager};
use tauri_plugin_notification::NotificationExt;
use tracing::{debug, warn};

use crate::state::ShellState;

/// Decoded `show-notification` arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub title: String,
    pub body: String,
    pub options: NotificationOptions,
}

impl NotificationRequest {
    pub fn from_args(args: &Args) -> Result<Self, ArgsError> {
        Ok(Self {
            title: args.required(0, "title")?,
            body: args.optional(1, "body")?.unwrap_or_default(),
            options: args.optional(2, "options")?.unwrap_or_default(),
        })
    }
}

/// Whether the OS lets the app post notifications, prompting once when it
/// has not decided yet.
fn os_permits(app: &AppHandle) -> bool {
    let notifications = app.notification();
    let state = match notifications.permission_state() {
        Ok(PermissionState::Prompt | PermissionState::PromptWithRationale) => {
            notifications.request_permission()
        }
        other => other,
    };
    match state {
        Ok(state) => is_granted(state),
        Err(e) => {
            warn!("failed to read notification permission: {e}");
            false
        }
    }
}

fn is_granted(state: PermissionState) -> bool {
    matches!(state, PermissionState::Granted)
}

fn show(app: &AppHandle, request: &NotificationRequest) -> Result<(), ChannelError> {
    if !os_permits(app) {
        debug!(title = %request.title, "notifications not permitted, dropped");
        return Ok(());
    }

    let mut builder = app
        .notification()
        .builder()
        .title(&request.title)
        .body(&request.body);
    if request.options.is_silent() {
        builder = builder.silent();
    }
    builder
        .show()
        .map_err(|e| ChannelError::Handler(format!("failed to show notification: {e}")))?;

    debug!(title = %request.title, "notification shown");
    Ok(())
}

pub fn register(app: &AppHandle) {
    let handle = app.clone();
    app.state::<ShellState>().channel.router().handle_fn(
        ChannelName::ShowNotification.as_str(),
        move |args: Args| {
            let app = handle.clone();
            async move {
                let request = NotificationRequest::from_args(&args)?;
                show(&app, &request)?;
                Ok::<Value, ChannelError>(Value::Null)
            }
        },
    );
}
