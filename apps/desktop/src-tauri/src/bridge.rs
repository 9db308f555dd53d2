//! Message channel bridge into the webview.
//!
//! Content → shell goes through two commands; shell → content goes out as
//! Tauri events targeted at the main window. The initialization script
//! wraps both into `window.desktopAPI`.

use infinity_channel::Outbound;
use infinity_protocol::Args;
use serde_json::Value;
use tauri::ipc::{CapabilityBuilder, InvokeBody, Request};
use tauri::{AppHandle, Emitter, Manager, State};
use tracing::{info, warn};
use url::Url;

use crate::commands::files::{self, SaveRequest, TauriSaveDialog};
use crate::state::ShellState;
use crate::window::MAIN_WINDOW;

/// Header carrying the percent-encoded default file name of a raw save.
pub const DEFAULT_NAME_HEADER: &str = "x-infinity-default-name";
/// Header carrying the percent-encoded JSON filter list of a raw save.
pub const FILTERS_HEADER: &str = "x-infinity-filters";

/// Commands and core permissions granted to the content origins.
const BRIDGE_PERMISSIONS: &[&str] = &[
    "core:default",
    "allow-ipc-invoke",
    "allow-ipc-send",
    "allow-ipc-save-file",
];

/// Exposes `window.desktopAPI` to the content.
pub const DESKTOP_API_SCRIPT: &str = include_str!("desktop-api.js");

/// Delivers notifies as Tauri events named after their channel.
pub struct TauriOutbound {
    app: AppHandle,
}

impl TauriOutbound {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

impl Outbound for TauriOutbound {
    fn deliver(&self, channel: &str, payload: Value) {
        if let Err(e) = self.app.emit_to(MAIN_WINDOW, channel, payload) {
            warn!(%channel, "failed to deliver notify: {e}");
        }
    }
}

/// Request from the content. Resolves with the handler's value.
#[tauri::command]
pub async fn ipc_invoke(
    state: State<'_, ShellState>,
    channel: String,
    args: Vec<Value>,
) -> Result<Value, String> {
    state
        .channel
        .invoke(&channel, Args::new(args))
        .await
        .map_err(|e| e.to_string())
}

/// Notify from the content.
#[tauri::command]
pub fn ipc_send(state: State<'_, ShellState>, channel: String, payload: Value) {
    state.channel.receive(&channel, &payload);
}

/// `save-file` with the buffer as the raw request body, so large files skip
/// JSON number arrays. Name and filters travel in headers.
#[tauri::command]
pub async fn ipc_save_file(app: AppHandle, request: Request<'_>) -> Result<Value, String> {
    let InvokeBody::Raw(bytes) = request.body() else {
        return Err("save-file expects a raw body".into());
    };
    let header = |name: &str| {
        request
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let save = SaveRequest::from_raw(
        bytes.clone(),
        header(DEFAULT_NAME_HEADER).as_deref(),
        header(FILTERS_HEADER).as_deref(),
    )
    .map_err(|e| e.to_string())?;

    let result = files::save(&TauriSaveDialog::new(app), save)
        .await
        .map_err(|e| e.to_string())?;
    serde_json::to_value(result).map_err(|e| e.to_string())
}

/// ACL pattern covering every page of `url`'s origin.
pub fn remote_pattern(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}://{host}:{port}/*", url.scheme()),
        None => format!("{}://{host}/*", url.scheme()),
    })
}

/// Grants the bridge to the configured dev server, whatever its address.
pub fn allow_dev_server(app: &AppHandle, dev_server_url: &str) -> anyhow::Result<()> {
    let url = Url::parse(dev_server_url)?;
    let pattern = remote_pattern(&url)
        .ok_or_else(|| anyhow::anyhow!("dev server url has no host: {dev_server_url}"))?;

    let capability = BRIDGE_PERMISSIONS.iter().fold(
        CapabilityBuilder::new("dev-server")
            .window(MAIN_WINDOW)
            .remote(pattern.clone()),
        |builder, permission| builder.permission(*permission),
    );
    app.add_capability(capability)?;
    info!(%pattern, "bridge granted to dev server");
    Ok(())
}
