//! Window title and call state, both fire-and-forget from the content.

use std::sync::{Arc, Mutex, PoisonError};

use infinity_channel::{Listeners, Subscription};
use infinity_protocol::{CallState, ChannelName};
use infinity_tray::{CallPresence, TrayHandle};
use tauri::{AppHandle, Manager};
use tracing::warn;

use crate::state::ShellState;
use crate::window::MAIN_WINDOW;

/// Feeds `call-state-changed` notifies into `presence`. Malformed states
/// are dropped by the listener registry.
pub fn bind_call_state<T>(listeners: &Listeners, presence: Arc<Mutex<CallPresence<T>>>) -> Subscription
where
    T: TrayHandle + Send + 'static,
{
    listeners.on_typed(
        ChannelName::CallStateChanged.as_str(),
        move |state: CallState| {
            presence
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .set_call_state(state);
        },
    )
}

pub fn register(app: &AppHandle) {
    let state = app.state::<ShellState>();
    let listeners = state.channel.listeners();

    let handle = app.clone();
    listeners.on_typed(ChannelName::SetTitle.as_str(), move |title: String| {
        let Some(window) = handle.get_webview_window(MAIN_WINDOW) else {
            return;
        };
        if let Err(e) = window.set_title(&title) {
            warn!("failed to set window title: {e}");
        }
    });

    bind_call_state(listeners, state.presence.clone());
}
