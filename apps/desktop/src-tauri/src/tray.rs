//! Tauri binding of the call-state tray.

use infinity_protocol::{APP_NAME, CallState, ChannelName, TrayAction};
use infinity_tray::{MenuAction, MenuHandlers, MenuItem, TRAY_ID, TrayHandle, build_menu, dispatch};
use tauri::menu::{Menu, MenuBuilder};
use tauri::tray::{MouseButton, MouseButtonState, TrayIconBuilder, TrayIconEvent};
use tauri::{AppHandle, Manager, Wry};
use tracing::{debug, info, warn};

use crate::state::ShellState;
use crate::window;

/// The native tray icon, looked up by id on every operation so calls after
/// it is destroyed are silent no-ops.
pub struct TauriTray {
    app: AppHandle,
}

impl TrayHandle for TauriTray {
    fn set_menu(&self, items: &[MenuItem]) {
        let Some(tray) = self.app.tray_by_id(TRAY_ID) else {
            debug!("tray gone, menu update skipped");
            return;
        };
        let result = native_menu(&self.app, items).and_then(|menu| tray.set_menu(Some(menu)));
        if let Err(e) = result {
            warn!("failed to update tray menu: {e}");
        }
    }

    fn set_tooltip(&self, tooltip: &str) {
        let Some(tray) = self.app.tray_by_id(TRAY_ID) else {
            return;
        };
        if let Err(e) = tray.set_tooltip(Some(tooltip)) {
            warn!("failed to update tray tooltip: {e}");
        }
    }
}

fn native_menu(app: &AppHandle, items: &[MenuItem]) -> tauri::Result<Menu<Wry>> {
    items
        .iter()
        .fold(MenuBuilder::new(app), |builder, item| match item {
            MenuItem::Entry { label, action } => builder.text(action.id(), label),
            MenuItem::Separator => builder.separator(),
        })
        .build()
}

/// Menu activations, routed to the window, the content or the app.
struct TrayMenu<'a>(&'a AppHandle);

impl MenuHandlers for TrayMenu<'_> {
    fn open_window(&self) {
        window::show_main(self.0);
    }

    fn send_action(&self, action: TrayAction) {
        self.0
            .state::<ShellState>()
            .channel
            .notify_content(ChannelName::TrayAction, &action);
    }

    fn quit(&self) {
        self.0.state::<ShellState>().quit.set();
        self.0.exit(0);
    }
}

/// Creates the tray icon with the idle menu and hands it to the call
/// presence.
pub fn create(app: &AppHandle) -> tauri::Result<()> {
    let menu = native_menu(app, &build_menu(CallState::Idle))?;

    let mut builder = TrayIconBuilder::with_id(TRAY_ID)
        .tooltip(APP_NAME)
        .menu(&menu)
        .show_menu_on_left_click(false)
        .on_menu_event(|app, event| match MenuAction::from_id(event.id().as_ref()) {
            Some(action) => dispatch(action, &TrayMenu(app)),
            None => debug!(id = ?event.id(), "unknown tray menu id"),
        })
        .on_tray_icon_event(|tray, event| match event {
            TrayIconEvent::DoubleClick {
                button: MouseButton::Left,
                ..
            }
            | TrayIconEvent::Click {
                button: MouseButton::Left,
                button_state: MouseButtonState::Up,
                ..
            } => window::show_main(tray.app_handle()),
            _ => {}
        });

    if let Some(icon) = app.default_window_icon() {
        builder = builder.icon(icon.clone());
    }
    builder.build(app)?;

    app.state::<ShellState>()
        .presence()
        .attach(TauriTray { app: app.clone() });
    info!("tray created");
    Ok(())
}

/// Removes the tray icon. Later call-state changes only update state.
pub fn destroy(app: &AppHandle) {
    app.state::<ShellState>().presence().detach();
    if app.remove_tray_by_id(TRAY_ID).is_some() {
        info!("tray destroyed");
    }
}
