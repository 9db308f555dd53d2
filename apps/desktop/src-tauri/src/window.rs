//! Main window creation and focus handling.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use infinity_protocol::{APP_NAME, ChannelName};
use infinity_shell_policy::NavigationDecision;
use tauri::webview::{NewWindowResponse, PageLoadEvent};
use tauri::{AppHandle, Manager, WebviewUrl, WebviewWindow, WebviewWindowBuilder};
use tracing::{info, warn};
use url::Url;

use crate::bridge::DESKTOP_API_SCRIPT;
use crate::state::ShellState;

pub const MAIN_WINDOW: &str = "main";

const WIDTH: f64 = 1400.0;
const HEIGHT: f64 = 900.0;
const MIN_WIDTH: f64 = 1024.0;
const MIN_HEIGHT: f64 = 700.0;

/// Custom scheme serving the packaged content in production.
pub const CONTENT_SCHEME: &str = "app";

/// Production content entry point. WebView2 exposes custom schemes as
/// `http://<scheme>.localhost`.
pub fn production_url() -> Result<Url, url::ParseError> {
    if cfg!(windows) {
        Url::parse(&format!("http://{CONTENT_SCHEME}.localhost/index.html"))
    } else {
        Url::parse(&format!("{CONTENT_SCHEME}://localhost/index.html"))
    }
}

/// URL the main window loads.
pub fn content_url(dev: bool, dev_server_url: &str) -> anyhow::Result<Url> {
    if dev {
        Ok(Url::parse(dev_server_url)?)
    } else {
        Ok(production_url()?)
    }
}

/// Creates the hidden main window; it shows itself once the first page load
/// finishes.
pub fn create_main(app: &AppHandle) -> anyhow::Result<WebviewWindow> {
    let state = app.state::<ShellState>();
    let url = content_url(state.dev, &state.config.dev_server_url)?;
    let webview_url = if state.dev || cfg!(windows) {
        WebviewUrl::External(url.clone())
    } else {
        WebviewUrl::CustomProtocol(url.clone())
    };

    let nav_app = app.clone();
    let popup_app = app.clone();
    let shown = Arc::new(AtomicBool::new(false));

    let window = WebviewWindowBuilder::new(app, MAIN_WINDOW, webview_url)
        .title(APP_NAME)
        .inner_size(WIDTH, HEIGHT)
        .min_inner_size(MIN_WIDTH, MIN_HEIGHT)
        .visible(false)
        .initialization_script(DESKTOP_API_SCRIPT)
        .on_navigation(move |target| {
            let decision = nav_app
                .state::<ShellState>()
                .navigation
                .decide_navigation(target);
            let allow = decision == NavigationDecision::Allow;
            apply_external(&nav_app, decision);
            allow
        })
        .on_new_window(move |target, _features| {
            let decision = popup_app
                .state::<ShellState>()
                .navigation
                .decide_new_window(&target);
            apply_external(&popup_app, decision);
            NewWindowResponse::Deny
        })
        .on_page_load(move |window, payload| {
            if payload.event() == PageLoadEvent::Finished && !shown.swap(true, Ordering::SeqCst) {
                if let Err(e) = window.show() {
                    warn!("failed to show main window: {e}");
                }
            }
        })
        .build()?;

    info!(url = %url, "main window created");

    if state.dev && state.config.open_devtools {
        window.open_devtools();
    }

    crate::permissions::install(&window);

    Ok(window)
}

/// Restores, shows and focuses the main window. Recreates it when it is gone.
pub fn show_main(app: &AppHandle) {
    let window = match app.get_webview_window(MAIN_WINDOW) {
        Some(window) => window,
        None => match create_main(app) {
            Ok(window) => window,
            Err(e) => {
                warn!("failed to recreate main window: {e}");
                return;
            }
        },
    };

    if window.is_minimized().unwrap_or(false) {
        let _ = window.unminimize();
    }
    if let Err(e) = window.show() {
        warn!("failed to show main window: {e}");
    }
    let _ = window.set_focus();
}

/// Hides the main window to the tray.
pub fn hide_main(app: &AppHandle) {
    if let Some(window) = app.get_webview_window(MAIN_WINDOW) {
        if let Err(e) = window.hide() {
            warn!("failed to hide main window: {e}");
        }
    }
}

/// Carries out a cancelled navigation: external links go to the default
/// browser, `tel:` links go to the content as a dial action.
fn apply_external(app: &AppHandle, decision: NavigationDecision) {
    match &decision {
        NavigationDecision::OpenExternal(url) => {
            #[allow(deprecated)]
            let opened = {
                use tauri_plugin_shell::ShellExt;
                app.shell().open(url.as_str(), None)
            };
            if let Err(e) = opened {
                warn!(%url, "failed to open external link: {e}");
            }
        }
        NavigationDecision::Dial(_) => {
            if let Some(action) = decision.dial_action() {
                app.state::<ShellState>()
                    .channel
                    .notify_content(ChannelName::TrayAction, &action);
            }
        }
        NavigationDecision::Allow | NavigationDecision::Deny => {}
    }
}
