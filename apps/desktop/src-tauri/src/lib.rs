mod bridge;
mod commands;
mod config;
mod content;
mod permissions;
mod state;
mod tray;
mod updater;
mod window;

use std::sync::Arc;

use infinity_shell_policy::{CloseDecision, NavigationPolicy, quit_on_all_windows_closed};
use tauri::{AppHandle, Manager, RunEvent, WindowEvent};
use tauri_plugin_autostart::MacosLauncher;
use tracing_subscriber::EnvFilter;
use url::Url;

use bridge::TauriOutbound;
use config::DesktopConfig;
use state::ShellState;

pub fn run() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,infinity=debug")),
        )
        .init();

    let cfg = DesktopConfig::load().unwrap_or_default();
    if !cfg.file_path().exists() {
        if let Err(e) = cfg.save() {
            tracing::warn!("failed to write default config: {e}");
        }
    }

    let dev = config::is_dev();
    let navigation = navigation_policy(dev, &cfg.dev_server_url);
    tracing::info!(version = commands::info::app_version(), dev, "starting Infinity");

    let mut builder = tauri::Builder::default()
        // Must be first so a second launch never gets as far as a window.
        .plugin(tauri_plugin_single_instance::init(|app, _argv, _cwd| {
            tracing::debug!("second instance launched, focusing main window");
            window::show_main(app);
        }))
        .plugin(tauri_plugin_shell::init())
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_notification::init())
        .plugin(tauri_plugin_autostart::init(MacosLauncher::LaunchAgent, None))
        .plugin(tauri_plugin_updater::Builder::new().build())
        .manage(ShellState::new(cfg, dev, navigation));

    if !dev {
        builder = builder.register_uri_scheme_protocol(window::CONTENT_SCHEME, |ctx, request| {
            content::serve(ctx.app_handle(), &request)
        });
    }

    let app = builder
        .setup(|app| {
            let handle = app.handle().clone();
            app.state::<ShellState>()
                .channel
                .attach_outbound(Arc::new(TauriOutbound::new(handle.clone())));

            if handle.state::<ShellState>().dev {
                let url = handle.state::<ShellState>().config.dev_server_url.clone();
                if let Err(e) = bridge::allow_dev_server(&handle, &url) {
                    tracing::warn!("dev server has no bridge access: {e}");
                }
            }
            commands::register(&handle);
            if let Err(e) = tray::create(&handle) {
                tracing::warn!("failed to create tray: {e}");
            }
            window::create_main(&handle)?;
            updater::start(&handle);
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            bridge::ipc_invoke,
            bridge::ipc_send,
            bridge::ipc_save_file,
        ])
        .build(tauri::generate_context!())
        .expect("error building tauri application");

    app.run(|handle, event| match event {
        RunEvent::WindowEvent {
            label,
            event: WindowEvent::CloseRequested { api, .. },
            ..
        } if label == window::MAIN_WINDOW => {
            let state = handle.state::<ShellState>();
            if state.quit.on_close_requested() == CloseDecision::Hide {
                api.prevent_close();
                window::hide_main(handle);
            }
        }
        RunEvent::ExitRequested { code, api, .. } => {
            // `None` means the last window went away rather than an explicit exit.
            if code.is_none() && !quit_on_all_windows_closed(std::env::consts::OS) {
                api.prevent_exit();
                return;
            }
            handle.state::<ShellState>().quit.set();
            tray::destroy(handle);
        }
        RunEvent::Exit => shutdown(handle),
        #[cfg(target_os = "macos")]
        RunEvent::Reopen { .. } => window::show_main(handle),
        _ => {}
    });
}

/// Internal origins: the packaged content, plus the dev server in development.
fn navigation_policy(dev: bool, dev_server_url: &str) -> NavigationPolicy {
    let mut internal = Vec::new();
    match window::production_url() {
        Ok(url) => internal.push(url),
        Err(e) => tracing::warn!("invalid content url: {e}"),
    }
    if dev {
        match Url::parse(dev_server_url) {
            Ok(url) => internal.push(url),
            Err(e) => tracing::warn!(%dev_server_url, "invalid dev server url: {e}"),
        }
    }
    NavigationPolicy::new(&internal)
}

fn shutdown(app: &AppHandle) {
    tracing::info!("shutting down");
    let state = app.state::<ShellState>();
    state.quit.set();
    tray::destroy(app);
    updater::shutdown(app);
    state.channel.close();
}
