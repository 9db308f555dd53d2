//! Tauri binding of the background updater.

use std::sync::{Arc, Mutex, PoisonError};

use infinity_protocol::{ChannelName, UpdateInfo};
use infinity_updater::{
    EventSink, ScheduleConfig, UpdateChecker, UpdateError, UpdateEvent, UpdateFuture,
    UpdateScheduler,
};
use tauri::{AppHandle, Manager};
use tauri_plugin_updater::{Update, UpdaterExt};
use tracing::info;

use crate::state::ShellState;

/// [`UpdateChecker`] backed by `tauri-plugin-updater`.
pub struct TauriUpdateChecker {
    app: AppHandle,
    /// Last update returned by a check.
    found: Mutex<Option<Update>>,
    /// Downloaded update waiting for install on quit.
    pending: Mutex<Option<(Update, Vec<u8>)>>,
}

impl TauriUpdateChecker {
    pub fn new(app: AppHandle) -> Self {
        Self {
            app,
            found: Mutex::new(None),
            pending: Mutex::new(None),
        }
    }
}

impl UpdateChecker for TauriUpdateChecker {
    fn check(&self) -> UpdateFuture<'_, Option<UpdateInfo>> {
        Box::pin(async move {
            let updater = self
                .app
                .updater()
                .map_err(|e| UpdateError::Check(e.to_string()))?;
            let update = updater
                .check()
                .await
                .map_err(|e| UpdateError::Check(e.to_string()))?;

            let info = update.as_ref().map(|u| UpdateInfo {
                version: u.version.clone(),
            });
            *self.found.lock().unwrap_or_else(PoisonError::into_inner) = update;
            Ok(info)
        })
    }

    fn download<'a>(&'a self, info: &'a UpdateInfo) -> UpdateFuture<'a, ()> {
        Box::pin(async move {
            let update = self
                .found
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
                .filter(|u| u.version == info.version)
                .ok_or_else(|| UpdateError::Download(format!("{} is not available", info.version)))?;

            let bytes = update
                .download(|_, _| {}, || {})
                .await
                .map_err(|e| UpdateError::Download(e.to_string()))?;

            *self.pending.lock().unwrap_or_else(PoisonError::into_inner) = Some((update, bytes));
            Ok(())
        })
    }

    fn install(&self) -> Result<bool, UpdateError> {
        let pending = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some((update, bytes)) = pending else {
            return Ok(false);
        };
        update
            .install(bytes)
            .map_err(|e| UpdateError::Install(e.to_string()))?;
        Ok(true)
    }
}

/// Starts background update checks (production only, when enabled).
pub fn start(app: &AppHandle) {
    let state = app.state::<ShellState>();
    if state.dev || !state.config.auto_update {
        info!(dev = state.dev, "auto-update disabled");
        return;
    }

    let channel = state.channel.clone();
    let sink: EventSink = Arc::new(move |event: UpdateEvent| match event {
        UpdateEvent::Available(info) => channel.notify_content(ChannelName::UpdateAvailable, &info),
        UpdateEvent::Downloaded(info) => {
            channel.notify_content(ChannelName::UpdateDownloaded, &info)
        }
    });

    let config = ScheduleConfig::from_secs(
        state.config.update_initial_delay_secs,
        state.config.update_interval_secs,
    );
    let scheduler = Arc::new(UpdateScheduler::new(
        Arc::new(TauriUpdateChecker::new(app.clone())),
        config,
        sink,
    ));

    let runner = scheduler.clone();
    tauri::async_runtime::spawn(async move { runner.run().await });
    *state.updater.lock().unwrap_or_else(PoisonError::into_inner) = Some(scheduler);
}

/// Stops checks and installs a downloaded update.
pub fn shutdown(app: &AppHandle) {
    if let Some(scheduler) = app.state::<ShellState>().updater() {
        scheduler.install_on_quit();
    }
}
