use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use infinity_channel::MessageChannel;
use infinity_shell_policy::{NavigationPolicy, QuitFlag};
use infinity_tray::CallPresence;
use infinity_updater::UpdateScheduler;

use crate::config::DesktopConfig;
use crate::tray::TauriTray;
use crate::updater::TauriUpdateChecker;

/// Shared application state managed by Tauri.
pub struct ShellState {
    pub channel: Arc<MessageChannel>,
    pub presence: Arc<Mutex<CallPresence<TauriTray>>>,
    pub quit: QuitFlag,
    pub navigation: NavigationPolicy,
    pub config: DesktopConfig,
    pub dev: bool,
    pub updater: Mutex<Option<Arc<UpdateScheduler<TauriUpdateChecker>>>>,
}

impl ShellState {
    pub fn new(config: DesktopConfig, dev: bool, navigation: NavigationPolicy) -> Self {
        Self {
            channel: Arc::new(MessageChannel::new()),
            presence: Arc::new(Mutex::new(CallPresence::new())),
            quit: QuitFlag::new(),
            navigation,
            config,
            dev,
            updater: Mutex::new(None),
        }
    }

    pub fn presence(&self) -> MutexGuard<'_, CallPresence<TauriTray>> {
        self.presence.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn updater(&self) -> Option<Arc<UpdateScheduler<TauriUpdateChecker>>> {
        self.updater
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
