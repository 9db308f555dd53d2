//! Call-state presence in the tray.

use infinity_protocol::CallState;
use tracing::debug;

use crate::menu::build_menu;
use crate::tray::{TrayHandle, tooltip_for};

/// Tracks the current [`CallState`] and keeps the tray in sync with it.
///
/// Every transition is permissive: any state may follow any other, and
/// setting the same state again still rebuilds the tray.
pub struct CallPresence<T> {
    state: CallState,
    tray: Option<T>,
}

impl<T: TrayHandle> Default for CallPresence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TrayHandle> CallPresence<T> {
    /// Starts idle with no tray attached.
    pub fn new() -> Self {
        Self {
            state: CallState::Idle,
            tray: None,
        }
    }

    pub fn state(&self) -> CallState {
        self.state
    }

    pub fn tray(&self) -> Option<&T> {
        self.tray.as_ref()
    }

    /// Attaches the tray and draws the current state on it.
    pub fn attach(&mut self, tray: T) {
        self.tray = Some(tray);
        self.rebuild();
    }

    /// Detaches and returns the tray. Later transitions only update state.
    pub fn detach(&mut self) -> Option<T> {
        self.tray.take()
    }

    /// Records `state` and rebuilds menu and tooltip.
    pub fn set_call_state(&mut self, state: CallState) {
        debug!(from = %self.state, to = %state, "call state changed");
        self.state = state;
        self.rebuild();
    }

    /// Reinstalls menu and tooltip for the current state. No-op without a tray.
    pub fn rebuild(&self) {
        let Some(tray) = &self.tray else {
            return;
        };
        tray.set_menu(&build_menu(self.state));
        tray.set_tooltip(&tooltip_for(self.state));
    }
}
