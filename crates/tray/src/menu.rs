//! Dynamic context menu for the system tray.

use infinity_protocol::{APP_NAME, CallState, TrayAction};

/// Actions that can be triggered from the tray context menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    /// Restore, show and focus the main window.
    OpenWindow,
    /// Forward a call-control action to the content.
    Send(TrayAction),
    /// Terminate the application.
    Quit,
}

impl MenuAction {
    /// Stable menu item id used by the host menu.
    pub fn id(&self) -> &'static str {
        match self {
            MenuAction::OpenWindow => "open",
            MenuAction::Send(TrayAction::Answer) => "answer",
            MenuAction::Send(TrayAction::Reject) => "reject",
            MenuAction::Send(TrayAction::Mute) => "mute",
            MenuAction::Send(TrayAction::Hangup) => "hangup",
            MenuAction::Send(TrayAction::Dial(_)) => "dial",
            MenuAction::Quit => "quit",
        }
    }

    /// Maps a host menu id back to its action.
    ///
    /// `dial` is never a menu entry, so it does not map back.
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "open" => Some(MenuAction::OpenWindow),
            "answer" => Some(MenuAction::Send(TrayAction::Answer)),
            "reject" => Some(MenuAction::Send(TrayAction::Reject)),
            "mute" => Some(MenuAction::Send(TrayAction::Mute)),
            "hangup" => Some(MenuAction::Send(TrayAction::Hangup)),
            "quit" => Some(MenuAction::Quit),
            _ => None,
        }
    }
}

/// A single menu entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuItem {
    /// Clickable entry.
    Entry { label: String, action: MenuAction },
    /// Visual divider.
    Separator,
}

impl MenuItem {
    fn entry(label: impl Into<String>, action: MenuAction) -> Self {
        MenuItem::Entry {
            label: label.into(),
            action,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            MenuItem::Entry { label, .. } => Some(label),
            MenuItem::Separator => None,
        }
    }

    pub fn action(&self) -> Option<&MenuAction> {
        match self {
            MenuItem::Entry { action, .. } => Some(action),
            MenuItem::Separator => None,
        }
    }

    pub fn is_separator(&self) -> bool {
        matches!(self, MenuItem::Separator)
    }
}

/// Builds the menu items for `state`.
///
/// Layout: header (open + separator), call controls (only while ringing or
/// in a call, each group followed by a separator), footer (quit).
pub fn build_menu(state: CallState) -> Vec<MenuItem> {
    let mut items = vec![
        MenuItem::entry(format!("Open {APP_NAME}"), MenuAction::OpenWindow),
        MenuItem::Separator,
    ];

    match state {
        CallState::Idle => {}
        CallState::Ringing => {
            items.push(MenuItem::entry("Answer", MenuAction::Send(TrayAction::Answer)));
            items.push(MenuItem::entry("Reject", MenuAction::Send(TrayAction::Reject)));
            items.push(MenuItem::Separator);
        }
        CallState::InCall => {
            items.push(MenuItem::entry("Mute", MenuAction::Send(TrayAction::Mute)));
            items.push(MenuItem::entry("Hang up", MenuAction::Send(TrayAction::Hangup)));
            items.push(MenuItem::Separator);
        }
    }

    items.push(MenuItem::entry("Quit", MenuAction::Quit));
    items
}

/// Receivers of menu activations.
pub trait MenuHandlers {
    /// Restore if minimized, then show and focus the main window.
    fn open_window(&self);
    /// Forward `action` to the content over the message channel.
    fn send_action(&self, action: TrayAction);
    /// Request full process termination.
    fn quit(&self);
}

/// Routes an activated menu action to its handler.
pub fn dispatch(action: MenuAction, handlers: &impl MenuHandlers) {
    match action {
        MenuAction::OpenWindow => handlers.open_window(),
        MenuAction::Send(action) => handlers.send_action(action),
        MenuAction::Quit => handlers.quit(),
    }
}
