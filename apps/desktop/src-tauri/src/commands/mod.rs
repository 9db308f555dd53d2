//! Message channel handlers.
//!
//! Each module registers its request handlers and notify listeners on the
//! shared [`MessageChannel`](infinity_channel::MessageChannel).

pub mod files;
pub mod info;
pub mod notifications;
pub mod presence;
pub mod startup;

use tauri::AppHandle;

/// Registers every content → shell channel.
pub fn register(app: &AppHandle) {
    notifications::register(app);
    files::register(app);
    startup::register(app);
    info::register(app);
    presence::register(app);
}
