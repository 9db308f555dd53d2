//! Background auto-update for the Infinity desktop shell.
//!
//! [`UpdateScheduler`] checks once after an initial delay, then on a fixed
//! interval. Found updates are downloaded right away and installed when the
//! application quits. The host update mechanism sits behind
//! [`UpdateChecker`].

mod checker;
mod error;
mod scheduler;

pub use checker::{UpdateChecker, UpdateFuture};
pub use error::UpdateError;
pub use scheduler::{EventSink, ScheduleConfig, UpdateEvent, UpdateScheduler};
