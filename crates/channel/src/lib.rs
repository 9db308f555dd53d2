//! Message channel between the native shell and the embedded web content.
//!
//! Two shapes cross the boundary:
//! - requests (content → shell), routed by [`Router`] to one handler and
//!   resolved exactly once
//! - notifies, delivered to zero or more [`Listeners`] (content → shell) or
//!   forwarded through an [`Outbound`] sink (shell → content)
//!
//! The transport never validates payload shapes; handlers and listeners
//! decode what they expect.

pub mod error;
pub mod listeners;
pub mod router;

use std::sync::{Arc, PoisonError, RwLock};

use infinity_protocol::{Args, ChannelName};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

pub use error::ChannelError;
pub use listeners::{Listener, Listeners, Subscription};
pub use router::{HandlerFuture, RequestHandler, Router};

/// Shell → content delivery, implemented by the host webview bridge.
pub trait Outbound: Send + Sync + 'static {
    /// Delivers a fire-and-forget notify to the content.
    fn deliver(&self, channel: &str, payload: Value);
}

/// Both directions of the shell/content boundary.
#[derive(Default)]
pub struct MessageChannel {
    router: Router,
    listeners: Listeners,
    outbound: RwLock<Option<Arc<dyn Outbound>>>,
}

impl MessageChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request handlers (content → shell).
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Notify listeners (content → shell).
    pub fn listeners(&self) -> &Listeners {
        &self.listeners
    }

    /// Installs the sink used for shell → content notifies.
    pub fn attach_outbound(&self, sink: Arc<dyn Outbound>) {
        *self.outbound.write().unwrap_or_else(PoisonError::into_inner) = Some(sink);
    }

    /// Removes the outbound sink; later notifies are dropped.
    pub fn detach_outbound(&self) {
        *self.outbound.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Handles a request from the content.
    pub async fn invoke(&self, channel: &str, args: Args) -> Result<Value, ChannelError> {
        self.router.invoke(channel, args).await
    }

    /// Handles a notify from the content.
    pub fn receive(&self, channel: &str, payload: &Value) {
        let delivered = self.listeners.emit(channel, payload);
        if delivered == 0 {
            debug!(%channel, "notify with no listeners");
        }
    }

    /// Sends a notify to the content. Dropped silently when no content is
    /// attached.
    pub fn notify_content<T: Serialize>(&self, channel: ChannelName, payload: &T) {
        let sink = self
            .outbound
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let Some(sink) = sink else {
            debug!(%channel, "no content attached, notify dropped");
            return;
        };
        match serde_json::to_value(payload) {
            Ok(value) => sink.deliver(channel.as_str(), value),
            Err(e) => warn!(%channel, "failed to encode notify payload: {e}"),
        }
    }

    /// Shuts the channel down: pending requests fail with
    /// [`ChannelError::Closed`] and outbound notifies stop.
    pub fn close(&self) {
        self.router.close();
        self.detach_outbound();
    }
}
