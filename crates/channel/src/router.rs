//! Request/response routing (the invoke pattern).
//!
//! Each channel name has at most one handler. A request on a channel with no
//! handler is parked until one is registered; there is no timeout, so callers
//! that cannot wait forever must guard at a higher layer.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use infinity_protocol::Args;
use serde_json::Value;
use tokio::sync::oneshot;
use tracing::debug;

use crate::error::ChannelError;

/// A boxed future returned by request handlers.
pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = Result<Value, ChannelError>> + Send + 'a>>;

/// Handles requests arriving on one channel.
pub trait RequestHandler: Send + Sync + 'static {
    fn handle(&self, args: Args) -> HandlerFuture<'_>;
}

struct FnHandler<F>(F);

impl<F, Fut> RequestHandler for FnHandler<F>
where
    F: Fn(Args) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, ChannelError>> + Send + 'static,
{
    fn handle(&self, args: Args) -> HandlerFuture<'_> {
        Box::pin((self.0)(args))
    }
}

type SharedHandler = Arc<dyn RequestHandler>;

#[derive(Default)]
struct RouterInner {
    handlers: HashMap<String, SharedHandler>,
    /// Callers waiting for a handler to appear, keyed by channel name.
    parked: HashMap<String, Vec<oneshot::Sender<SharedHandler>>>,
    closed: bool,
}

/// Routes requests to the handler registered for their channel.
#[derive(Default)]
pub struct Router {
    inner: Mutex<RouterInner>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RouterInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers (or replaces) the handler for `channel`.
    ///
    /// Requests parked on this channel are released to the new handler.
    pub fn handle<H: RequestHandler>(&self, channel: impl Into<String>, handler: H) {
        let channel = channel.into();
        let handler: SharedHandler = Arc::new(handler);

        let waiters = {
            let mut inner = self.lock();
            inner.handlers.insert(channel.clone(), handler.clone());
            inner.parked.remove(&channel).unwrap_or_default()
        };

        if !waiters.is_empty() {
            debug!(%channel, count = waiters.len(), "releasing parked requests");
        }
        for waiter in waiters {
            let _ = waiter.send(handler.clone());
        }
    }

    /// Registers a closure as the handler for `channel`.
    pub fn handle_fn<F, Fut>(&self, channel: impl Into<String>, f: F)
    where
        F: Fn(Args) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ChannelError>> + Send + 'static,
    {
        self.handle(channel, FnHandler(f));
    }

    /// Returns `true` if a handler is registered for `channel`.
    pub fn has_handler(&self, channel: &str) -> bool {
        self.lock().handlers.contains_key(channel)
    }

    /// Number of requests waiting for a handler on `channel`.
    pub fn parked_count(&self, channel: &str) -> usize {
        self.lock().parked.get(channel).map_or(0, Vec::len)
    }

    /// Sends a request and waits for its single response.
    pub async fn invoke(&self, channel: &str, args: Args) -> Result<Value, ChannelError> {
        let found = {
            let mut inner = self.lock();
            if inner.closed {
                return Err(ChannelError::Closed);
            }
            match inner.handlers.get(channel) {
                Some(handler) => Ok(handler.clone()),
                None => {
                    let (tx, rx) = oneshot::channel();
                    inner.parked.entry(channel.to_string()).or_default().push(tx);
                    Err(rx)
                }
            }
        };

        let handler = match found {
            Ok(handler) => handler,
            Err(rx) => {
                debug!(%channel, "no handler registered, request parked");
                rx.await.map_err(|_| ChannelError::Closed)?
            }
        };

        handler.handle(args).await
    }

    /// Closes the router: parked and future requests resolve with
    /// [`ChannelError::Closed`].
    pub fn close(&self) {
        let mut inner = self.lock();
        inner.closed = true;
        inner.parked.clear();
    }
}
