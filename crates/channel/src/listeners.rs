//! Notify listeners (the send pattern).

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

/// Callback invoked with each payload emitted on a channel.
pub type Listener = Arc<dyn Fn(&Value) + Send + Sync + 'static>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    by_channel: HashMap<String, Vec<(u64, Listener)>>,
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Subscription registry keyed by channel name.
///
/// Cloning is cheap; clones share the same registry.
#[derive(Clone, Default)]
pub struct Listeners {
    inner: Arc<Mutex<Registry>>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `f` for every payload emitted on `channel`.
    pub fn on<F>(&self, channel: impl Into<String>, f: F) -> Subscription
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        let channel = channel.into();
        let mut registry = lock(&self.inner);
        let id = registry.next_id;
        registry.next_id += 1;
        registry
            .by_channel
            .entry(channel.clone())
            .or_default()
            .push((id, Arc::new(f)));

        Subscription {
            registry: Arc::downgrade(&self.inner),
            channel,
            id,
            active: AtomicBool::new(true),
        }
    }

    /// Registers a listener that receives the payload decoded as `T`.
    ///
    /// Payloads that do not decode are logged and dropped; the transport
    /// itself never rejects them.
    pub fn on_typed<T, F>(&self, channel: impl Into<String>, f: F) -> Subscription
    where
        T: DeserializeOwned,
        F: Fn(T) + Send + Sync + 'static,
    {
        let channel = channel.into();
        let name = channel.clone();
        self.on(channel, move |payload| {
            match serde_json::from_value::<T>(payload.clone()) {
                Ok(value) => f(value),
                Err(e) => warn!(channel = %name, "dropping malformed payload: {e}"),
            }
        })
    }

    /// Delivers `payload` to the listeners of `channel`, in registration
    /// order. Returns how many listeners were called.
    pub fn emit(&self, channel: &str, payload: &Value) -> usize {
        // Snapshot so listeners can (un)subscribe without deadlocking.
        let snapshot: Vec<Listener> = lock(&self.inner)
            .by_channel
            .get(channel)
            .map(|entries| entries.iter().map(|(_, l)| l.clone()).collect())
            .unwrap_or_default();

        for listener in &snapshot {
            listener(payload);
        }
        snapshot.len()
    }

    /// Number of listeners currently registered on `channel`.
    pub fn listener_count(&self, channel: &str) -> usize {
        lock(&self.inner)
            .by_channel
            .get(channel)
            .map_or(0, Vec::len)
    }
}

/// Handle returned by [`Listeners::on`].
///
/// Dropping the handle does not unsubscribe; call [`unsubscribe`](Self::unsubscribe).
pub struct Subscription {
    registry: Weak<Mutex<Registry>>,
    channel: String,
    id: u64,
    active: AtomicBool,
}

impl Subscription {
    /// Removes the listener. Safe to call repeatedly and after the registry
    /// is gone.
    pub fn unsubscribe(&self) {
        if !self.active.swap(false, Ordering::SeqCst) {
            return;
        }
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let mut registry = lock(&registry);
        if let Some(entries) = registry.by_channel.get_mut(&self.channel) {
            entries.retain(|(id, _)| *id != self.id);
            if entries.is_empty() {
                registry.by_channel.remove(&self.channel);
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("channel", &self.channel)
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
