//! Reload listener registry.
//!
//! Ordered collection of the currently connected reload listeners, with a
//! broadcast primitive. Each listener is the sending half of an unbounded
//! channel whose receiving half is drained by that listener's SSE stream.

use std::sync::Mutex;

use tokio::sync::mpsc;

/// Message pushed to a connected listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ReloadMessage {
    /// Initial handshake confirming the channel is open.
    Connected,
    /// Instruct the browser to reload the page.
    Reload,
}

impl ReloadMessage {
    /// Wire payload for the SSE `data:` field.
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::Reload => "reload",
        }
    }
}

/// Identifier for a registered listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ListenerId(u64);

/// One registered listener.
struct Listener {
    id: ListenerId,
    tx: mpsc::UnboundedSender<ReloadMessage>,
}

/// Registry of currently connected reload listeners.
///
/// A listener appears at most once; removal is idempotent. All mutation goes
/// through one mutex, so registration, removal, and broadcast never
/// interleave mid-operation.
pub(crate) struct ListenerRegistry {
    inner: Mutex<RegistryInner>,
}

struct RegistryInner {
    next_id: u64,
    listeners: Vec<Listener>,
}

impl ListenerRegistry {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(RegistryInner {
                next_id: 0,
                listeners: Vec::new(),
            }),
        }
    }

    /// Register a new listener, returning its id and receiving channel.
    ///
    /// The handshake message is enqueued before the listener becomes visible
    /// to broadcasts, so the first frame a client sees is always
    /// [`ReloadMessage::Connected`].
    pub(crate) fn register(&self) -> (ListenerId, mpsc::UnboundedReceiver<ReloadMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.inner.lock().unwrap();

        let id = ListenerId(inner.next_id);
        inner.next_id += 1;

        let _ = tx.send(ReloadMessage::Connected);
        inner.listeners.push(Listener { id, tx });

        tracing::debug!(
            id = id.0,
            listeners = inner.listeners.len(),
            "Reload listener registered"
        );
        (id, rx)
    }

    /// Remove a listener.
    ///
    /// Removing an unknown or already-removed id is a no-op.
    pub(crate) fn unregister(&self, id: ListenerId) {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.listeners.len();
        inner.listeners.retain(|listener| listener.id != id);

        if inner.listeners.len() < before {
            tracing::debug!(
                id = id.0,
                listeners = inner.listeners.len(),
                "Reload listener unregistered"
            );
        }
    }

    /// Send a message to every listener, in registration order.
    ///
    /// Delivery is fire-and-forget: a listener whose receiver is gone is
    /// skipped and cleaned up by its own disconnect path.
    pub(crate) fn broadcast(&self, message: ReloadMessage) {
        let inner = self.inner.lock().unwrap();
        for listener in &inner.listeners {
            let _ = listener.tx.send(message);
        }
    }

    /// Number of currently registered listeners.
    pub(crate) fn listener_count(&self) -> usize {
        self.inner.lock().unwrap().listeners.len()
    }

    #[cfg(test)]
    fn ids(&self) -> Vec<ListenerId> {
        self.inner
            .lock()
            .unwrap()
            .listeners
            .iter()
            .map(|listener| listener.id)
            .collect()
    }
}
