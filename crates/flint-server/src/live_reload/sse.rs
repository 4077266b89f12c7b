//! SSE handler for live reload.
//!
//! Each connection registers a listener with the registry and streams its
//! messages as `text/event-stream` frames until the client disconnects.

use std::convert::Infallible;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Response};
use futures_util::Stream;
use tokio::sync::mpsc;

use super::registry::{ListenerId, ListenerRegistry, ReloadMessage};
use crate::state::AppState;

/// Handle GET /__livereload.
///
/// Sends the `connected` handshake frame immediately, then a `reload` frame
/// for every broadcast until the client goes away.
pub(crate) async fn sse_handler(State(state): State<Arc<AppState>>) -> Response {
    let Some(live_reload) = &state.live_reload else {
        // Route is only mounted when live reload is enabled; guard kept for
        // direct handler use.
        return StatusCode::NOT_FOUND.into_response();
    };

    let registry = Arc::clone(live_reload.registry());
    let (id, rx) = registry.register();
    let stream = ListenerStream { registry, id, rx };

    (
        [
            (header::CACHE_CONTROL, "no-cache"),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        ],
        Sse::new(stream),
    )
        .into_response()
}

/// Stream adapter that forwards registry messages as SSE events and
/// unregisters the listener when the connection drops.
struct ListenerStream {
    registry: Arc<ListenerRegistry>,
    id: ListenerId,
    rx: mpsc::UnboundedReceiver<ReloadMessage>,
}

impl Stream for ListenerStream {
    type Item = Result<Event, Infallible>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx
            .poll_recv(cx)
            .map(|message| message.map(|m| Ok(Event::default().data(m.as_str()))))
    }
}

impl Drop for ListenerStream {
    fn drop(&mut self) {
        self.registry.unregister(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_dropping_stream_unregisters_listener() {
        let registry = Arc::new(ListenerRegistry::new());
        let (id, rx) = registry.register();
        let stream = ListenerStream {
            registry: Arc::clone(&registry),
            id,
            rx,
        };
        assert_eq!(registry.listener_count(), 1);

        drop(stream);

        assert_eq!(registry.listener_count(), 0);
    }

    #[tokio::test]
    async fn test_unregister_after_drop_is_idempotent() {
        let registry = Arc::new(ListenerRegistry::new());
        let (id, rx) = registry.register();
        let stream = ListenerStream {
            registry: Arc::clone(&registry),
            id,
            rx,
        };

        // Disconnect cleanup can race a manual unregister; both are no-ops
        // the second time around.
        registry.unregister(id);
        drop(stream);

        assert_eq!(registry.listener_count(), 0);
    }
}
