//! Change watcher.
//!
//! Bridges filesystem events from notify into the debounced reload pipeline.
//! The serving root is watched non-recursively; only create/modify/remove
//! events whose path carries a watched extension count as relevant.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::time::Instant;

use super::debouncer::ReloadDebouncer;
use super::registry::{ListenerRegistry, ReloadMessage};

/// Default debounce duration in milliseconds.
pub(crate) const DEFAULT_DEBOUNCE_MS: u64 = 100;

/// Extensions watched when the configuration does not name any.
const DEFAULT_WATCH_EXTENSIONS: &[&str] = &["html", "css", "js"];

/// Manages file watching and broadcasting reload notifications.
///
/// Owns the listener registry and keeps the notify watcher alive for the
/// server's lifetime.
pub(crate) struct LiveReloadManager {
    root: PathBuf,
    watch_extensions: Vec<String>,
    registry: Arc<ListenerRegistry>,
    watcher: Option<RecommendedWatcher>,
    debounce_ms: u64,
}

impl LiveReloadManager {
    /// Create a new manager watching `root`.
    ///
    /// `watch_extensions` are normalized to dotless lowercase; `None` selects
    /// the default set.
    #[must_use]
    pub(crate) fn new(root: PathBuf, watch_extensions: Option<Vec<String>>) -> Self {
        let watch_extensions = watch_extensions
            .unwrap_or_else(|| {
                DEFAULT_WATCH_EXTENSIONS
                    .iter()
                    .map(|ext| (*ext).to_owned())
                    .collect()
            })
            .into_iter()
            .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
            .collect();

        Self {
            root,
            watch_extensions,
            registry: Arc::new(ListenerRegistry::new()),
            watcher: None,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }

    /// Set the debounce duration in milliseconds.
    #[must_use]
    pub(crate) fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    /// Registry holding the connected listeners.
    pub(crate) fn registry(&self) -> &Arc<ListenerRegistry> {
        &self.registry
    }

    /// Start the file watcher.
    ///
    /// Spawns a background task that filters, debounces, and broadcasts
    /// filesystem events until the manager is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the file watcher cannot be created.
    pub(crate) fn start(&mut self) -> Result<(), notify::Error> {
        let (tx, rx) = mpsc::channel::<Event>(100);

        // Callback runs on the notify thread; hand events into the async world.
        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            if let Ok(event) = res {
                let _ = tx.blocking_send(event);
            }
        })?;

        watcher.watch(&self.root, RecursiveMode::NonRecursive)?;
        self.watcher = Some(watcher);
        tracing::debug!(root = %self.root.display(), "Watching for file changes");

        let registry = Arc::clone(&self.registry);
        let watch_extensions = self.watch_extensions.clone();
        let window = Duration::from_millis(self.debounce_ms);
        tokio::spawn(async move {
            drive(rx, watch_extensions, window, registry).await;
        });

        Ok(())
    }
}

/// Drive loop: filter events, debounce, broadcast.
///
/// Owns the debounce state exclusively, so a relevant event and an expiring
/// deadline can never interleave mid-operation. Exits when the watcher side
/// of the channel is dropped.
async fn drive(
    mut rx: mpsc::Receiver<Event>,
    watch_extensions: Vec<String>,
    window: Duration,
    registry: Arc<ListenerRegistry>,
) {
    let mut debouncer = ReloadDebouncer::new(window);

    loop {
        match debouncer.deadline() {
            // Pending: a relevant event reschedules, an elapsed deadline fires.
            Some(deadline) => tokio::select! {
                event = rx.recv() => match event {
                    Some(event) => record(&event, &watch_extensions, &mut debouncer),
                    None => break,
                },
                () = tokio::time::sleep_until(deadline) => {
                    if debouncer.fire() {
                        tracing::info!(
                            listeners = registry.listener_count(),
                            "Broadcasting reload"
                        );
                        registry.broadcast(ReloadMessage::Reload);
                    }
                }
            },
            // Idle: wait for the first relevant event.
            None => match rx.recv().await {
                Some(event) => record(&event, &watch_extensions, &mut debouncer),
                None => break,
            },
        }
    }
}

/// Feed one raw event into the debouncer if it is relevant.
fn record(event: &Event, watch_extensions: &[String], debouncer: &mut ReloadDebouncer) {
    if !is_relevant(event, watch_extensions) {
        return;
    }
    tracing::debug!(paths = ?event.paths, "Recorded file change");
    debouncer.schedule(Instant::now());
}

/// Whether an event should feed the debouncer.
///
/// Events without a path are ignored rather than treated as errors; so are
/// kinds other than create/modify/remove and paths outside the watched
/// extension set.
fn is_relevant(event: &Event, watch_extensions: &[String]) -> bool {
    if !matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    ) {
        return false;
    }

    event
        .paths
        .iter()
        .any(|path| has_watched_extension(path, watch_extensions))
}

/// Case-insensitive extension membership test.
fn has_watched_extension(path: &Path, watch_extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            watch_extensions.iter().any(|watched| *watched == ext)
        })
}
