//! Live reload.
//!
//! Watches the serving root for file changes and pushes reload notifications
//! to connected browsers over Server-Sent Events. Changes are debounced so an
//! editor save that emits several filesystem events triggers one reload.

mod debouncer;
mod inject;
pub(crate) mod registry;
mod sse;
mod watcher;

pub(crate) use inject::inject_client_script;
pub(crate) use sse::sse_handler;
pub(crate) use watcher::{DEFAULT_DEBOUNCE_MS, LiveReloadManager};
