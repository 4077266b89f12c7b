//! Static file serving.
//!
//! Resolves request paths against the serving root and serves file contents,
//! injecting the live-reload client script into HTML documents.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{StatusCode, header};
use axum::response::Response;

use crate::error::ServerError;
use crate::live_reload;
use crate::mime;
use crate::state::AppState;

/// Create router for static file serving.
pub(crate) fn static_router() -> Router<Arc<AppState>> {
    Router::new().fallback(serve_file)
}

/// Resolve a request path to a filesystem path and content type.
///
/// `/` resolves to the default document and query strings are stripped. The
/// remainder is joined onto the serving root as-is: there is no traversal
/// containment beyond the join, so callers exposing the server to untrusted
/// input must add their own check.
fn resolve(
    request_path: &str,
    root: &Path,
    default_document: &str,
) -> (PathBuf, &'static str) {
    let path = request_path.split('?').next().unwrap_or(request_path);
    let relative = if path == "/" || path.is_empty() {
        default_document
    } else {
        path.trim_start_matches('/')
    };

    let file_path = root.join(relative);
    let content_type = mime::content_type_for(&file_path);
    (file_path, content_type)
}

/// Serve a static file, injecting the reload client into HTML payloads.
async fn serve_file(
    State(state): State<Arc<AppState>>,
    req: Request,
) -> Result<Response, ServerError> {
    let (file_path, content_type) =
        resolve(req.uri().path(), &state.root, &state.default_document);

    let content = tokio::fs::read(&file_path).await.map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            ServerError::NotFound(req.uri().path().to_owned())
        } else {
            ServerError::Io(err)
        }
    })?;

    let body = if content_type == mime::HTML && state.live_reload_enabled() {
        let html = String::from_utf8_lossy(&content);
        Body::from(live_reload::inject_client_script(&html).into_owned())
    } else {
        Body::from(content)
    };

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .body(body)
        .unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_resolve_root_uses_default_document() {
        let (path, content_type) = resolve("/", Path::new("/site"), "index.html");
        assert_eq!(path, PathBuf::from("/site/index.html"));
        assert_eq!(content_type, "text/html");
    }

    #[test]
    fn test_resolve_joins_onto_root() {
        let (path, content_type) = resolve("/css/style.css", Path::new("/site"), "index.html");
        assert_eq!(path, PathBuf::from("/site/css/style.css"));
        assert_eq!(content_type, "text/css");
    }

    #[test]
    fn test_resolve_strips_query_string() {
        let (path, _) = resolve("/app.js?v=42", Path::new("/site"), "index.html");
        assert_eq!(path, PathBuf::from("/site/app.js"));
    }

    #[test]
    fn test_resolve_unknown_extension_is_binary() {
        let (_, content_type) = resolve("/download.tar", Path::new("/site"), "index.html");
        assert_eq!(content_type, mime::OCTET_STREAM);
    }

    #[test]
    fn test_resolve_respects_configured_default_document() {
        let (path, _) = resolve("/", Path::new("/site"), "home.html");
        assert_eq!(path, PathBuf::from("/site/home.html"));
    }
}
