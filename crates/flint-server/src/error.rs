//! Server error types.

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

use crate::mime;

/// Request-level error for the static responder.
///
/// `NotFound` renders the minimal 404 page; any other read failure surfaces
/// the underlying `io::ErrorKind` so a developer can tell a permission
/// problem from a transient I/O failure. Neither aborts the process.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    #[error("file not found: {0}")]
    NotFound(String),

    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound(_) => (
                StatusCode::NOT_FOUND,
                [(header::CONTENT_TYPE, mime::HTML)],
                "<h1>404 - File Not Found</h1>",
            )
                .into_response(),
            Self::Io(err) => {
                tracing::warn!(error = %err, "File read failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Server Error: {}", err.kind()),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_renders_404_page() {
        let response = ServerError::NotFound("/missing.html".to_owned()).into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html"
        );
        let body = body_string(response).await;
        assert!(body.contains("404 - File Not Found"));
    }

    #[tokio::test]
    async fn test_io_error_surfaces_kind() {
        let err = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
        let response = ServerError::Io(err).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_string(response).await;
        assert_eq!(body, "Server Error: permission denied");
    }
}
