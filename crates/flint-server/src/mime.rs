//! Content-type resolution.
//!
//! Fixed mapping from file extension to content-type string, immutable for
//! the process lifetime. Anything outside the table is served as a generic
//! binary.

use std::path::Path;

/// Content type for HTML documents (the script-injection target).
pub(crate) const HTML: &str = "text/html";

/// Content type served when the extension is unknown or missing.
pub(crate) const OCTET_STREAM: &str = "application/octet-stream";

/// Return the content-type for a path based on its extension.
///
/// Lookup is case-insensitive. Unknown and missing extensions yield
/// [`OCTET_STREAM`].
pub(crate) fn content_type_for(path: &Path) -> &'static str {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return OCTET_STREAM;
    };

    match ext.to_ascii_lowercase().as_str() {
        "html" => HTML,
        "css" => "text/css",
        "js" => "text/javascript",
        "json" => "application/json",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        _ => OCTET_STREAM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_content_type_for_known_types() {
        assert_eq!(content_type_for(Path::new("index.html")), "text/html");
        assert_eq!(content_type_for(Path::new("style.css")), "text/css");
        assert_eq!(content_type_for(Path::new("app.js")), "text/javascript");
        assert_eq!(
            content_type_for(Path::new("data.json")),
            "application/json"
        );
        assert_eq!(content_type_for(Path::new("logo.png")), "image/png");
        assert_eq!(content_type_for(Path::new("photo.jpg")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("photo.jpeg")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("anim.gif")), "image/gif");
        assert_eq!(content_type_for(Path::new("icon.svg")), "image/svg+xml");
        assert_eq!(content_type_for(Path::new("fav.ico")), "image/x-icon");
        assert_eq!(content_type_for(Path::new("font.woff")), "font/woff");
        assert_eq!(content_type_for(Path::new("font.woff2")), "font/woff2");
    }

    #[test]
    fn test_content_type_is_case_insensitive() {
        assert_eq!(content_type_for(Path::new("INDEX.HTML")), "text/html");
        assert_eq!(content_type_for(Path::new("Style.Css")), "text/css");
    }

    #[test]
    fn test_unknown_extension_is_octet_stream() {
        assert_eq!(content_type_for(Path::new("archive.tar")), OCTET_STREAM);
    }

    #[test]
    fn test_missing_extension_is_octet_stream() {
        assert_eq!(content_type_for(Path::new("README")), OCTET_STREAM);
        assert_eq!(content_type_for(Path::new("")), OCTET_STREAM);
    }
}
