//! Reload client injection.
//!
//! Rewrites served HTML so the browser opens the reload channel: the client
//! script is inserted immediately before the first closing `</body>` tag.
//! Documents without a closing body tag pass through untouched.

use std::borrow::Cow;

/// Script injected into served HTML documents.
///
/// Opens an `EventSource` on the reload endpoint. A `reload` payload reloads
/// the page; a dropped connection reloads after a short delay, so the reload
/// doubles as a reconnect.
const CLIENT_SCRIPT: &str = r"<script>
(function() {
    var source = new EventSource('/__livereload');
    source.onmessage = function(event) {
        if (event.data === 'reload') {
            window.location.reload();
        }
    };
    source.onerror = function() {
        setTimeout(function() { window.location.reload(); }, 2000);
    };
})();
</script>
";

const BODY_CLOSE: &str = "</body>";

/// Insert the reload client before the first `</body>` tag.
///
/// The surrounding document is left byte-identical. HTML without a closing
/// body tag is returned unmodified.
pub(crate) fn inject_client_script(html: &str) -> Cow<'_, str> {
    match html.find(BODY_CLOSE) {
        Some(index) => {
            let mut out = String::with_capacity(html.len() + CLIENT_SCRIPT.len());
            out.push_str(&html[..index]);
            out.push_str(CLIENT_SCRIPT);
            out.push_str(&html[index..]);
            Cow::Owned(out)
        }
        None => Cow::Borrowed(html),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_injects_before_closing_body_tag() {
        let html = "<html><body><h1>Hi</h1></body></html>";
        let injected = inject_client_script(html);

        assert_eq!(
            injected,
            format!("<html><body><h1>Hi</h1>{CLIENT_SCRIPT}</body></html>")
        );
    }

    #[test]
    fn test_injects_exactly_once() {
        let html = "<body>text</body>";
        let injected = inject_client_script(html);

        assert_eq!(injected.matches("<script>").count(), 1);
        assert_eq!(injected.matches("EventSource").count(), 1);
    }

    #[test]
    fn test_surrounding_content_is_untouched() {
        let html = "<html><body>before</body>after</html>";
        let injected = inject_client_script(html);

        assert!(injected.starts_with("<html><body>before"));
        assert!(injected.ends_with("</body>after</html>"));
    }

    #[test]
    fn test_only_first_closing_tag_is_targeted() {
        let html = "<body>a</body><body>b</body>";
        let injected = inject_client_script(html);

        assert_eq!(injected.matches("<script>").count(), 1);
        let script_at = injected.find("<script>").unwrap();
        let first_close = injected.find("</body>").unwrap();
        assert!(script_at < first_close);
    }

    #[test]
    fn test_html_without_body_tag_passes_through() {
        let html = "<p>fragment</p>";
        let injected = inject_client_script(html);

        assert!(matches!(injected, Cow::Borrowed(_)));
        assert_eq!(injected, html);
    }
}
