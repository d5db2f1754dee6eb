//! Escaping helpers for DOT and HTML output.
//!
//! User-supplied value names end up inside quoted DOT strings, HTML-like DOT table labels
//! and the HTML log file; these helpers keep such names from breaking the surrounding
//! markup.

/// Escapes a string for safe use inside a quoted DOT string.
///
/// Handles backslashes, double quotes and newlines, which are the characters with special
/// meaning inside `"..."` DOT literals.
///
/// # Examples
///
/// ```rust
/// use lifescope::render::escape::escape_dot;
///
/// assert_eq!(escape_dot("say \"hi\""), "say \\\"hi\\\"");
/// ```
#[must_use]
pub fn escape_dot(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\r', "")
        .replace('\n', "\\n")
}

/// Escapes a string for safe use as HTML text content.
///
/// Used both for the cells of DOT table labels (which Graphviz parses as HTML) and for the
/// HTML log backend.
///
/// # Examples
///
/// ```rust
/// use lifescope::render::escape::escape_html;
///
/// assert_eq!(escape_html("a<b & c>d"), "a&lt;b &amp; c&gt;d");
/// ```
#[must_use]
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_dot_plain() {
        assert_eq!(escape_dot("hello"), "hello");
    }

    #[test]
    fn test_escape_dot_quotes_and_backslash() {
        assert_eq!(escape_dot("a\\\"b"), "a\\\\\\\"b");
    }

    #[test]
    fn test_escape_dot_newlines() {
        assert_eq!(escape_dot("line1\r\nline2"), "line1\\nline2");
    }

    #[test]
    fn test_escape_html_plain() {
        assert_eq!(escape_html("tmp3"), "tmp3");
    }

    #[test]
    fn test_escape_html_amp_first() {
        assert_eq!(escape_html("&lt;"), "&amp;lt;");
    }

    #[test]
    fn test_escape_html_history_notation() {
        assert_eq!(escape_html("<id0|54>"), "&lt;id0|54&gt;");
    }
}
