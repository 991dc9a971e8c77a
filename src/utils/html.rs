// src/utils/html.rs

/// Strips unsafe markup from user-supplied text before it is stored.
///
/// Whitelist based: harmless inline tags such as `<b>` survive, `<script>`
/// disappears together with its body, and event-handler attributes are
/// dropped. Surrounding whitespace is trimmed so a field that contained only
/// markup ends up empty and fails the non-empty checks.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_plain_text() {
        assert_eq!(clean_html("  Paris  "), "Paris");
    }

    #[test]
    fn test_removes_script() {
        assert_eq!(clean_html("<script>alert(1)</script>"), "");
        assert_eq!(clean_html("<b onclick=\"x()\">bold</b>"), "<b>bold</b>");
    }
}
