/// Sanitizes free-text profile fields with ammonia's whitelist.
///
/// Safe inline tags survive; scripts, iframes and event-handler
/// attributes are stripped. Blank input collapses to `None`.
pub fn clean_optional_html(input: Option<&str>) -> Option<String> {
    input
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ammonia::clean)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_script_tags() {
        let cleaned = clean_optional_html(Some("<b>hi</b><script>alert(1)</script>")).unwrap();
        assert_eq!(cleaned, "<b>hi</b>");
    }

    #[test]
    fn blank_becomes_none() {
        assert_eq!(clean_optional_html(Some("   ")), None);
        assert_eq!(clean_optional_html(None), None);
    }
}
