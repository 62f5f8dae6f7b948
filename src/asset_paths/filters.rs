use regex::Regex;

fn reference_ignores() -> &'static [Regex] {
    use std::sync::OnceLock;

    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS
        .get_or_init(|| {
            vec![
                Regex::new(r"(?i)^https?://").expect("invalid http(s) regex"),
                Regex::new(r"^//").expect("invalid protocol-relative regex"),
                Regex::new(r"(?i)^data:").expect("invalid data URI regex"),
                Regex::new(r"(?i)^mailto:").expect("invalid mailto regex"),
                Regex::new(r"(?i)^tel:").expect("invalid tel regex"),
                Regex::new(r"^#").expect("invalid fragment regex"),
            ]
        })
        .as_slice()
}

/// Determine whether an extracted reference points outside the exported tree.
///
/// External URLs, data URIs and in-page fragments can never match a file on disk, so they are
/// dropped before they reach the reference set.
pub fn should_ignore_reference(value: &str) -> bool {
    reference_ignores()
        .iter()
        .any(|pattern| pattern.is_match(value.trim()))
}
