use regex::Regex;

/// Kind of source file, which selects the extraction patterns applied to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// HTML documents: attributes and inline `background-image` declarations.
    Markup,
    /// Stylesheets: every `url(...)` payload.
    Stylesheet,
}

fn markup_patterns() -> &'static [Regex] {
    use std::sync::OnceLock;

    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS
        .get_or_init(|| {
            vec![
                Regex::new(
                    r#"(?i)\bsrc\s*=\s*["']([^"']*?\.(?:jpe?g|png|gif|svg|webp))(?:\?[^"']*)?["']"#,
                )
                .expect("invalid image src regex"),
                Regex::new(
                    r#"(?i)background-image\s*:\s*url\(\s*["']?([^"')\s]*?\.(?:jpe?g|png|gif|svg|webp))(?:\?[^"')\s]*)?["']?\s*\)"#,
                )
                .expect("invalid background-image regex"),
                Regex::new(r#"(?i)<link\b[^>]*?\bhref\s*=\s*["']([^"']*?\.css)(?:\?[^"']*)?["']"#)
                    .expect("invalid stylesheet link regex"),
                Regex::new(r#"(?i)<script\b[^>]*?\bsrc\s*=\s*["']([^"']*?\.js)(?:\?[^"']*)?["']"#)
                    .expect("invalid script src regex"),
            ]
        })
        .as_slice()
}

fn stylesheet_patterns() -> &'static [Regex] {
    use std::sync::OnceLock;

    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS
        .get_or_init(|| {
            vec![
                Regex::new(
                    r#"(?i)url\(\s*["']?([^"')\s]*?\.(?:jpe?g|png|gif|svg|webp))(?:\?[^"')\s]*)?["']?\s*\)"#,
                )
                .expect("invalid css url regex"),
            ]
        })
        .as_slice()
}

fn attribute_value_pattern() -> &'static Regex {
    use std::sync::OnceLock;

    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?i)\b(?:src|href)\s*=\s*["']([^"']*)["']"#)
            .expect("invalid attribute value regex")
    })
}

/// Extraction patterns for a source kind. Capture group 1 holds the raw reference.
pub fn patterns_for(kind: SourceKind) -> &'static [Regex] {
    match kind {
        SourceKind::Markup => markup_patterns(),
        SourceKind::Stylesheet => stylesheet_patterns(),
    }
}

/// Raw captures of every pattern for `kind`, in pattern order, without normalisation.
pub fn raw_references(content: &str, kind: SourceKind) -> Vec<&str> {
    patterns_for(kind)
        .iter()
        .flat_map(|pattern| pattern.captures_iter(content))
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

/// Every `src`/`href` attribute value in `content`, regardless of extension.
pub fn attribute_values(content: &str) -> Vec<&str> {
    attribute_value_pattern()
        .captures_iter(content)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}
