//! Removal patterns for each cleaning pass.

use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::Serialize;

/// A group of related markup removals applied to exported HTML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CleanPass {
    /// WordPress head links and meta tags, emoji loader, core block and media stylesheets.
    Wordpress,
    /// Assets of removed plugins, unused jQuery UI widgets and `wp-includes` dist scripts.
    Plugins,
    /// Theme and WordPress tokens in the `<body class="...">` attribute.
    BodyClasses,
    /// Stylesheets and scripts served by theme PHP callbacks.
    PhpCallbacks,
}

impl CleanPass {
    /// Every pass, in the order they are applied.
    pub const ALL: [CleanPass; 4] = [
        CleanPass::Wordpress,
        CleanPass::Plugins,
        CleanPass::BodyClasses,
        CleanPass::PhpCallbacks,
    ];

    /// Apply this pass to `content`, returning the rewritten text.
    pub fn apply(self, content: &str) -> String {
        match self {
            CleanPass::Wordpress => {
                let text = remove_all(wordpress_patterns(), content);
                strip_scripts_containing(&text, "_wpemojiSettings")
            }
            CleanPass::Plugins => remove_all(plugin_patterns(), content),
            CleanPass::BodyClasses => strip_body_classes(content),
            CleanPass::PhpCallbacks => remove_all(php_callback_patterns(), content),
        }
    }
}

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|pattern| Regex::new(pattern).expect("invalid cleaning regex"))
        .collect()
}

fn wordpress_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        compile(&[
            r#"(?i)<link rel="profile"[^>]*>"#,
            r#"(?i)<link rel="pingback"[^>]*>"#,
            r#"(?i)<link rel="alternate"[^>]*rss[^>]*>"#,
            r#"(?i)<link rel="https://api\.w\.org/"[^>]*>"#,
            r#"(?i)<link rel="EditURI"[^>]*>"#,
            r#"(?i)<meta name="generator"[^>]*WordPress[^>]*>"#,
            r#"(?i)<meta name="generator"[^>]*WPBakery[^>]*>"#,
            r#"(?i)<link rel="canonical"[^>]*>"#,
            r#"(?i)<link rel="shortlink"[^>]*>"#,
            r#"(?is)<style[^>]*wp-emoji[^>]*>.*?</style>"#,
            r#"(?i)<link[^>]*wp-block-library[^>]*>"#,
            r#"(?i)<link[^>]*mediaelement[^>]*>"#,
            r#"(?i)<style[^>]*>\.recentcomments[^<]*</style>"#,
        ])
    })
}

fn plugin_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        compile(&[
            r#"(?i)<link[^>]*bridge-core[^>]*>"#,
            r#"(?i)<link[^>]*tablepress[^>]*>"#,
            r#"(?is)<script[^>]*jquery/ui/(?:accordion|autocomplete|button|controlgroup|checkboxradio|datepicker|dialog|draggable|droppable|effect|menu|mouse|progressbar|resizable|selectable|slider|sortable|spinner|tabs|tooltip)[^>]*>.*?</script>"#,
            r#"(?is)<script[^>]*wp-includes/js/dist/(?:hooks|i18n|dom-ready|a11y)[^>]*>.*?</script>"#,
            r#"(?is)<script[^>]*comment-reply[^>]*>.*?</script>"#,
            r#"(?is)<script[^>]*mediaelement[^>]*>.*?</script>"#,
        ])
    })
}

fn php_callback_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        compile(&[
            r#"(?i)<link\b[^>]*href="[^"]*_callback\.php[^"]*"[^>]*>\s*"#,
            r#"(?is)<script\b[^>]*src="[^"]*_callback\.php[^"]*"[^>]*>.*?</script>\s*"#,
        ])
    })
}

fn script_block() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script>").expect("invalid script block regex"))
}

fn body_class_attribute() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?i)(<body\b[^>]*?\bclass\s*=\s*")([^"]*)(")"#)
            .expect("invalid body class regex")
    })
}

fn wordpress_body_class() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^(?:wp-singular|page-template.*|page-id-\d+|wp-theme-bridge|bridge-core.*|qode.*|wpb-js-composer|js-comp-ver.*|vc_responsive)$",
        )
        .expect("invalid body class token regex")
    })
}

fn remove_all(patterns: &[Regex], content: &str) -> String {
    let mut text = content.to_string();
    for pattern in patterns {
        text = pattern.replace_all(&text, "").into_owned();
    }
    text
}

/// Drop whole `<script>` elements whose body mentions `marker`, leaving every other script alone.
fn strip_scripts_containing(content: &str, marker: &str) -> String {
    script_block()
        .replace_all(content, |caps: &Captures| {
            let block = &caps[0];
            if block.contains(marker) {
                String::new()
            } else {
                block.to_string()
            }
        })
        .into_owned()
}

/// Remove WordPress class tokens from `<body class="...">`, leaving the attribute untouched when
/// none of its tokens match.
fn strip_body_classes(content: &str) -> String {
    body_class_attribute()
        .replace_all(content, |caps: &Captures| {
            let classes = &caps[2];
            let kept: Vec<&str> = classes
                .split_whitespace()
                .filter(|token| !wordpress_body_class().is_match(token))
                .collect();

            if kept.len() == classes.split_whitespace().count() {
                caps[0].to_string()
            } else {
                format!("{}{}{}", &caps[1], kept.join(" "), &caps[3])
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wordpress_pass_removes_head_noise() {
        let html = r#"<head>
<link rel="profile" href="https://gmpg.org/xfn/11">
<meta name="generator" content="WordPress 6.5">
<link rel="stylesheet" id="wp-block-library-css" href="wp-includes/css/dist/block-library/style.min.css">
<link rel="stylesheet" href="wp-content/themes/bridge/style.css">
</head>"#;
        let cleaned = CleanPass::Wordpress.apply(html);

        assert!(!cleaned.contains("gmpg.org"));
        assert!(!cleaned.contains("generator"));
        assert!(!cleaned.contains("block-library"));
        assert!(cleaned.contains(r#"<link rel="stylesheet" href="wp-content/themes/bridge/style.css">"#));
    }

    #[test]
    fn emoji_script_removal_spares_neighbouring_scripts() {
        let html = "<script src=\"jquery.min.js\"></script>\n<script>window._wpemojiSettings = {};</script>\n<script>var keep = 1;</script>";
        let cleaned = CleanPass::Wordpress.apply(html);

        assert_eq!(
            cleaned,
            "<script src=\"jquery.min.js\"></script>\n\n<script>var keep = 1;</script>"
        );
    }

    #[test]
    fn plugin_pass_removes_whole_script_elements() {
        let html = r#"<script src="wp-includes/js/jquery/ui/core.min.js"></script><script src="wp-includes/js/jquery/ui/datepicker.min.js?ver=1.13"></script><script src="wp-includes/js/comment-reply.min.js"></script>"#;
        let cleaned = CleanPass::Plugins.apply(html);

        assert_eq!(cleaned, r#"<script src="wp-includes/js/jquery/ui/core.min.js"></script>"#);
    }

    #[test]
    fn body_classes_only_touch_the_body_attribute() {
        let html = r#"<body class="home page-id-12 qode-theme-ver-1 wpb-js-composer js-comp-ver-6.1 vc_responsive custom"><div class="qode-slider">"#;
        let cleaned = CleanPass::BodyClasses.apply(html);

        assert_eq!(cleaned, r#"<body class="home custom"><div class="qode-slider">"#);
    }

    #[test]
    fn body_without_wordpress_classes_is_left_verbatim() {
        let html = "<body class=\"home   custom\">";
        assert_eq!(CleanPass::BodyClasses.apply(html), html);
    }

    #[test]
    fn php_callback_pass_removes_dynamic_assets() {
        let html = r#"<link rel="stylesheet" id="bridge-style-dynamic-css" href="wp-content/themes/bridge/css/style_dynamic_callback.php?ver=6" type="text/css" media="all">
<script type="text/javascript" src="wp-content/themes/bridge/js/default_dynamic_callback.php"></script>
<link rel="stylesheet" href="style.css">"#;
        let cleaned = CleanPass::PhpCallbacks.apply(html);

        assert_eq!(cleaned, r#"<link rel="stylesheet" href="style.css">"#);
    }
}
