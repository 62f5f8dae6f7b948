//! Project configuration loader describing the exported site and the paths cleanup may touch.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::project::SiteLayout;

/// File name looked up in the site root when no explicit configuration is given.
pub const DEFAULT_CONFIG_FILE: &str = "static-cleanup.json";

/// Discoverable project configuration. Every field falls back to the values used for the
/// original brochure-site export.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Directory holding uploaded media, relative to the site root.
    pub uploads_dir: String,
    /// Extensions treated as images.
    pub image_extensions: Vec<String>,
    /// Extensions scanned for asset references.
    pub markup_extensions: Vec<String>,
    /// Path segments excluded from every scan.
    pub excluded_segments: Vec<String>,
    /// Directory holding installed plugins.
    pub plugins_dir: String,
    /// Plugin directories removed by `prune`.
    pub unused_plugins: Vec<String>,
    /// Backend directories removed by `prune --remove-includes`.
    pub backend_dirs: Vec<String>,
    /// Backend files and directories removed by `prune`.
    pub backend_files: Vec<String>,
    /// Theme PHP callback files removed by `prune`.
    pub php_callback_files: Vec<String>,
    /// File name swept from every directory.
    pub junk_file_name: String,
    /// Page-builder plugin directory.
    pub page_builder_dir: String,
    /// Files kept inside the page-builder directory.
    pub page_builder_keep: Vec<String>,
    /// Slider template uploads directory.
    pub templates_dir: String,
    /// Files checked by `verify`.
    pub essential_files: Vec<String>,
    /// Reference prefixes whose targets `verify` resolves on disk.
    pub watched_prefixes: Vec<String>,
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            uploads_dir: "wp-content/uploads".into(),
            image_extensions: strings(&["jpg", "jpeg", "png", "gif", "svg", "webp"]),
            markup_extensions: strings(&["html", "css"]),
            excluded_segments: strings(&["feed"]),
            plugins_dir: "wp-content/plugins".into(),
            unused_plugins: strings(&[
                "wp-content/plugins/tablepress",
                "wp-content/plugins/bridge-core",
            ]),
            backend_dirs: strings(&["wp-includes"]),
            backend_files: strings(&[
                "xmlrpc.php",
                "wp-config-sample.php",
                "wp-comments-post.php",
                "wp-cron.php",
                "wp-links-opml.php",
                "wp-load.php",
                "wp-login.php",
                "wp-mail.php",
                "wp-settings.php",
                "wp-signup.php",
                "wp-trackback.php",
                "wp-admin",
            ]),
            php_callback_files: strings(&[
                "wp-content/themes/bridge/css/style_dynamic_callback.php",
                "wp-content/themes/bridge/css/style_dynamic_responsive_callback.php",
                "wp-content/themes/bridge/js/default_dynamic_callback.php",
            ]),
            junk_file_name: ".DS_Store".into(),
            page_builder_dir: "wp-content/plugins/js_composer".into(),
            page_builder_keep: strings(&[
                "assets/css/js_composer.min.css",
                "assets/js/dist/js_composer_front.min.js",
            ]),
            templates_dir: "wp-content/uploads/revslider".into(),
            essential_files: strings(&[
                "index.html",
                "wp-includes/js/jquery/jquery.min.js",
                "wp-includes/js/jquery/jquery-migrate.min.js",
                "wp-includes/js/jquery/ui/core.min.js",
                "wp-includes/js/hoverIntent.min.js",
                "wp-includes/js/jquery/jquery.form.min.js",
                "wp-content/themes/bridge/js/default.min.js",
                "wp-content/plugins/js_composer/assets/js/dist/js_composer_front.min.js",
                "wp-content/themes/bridge/style.css",
                "wp-content/themes/bridge/css/stylesheet.min.css",
                "wp-content/themes/bridge/css/responsive.min.css",
                "wp-content/plugins/js_composer/assets/css/js_composer.min.css",
            ]),
            watched_prefixes: strings(&["wp-includes/"]),
        }
    }
}

/// Errors that can occur while loading a configuration file.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    Io {
        /// Path that caused the error.
        path: PathBuf,
        /// Source I/O error.
        source: std::io::Error,
    },
    /// Failed to parse the JSON configuration.
    Parse {
        /// Path that caused the error.
        path: PathBuf,
        /// Source parse error.
        source: serde_json::Error,
    },
}

impl ProjectConfig {
    /// Look for [`DEFAULT_CONFIG_FILE`] in the site root.
    ///
    /// A missing file yields the defaults; a file that exists but cannot be read or parsed is
    /// reported so a typo does not silently widen what `prune` deletes.
    pub fn discover(site_root: &Path) -> Result<Self, ConfigError> {
        let candidate = site_root.join(DEFAULT_CONFIG_FILE);
        match fs::read_to_string(&candidate) {
            Ok(content) => Self::parse(&candidate, &content),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io {
                path: candidate,
                source: err,
            }),
        }
    }

    /// Read configuration from an explicit JSON file. The file must exist.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|err| ConfigError::Io {
            path: path.to_path_buf(),
            source: err,
        })?;
        Self::parse(path, &content)
    }

    fn parse(path: &Path, content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            source: err,
        })
    }

    /// Convert the configuration into an owned layout description.
    pub fn into_layout(self) -> SiteLayout {
        SiteLayout {
            uploads_dir: self.uploads_dir,
            image_extensions: self.image_extensions,
            markup_extensions: self.markup_extensions,
            excluded_segments: self.excluded_segments,
            plugins_dir: self.plugins_dir,
            unused_plugins: self.unused_plugins,
            backend_dirs: self.backend_dirs,
            backend_files: self.backend_files,
            php_callback_files: self.php_callback_files,
            junk_file_name: self.junk_file_name,
            page_builder_dir: self.page_builder_dir,
            page_builder_keep: self.page_builder_keep,
            templates_dir: self.templates_dir,
            essential_files: self.essential_files,
            watched_prefixes: self.watched_prefixes,
        }
    }

    /// Borrowing conversion into a layout, cloning the underlying strings.
    pub fn to_layout(&self) -> SiteLayout {
        self.clone().into_layout()
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}
