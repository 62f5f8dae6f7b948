//! Layout of the exported site: where assets live and which literal paths the cleanup touches.

use std::path::{Path, PathBuf};

/// Owned description of the exported site, produced from [`crate::config::ProjectConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLayout {
    /// Directory (relative to the site root) holding uploaded media.
    pub uploads_dir: String,
    /// Extensions treated as images when building the asset inventory.
    pub image_extensions: Vec<String>,
    /// Extensions of files scanned for asset references.
    pub markup_extensions: Vec<String>,
    /// Path segments that take a file out of every scan (feeds, by default).
    pub excluded_segments: Vec<String>,
    /// Directory holding installed plugins.
    pub plugins_dir: String,
    /// Plugin directories deleted outright.
    pub unused_plugins: Vec<String>,
    /// Backend directories deleted only on request (`wp-includes`).
    pub backend_dirs: Vec<String>,
    /// Backend PHP entry points and the admin directory, deleted by every prune.
    pub backend_files: Vec<String>,
    /// Theme PHP files that generated dynamic CSS/JS on the live site.
    pub php_callback_files: Vec<String>,
    /// File name swept from every directory.
    pub junk_file_name: String,
    /// Page-builder plugin directory pruned down to [`SiteLayout::page_builder_keep`].
    pub page_builder_dir: String,
    /// Files kept inside the page-builder directory, relative to it.
    pub page_builder_keep: Vec<String>,
    /// Slider template uploads reported separately by the footprint report.
    pub templates_dir: String,
    /// Files the deployment cannot work without.
    pub essential_files: Vec<String>,
    /// Reference prefixes whose targets must exist on disk.
    pub watched_prefixes: Vec<String>,
}

impl SiteLayout {
    /// Absolute path of the uploads directory for a site rooted at `root`.
    pub fn uploads_path(&self, root: &Path) -> PathBuf {
        root.join(&self.uploads_dir)
    }

    /// Returns `true` when `path` carries one of the configured image extensions.
    pub fn is_image(&self, path: &Path) -> bool {
        has_extension(path, &self.image_extensions)
    }

    /// Returns `true` when `path` should be scanned for references.
    pub fn is_markup(&self, path: &Path) -> bool {
        has_extension(path, &self.markup_extensions)
    }
}

/// Case-insensitive extension check against a list of bare extensions (`"png"`, not `".png"`).
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            extensions
                .iter()
                .any(|candidate| candidate.trim_start_matches('.').eq_ignore_ascii_case(ext))
        })
}
