//! Asset inventory and unused-image classification.
//!
//! Classification is advisory: the suffix match cannot see paths assembled at runtime (generated
//! `srcset` candidates, CSS variables), so an "unused" image may still be needed. Nothing in this
//! crate deletes an image because of this report.

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::asset_paths::is_used_by;
use crate::models::{AssetClassification, AssetFile, ReferenceSet};
use crate::project::SiteLayout;
use crate::scanner::{collect_site_files, relative_display};
use crate::scope::PathScope;

/// List every image under the layout's uploads directory.
///
/// A missing uploads directory yields an empty inventory.
pub fn collect_asset_inventory(root: &Path, layout: &SiteLayout) -> Vec<AssetFile> {
    let uploads = layout.uploads_path(root);
    if !uploads.is_dir() {
        info!("no uploads directory at {}", uploads.display());
        return Vec::new();
    }

    collect_site_files(&uploads, &PathScope::default(), |path| layout.is_image(path))
        .into_iter()
        .map(|path| {
            let bytes = match fs::metadata(&path) {
                Ok(metadata) => metadata.len(),
                Err(err) => {
                    warn!("failed to stat {}: {}", path.display(), err);
                    0
                }
            };
            AssetFile {
                relative_path: relative_display(root, &path),
                bytes,
            }
        })
        .collect()
}

/// Split `inventory` into assets some reference points at and assets none do.
pub fn classify_assets(references: &ReferenceSet, inventory: Vec<AssetFile>) -> AssetClassification {
    let mut classification = AssetClassification::default();

    for asset in inventory {
        if is_used_by(&asset.relative_path, references) {
            classification.used.push(asset);
        } else {
            classification.unused_bytes += asset.bytes;
            classification.unused.push(asset);
        }
    }

    info!(
        "{} images referenced, {} potentially unused ({} bytes)",
        classification.used.len(),
        classification.unused.len(),
        classification.unused_bytes
    );

    classification
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectConfig;
    use tempfile::tempdir;

    fn asset(path: &str, bytes: u64) -> AssetFile {
        AssetFile {
            relative_path: path.into(),
            bytes,
        }
    }

    fn paths(assets: &[AssetFile]) -> Vec<&str> {
        assets.iter().map(|asset| asset.relative_path.as_str()).collect()
    }

    #[test]
    fn classifies_by_suffix() {
        let references: ReferenceSet = ["a/b.png".to_string()].into_iter().collect();
        let result = classify_assets(&references, vec![asset("x/a/b.png", 3), asset("y/q.png", 5)]);

        assert_eq!(paths(&result.used), vec!["x/a/b.png"]);
        assert_eq!(paths(&result.unused), vec!["y/q.png"]);
        assert_eq!(result.unused_bytes, 5);
    }

    #[test]
    fn inventory_lists_only_images_under_uploads() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let uploads = root.join("wp-content/uploads/2018/06");
        fs::create_dir_all(&uploads).unwrap();
        fs::write(uploads.join("favi.png"), b"1234").unwrap();
        fs::write(uploads.join("HERO.JPG"), b"12").unwrap();
        fs::write(uploads.join("notes.pdf"), b"1").unwrap();
        fs::write(root.join("outside.png"), b"1").unwrap();

        let layout = ProjectConfig::default().into_layout();
        let inventory = collect_asset_inventory(root, &layout);

        assert_eq!(
            paths(&inventory),
            vec![
                "wp-content/uploads/2018/06/HERO.JPG",
                "wp-content/uploads/2018/06/favi.png"
            ]
        );
        assert_eq!(inventory[1].bytes, 4);
    }

    #[test]
    fn missing_uploads_directory_is_empty() {
        let dir = tempdir().unwrap();
        let layout = ProjectConfig::default().into_layout();
        assert!(collect_asset_inventory(dir.path(), &layout).is_empty());
    }

    #[test]
    fn classification_never_touches_the_filesystem() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let uploads = root.join("wp-content/uploads");
        fs::create_dir_all(&uploads).unwrap();
        fs::write(uploads.join("orphan.png"), b"1").unwrap();

        let layout = ProjectConfig::default().into_layout();
        let inventory = collect_asset_inventory(root, &layout);
        let result = classify_assets(&ReferenceSet::new(), inventory);

        assert_eq!(result.unused.len(), 1);
        assert!(uploads.join("orphan.png").exists());
    }
}
