//! Reference scanner: collects every asset path the exported markup and stylesheets point at.

mod patterns;
mod walk;

use std::fs;
use std::path::Path;

use anyhow::{Result, bail};
use tracing::{debug, info, warn};

use crate::asset_paths::{normalize_reference, should_ignore_reference};
use crate::models::{ReferenceScan, ReferenceSet, SkippedFile};
use crate::project::{SiteLayout, has_extension};
use crate::scope::ScanScope;

pub use patterns::{SourceKind, attribute_values, raw_references};
pub use walk::{collect_site_files, directory_size, relative_display};

impl SourceKind {
  /// Classify a file by extension; anything that is not a stylesheet is treated as markup.
  pub fn from_path(path: &Path) -> Self {
    if has_extension(path, &["css".to_string()]) {
      SourceKind::Stylesheet
    } else {
      SourceKind::Markup
    }
  }
}

/// Extract the normalised reference set from a single document.
pub fn extract_references(content: &str, kind: SourceKind) -> ReferenceSet {
  raw_references(content, kind)
    .into_iter()
    .filter(|value| !should_ignore_reference(value))
    .filter_map(normalize_reference)
    .collect()
}

/// Scan every in-scope markup and stylesheet file below `root` and merge their references.
///
/// Files that cannot be read or are not valid UTF-8 are logged, recorded in
/// [`ReferenceScan::skipped`] and otherwise ignored; the scan always covers the remaining files.
pub fn scan_references<S: ScanScope + ?Sized>(
  root: &Path,
  layout: &SiteLayout,
  scope: &S,
) -> Result<ReferenceScan> {
  if !root.is_dir() {
    bail!("site root {} is not a directory", root.display());
  }

  let mut scan = ReferenceScan::default();
  let files = collect_site_files(root, scope, |path| layout.is_markup(path));

  for path in files {
    let relative = relative_display(root, &path);
    let content = match fs::read_to_string(&path) {
      Ok(content) => content,
      Err(err) => {
        warn!("skipping {}: {}", relative, err);
        scan.skipped.push(SkippedFile {
          path: relative,
          reason: err.to_string(),
        });
        continue;
      }
    };

    let references = extract_references(&content, SourceKind::from_path(&path));
    debug!("{}: {} references", relative, references.len());
    scan.references.extend(references);
    scan.files_scanned += 1;
  }

  info!(
    "scanned {} files, found {} distinct references",
    scan.files_scanned,
    scan.references.len()
  );

  Ok(scan)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::ProjectConfig;
  use crate::scope::PathScope;
  use tempfile::tempdir;

  fn write_file(path: &Path, contents: &[u8]) {
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
  }

  fn set(values: &[&str]) -> ReferenceSet {
    values.iter().map(|value| value.to_string()).collect()
  }

  #[test]
  fn extracts_fixture_reference_set() {
    let html = r#"<img src="a/b.png"><div style="background-image:url(c/d.jpg)"></div>"#;
    assert_eq!(
      extract_references(html, SourceKind::Markup),
      set(&["a/b.png", "c/d.jpg"])
    );
  }

  #[test]
  fn drops_external_and_normalises_local_references() {
    let html = r#"<img src="https://cdn.example.com/x.png"><img src="/wp-content/uploads/y.png">
<img src="./wp-content/uploads/y.png">"#;
    assert_eq!(
      extract_references(html, SourceKind::Markup),
      set(&["wp-content/uploads/y.png"])
    );
  }

  #[test]
  fn scans_html_and_css_but_skips_feeds() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write_file(&root.join("index.html"), br#"<img src="img/logo.png">"#);
    write_file(
      &root.join("css/site.css"),
      b"body{background:url(../img/bg.jpg)}",
    );
    write_file(&root.join("feed/index.html"), br#"<img src="img/rss.png">"#);

    let layout = ProjectConfig::default().into_layout();
    let scope = PathScope::from_layout(&layout);
    let scan = scan_references(root, &layout, &scope).unwrap();

    assert_eq!(scan.files_scanned, 2);
    assert_eq!(scan.references, set(&["img/bg.jpg", "img/logo.png"]));
    assert!(scan.skipped.is_empty());
  }

  #[test]
  fn undecodable_files_are_skipped_and_scan_continues() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write_file(&root.join("a.html"), &[0xff, 0xfe, 0x00, 0x3c]);
    write_file(&root.join("b.html"), br#"<img src="ok.png">"#);

    let layout = ProjectConfig::default().into_layout();
    let scan = scan_references(root, &layout, &PathScope::default()).unwrap();

    assert_eq!(scan.files_scanned, 1);
    assert_eq!(scan.skipped.len(), 1);
    assert_eq!(scan.skipped[0].path, "a.html");
    assert_eq!(scan.references, set(&["ok.png"]));
  }

  #[test]
  fn scan_does_not_modify_inputs() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    let original = br#"<link rel="stylesheet" href="style.css"><img src="a.png">"#;
    write_file(&root.join("index.html"), original);

    let layout = ProjectConfig::default().into_layout();
    scan_references(root, &layout, &PathScope::default()).unwrap();

    assert_eq!(fs::read(root.join("index.html")).unwrap(), original.to_vec());
  }

  #[test]
  fn rejects_missing_root() {
    let dir = tempdir().unwrap();
    let layout = ProjectConfig::default().into_layout();
    let err = scan_references(&dir.path().join("missing"), &layout, &PathScope::default())
      .unwrap_err();
    assert!(err.to_string().contains("is not a directory"));
  }
}
