//! Footprint analysis of the exported site.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use tracing::warn;

use crate::asset_paths::{normalize_reference, should_ignore_reference};
use crate::models::{PluginFootprint, ReferenceSet, SiteReport};
use crate::project::{SiteLayout, has_extension};
use crate::scanner::{
  attribute_values, collect_site_files, directory_size, relative_display, scan_references,
};
use crate::scope::{PathScope, ScanScope};

/// Measure the site: deployable files, plugins and how much of each is referenced, leftover PHP.
pub fn site_report<S: ScanScope + ?Sized>(
  root: &Path,
  layout: &SiteLayout,
  scope: &S,
) -> Result<SiteReport> {
  let scan = scan_references(root, layout, scope)?;
  let everything = PathScope::default();

  let mut report = SiteReport::default();

  let deployable = collect_site_files(root, &everything, |path| {
    let hidden = path
      .file_name()
      .is_some_and(|name| name.to_string_lossy().starts_with('.'));
    !hidden && !has_extension(path, &["py".to_string()])
  });
  report.total_files = deployable.len();
  report.total_bytes = deployable
    .iter()
    .filter_map(|path| fs::metadata(path).ok())
    .map(|metadata| metadata.len())
    .sum();

  report.php_files =
    collect_site_files(root, &everything, |path| has_extension(path, &["php".to_string()])).len();

  let mut linked = scan.references;
  linked.extend(linked_paths(root, scope));
  report.plugins = plugin_footprints(root, layout, &linked)?;

  let templates = root.join(&layout.templates_dir);
  if templates.is_dir() {
    report.templates_bytes = Some(directory_size(&templates));
  }

  Ok(report)
}

/// Every local `src`/`href` target in the site's HTML, whatever its file type. Fonts and other
/// plugin assets never reach the scanner's reference set but still keep a plugin alive.
fn linked_paths<S: ScanScope + ?Sized>(root: &Path, scope: &S) -> ReferenceSet {
  let html = ["html".to_string(), "htm".to_string()];
  let mut linked = ReferenceSet::new();

  for path in collect_site_files(root, scope, |path| has_extension(path, &html)) {
    let content = match fs::read_to_string(&path) {
      Ok(content) => content,
      Err(err) => {
        warn!("skipping {}: {}", relative_display(root, &path), err);
        continue;
      }
    };

    linked.extend(
      attribute_values(&content)
        .into_iter()
        .filter(|value| !should_ignore_reference(value))
        .filter_map(normalize_reference),
    );
  }

  linked
}

fn plugin_footprints(
  root: &Path,
  layout: &SiteLayout,
  references: &ReferenceSet,
) -> Result<Vec<PluginFootprint>> {
  let plugins_dir = root.join(&layout.plugins_dir);
  if !plugins_dir.is_dir() {
    return Ok(Vec::new());
  }

  let mut footprints = Vec::new();
  for entry in fs::read_dir(&plugins_dir)
    .with_context(|| format!("failed to read {}", plugins_dir.display()))?
  {
    let entry = entry?;
    if !entry.file_type()?.is_dir() {
      continue;
    }

    let name = entry.file_name().to_string_lossy().to_string();
    let prefix = format!("{}/{}/", layout.plugins_dir.trim_matches('/'), name);
    footprints.push(PluginFootprint {
      bytes: directory_size(&entry.path()),
      referenced_files: references
        .iter()
        .filter(|reference| reference.starts_with(&prefix))
        .count(),
      name,
    });
  }

  footprints.sort_by(|a, b| a.name.cmp(&b.name));
  Ok(footprints)
}
