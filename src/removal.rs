//! Destructive cleanup of plugin directories, backend files and junk left in the export.
//!
//! Removals are not transactional: a failure is logged and recorded, and the remaining targets
//! are still processed. A target that does not exist is recorded as missing, never as an error.

use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use tracing::{info, warn};

use crate::models::{PruneReport, RemovalRecord, RemovalStatus, RemovalSummary};
use crate::project::SiteLayout;
use crate::scanner::{collect_site_files, directory_size, relative_display};
use crate::scope::PathScope;

/// Switches for [`prune_site`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PruneOptions {
  /// Also delete the configured backend directories (`wp-includes`). Off by default because the
  /// exported pages still load jQuery from there.
  pub remove_backend_dirs: bool,
  /// Report what would be deleted without touching the filesystem.
  pub dry_run: bool,
}

/// Remove each literal site-relative path (file or directory tree) if it exists.
pub fn remove_paths(root: &Path, targets: &[String], dry_run: bool) -> RemovalSummary {
  let mut summary = RemovalSummary::default();
  for target in targets {
    let relative = target.trim_matches('/');
    if relative.is_empty() {
      continue;
    }
    summary.push(remove_target(root, relative, dry_run));
  }
  summary
}

fn remove_target(root: &Path, relative: &str, dry_run: bool) -> RemovalRecord {
  let path = root.join(relative);
  let record = |bytes, status| RemovalRecord {
    path: relative.to_string(),
    bytes,
    status,
  };

  let metadata = match fs::symlink_metadata(&path) {
    Ok(metadata) => metadata,
    Err(err) if err.kind() == ErrorKind::NotFound => return record(0, RemovalStatus::Missing),
    Err(err) => {
      warn!("could not inspect {}: {}", relative, err);
      return record(
        0,
        RemovalStatus::Failed {
          reason: err.to_string(),
        },
      );
    }
  };

  let is_dir = metadata.is_dir();
  let bytes = if is_dir {
    directory_size(&path)
  } else {
    metadata.len()
  };

  if dry_run {
    return record(bytes, RemovalStatus::WouldRemove);
  }

  let result = if is_dir {
    fs::remove_dir_all(&path)
  } else {
    fs::remove_file(&path)
  };

  match result {
    Ok(()) => {
      info!("removed {} ({} bytes)", relative, bytes);
      record(bytes, RemovalStatus::Removed)
    }
    Err(err) => {
      warn!("could not remove {}: {}", relative, err);
      record(
        bytes,
        RemovalStatus::Failed {
          reason: err.to_string(),
        },
      )
    }
  }
}

/// Delete every file called `file_name` anywhere below `root` (outside hidden directories).
pub fn remove_named_files(root: &Path, file_name: &str, dry_run: bool) -> RemovalSummary {
  let files = collect_site_files(root, &PathScope::default(), |path| {
    path.file_name().is_some_and(|name| name == file_name)
  });

  let targets: Vec<String> = files
    .iter()
    .map(|path| relative_display(root, path))
    .collect();
  remove_paths(root, &targets, dry_run)
}

/// Delete every file under `root/dir_relative` whose path relative to that directory is not in
/// `keep`, then delete directories left empty. The directory itself is kept.
///
/// Entries that cannot be read are recorded as failed and left in place; the rest of the tree is
/// still pruned.
pub fn prune_directory_except(
  root: &Path,
  dir_relative: &str,
  keep: &BTreeSet<PathBuf>,
  dry_run: bool,
) -> RemovalSummary {
  let base = root.join(dir_relative);
  let mut summary = RemovalSummary::default();

  if !base.is_dir() {
    info!("{} not found, nothing to prune", dir_relative);
    return summary;
  }

  let mut pruner = DirectoryPruner {
    site_root: root,
    base: &base,
    keep,
    dry_run,
    summary: &mut summary,
  };
  pruner.prune_subtree(Path::new(""));

  summary
}

struct DirectoryPruner<'a> {
  site_root: &'a Path,
  base: &'a Path,
  keep: &'a BTreeSet<PathBuf>,
  dry_run: bool,
  summary: &'a mut RemovalSummary,
}

impl DirectoryPruner<'_> {
  /// Returns `true` when nothing under `relative` survives, so the caller may drop it.
  fn prune_subtree(&mut self, relative: &Path) -> bool {
    let current_path = if relative.as_os_str().is_empty() {
      self.base.to_path_buf()
    } else {
      self.base.join(relative)
    };

    let entries = match fs::read_dir(&current_path) {
      Ok(entries) => entries,
      Err(err) if err.kind() == ErrorKind::NotFound => return true,
      Err(err) => {
        self.record_failure(&current_path, &err);
        return false;
      }
    };

    let mut has_survivors = false;

    for entry in entries {
      let entry = match entry {
        Ok(entry) => entry,
        Err(err) => {
          self.record_failure(&current_path, &err);
          has_survivors = true;
          continue;
        }
      };
      let entry_path = entry.path();
      let child_relative = if relative.as_os_str().is_empty() {
        PathBuf::from(entry.file_name())
      } else {
        relative.join(entry.file_name())
      };

      let file_type = match entry.file_type() {
        Ok(file_type) => file_type,
        Err(err) => {
          self.record_failure(&entry_path, &err);
          has_survivors = true;
          continue;
        }
      };

      if file_type.is_dir() {
        if self.prune_subtree(&child_relative) {
          if !self.dry_run {
            if let Err(err) = fs::remove_dir(&entry_path) {
              warn!("could not remove {}: {}", entry_path.display(), err);
              has_survivors = true;
            }
          }
        } else {
          has_survivors = true;
        }
      } else if self.keep.contains(&child_relative) {
        has_survivors = true;
      } else {
        let target = relative_display(self.site_root, &entry_path);
        let record = remove_target(self.site_root, &target, self.dry_run);
        if matches!(record.status, RemovalStatus::Failed { .. }) {
          has_survivors = true;
        }
        self.summary.push(record);
      }
    }

    !has_survivors
  }

  fn record_failure(&mut self, path: &Path, err: &std::io::Error) {
    let relative = relative_display(self.site_root, path);
    warn!("could not read {}: {}", relative, err);
    self.summary.push(RemovalRecord {
      path: relative,
      bytes: 0,
      status: RemovalStatus::Failed {
        reason: err.to_string(),
      },
    });
  }
}

/// Run every removal the layout describes and report what happened to each target.
pub fn prune_site(root: &Path, layout: &SiteLayout, options: PruneOptions) -> Result<PruneReport> {
  if !root.is_dir() {
    bail!("site root {} is not a directory", root.display());
  }

  let dry_run = options.dry_run;
  let mut report = PruneReport {
    dry_run,
    ..PruneReport::default()
  };

  report.plugins = remove_paths(root, &layout.unused_plugins, dry_run);
  report.php_callbacks = remove_paths(root, &layout.php_callback_files, dry_run);

  let mut backend_targets = layout.backend_files.clone();
  if options.remove_backend_dirs {
    backend_targets.extend(layout.backend_dirs.iter().cloned());
  }
  report.backend = remove_paths(root, &backend_targets, dry_run);

  report.junk = remove_named_files(root, &layout.junk_file_name, dry_run);

  let keep: BTreeSet<PathBuf> = layout
    .page_builder_keep
    .iter()
    .map(|entry| PathBuf::from(entry.trim_start_matches("./").trim_start_matches('/')))
    .collect();
  report.page_builder = prune_directory_except(root, &layout.page_builder_dir, &keep, dry_run);

  info!(
    "{} {} bytes, {} failures",
    if dry_run { "would reclaim" } else { "reclaimed" },
    report.bytes_reclaimed(),
    report.failure_count()
  );

  Ok(report)
}
