//! Data structures produced by scans, cleaning passes and removals.
//!
//! Every report is rebuilt from the filesystem on each run and never persisted; the types are
//! `Serialize` so the binary can print them as JSON.

use std::collections::BTreeSet;

use serde::Serialize;

/// Deduplicated, normalised asset paths discovered in markup and stylesheets.
pub type ReferenceSet = BTreeSet<String>;

/// A file a pass could not process, with the reason it was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
  /// Site-relative path of the file.
  pub path: String,
  /// Human readable failure description.
  pub reason: String,
}

/// Result of scanning a site for asset references.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReferenceScan {
  /// Merged reference set across every scanned file.
  pub references: ReferenceSet,
  /// Number of files read successfully.
  pub files_scanned: usize,
  /// Files that could not be read or decoded.
  pub skipped: Vec<SkippedFile>,
}

/// An image found under the uploads directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetFile {
  /// Path relative to the site root, using forward slashes.
  pub relative_path: String,
  /// Size on disk in bytes.
  pub bytes: u64,
}

/// Split of the asset inventory into referenced and unreferenced images.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AssetClassification {
  /// Assets matched by at least one reference.
  pub used: Vec<AssetFile>,
  /// Assets matched by no reference. Candidates for manual review only.
  pub unused: Vec<AssetFile>,
  /// Combined size of [`AssetClassification::unused`].
  pub unused_bytes: u64,
}

/// Outcome of running the cleaning passes over a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileOutcome {
  /// The content changed (and was written back unless running dry).
  Changed,
  /// No pattern matched.
  Unchanged,
}

/// Summary of a cleaning run over the whole site.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanReport {
  /// Files whose content changed.
  pub changed: Vec<String>,
  /// Number of files left untouched.
  pub unchanged: usize,
  /// Files that could not be processed.
  pub skipped: Vec<SkippedFile>,
  /// Whether changes were only computed, not written.
  pub dry_run: bool,
}

/// What happened to a single removal target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RemovalStatus {
  /// The path was deleted.
  Removed,
  /// The path exists and would be deleted outside of a dry run.
  WouldRemove,
  /// The path did not exist; nothing to do.
  Missing,
  /// Deletion was attempted and failed.
  Failed {
    /// Failure description.
    reason: String,
  },
}

/// A single removal target and its outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemovalRecord {
  /// Site-relative path of the target.
  pub path: String,
  /// Bytes occupied by the target before removal.
  pub bytes: u64,
  /// Outcome of the removal.
  #[serde(flatten)]
  pub status: RemovalStatus,
}

/// Ordered list of removal outcomes for one group of targets.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RemovalSummary {
  /// Every target visited, in the order it was processed.
  pub records: Vec<RemovalRecord>,
  /// Bytes freed (or that would be freed on a dry run).
  pub bytes_reclaimed: u64,
}

impl RemovalSummary {
  /// Append a record, accounting for its size when it was (or would be) removed.
  pub fn push(&mut self, record: RemovalRecord) {
    if matches!(
      record.status,
      RemovalStatus::Removed | RemovalStatus::WouldRemove
    ) {
      self.bytes_reclaimed += record.bytes;
    }
    self.records.push(record);
  }

  /// Records whose target was (or would be) removed.
  pub fn removed(&self) -> impl Iterator<Item = &RemovalRecord> {
    self.records.iter().filter(|record| {
      matches!(
        record.status,
        RemovalStatus::Removed | RemovalStatus::WouldRemove
      )
    })
  }

  /// Records whose removal failed.
  pub fn failures(&self) -> impl Iterator<Item = &RemovalRecord> {
    self
      .records
      .iter()
      .filter(|record| matches!(record.status, RemovalStatus::Failed { .. }))
  }
}

/// Grouped outcome of a full `prune` run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PruneReport {
  /// Unused plugin directories.
  pub plugins: RemovalSummary,
  /// Theme PHP callback files.
  pub php_callbacks: RemovalSummary,
  /// Backend files, plus backend directories when requested.
  pub backend: RemovalSummary,
  /// Swept junk files.
  pub junk: RemovalSummary,
  /// Files pruned from the page-builder plugin.
  pub page_builder: RemovalSummary,
  /// Whether the run only reported what it would delete.
  pub dry_run: bool,
}

impl PruneReport {
  /// Total bytes reclaimed across every group.
  pub fn bytes_reclaimed(&self) -> u64 {
    self.groups().map(|group| group.bytes_reclaimed).sum()
  }

  /// Number of failed removals across every group.
  pub fn failure_count(&self) -> usize {
    self.groups().map(|group| group.failures().count()).sum()
  }

  fn groups(&self) -> impl Iterator<Item = &RemovalSummary> {
    [
      &self.plugins,
      &self.php_callbacks,
      &self.backend,
      &self.junk,
      &self.page_builder,
    ]
    .into_iter()
  }
}

/// Presence check for a file the deployment depends on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EssentialFile {
  /// Site-relative path.
  pub path: String,
  /// Size when present, `None` when missing.
  pub bytes: Option<u64>,
}

impl EssentialFile {
  /// Returns `true` when the file exists.
  pub fn is_present(&self) -> bool {
    self.bytes.is_some()
  }
}

/// A reference in an HTML file whose target does not exist on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrokenReference {
  /// HTML file containing the reference.
  pub source: String,
  /// The reference as written in the markup.
  pub reference: String,
}

/// Deployment readiness report.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VerificationReport {
  /// Essential files, present or missing.
  pub essentials: Vec<EssentialFile>,
  /// References to watched prefixes that do not resolve.
  pub broken: Vec<BrokenReference>,
  /// HTML files that could not be read.
  pub skipped: Vec<SkippedFile>,
  /// `true` when nothing is missing and nothing is broken.
  pub ready: bool,
}

/// Footprint of a single plugin directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginFootprint {
  /// Plugin directory name.
  pub name: String,
  /// Size on disk in bytes.
  pub bytes: u64,
  /// Number of distinct references pointing into the plugin.
  pub referenced_files: usize,
}

/// On-disk footprint of the exported site.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SiteReport {
  /// Number of non-hidden, non-script files.
  pub total_files: usize,
  /// Combined size of those files.
  pub total_bytes: u64,
  /// Installed plugins with their size and reference counts.
  pub plugins: Vec<PluginFootprint>,
  /// Number of PHP files still present.
  pub php_files: usize,
  /// Size of the slider templates directory when present.
  pub templates_bytes: Option<u64>,
}
