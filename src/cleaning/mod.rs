//! In-place stripping of WordPress markup from exported HTML files.
//!
//! The passes are regular-expression removals over raw text, not an HTML parser. Every rule
//! matches a bounded element or attribute, so text that contains none of the patterns comes
//! back byte-for-byte, and running the passes a second time changes nothing.

mod rules;

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use anyhow::{Context, Result, bail};
use regex::Regex;
use tracing::{debug, info, warn};

use crate::models::{CleanReport, FileOutcome, SkippedFile};
use crate::project::has_extension;
use crate::scanner::{collect_site_files, relative_display};
use crate::scope::ScanScope;

pub use rules::CleanPass;

fn blank_line_runs() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| {
    Regex::new(r"(\r?\n)(?:[ \t]*\r?\n){2,}").expect("invalid blank line regex")
  })
}

/// Apply `passes` in order. When any of them removed something, runs of blank lines left behind
/// are collapsed to one, keeping the file's own line ending; otherwise the input is returned as is.
pub fn clean_html_content(content: &str, passes: &[CleanPass]) -> String {
  let mut text = content.to_string();
  for pass in passes {
    text = pass.apply(&text);
  }
  if text == content {
    return text;
  }
  blank_line_runs().replace_all(&text, "${1}${1}").into_owned()
}

/// Clean a single file, writing it back only when the content changed.
pub fn clean_html_file(path: &Path, passes: &[CleanPass], dry_run: bool) -> Result<FileOutcome> {
  let original =
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

  let cleaned = clean_html_content(&original, passes);
  if cleaned == original {
    return Ok(FileOutcome::Unchanged);
  }

  if !dry_run {
    fs::write(path, &cleaned).with_context(|| format!("failed to write {}", path.display()))?;
  }

  Ok(FileOutcome::Changed)
}

/// Run the cleaning passes over every in-scope HTML file below `root`.
///
/// A file that fails to read or write is logged and recorded as skipped; the remaining files are
/// still processed. Nothing is rolled back.
pub fn clean_site<S: ScanScope + ?Sized>(
  root: &Path,
  scope: &S,
  passes: &[CleanPass],
  dry_run: bool,
) -> Result<CleanReport> {
  if !root.is_dir() {
    bail!("site root {} is not a directory", root.display());
  }

  let html = ["html".to_string(), "htm".to_string()];
  let files = collect_site_files(root, scope, |path| has_extension(path, &html));

  let mut report = CleanReport {
    dry_run,
    ..CleanReport::default()
  };

  for path in files {
    let relative = relative_display(root, &path);
    match clean_html_file(&path, passes, dry_run) {
      Ok(FileOutcome::Changed) => {
        info!("cleaned {}", relative);
        report.changed.push(relative);
      }
      Ok(FileOutcome::Unchanged) => {
        debug!("no changes in {}", relative);
        report.unchanged += 1;
      }
      Err(err) => {
        warn!("skipping {}: {:#}", relative, err);
        report.skipped.push(SkippedFile {
          path: relative,
          reason: format!("{err:#}"),
        });
      }
    }
  }

  Ok(report)
}
