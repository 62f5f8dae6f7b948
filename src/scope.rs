//! Helpers used to decide which exported files a scan or cleaning pass looks at.

use std::collections::BTreeSet;

use crate::project::SiteLayout;

/// Trait describing which site-relative paths a pass should visit.
pub trait ScanScope {
  /// Returns `true` when the file at `relative_path` (forward slashes) is in scope.
  fn is_in_scope(&self, relative_path: &str) -> bool;
}

/// Scope that excludes any path containing one of a set of directory names.
///
/// The default excludes `feed`, so RSS exports such as `blog/feed/index.html` are never
/// scanned or rewritten.
#[derive(Debug, Clone, Default)]
pub struct PathScope {
  excluded_segments: BTreeSet<String>,
}

impl PathScope {
  /// Build a scope from raw segment names.
  pub fn new(excluded_segments: impl IntoIterator<Item = String>) -> Self {
    Self {
      excluded_segments: normalise_list(excluded_segments),
    }
  }

  /// Build the scope configured for a site layout.
  pub fn from_layout(layout: &SiteLayout) -> Self {
    Self::new(layout.excluded_segments.iter().cloned())
  }
}

impl ScanScope for PathScope {
  fn is_in_scope(&self, relative_path: &str) -> bool {
    !relative_path
      .split(['/', '\\'])
      .any(|segment| self.excluded_segments.contains(segment))
  }
}

/// Convert a list of raw names into a sorted, de-duplicated set.
///
/// Values are trimmed of whitespace and slashes; empty entries are discarded.
fn normalise_list(values: impl IntoIterator<Item = String>) -> BTreeSet<String> {
  values
    .into_iter()
    .map(|value| value.trim().trim_matches('/').to_string())
    .filter(|value| !value.is_empty())
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_scope_includes_everything() {
    let scope = PathScope::default();
    assert!(scope.excluded_segments.is_empty());
    assert!(scope.is_in_scope("feed/index.html"));
  }

  #[test]
  fn excludes_paths_with_matching_segment() {
    let scope = PathScope::new(vec!["feed".into()]);

    assert!(!scope.is_in_scope("feed/index.html"));
    assert!(!scope.is_in_scope("contact/feed/index.html"));
    assert!(scope.is_in_scope("feedback/index.html"));
    assert!(scope.is_in_scope("index.html"));
  }

  #[test]
  fn normalises_whitespace_slashes_and_duplicates() {
    let normalised: Vec<String> =
      normalise_list(vec![" feed ".into(), "/feed/".into(), String::new(), "amp".into()])
        .into_iter()
        .collect();

    assert_eq!(normalised, vec![String::from("amp"), String::from("feed")]);
  }

  #[test]
  fn handles_windows_separators() {
    let scope = PathScope::new(vec!["feed".into()]);
    assert!(!scope.is_in_scope("blog\\feed\\index.html"));
  }
}
