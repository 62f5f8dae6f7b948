//! Directory walking shared by every pass over the exported site.

use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::{DirEntry, WalkDir};

use crate::scope::ScanScope;

/// Render `path` relative to `root` with forward slashes, for reports and scope checks.
pub fn relative_display(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative.to_string_lossy().replace('\\', "/")
}

fn is_hidden_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry.file_name().to_string_lossy().starts_with('.')
}

/// Walk `root` and return every regular file that is in scope and accepted by `keep`.
///
/// Hidden directories are never descended into. Entries that cannot be read are logged and
/// skipped. The result is sorted so reports are stable between runs.
pub fn collect_site_files<S, F>(root: &Path, scope: &S, mut keep: F) -> Vec<PathBuf>
where
    S: ScanScope + ?Sized,
    F: FnMut(&Path) -> bool,
{
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_hidden_dir(entry));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("skipping unreadable entry under {}: {}", root.display(), err);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if !keep(path) {
            continue;
        }

        if scope.is_in_scope(&relative_display(root, path)) {
            files.push(path.to_path_buf());
        }
    }

    files
}

/// Total size in bytes of the regular files at or below `path`. Missing paths weigh nothing.
pub fn directory_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.metadata().ok())
        .map(|metadata| metadata.len())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::PathScope;
    use std::fs;
    use tempfile::tempdir;

    fn write_file(path: &Path, contents: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn collects_in_scope_files_in_sorted_order() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write_file(&root.join("index.html"), "home");
        write_file(&root.join("contact/index.html"), "contact");
        write_file(&root.join("feed/index.html"), "rss");
        write_file(&root.join(".git/index.html"), "hidden");
        write_file(&root.join("notes.txt"), "text");

        let scope = PathScope::new(vec!["feed".into()]);
        let files = collect_site_files(root, &scope, |path| {
            path.extension().is_some_and(|ext| ext == "html")
        });
        let relative: Vec<String> = files
            .iter()
            .map(|path| relative_display(root, path))
            .collect();

        assert_eq!(relative, vec!["contact/index.html", "index.html"]);
    }

    #[test]
    fn hidden_files_are_still_visited() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write_file(&root.join("css/.DS_Store"), "junk");

        let files = collect_site_files(root, &PathScope::default(), |path| {
            path.file_name().is_some_and(|name| name == ".DS_Store")
        });
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn sums_directory_size() {
        let dir = tempdir().unwrap();
        write_file(&dir.path().join("a/one.bin"), "1234");
        write_file(&dir.path().join("a/b/two.bin"), "12");

        assert_eq!(directory_size(&dir.path().join("a")), 6);
        assert_eq!(directory_size(&dir.path().join("missing")), 0);
    }
}
