//! Deployment readiness: essential files are present and HTML does not point at removed backend
//! files.

use std::fs;
use std::path::Path;

use anyhow::{Result, bail};
use tracing::{info, warn};

use crate::asset_paths::normalize_reference;
use crate::models::{BrokenReference, EssentialFile, SkippedFile, VerificationReport};
use crate::project::{SiteLayout, has_extension};
use crate::scanner::{attribute_values, collect_site_files, relative_display};
use crate::scope::ScanScope;

/// Check the layout's essential files and every watched reference in the site's HTML.
pub fn verify_site<S: ScanScope + ?Sized>(
    root: &Path,
    layout: &SiteLayout,
    scope: &S,
) -> Result<VerificationReport> {
    if !root.is_dir() {
        bail!("site root {} is not a directory", root.display());
    }

    let mut report = VerificationReport::default();

    for relative in &layout.essential_files {
        let bytes = fs::metadata(root.join(relative))
            .ok()
            .filter(|metadata| metadata.is_file())
            .map(|metadata| metadata.len());
        if bytes.is_none() {
            warn!("missing essential file {}", relative);
        }
        report.essentials.push(EssentialFile {
            path: relative.clone(),
            bytes,
        });
    }

    let html = ["html".to_string()];
    for path in collect_site_files(root, scope, |path| has_extension(path, &html)) {
        let source = relative_display(root, &path);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                warn!("skipping {}: {}", source, err);
                report.skipped.push(SkippedFile {
                    path: source,
                    reason: err.to_string(),
                });
                continue;
            }
        };

        report
            .broken
            .extend(broken_references(root, layout, &source, &content));
    }

    report.ready = report.essentials.iter().all(EssentialFile::is_present)
        && report.broken.is_empty();

    info!(
        "{} of {} essential files present, {} broken references",
        report.essentials.iter().filter(|file| file.is_present()).count(),
        report.essentials.len(),
        report.broken.len()
    );

    Ok(report)
}

fn broken_references(
    root: &Path,
    layout: &SiteLayout,
    source: &str,
    content: &str,
) -> Vec<BrokenReference> {
    let mut broken = Vec::new();

    for value in attribute_values(content) {
        if !layout
            .watched_prefixes
            .iter()
            .any(|prefix| value.contains(prefix.as_str()))
        {
            continue;
        }

        let resolves = normalize_reference(value)
            .is_some_and(|normalised| root.join(normalised).is_file());
        if !resolves {
            warn!("{} references missing file {}", source, value);
            let reference = BrokenReference {
                source: source.to_string(),
                reference: value.to_string(),
            };
            if !broken.contains(&reference) {
                broken.push(reference);
            }
        }
    }

    broken
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectConfig;
    use crate::scope::PathScope;
    use tempfile::tempdir;

    fn write_file(path: &Path, contents: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    fn layout(essentials: &[&str]) -> SiteLayout {
        let mut layout = ProjectConfig::default().into_layout();
        layout.essential_files = essentials.iter().map(|value| value.to_string()).collect();
        layout
    }

    #[test]
    fn ready_when_everything_resolves() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write_file(&root.join("wp-includes/js/jquery/jquery.min.js"), "jq");
        let page = r#"<script src="wp-includes/js/jquery/jquery.min.js?ver=3.7.1"></script>"#;
        write_file(&root.join("index.html"), page);

        let report = verify_site(root, &layout(&["index.html"]), &PathScope::default()).unwrap();

        assert!(report.ready);
        assert_eq!(report.essentials[0].bytes, Some(page.len() as u64));
        assert!(report.broken.is_empty());
    }

    #[test]
    fn reports_missing_essentials_and_broken_references() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write_file(
            &root.join("contact/index.html"),
            r#"<script src="../wp-includes/js/hoverIntent.min.js"></script>
<script src="../wp-includes/js/hoverIntent.min.js"></script>
<link rel="stylesheet" href="../wp-content/themes/bridge/style.css">"#,
        );

        let report = verify_site(
            root,
            &layout(&["index.html", "contact/index.html"]),
            &PathScope::default(),
        )
        .unwrap();

        assert!(!report.ready);
        assert!(!report.essentials[0].is_present());
        assert!(report.essentials[1].is_present());
        assert_eq!(
            report.broken,
            vec![BrokenReference {
                source: "contact/index.html".into(),
                reference: "../wp-includes/js/hoverIntent.min.js".into(),
            }]
        );
    }
}
