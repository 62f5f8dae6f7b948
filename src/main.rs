use std::fmt::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use static_export_cleanup::models::{
    AssetClassification, CleanReport, PruneReport, ReferenceScan, RemovalStatus, RemovalSummary,
    SiteReport, VerificationReport,
};
use static_export_cleanup::{
    CleanPass, PathScope, ProjectConfig, PruneOptions, classify_assets, clean_site,
    collect_asset_inventory, prune_site, scan_references, site_report, verify_site,
};

#[derive(Parser, Debug)]
#[command(
    name = "export-cleanup",
    version,
    about = "Strip WordPress leftovers from a static HTML export"
)]
struct Cli {
    #[arg(long, global = true, default_value = ".", help = "Root of the exported site")]
    root: PathBuf,
    #[arg(long, global = true, help = "Configuration file (defaults to static-cleanup.json in the root)")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    json: bool,
    #[arg(short, long, global = true, help = "Log every file visited")]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List asset references found in markup and stylesheets.
    Scan,
    /// List uploaded images that nothing references. Never deletes.
    Unused,
    /// Strip WordPress markup from exported pages in place.
    Clean {
        #[arg(long = "pass", value_enum, help = "Pass to run; repeat for several (default: all)")]
        passes: Vec<CleanPass>,
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// Delete unused plugins, PHP callbacks, backend files and junk files.
    Prune {
        #[arg(long, default_value_t = false, help = "Also delete wp-includes")]
        remove_includes: bool,
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// Check that the files a deployment needs are present.
    Verify {
        #[arg(long, default_value_t = false, help = "Exit non-zero when the site is not ready")]
        strict: bool,
    },
    /// Show the on-disk footprint of the export.
    Report,
}

#[derive(Serialize)]
struct JsonOut<T: Serialize> {
    ok: bool,
    data: T,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => ProjectConfig::load_from_path(path)?,
        None => ProjectConfig::discover(&cli.root)?,
    };
    let layout = config.into_layout();
    let scope = PathScope::from_layout(&layout);
    let root = cli.root.as_path();

    match cli.command {
        Commands::Scan => {
            let scan = scan_references(root, &layout, &scope)?;
            print_one(cli.json, &scan, render_scan)?;
        }
        Commands::Unused => {
            let scan = scan_references(root, &layout, &scope)?;
            let inventory = collect_asset_inventory(root, &layout);
            let classification = classify_assets(&scan.references, inventory);
            print_one(cli.json, &classification, render_unused)?;
        }
        Commands::Clean { passes, dry_run } => {
            let passes = if passes.is_empty() {
                CleanPass::ALL.to_vec()
            } else {
                passes
            };
            let report = clean_site(root, &scope, &passes, dry_run)?;
            print_one(cli.json, &report, render_clean)?;
        }
        Commands::Prune {
            remove_includes,
            dry_run,
        } => {
            let options = PruneOptions {
                remove_backend_dirs: remove_includes,
                dry_run,
            };
            let report = prune_site(root, &layout, options)?;
            print_one(cli.json, &report, render_prune)?;
        }
        Commands::Verify { strict } => {
            let report = verify_site(root, &layout, &scope)?;
            print_one(cli.json, &report, render_verify)?;
            if strict && !report.ready {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Report => {
            let report = site_report(root, &layout, &scope)?;
            print_one(cli.json, &report, render_report)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_one<T: Serialize>(json: bool, data: &T, render: impl Fn(&T) -> String) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut { ok: true, data })?
        );
    } else {
        print!("{}", render(data));
    }
    Ok(())
}

fn kib(bytes: u64) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}

fn render_scan(scan: &ReferenceScan) -> String {
    let mut out = String::new();
    for reference in &scan.references {
        let _ = writeln!(out, "{reference}");
    }
    for skipped in &scan.skipped {
        let _ = writeln!(out, "skipped {}: {}", skipped.path, skipped.reason);
    }
    let _ = writeln!(
        out,
        "{} references in {} files",
        scan.references.len(),
        scan.files_scanned
    );
    out
}

fn render_unused(classification: &AssetClassification) -> String {
    let mut out = String::new();
    for asset in &classification.unused {
        let _ = writeln!(out, "{} ({})", asset.relative_path, kib(asset.bytes));
    }
    let _ = writeln!(
        out,
        "{} used, {} potentially unused ({})",
        classification.used.len(),
        classification.unused.len(),
        kib(classification.unused_bytes)
    );
    if !classification.unused.is_empty() {
        let _ = writeln!(out, "nothing was deleted; review the list before removing files");
    }
    out
}

fn render_clean(report: &CleanReport) -> String {
    let mut out = String::new();
    let verb = if report.dry_run { "would clean" } else { "cleaned" };
    for path in &report.changed {
        let _ = writeln!(out, "{verb} {path}");
    }
    for skipped in &report.skipped {
        let _ = writeln!(out, "skipped {}: {}", skipped.path, skipped.reason);
    }
    let _ = writeln!(
        out,
        "{} changed, {} unchanged, {} skipped",
        report.changed.len(),
        report.unchanged,
        report.skipped.len()
    );
    out
}

fn render_removals(out: &mut String, label: &str, summary: &RemovalSummary) {
    for record in &summary.records {
        let status = match &record.status {
            RemovalStatus::Removed => "removed".to_string(),
            RemovalStatus::WouldRemove => "would remove".to_string(),
            RemovalStatus::Missing => continue,
            RemovalStatus::Failed { reason } => format!("failed ({reason})"),
        };
        let _ = writeln!(out, "{label}: {status} {} ({})", record.path, kib(record.bytes));
    }
}

fn render_prune(report: &PruneReport) -> String {
    let mut out = String::new();
    render_removals(&mut out, "plugin", &report.plugins);
    render_removals(&mut out, "php callback", &report.php_callbacks);
    render_removals(&mut out, "backend", &report.backend);
    render_removals(&mut out, "junk", &report.junk);
    render_removals(&mut out, "page builder", &report.page_builder);
    let _ = writeln!(
        out,
        "{} {}, {} failures",
        if report.dry_run { "would reclaim" } else { "reclaimed" },
        kib(report.bytes_reclaimed()),
        report.failure_count()
    );
    out
}

fn render_verify(report: &VerificationReport) -> String {
    let mut out = String::new();
    for file in &report.essentials {
        match file.bytes {
            Some(bytes) => {
                let _ = writeln!(out, "ok      {} ({})", file.path, kib(bytes));
            }
            None => {
                let _ = writeln!(out, "MISSING {}", file.path);
            }
        }
    }
    for broken in &report.broken {
        let _ = writeln!(
            out,
            "BROKEN  {} references {}",
            broken.source, broken.reference
        );
    }
    let _ = writeln!(
        out,
        "{}",
        if report.ready {
            "ready for deployment"
        } else {
            "not ready: missing files or broken references"
        }
    );
    out
}

fn render_report(report: &SiteReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} files, {:.1} MB",
        report.total_files,
        report.total_bytes as f64 / 1024.0 / 1024.0
    );
    for plugin in &report.plugins {
        let _ = writeln!(
            out,
            "plugin {}: {} ({} files referenced)",
            plugin.name,
            kib(plugin.bytes),
            plugin.referenced_files
        );
    }
    let _ = writeln!(out, "{} PHP files", report.php_files);
    if let Some(bytes) = report.templates_bytes {
        let _ = writeln!(out, "slider templates: {}", kib(bytes));
    }
    out
}
