#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod asset_paths;
pub mod cleaning;
pub mod config;
pub mod inventory;
pub mod models;
pub mod project;
pub mod removal;
pub mod report;
pub mod scanner;
pub mod scope;
pub mod verify;

pub use cleaning::{CleanPass, clean_html_content, clean_site};
pub use config::{ConfigError, ProjectConfig};
pub use inventory::{classify_assets, collect_asset_inventory};
pub use project::SiteLayout;
pub use removal::{PruneOptions, prune_site};
pub use report::site_report;
pub use scanner::{extract_references, scan_references};
pub use scope::{PathScope, ScanScope};
pub use verify::verify_site;
