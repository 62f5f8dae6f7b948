#![allow(dead_code)]

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
<link rel="pingback" href="https://example.com/xmlrpc.php">
<meta name="generator" content="WordPress 6.8.1" />
<link rel="stylesheet" href="wp-content/themes/bridge/style.css?ver=6.8.1" type="text/css">
<script src="wp-includes/js/jquery/jquery.min.js?ver=3.7.1"></script>
</head>
<body class="home page-id-12 wp-theme-bridge qode-theme-ver-30 custom">
<img src="wp-content/uploads/2018/06/hero.png" alt="">
<div style="background-image: url('wp-content/uploads/2018/06/band.jpg')"></div>



<p>Contact us</p>
</body>
</html>
"#;

pub const STYLE_CSS: &str = ".footer { background: url(../../uploads/2018/06/footer.webp); }\n";

/// A small exported site in a temporary directory.
pub struct TestSite {
    _tmp: TempDir,
    pub root: PathBuf,
}

impl TestSite {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let root = tmp.path().join("site");

        write(&root.join("index.html"), INDEX_HTML);
        write(&root.join("wp-content/themes/bridge/style.css"), STYLE_CSS);
        write(&root.join("wp-includes/js/jquery/jquery.min.js"), "jq");
        write(&root.join("wp-content/uploads/2018/06/hero.png"), "hero");
        write(&root.join("wp-content/uploads/2018/06/band.jpg"), "band");
        write(&root.join("wp-content/uploads/2018/06/footer.webp"), "footer");
        write(&root.join("wp-content/uploads/2018/06/orphan.png"), "orphan-bytes");
        write(&root.join("wp-content/plugins/tablepress/tablepress.php"), "<?php");
        write(&root.join("wp-login.php"), "<?php");
        write(&root.join("feed/index.html"), r#"<img src="feed-only.png">"#);

        Self { _tmp: tmp, root }
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = bare_cmd();
        cmd.arg("--root").arg(&self.root);
        cmd
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let out = self
            .cmd()
            .arg("--json")
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }
}

/// The binary with quiet logging and no `--root`.
pub fn bare_cmd() -> Command {
    let mut cmd = cargo_bin_cmd!("export-cleanup");
    cmd.env("RUST_LOG", "warn");
    cmd
}

pub fn write(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, contents).expect("write fixture file");
}
