// SPDX-License-Identifier: GPL-3.0-only

use std::process::Command;

fn main() {
    println!("cargo::rerun-if-changed=.git/HEAD");
    println!("cargo::rerun-if-changed=.git/refs/tags");
    println!("cargo::rerun-if-env-changed=CAMERA_QC_VERSION");

    // Packagers building from a tarball set the version explicitly
    let version = std::env::var("CAMERA_QC_VERSION")
        .ok()
        .or_else(describe_head)
        .unwrap_or_else(|| std::env::var("CARGO_PKG_VERSION").unwrap_or_default());

    println!("cargo::rustc-env=GIT_VERSION={}", version);
}

/// Version from `git describe`, e.g. "0.1.0" on a tag or "0.1.0-3-gabc1234" after it.
fn describe_head() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty", "--match", "v*"])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let described = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let described = described.strip_prefix('v').unwrap_or(&described);

    // A bare commit hash means no tag exists yet
    if !described.contains('.') {
        let pkg = std::env::var("CARGO_PKG_VERSION").unwrap_or_default();
        return Some(format!("{}-{}", pkg, described));
    }

    Some(described.to_string())
}
