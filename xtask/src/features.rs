//! Feature matrix for `workbase-infra`.
//!
//! The keychain backend is optional, so both builds must keep compiling.
//! Every combination is checked even after a failure so one run reports the
//! whole matrix.

use std::process::Command;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

const PACKAGE: &str = "workbase-infra";

/// Feature sets to check; the empty set is the default build.
const FEATURE_SETS: &[&[&str]] = &[&[], &["keychain"]];

struct CheckOutcome {
    label: String,
    passed: bool,
    elapsed: Duration,
}

fn label(features: &[&str]) -> String {
    if features.is_empty() {
        "default".to_string()
    } else {
        features.join(",")
    }
}

fn check_features(features: &[&str]) -> Result<CheckOutcome> {
    let label = label(features);
    let mut command = Command::new("cargo");
    command.args(["check", "-p", PACKAGE, "--all-targets"]);
    if !features.is_empty() {
        command.args(["--features", &features.join(",")]);
    }

    let started = Instant::now();
    let status =
        command.status().with_context(|| format!("Failed to run cargo check for '{label}'"))?;

    Ok(CheckOutcome { label, passed: status.success(), elapsed: started.elapsed() })
}

/// Check every feature set, then print a summary.
pub fn test_feature_matrix() -> Result<()> {
    println!("Checking {} {PACKAGE} feature sets...", FEATURE_SETS.len());

    let mut outcomes = Vec::with_capacity(FEATURE_SETS.len());
    for (index, features) in FEATURE_SETS.iter().enumerate() {
        println!("\n[{}/{}] {}", index + 1, FEATURE_SETS.len(), label(features));
        outcomes.push(check_features(features)?);
    }

    println!("\nFeature matrix summary:");
    for outcome in &outcomes {
        let mark = if outcome.passed { "ok  " } else { "FAIL" };
        println!("  {mark} {:<12} {:>6.1}s", outcome.label, outcome.elapsed.as_secs_f64());
    }

    let failed: Vec<&str> =
        outcomes.iter().filter(|o| !o.passed).map(|o| o.label.as_str()).collect();
    if !failed.is_empty() {
        anyhow::bail!("Feature sets failed to compile: {}", failed.join(", "));
    }

    Ok(())
}
