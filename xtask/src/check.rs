use anyhow::Result;
use colored::Colorize;
use std::time::Instant;

use crate::step::{self, OnFailure};

pub fn run() -> Result<()> {
    println!();
    println!("{}", "🔍 Checking builds...".cyan().bold());
    println!();

    let start = Instant::now();

    step::run(
        "Checking host build (headless launcher)",
        "cargo",
        &["check", "--workspace", "--all-targets"],
        OnFailure::Abort,
    )?;

    // linux-embedded-hal only builds on Linux hosts.
    if cfg!(target_os = "linux") {
        step::run(
            "Checking hardware feature",
            "cargo",
            &["check", "-p", "pendeck", "--features", "hardware"],
            OnFailure::Abort,
        )?;
    } else {
        println!("{}", "  ⚠ Skipping hardware feature (Linux only)".yellow());
        println!();
    }

    step::run(
        "Checking platform crate (no_std)",
        "cargo",
        &["check", "-p", "platform", "--no-default-features"],
        OnFailure::Abort,
    )?;

    step::run(
        "Running clippy lints",
        "cargo",
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
        OnFailure::Warn,
    )?;

    let fmt = step::run(
        "Checking code formatting",
        "cargo",
        &["fmt", "--all", "--check"],
        OnFailure::Warn,
    )?;
    if !fmt.status.success() {
        eprintln!("     Run 'cargo fmt --all' to fix");
        eprintln!();
    }

    step::finished("All checks completed", start);
    Ok(())
}
