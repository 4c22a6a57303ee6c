//! One cargo (or other tool) invocation with coloured progress output.

use anyhow::{Context, Result};
use colored::Colorize;
use std::process::{Command, Output};
use std::time::Instant;

/// What a failing step does to the overall task.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum OnFailure {
    Abort,
    Warn,
}

/// Run `program args…`, print a ✓/✗ line and return the captured output.
///
/// With [`OnFailure::Abort`] a non-zero exit prints stderr and bails.
pub fn run(label: &str, program: &str, args: &[&str], on_failure: OnFailure) -> Result<Output> {
    println!("{}", format!("  {label}...").cyan());
    let start = Instant::now();

    let output = Command::new(program)
        .args(args)
        .output()
        .with_context(|| format!("Failed to run {program} {}", args.join(" ")))?;

    if output.status.success() {
        println!(
            "{}",
            format!("  ✓ {label} passed in {:.2}s", start.elapsed().as_secs_f64()).green()
        );
    } else if on_failure == OnFailure::Abort {
        eprintln!("{}", format!("  ✗ {label} failed").red().bold());
        eprintln!();
        eprintln!("{}", String::from_utf8_lossy(&output.stderr));
        anyhow::bail!("{label} failed");
    } else {
        eprintln!("{}", format!("  ⚠ {label} reported problems").yellow().bold());
        eprintln!("{}", String::from_utf8_lossy(&output.stderr));
    }
    println!();
    Ok(output)
}

/// Green summary line for a whole task.
pub fn finished(what: &str, start: Instant) {
    println!(
        "{}",
        format!("✓ {what} in {:.2}s", start.elapsed().as_secs_f64())
            .green()
            .bold()
    );
    println!();
}
