use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;
use std::time::Instant;

use crate::step::{self, OnFailure};

/// 32-bit Raspberry Pi OS.
pub const DEFAULT_TARGET: &str = "armv7-unknown-linux-gnueabihf";

/// Where the launcher lands on the device.
const REMOTE_PATH: &str = "~/pendeck/pendeck";

pub fn run(host: Option<&str>, target: &str, release: bool) -> Result<()> {
    let mode = if release { "release" } else { "debug" };

    println!();
    println!(
        "{}",
        format!("🔨 Building pendeck for {target} ({mode} mode)...")
            .cyan()
            .bold()
    );
    println!();

    let start = Instant::now();
    let mut args = vec![
        "build", "-p", "pendeck", "--features", "hardware", "--target", target,
    ];
    if release {
        args.push("--release");
    }
    step::run("Cross build", "cargo", &args, OnFailure::Abort)?;

    let binary = binary_path(target, mode);
    show_binary_size(&binary);

    let Some(host) = host else {
        println!("   {}", "No --host given; copy the binary yourself:".dimmed());
        println!("   {}", binary.display().to_string().dimmed());
        println!();
        return Ok(());
    };

    let destination = format!("{host}:{REMOTE_PATH}");
    let source = binary.display().to_string();
    step::run(
        &format!("Copying to {destination}"),
        "scp",
        &[source.as_str(), destination.as_str()],
        OnFailure::Abort,
    )?;

    step::finished("Deployed", start);
    println!(
        "   {}",
        format!("Run on the device: ssh {host} 'cd ~/pendeck && sudo ./pendeck'").dimmed()
    );
    println!();
    Ok(())
}

fn binary_path(target: &str, mode: &str) -> PathBuf {
    ["target", target, mode, "pendeck"].iter().collect()
}

fn show_binary_size(binary: &std::path::Path) {
    match std::fs::metadata(binary) {
        Ok(meta) => {
            let kib = meta.len() / 1024;
            println!("   {}", format!("Binary size: {kib} KiB").dimmed());
        }
        Err(_) => println!("{}", "   ⚠ Binary not found after build".yellow()),
    }
    println!();
}
