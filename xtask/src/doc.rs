use anyhow::Result;
use colored::Colorize;
use std::time::Instant;

use crate::step::{self, OnFailure};

pub fn run(open: bool) -> Result<()> {
    println!();
    println!("{}", "📚 Building documentation...".cyan().bold());
    println!();

    let start = Instant::now();
    let mut args = vec!["doc", "--workspace", "--no-deps", "--document-private-items"];
    if open {
        args.push("--open");
    }
    step::run("Documentation build", "cargo", &args, OnFailure::Abort)?;

    if !open {
        println!("   {}", "Open target/doc/pendeck/index.html in your browser".dimmed());
        println!("   {}", "Or run 'cargo run -p xtask -- doc --open'".dimmed());
        println!();
    }

    step::finished("Documentation built", start);
    Ok(())
}
