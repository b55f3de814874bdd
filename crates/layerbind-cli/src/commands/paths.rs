//! The paths command

use colored::Colorize;
use layerbind_core::{loader, machine_name};

use super::load_options;
use crate::cli::Target;
use crate::error::Result;

/// Run the paths command
pub fn run_paths(target: &Target) -> Result<()> {
    let options = load_options(target)?;
    let loaded = loader::load(&options)?;
    let entrypoint = &options.entrypoint;

    println!("{:<12} {}", "Entrypoint:".bold(), entrypoint.directory());
    match entrypoint.repository_root() {
        Some(root) => println!("{:<12} {}", "Repository:".bold(), root),
        None => println!("{:<12} {}", "Repository:".bold(), "none".dimmed()),
    }
    println!("{:<12} {}", "Machine:".bold(), machine_name().unwrap_or("unknown"));
    println!("{:<12} {}-{}", "Sections:".bold(), options.build, options.debugger);

    println!();
    println!("{}", "Sources".bold());
    if loaded.sources.is_empty() {
        println!("  {}", "No configuration files found.".dimmed());
    }
    for source in &loaded.sources {
        println!("  {}", source.as_str().green());
    }
    Ok(())
}
