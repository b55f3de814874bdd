//! The overrides command

use std::collections::BTreeMap;

use colored::Colorize;
use layerbind_core::loader;

use super::load_options;
use crate::cli::Target;
use crate::error::Result;

/// Run the overrides command
pub fn run_overrides(target: &Target, json: bool) -> Result<()> {
    let loaded = loader::load(&load_options(target)?)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&loaded.store.to_json())?);
        return Ok(());
    }

    if loaded.store.is_empty() {
        println!("{}", "No overrides found.".dimmed());
    } else {
        let sorted: BTreeMap<&str, _> = loaded.store.iter().collect();
        for (key, value) in sorted {
            println!("{} = {}", key.cyan(), value);
        }
    }

    let positional = loaded.command_line.positional();
    if !positional.is_empty() {
        println!();
        println!("{} {}", "Positional:".bold(), positional.join(" "));
    }
    if loaded.command_line.is_performance_test() {
        println!("{}", "Performance-test mode is on.".yellow());
    }
    Ok(())
}
