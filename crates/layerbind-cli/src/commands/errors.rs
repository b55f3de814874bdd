//! The errors command

use colored::Colorize;

use super::load_manager;
use crate::cli::Target;
use crate::error::Result;

/// Run the errors command
pub fn run_errors(target: &Target, json: bool) -> Result<()> {
    let manager = load_manager(target)?;
    let current = manager.current();

    if json {
        println!("{}", serde_json::to_string_pretty(&current.error_behaviors)?);
        return Ok(());
    }

    println!("{}", "Error behaviors".bold());
    for (category, behavior) in current.error_behaviors.iter() {
        println!("  {:<14} {}", category.as_str().cyan(), behavior);
    }
    if current.is_performance_test() {
        println!();
        println!("{}", "Performance-test mode is on.".yellow());
    }
    Ok(())
}
