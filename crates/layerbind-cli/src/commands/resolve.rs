//! The resolve command

use colored::Colorize;
use layerbind_core::{Resolution, loader, resolve_field};

use super::load_options;
use crate::cli::Target;
use crate::error::Result;
use crate::shape::{FieldOptions, descriptor, parse_shape};

/// Run the resolve command
pub fn run_resolve(
    target: &Target,
    key: &str,
    shape: &str,
    alias: Option<&str>,
    performance: Option<&str>,
) -> Result<()> {
    let shape = parse_shape(shape)?;
    let descriptor = descriptor(key, shape, FieldOptions { alias, performance })?;
    let loaded = loader::load(&load_options(target)?)?;

    match resolve_field(&descriptor, &loaded.store, &loaded.command_line)? {
        Resolution::Applied(value) => println!("{} = {}", descriptor.key().cyan(), value),
        Resolution::Unset => println!("{} {}", descriptor.key().cyan(), "is unset".dimmed()),
    }
    Ok(())
}
