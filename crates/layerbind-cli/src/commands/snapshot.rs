//! The snapshot command

use std::sync::Arc;

use layerbind_core::ComponentManifest;

use super::load_manager;
use crate::cli::Target;
use crate::error::Result;
use crate::shape::parse_declaration;

/// Name of the component holding fields declared with `--field`.
pub const CLI_COMPONENT: &str = "cli";

/// Run the snapshot command
pub fn run_snapshot(target: &Target, fields: &[String]) -> Result<()> {
    let manager = load_manager(target)?;

    if !fields.is_empty() {
        let mut component = ComponentManifest::new(CLI_COMPONENT);
        for declaration in fields {
            component = component.descriptor(parse_declaration(declaration)?);
        }
        manager.initialize(Arc::new(component))?;
    }

    println!("{}", manager.current().snapshot.to_json()?);
    Ok(())
}
