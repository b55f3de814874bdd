//! Field resolution and binding
//!
//! # Resolution order
//!
//! For each field, the first match wins:
//!
//! 1. Performance-test mode, the field declares a performance literal, and
//!    neither its alias nor its key was given on the command line: the literal
//! 2. The override stored under the field's alias
//! 3. The override stored under the field's full key
//! 4. Curve fields: [`Curve::unconfigured`]
//! 5. Nothing: the field keeps the value it had before binding
//!
//! A `null` override counts as absent.

use std::collections::HashSet;

use crate::args::CommandLine;
use crate::coerce::coerce;
use crate::component::Component;
use crate::curve::Curve;
use crate::field::{FieldDescriptor, FieldValue, Shape};
use crate::resolved::ResolvedValues;
use crate::snapshot::ConfigSnapshot;
use crate::store::OverrideStore;
use crate::value::RawValue;
use crate::{Error, Result};

/// Outcome of resolving one field.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// A value was found and coerced
    Applied(FieldValue),
    /// No source provided a value
    Unset,
}

/// Resolve one field against the store and command line.
pub fn resolve_field(
    descriptor: &FieldDescriptor,
    store: &OverrideStore,
    command_line: &CommandLine,
) -> Result<Resolution> {
    let key = descriptor.key();
    let spec = &descriptor.spec;

    let performance = spec
        .performance_literal()
        .filter(|_| command_line.is_performance_test());
    if let Some(literal) = performance {
        let explicit = spec.alias_name().is_some_and(|alias| command_line.is_overridden(alias))
            || command_line.is_overridden(&key);
        if !explicit {
            tracing::trace!(%key, literal, "Using performance value");
            let value = coerce(&key, &descriptor.shape, &RawValue::from(literal))?;
            return Ok(Resolution::Applied(value));
        }
    }

    let found = spec
        .alias_name()
        .and_then(|alias| store.get(alias))
        .filter(|raw| !raw.is_null())
        .or_else(|| store.get(&key).filter(|raw| !raw.is_null()));

    match found {
        Some(raw) => {
            tracing::trace!(%key, %raw, "Applying override");
            coerce(&key, &descriptor.shape, raw).map(Resolution::Applied)
        }
        None if descriptor.shape == Shape::Curve => {
            Ok(Resolution::Applied(FieldValue::Curve(Curve::unconfigured())))
        }
        None => Ok(Resolution::Unset),
    }
}

/// Bind every field of `component` into `values` and `snapshot`.
///
/// Unset fields keep whatever `values` already holds for them, or their
/// declared default. Returns the number of fields that received a value.
pub fn bind_component(
    component: &dyn Component,
    store: &OverrideStore,
    command_line: &CommandLine,
    values: &mut ResolvedValues,
    snapshot: &mut ConfigSnapshot,
) -> Result<usize> {
    let name = component.name();
    let fields = component.fields().map_err(|err| Error::Scan {
        component: name.to_string(),
        cause: err.to_string(),
    })?;

    let mut seen = HashSet::with_capacity(fields.len());
    for descriptor in &fields {
        let key = descriptor.key();
        if !seen.insert(key.clone()) {
            return Err(Error::DuplicateField {
                component: name.to_string(),
                key,
            });
        }
    }

    snapshot.remove_component(name);
    let mut applied = 0;
    for descriptor in &fields {
        let key = descriptor.key();
        let value = match resolve_field(descriptor, store, command_line)? {
            Resolution::Applied(value) => {
                applied += 1;
                value
            }
            Resolution::Unset => match values.get(&key) {
                Some(previous) => previous.clone(),
                None => descriptor.default.clone(),
            },
        };
        snapshot.record(
            name,
            &descriptor.spec.owner(),
            descriptor.spec.public_name(),
            value.clone(),
        );
        values.insert(key, value);
    }

    tracing::debug!(component = name, fields = fields.len(), applied, "Bound component");
    Ok(applied)
}
