//! Recursive expansion of nested DTO and DTO-collection properties.
//!
//! Walks a schema's properties in declaration order and emits one rule-map
//! entry per addressable path. Nested DTOs expand under `path.`, collections
//! under `path.*.`; both recurse with the same walker, so intermediate
//! entries appear under wildcard prefixes too. A child schema's presence
//! atoms come from its own property flags, never inherited from the parent.
//!
//! Recursion carries the chain of visited DTO types: a repeated type on the
//! current chain is a cyclic schema, and a chain longer than the configured
//! depth limit fails rather than recursing unbounded. Sibling properties of
//! the same DTO type are legal; only self-referential chains are rejected.

use crate::derive::attributes::constraint_atoms;
use crate::derive::baseline::baseline_atoms;
use crate::derive::presence::{presence_atoms, Placement};
use crate::derive::DeriveConfig;
use crate::error::SchemaError;
use crate::rules::{RuleAtom, RuleMap};
use crate::schema::{PropertyDescriptor, PropertyKind, SchemaDescriptor, SchemaRef};
use std::any::TypeId;
use std::collections::HashSet;

/// One frame of the visited-type chain.
pub(crate) struct Visited {
    pub type_id: TypeId,
    pub type_name: &'static str,
}

/// Expand every property of `schema` into `map`, prefixing paths with
/// `prefix` (empty at the root, `"parent."` or `"items.*."` below it).
pub(crate) fn expand_into(
    schema: &SchemaDescriptor,
    prefix: &str,
    visited: &mut Vec<Visited>,
    config: &DeriveConfig,
    map: &mut RuleMap,
) -> Result<(), SchemaError> {
    if visited.len() > config.max_depth {
        return Err(SchemaError::DepthExceeded {
            limit: config.max_depth,
            path: prefix.trim_end_matches(['.', '*']).to_string(),
        });
    }

    let mut seen_names: HashSet<String> = HashSet::new();

    for property in schema.properties() {
        if property.is_suppressed() {
            continue;
        }

        let key = property.resolved_input_name(schema.name_strategy());
        if !seen_names.insert(key.clone()) {
            return Err(SchemaError::DuplicateProperty {
                dto: schema.type_name().to_string(),
                property: key,
            });
        }
        let path = format!("{}{}", prefix, key);

        match &property.kind {
            Some(PropertyKind::Nested(reference)) => {
                map.insert(
                    path.clone(),
                    entry_atoms(schema.type_name(), property, Placement::Nested)?,
                );
                descend(reference, &format!("{}.", path), visited, config, map)?;
            }
            Some(PropertyKind::Collection(reference)) => {
                map.insert(
                    path.clone(),
                    entry_atoms(schema.type_name(), property, Placement::Collection)?,
                );
                descend(reference, &format!("{}.*.", path), visited, config, map)?;
            }
            Some(_) => {
                map.insert(path, entry_atoms(schema.type_name(), property, Placement::Leaf)?);
            }
            None => {
                return Err(SchemaError::UnresolvedType {
                    dto: schema.type_name().to_string(),
                    property: property.name.clone(),
                });
            }
        }
    }

    Ok(())
}

/// Recurse into a referenced child schema, guarding against cycles.
fn descend(
    reference: &SchemaRef,
    child_prefix: &str,
    visited: &mut Vec<Visited>,
    config: &DeriveConfig,
    map: &mut RuleMap,
) -> Result<(), SchemaError> {
    if visited.iter().any(|frame| frame.type_id == reference.type_id()) {
        let mut chain: Vec<&str> = visited.iter().map(|frame| frame.type_name).collect();
        chain.push(reference.type_name());
        return Err(SchemaError::CyclicSchema {
            chain: chain.join(" -> "),
        });
    }

    let child = reference.descriptor();
    visited.push(Visited {
        type_id: reference.type_id(),
        type_name: reference.type_name(),
    });
    let result = expand_into(&child, child_prefix, visited, config, map);
    visited.pop();
    result
}

/// The full atom sequence for one entry: presence prefix, baseline,
/// constraints, presence suffix. Placement decides where `required` (or
/// `present`) lands.
fn entry_atoms(
    dto: &str,
    property: &PropertyDescriptor,
    placement: Placement,
) -> Result<Vec<RuleAtom>, SchemaError> {
    let presence = presence_atoms(property, placement);
    let mut atoms = presence.prefix;
    atoms.extend(baseline_atoms(dto, property)?);
    atoms.extend(constraint_atoms(&property.attrs));
    atoms.extend(presence.suffix);
    Ok(atoms)
}
