//! The rule-derivation walker.
//!
//! Ties the per-property resolvers together: baseline atoms from the
//! declared type, constraint atoms from attributes, presence atoms from the
//! nullable/optional flags, recursive nested/collection expansion, and
//! finally custom-rule overrides. The output is a fresh [`RuleMap`] per
//! call; derivation is a pure function of the cached schema and the payload.

pub mod attributes;
pub mod baseline;
pub mod nested;
pub mod overrides;
pub mod presence;

pub use overrides::{CustomRules, RuleOverrides};

use crate::error::SchemaError;
use crate::rules::RuleMap;
use crate::schema::SchemaDescriptor;
use serde_json::Value;
use std::any::TypeId;

/// Derivation configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeriveConfig {
    /// Maximum schema nesting depth before derivation fails with
    /// [`SchemaError::DepthExceeded`].
    pub max_depth: usize,
}

impl Default for DeriveConfig {
    fn default() -> Self {
        Self { max_depth: 32 }
    }
}

/// Derive the complete rule mapping for a schema.
///
/// `root_id` is the DTO type the schema belongs to, seeding the cycle guard.
/// The payload is only consulted by payload-dependent custom rule routines.
pub fn derive_rules(
    schema: &SchemaDescriptor,
    root_id: TypeId,
    payload: Option<&Value>,
    config: &DeriveConfig,
) -> Result<RuleMap, SchemaError> {
    let mut map = RuleMap::new();
    let mut visited = vec![nested::Visited {
        type_id: root_id,
        type_name: schema.type_name(),
    }];
    nested::expand_into(schema, "", &mut visited, config, &mut map)?;

    if let Some(custom) = schema.custom_rules() {
        let fragment = custom.produce(payload);
        let overridden = fragment.len();
        for (path, spec) in fragment {
            let atoms = spec.into_atoms();
            if atoms.is_empty() {
                return Err(SchemaError::EmptyRule { path });
            }
            // Full replacement for the path; position is kept if it already
            // had derived rules.
            map.insert(path, atoms);
        }
        tracing::debug!(
            dto = schema.type_name(),
            paths = overridden,
            payload_dependent = custom.is_payload_dependent(),
            "applied custom rule overrides"
        );
    }

    Ok(map)
}
