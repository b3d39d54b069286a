//! Entry points: derive a rule mapping for a DTO type, or validate a
//! payload against it in one call.

use crate::derive::{derive_rules, DeriveConfig};
use crate::engine;
use crate::error::{SchemaError, Verdict};
use crate::rules::RuleMap;
use crate::schema::{schema_of, Dto};
use serde_json::Value;
use std::any::TypeId;

/// Derive the validation rule mapping for `T`, with the default
/// configuration.
///
/// The payload is only consulted when `T` declares payload-dependent custom
/// rules; pass `None` for a payload-independent view of the mapping. Pure
/// function of the cached schema and the payload.
pub fn resolve_rules<T: Dto>(payload: Option<&Value>) -> Result<RuleMap, SchemaError> {
    resolve_rules_with::<T>(payload, &DeriveConfig::default())
}

/// [`resolve_rules`] with an explicit [`DeriveConfig`].
pub fn resolve_rules_with<T: Dto>(
    payload: Option<&Value>,
    config: &DeriveConfig,
) -> Result<RuleMap, SchemaError> {
    let schema = schema_of::<T>();
    derive_rules(&schema, TypeId::of::<T>(), payload, config)
}

/// Validate a payload against `T`'s derived rules.
///
/// Returns `Err` only for schema errors; a failing payload is the
/// [`Verdict::Fail`] arm of the `Ok` value.
pub fn validate<T: Dto>(payload: &Value) -> Result<Verdict, SchemaError> {
    validate_with::<T>(payload, &DeriveConfig::default())
}

/// [`validate`] with an explicit [`DeriveConfig`].
pub fn validate_with<T: Dto>(
    payload: &Value,
    config: &DeriveConfig,
) -> Result<Verdict, SchemaError> {
    let map = resolve_rules_with::<T>(Some(payload), config)?;
    Ok(engine::run(&map, payload))
}
