//! Per-atom checks against a resolved payload value.
//!
//! Value semantics follow the form-validation conventions the atom
//! vocabulary comes from: `numeric` accepts numeric strings, `boolean`
//! accepts `0`/`1` in number or string form, `array` accepts JSON objects
//! (a nested DTO payload is an object and must satisfy its `array` atom),
//! and non-implicit atoms are skipped for absent or null values so that
//! only `required`/`present` ever fire on absence.

use crate::error::{FieldError, ValidationErrorKind, ValidationErrors};
use crate::rules::RuleAtom;
use dashmap::DashMap;
use regex::Regex;
use serde_json::Value;
use std::sync::{Arc, LazyLock};

/// Compiled patterns from `regex:` atoms, keyed by source text. A pattern
/// that fails to compile is cached as `None` and its atom is skipped.
static REGEX_CACHE: LazyLock<DashMap<String, Option<Arc<Regex>>>> = LazyLock::new(DashMap::new);

fn compiled(pattern: &str) -> Option<Arc<Regex>> {
    if let Some(entry) = REGEX_CACHE.get(pattern) {
        return entry.value().clone();
    }
    let compiled = match Regex::new(pattern) {
        Ok(regex) => Some(Arc::new(regex)),
        Err(error) => {
            tracing::warn!(pattern, %error, "invalid regex atom, skipping");
            None
        }
    };
    REGEX_CACHE.insert(pattern.to_string(), compiled.clone());
    compiled
}

/// Check one rule entry's atoms against the value resolved for `path`.
///
/// `value` is `None` when the key was absent from the payload.
pub(crate) fn check_atoms(
    path: &str,
    atoms: &[RuleAtom],
    value: Option<&Value>,
    errors: &mut ValidationErrors,
) {
    let has = |keyword: &str| atoms.iter().any(|atom| atom.is(keyword));

    match value {
        None => {
            // `sometimes` skips the whole entry when the key is absent.
            if has("sometimes") {
                return;
            }
            for atom in atoms {
                if atom.is("required") {
                    errors.add_error(path, ValidationErrorKind::Required);
                } else if atom.is("present") {
                    errors.add_error(path, ValidationErrorKind::MustBePresent);
                }
                // Every other atom skips absent values.
            }
        }
        Some(Value::Null) => {
            // `nullable` short-circuits the remaining atoms on explicit null.
            if has("nullable") {
                return;
            }
            for atom in atoms {
                if atom.is("required") {
                    errors.add_error(path, ValidationErrorKind::Required);
                }
                // `present` passes: the key exists. Non-implicit atoms skip.
            }
        }
        Some(value) => {
            for atom in atoms {
                if let Some(error) = check_atom(atom, value) {
                    errors.add(path, error);
                }
            }
        }
    }
}

/// Check one atom against a concrete (non-null) value.
fn check_atom(atom: &RuleAtom, value: &Value) -> Option<FieldError> {
    if let Some(rule) = atom.engine_rule() {
        return rule.check(value);
    }

    let name = atom.name();
    match name.as_str() {
        "required" => check_required(value),
        "present" | "sometimes" | "nullable" => None,
        "string" => check_shape(value.is_string(), "string"),
        "numeric" => check_shape(as_number(value).is_some(), "number"),
        "boolean" => check_shape(is_boolean_like(value), "boolean"),
        "array" => check_shape(value.is_array() || value.is_object(), "array"),
        "min" => check_min(atom.args()?.as_str(), value),
        "max" => check_max(atom.args()?.as_str(), value),
        "regex" => check_regex(atom.args()?.as_str(), value),
        other => {
            tracing::trace!(atom = other, "unrecognized rule atom, skipping");
            None
        }
    }
}

fn check_required(value: &Value) -> Option<FieldError> {
    let empty = match value {
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Null => true,
        _ => false,
    };
    empty.then(|| FieldError::new(ValidationErrorKind::Required))
}

fn check_shape(ok: bool, expected: &str) -> Option<FieldError> {
    if ok {
        None
    } else {
        Some(FieldError::new(ValidationErrorKind::WrongType {
            expected: expected.to_string(),
        }))
    }
}

fn check_min(args: &str, value: &Value) -> Option<FieldError> {
    let min: f64 = args.parse().ok()?;
    let actual = size_of(value)?;
    (actual < min).then(|| {
        FieldError::new(ValidationErrorKind::TooSmall {
            min: args.to_string(),
            actual: render_size(actual),
        })
    })
}

fn check_max(args: &str, value: &Value) -> Option<FieldError> {
    let max: f64 = args.parse().ok()?;
    let actual = size_of(value)?;
    (actual > max).then(|| {
        FieldError::new(ValidationErrorKind::TooLarge {
            max: args.to_string(),
            actual: render_size(actual),
        })
    })
}

fn check_regex(pattern: &str, value: &Value) -> Option<FieldError> {
    let Some(text) = value.as_str() else {
        return Some(FieldError::new(ValidationErrorKind::Pattern {
            pattern: pattern.to_string(),
        }));
    };
    let regex = compiled(pattern)?;
    if regex.is_match(text) {
        None
    } else {
        Some(FieldError::new(ValidationErrorKind::Pattern {
            pattern: pattern.to_string(),
        }))
    }
}

/// The size of a value under `min`/`max`: character count for strings,
/// magnitude for numbers, element count for arrays and objects.
fn size_of(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => Some(s.chars().count() as f64),
        Value::Number(_) => value.as_f64(),
        Value::Array(items) => Some(items.len() as f64),
        Value::Object(map) => Some(map.len() as f64),
        _ => None,
    }
}

fn render_size(size: f64) -> String {
    if size.fract() == 0.0 {
        format!("{}", size as i64)
    } else {
        format!("{}", size)
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(_) => value.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn is_boolean_like(value: &Value) -> bool {
    match value {
        Value::Bool(_) => true,
        Value::Number(_) => matches!(value.as_f64(), Some(n) if n == 0.0 || n == 1.0),
        Value::String(s) => s == "0" || s == "1",
        _ => false,
    }
}
