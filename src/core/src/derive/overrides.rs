//! Custom rule overrides declared by a DTO.
//!
//! A DTO may attach a rule-producing routine to its schema. The routine's
//! output is a [`RuleOverrides`] fragment: for every path it names, the
//! normalized atom sequence fully replaces the engine-derived one (never
//! merged or appended). Paths it does not name keep their derived rules.

use crate::rules::RuleSpec;
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

// ═══════════════════════════════════════════════════════════════════════════════
// Custom Rules Strategy
// ═══════════════════════════════════════════════════════════════════════════════

/// A DTO's custom rule-producing routine.
///
/// Two variants, dispatched on which signature the DTO supplies: a
/// payload-independent routine, or one that branches on the payload being
/// validated (e.g. on a sibling field's value).
#[derive(Clone)]
pub enum CustomRules {
    /// Routine with no payload parameter.
    Fixed(Arc<dyn Fn() -> RuleOverrides + Send + Sync>),
    /// Routine invoked with the current payload. When rules are resolved
    /// without a payload, the routine sees `Value::Null`.
    WithPayload(Arc<dyn Fn(&Value) -> RuleOverrides + Send + Sync>),
}

impl CustomRules {
    /// Invoke the routine for the given payload.
    pub fn produce(&self, payload: Option<&Value>) -> RuleOverrides {
        match self {
            CustomRules::Fixed(routine) => routine(),
            CustomRules::WithPayload(routine) => routine(payload.unwrap_or(&Value::Null)),
        }
    }

    /// True if the routine branches on the payload.
    pub fn is_payload_dependent(&self) -> bool {
        matches!(self, CustomRules::WithPayload(_))
    }
}

impl fmt::Debug for CustomRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomRules::Fixed(_) => write!(f, "CustomRules::Fixed"),
            CustomRules::WithPayload(_) => write!(f, "CustomRules::WithPayload"),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Rule Overrides Fragment
// ═══════════════════════════════════════════════════════════════════════════════

/// An ordered `path -> rule spec` fragment produced by a custom rule routine.
#[derive(Debug, Clone, Default)]
pub struct RuleOverrides {
    entries: IndexMap<String, RuleSpec>,
}

impl RuleOverrides {
    /// Create an empty fragment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the rules for a path. Accepts any [`RuleSpec`] input form:
    /// an atom list, a `|`-joined string, a scalar string, an engine object,
    /// or a mixed list.
    pub fn rule(mut self, path: impl Into<String>, spec: impl Into<RuleSpec>) -> Self {
        self.entries.insert(path.into(), spec.into());
        self
    }

    /// True if the fragment names no paths.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of overridden paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl IntoIterator for RuleOverrides {
    type Item = (String, RuleSpec);
    type IntoIter = indexmap::map::IntoIter<String, RuleSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
