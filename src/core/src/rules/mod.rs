//! Rule atoms: the constraint vocabulary the derivation engine emits.
//!
//! A [`RuleAtom`] is one constraint unit in a derived rule sequence. Most
//! atoms are flat keywords in canonical `name` or `name:args` form
//! (`"string"`, `"min:5"`). Constructs the flat form cannot express, such as
//! enum membership over an arbitrary value set, are carried as opaque
//! [`EngineRule`] objects that the interpreting engine calls back into.
//!
//! [`RuleSpec`] is the normalization layer for custom rule overrides: the
//! accepted input forms (atom list, `|`-joined string, scalar string, engine
//! object, mixed list) all normalize to one atom sequence.

pub mod map;

pub use map::RuleMap;

use crate::error::{FieldError, ValidationErrorKind};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

// ═══════════════════════════════════════════════════════════════════════════════
// Engine Rule Trait
// ═══════════════════════════════════════════════════════════════════════════════

/// An opaque validator-engine rule object.
///
/// Used where the flat keyword form cannot express the constraint. The
/// interpreting engine dispatches through [`EngineRule::check`]; equality,
/// ordering, and display of the carrying atom go through
/// [`EngineRule::fingerprint`].
pub trait EngineRule: Send + Sync + fmt::Debug {
    /// Canonical string form of this rule, used for atom equality and display.
    fn fingerprint(&self) -> String;

    /// Check one payload value, returning a violation if it fails.
    fn check(&self, value: &Value) -> Option<FieldError>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// Membership Rule
// ═══════════════════════════════════════════════════════════════════════════════

/// Engine rule asserting a value belongs to a fixed set.
///
/// Backs both enum-typed properties and explicit `in` constraints. Values
/// match either exactly or by their rendered string form, so a payload
/// `"1"` satisfies an allowed numeric `1`.
#[derive(Debug, Clone)]
pub struct MembershipRule {
    label: String,
    allowed: Vec<Value>,
}

impl MembershipRule {
    /// Create a membership rule over the given allowed value set.
    pub fn new(label: impl Into<String>, allowed: Vec<Value>) -> Self {
        Self {
            label: label.into(),
            allowed,
        }
    }

    /// The allowed values rendered as plain strings.
    pub fn allowed_rendered(&self) -> Vec<String> {
        self.allowed.iter().map(render_value).collect()
    }

    /// The label this rule was declared under (enum type name or `in`).
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl EngineRule for MembershipRule {
    fn fingerprint(&self) -> String {
        format!("in:{}", self.allowed_rendered().join(","))
    }

    fn check(&self, value: &Value) -> Option<FieldError> {
        if self.allowed.contains(value) {
            return None;
        }
        let rendered = render_value(value);
        if self.allowed.iter().any(|a| render_value(a) == rendered) {
            return None;
        }
        Some(FieldError::new(ValidationErrorKind::NotInSet {
            allowed: self.allowed_rendered(),
        }))
    }
}

/// Render a JSON value as a bare string (strings lose their quotes).
fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Rule Atom
// ═══════════════════════════════════════════════════════════════════════════════

/// One constraint unit in a derived rule sequence.
#[derive(Debug, Clone)]
pub enum RuleAtom {
    /// A bare or parameterized keyword in canonical `name[:args]` form.
    Keyword(String),
    /// An opaque engine rule object.
    Engine(Arc<dyn EngineRule>),
}

impl RuleAtom {
    /// Create a keyword atom, trimming surrounding whitespace.
    pub fn keyword(s: impl Into<String>) -> Self {
        RuleAtom::Keyword(s.into().trim().to_string())
    }

    /// Wrap an engine rule object as an atom.
    pub fn engine(rule: impl EngineRule + 'static) -> Self {
        RuleAtom::Engine(Arc::new(rule))
    }

    /// The normalized string form (keyword text or engine fingerprint).
    pub fn canonical(&self) -> String {
        match self {
            RuleAtom::Keyword(s) => s.clone(),
            RuleAtom::Engine(rule) => rule.fingerprint(),
        }
    }

    /// The keyword name with any `:args` suffix stripped.
    ///
    /// Engine atoms report the part of their fingerprint before the first
    /// colon.
    pub fn name(&self) -> String {
        let canonical = self.canonical();
        match canonical.split_once(':') {
            Some((name, _)) => name.to_string(),
            None => canonical,
        }
    }

    /// The `:args` suffix of a parameterized keyword, if any.
    pub fn args(&self) -> Option<String> {
        self.canonical()
            .split_once(':')
            .map(|(_, args)| args.to_string())
    }

    /// True if this atom is the given bare keyword.
    pub fn is(&self, keyword: &str) -> bool {
        matches!(self, RuleAtom::Keyword(s) if s == keyword)
    }

    /// The engine rule object, if this is an engine atom.
    pub fn engine_rule(&self) -> Option<&Arc<dyn EngineRule>> {
        match self {
            RuleAtom::Engine(rule) => Some(rule),
            RuleAtom::Keyword(_) => None,
        }
    }
}

impl PartialEq for RuleAtom {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for RuleAtom {}

impl PartialOrd for RuleAtom {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RuleAtom {
    fn cmp(&self, other: &Self) -> Ordering {
        self.canonical().cmp(&other.canonical())
    }
}

impl Hash for RuleAtom {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl fmt::Display for RuleAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

impl From<&str> for RuleAtom {
    fn from(s: &str) -> Self {
        RuleAtom::keyword(s)
    }
}

impl From<String> for RuleAtom {
    fn from(s: String) -> Self {
        RuleAtom::keyword(s)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Atom Parsing
// ═══════════════════════════════════════════════════════════════════════════════

/// Parse a `|`-joined rule run (`"array|min:5"`) into keyword atoms.
///
/// Empty segments are dropped, so `"array||min:5"` and `"array|min:5"`
/// normalize identically.
pub fn parse_atoms(run: &str) -> Vec<RuleAtom> {
    run.split('|')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(RuleAtom::keyword)
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════════
// Rule Spec (override normalization)
// ═══════════════════════════════════════════════════════════════════════════════

/// One accepted input form for a custom rule override.
///
/// All forms normalize through [`RuleSpec::into_atoms`] to the same atom
/// sequence, so `vec!["array", "min:5"]`, `"array|min:5"`, and a mixed list
/// of strings and engine objects are interchangeable.
#[derive(Debug, Clone)]
pub enum RuleSpec {
    /// A single atom used directly.
    Atom(RuleAtom),
    /// A scalar string, split on `|` during normalization.
    Joined(String),
    /// A pre-split list; string elements are still split on `|`.
    List(Vec<RuleSpec>),
}

impl RuleSpec {
    /// Normalize to the canonical atom sequence.
    pub fn into_atoms(self) -> Vec<RuleAtom> {
        match self {
            RuleSpec::Atom(atom) => vec![atom],
            RuleSpec::Joined(run) => parse_atoms(&run),
            RuleSpec::List(specs) => specs
                .into_iter()
                .flat_map(RuleSpec::into_atoms)
                .collect(),
        }
    }
}

impl From<&str> for RuleSpec {
    fn from(s: &str) -> Self {
        RuleSpec::Joined(s.to_string())
    }
}

impl From<String> for RuleSpec {
    fn from(s: String) -> Self {
        RuleSpec::Joined(s)
    }
}

impl From<RuleAtom> for RuleSpec {
    fn from(atom: RuleAtom) -> Self {
        RuleSpec::Atom(atom)
    }
}

impl From<Vec<RuleSpec>> for RuleSpec {
    fn from(specs: Vec<RuleSpec>) -> Self {
        RuleSpec::List(specs)
    }
}

impl From<Vec<RuleAtom>> for RuleSpec {
    fn from(atoms: Vec<RuleAtom>) -> Self {
        RuleSpec::List(atoms.into_iter().map(RuleSpec::Atom).collect())
    }
}

impl From<Vec<&str>> for RuleSpec {
    fn from(runs: Vec<&str>) -> Self {
        RuleSpec::List(runs.into_iter().map(RuleSpec::from).collect())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
