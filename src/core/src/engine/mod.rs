//! The rule-interpreting validation engine.
//!
//! Takes a derived [`RuleMap`] plus a JSON payload and produces a
//! [`Verdict`]. Each entry's path is resolved against the payload tree:
//! wildcard segments fan out over the actual array elements and report at
//! concrete indexed paths (`"items.0.sku"`), and intermediate nodes that
//! are legitimately absent (`sometimes`) or null (`nullable`) short-circuit
//! their whole subtree.

mod checks;

use crate::error::{ValidationErrors, Verdict};
use crate::rules::{RuleAtom, RuleMap};
use serde_json::Value;

/// Run a rule mapping against a payload.
pub fn run(map: &RuleMap, payload: &Value) -> Verdict {
    let mut errors = ValidationErrors::new();

    for (path, atoms) in map.iter() {
        let segments: Vec<&str> = path.split('.').collect();
        let mut walker = Walker {
            map,
            atoms: atoms.as_slice(),
            rule_path: Vec::with_capacity(segments.len()),
            concrete_path: Vec::with_capacity(segments.len()),
        };
        walker.walk(&segments, Some(payload), &mut errors);
    }

    tracing::debug!(
        entries = map.len(),
        violations = errors.error_count(),
        "validation engine verdict"
    );

    if errors.is_empty() {
        Verdict::Pass
    } else {
        Verdict::Fail(errors)
    }
}

struct Walker<'a> {
    map: &'a RuleMap,
    atoms: &'a [RuleAtom],
    /// Consumed segments in rule form (`*` kept), for ancestor entry lookups.
    rule_path: Vec<&'a str>,
    /// Consumed segments in concrete form (indices substituted), for error
    /// reporting.
    concrete_path: Vec<String>,
}

impl<'a> Walker<'a> {
    fn walk(
        &mut self,
        remaining: &[&'a str],
        current: Option<&Value>,
        errors: &mut ValidationErrors,
    ) {
        let Some((&segment, rest)) = remaining.split_first() else {
            let path = self.concrete_path.join(".");
            checks::check_atoms(&path, self.atoms, current, errors);
            return;
        };

        if segment == "*" {
            // Fan out over the actual array. A missing or non-array parent
            // contributes no wildcard checks; the parent's own entry reports
            // the shape error. Empty arrays are vacuously fine.
            if let Some(Value::Array(items)) = current {
                for (index, element) in items.iter().enumerate() {
                    self.rule_path.push("*");
                    self.concrete_path.push(index.to_string());
                    self.walk(rest, Some(element), errors);
                    self.rule_path.pop();
                    self.concrete_path.pop();
                }
            }
            return;
        }

        let next = current.and_then(|value| value.get(segment));
        self.rule_path.push(segment);
        self.concrete_path.push(segment.to_string());

        // Ancestor short-circuit: an intermediate node that is absent under
        // `sometimes`, or null under `nullable`, skips the child entry.
        let short_circuit = !rest.is_empty()
            && match next {
                None => self.ancestor_allows("sometimes"),
                Some(Value::Null) => self.ancestor_allows("nullable"),
                Some(_) => false,
            };

        if !short_circuit {
            // A null intermediate without `nullable` leaves descendants
            // unresolvable; they continue as absent.
            let next = match next {
                Some(Value::Null) if !rest.is_empty() => None,
                other => other,
            };
            self.walk(rest, next, errors);
        }

        self.rule_path.pop();
        self.concrete_path.pop();
    }

    fn ancestor_allows(&self, keyword: &str) -> bool {
        let ancestor = self.rule_path.join(".");
        self.map
            .get(&ancestor)
            .map(|atoms| atoms.iter().any(|atom| atom.is(keyword)))
            .unwrap_or(false)
    }
}
