//! Constraint attributes to rule atoms.

use crate::rules::{parse_atoms, MembershipRule, RuleAtom};
use crate::schema::ConstraintAttr;

/// Convert a property's constraint attributes into additional atoms,
/// preserving declaration order. Appended after the baseline atoms.
///
/// `WithoutValidation` contributes nothing here; it is handled upstream by
/// excluding the property from the mapping entirely.
pub(crate) fn constraint_atoms(attrs: &[ConstraintAttr]) -> Vec<RuleAtom> {
    let mut atoms = Vec::new();
    for attr in attrs {
        match attr {
            ConstraintAttr::Min(min) => atoms.push(RuleAtom::keyword(format!("min:{}", min))),
            ConstraintAttr::Max(max) => atoms.push(RuleAtom::keyword(format!("max:{}", max))),
            ConstraintAttr::Pattern(pattern) => {
                atoms.push(RuleAtom::keyword(format!("regex:{}", pattern)))
            }
            ConstraintAttr::In(allowed) => {
                atoms.push(RuleAtom::engine(MembershipRule::new("in", allowed.clone())))
            }
            ConstraintAttr::Raw(run) => atoms.extend(parse_atoms(run)),
            ConstraintAttr::WithoutValidation => {}
        }
    }
    atoms
}
