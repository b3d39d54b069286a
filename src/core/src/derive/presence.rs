//! Presence atoms derived from the nullable/optional flags.
//!
//! The two flags are independent axes: `optional` means the key may be
//! entirely absent (`sometimes` skips validation when it is), `nullable`
//! means the key may be present with an explicit null. They combine rather
//! than override each other.
//!
//! Atom placement varies by entry shape:
//! - `sometimes` always goes first.
//! - Leaf entries append `required` after the baseline and constraint atoms
//!   (`[string, min:2, required]`).
//! - Nested and collection entries prepend `required` before `array`;
//!   collections use `present` instead, since their requiredness is an
//!   array-presence check rather than a scalar-required check.
//! - `nullable` always appends last.
//!
//! Boolean properties never receive `required`: absence and `false` are
//! indistinguishable in form payloads, so presence must not be forced.

use crate::rules::RuleAtom;
use crate::schema::{PropertyDescriptor, PropertyKind};

/// Where the presence atoms will sit in the final sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Placement {
    /// A scalar/enum/untyped-array leaf entry.
    Leaf,
    /// The subtree root entry of a nested DTO property.
    Nested,
    /// The subtree root entry of a DTO-collection property.
    Collection,
}

/// Presence atoms split by their position relative to the type and
/// constraint atoms.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct PresenceAtoms {
    pub prefix: Vec<RuleAtom>,
    pub suffix: Vec<RuleAtom>,
}

/// Derive the presence atoms for a property at the given placement.
pub(crate) fn presence_atoms(property: &PropertyDescriptor, placement: Placement) -> PresenceAtoms {
    let mut presence = PresenceAtoms::default();

    if property.optional {
        presence.prefix.push(RuleAtom::keyword("sometimes"));
    }

    if property.nullable {
        presence.suffix.push(RuleAtom::keyword("nullable"));
    } else if !property.optional && !is_boolean(property) {
        match placement {
            Placement::Leaf => presence.suffix.push(RuleAtom::keyword("required")),
            Placement::Nested => presence.prefix.push(RuleAtom::keyword("required")),
            Placement::Collection => presence.prefix.push(RuleAtom::keyword("present")),
        }
    }

    presence
}

fn is_boolean(property: &PropertyDescriptor) -> bool {
    matches!(property.kind, Some(PropertyKind::Boolean))
}
