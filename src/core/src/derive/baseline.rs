//! Baseline rule atoms for each declared property type.

use crate::error::SchemaError;
use crate::rules::{MembershipRule, RuleAtom};
use crate::schema::{PropertyDescriptor, PropertyKind};

/// The baseline atom sequence for a property's declared type variant.
///
/// Each type maps to exactly one baseline set. Nested and collection
/// references produce `array` here; their subtrees are expanded separately.
/// A property with no resolvable kind is a schema error.
pub(crate) fn baseline_atoms(
    dto: &str,
    property: &PropertyDescriptor,
) -> Result<Vec<RuleAtom>, SchemaError> {
    let kind = property.kind.as_ref().ok_or_else(|| SchemaError::UnresolvedType {
        dto: dto.to_string(),
        property: property.name.clone(),
    })?;

    let atoms = match kind {
        PropertyKind::String => vec![RuleAtom::keyword("string")],
        PropertyKind::Integer | PropertyKind::Float => vec![RuleAtom::keyword("numeric")],
        PropertyKind::Boolean => vec![RuleAtom::keyword("boolean")],
        PropertyKind::Array => vec![RuleAtom::keyword("array")],
        PropertyKind::Enumeration { type_name, allowed } => {
            vec![RuleAtom::engine(MembershipRule::new(*type_name, allowed.clone()))]
        }
        PropertyKind::Nested(_) | PropertyKind::Collection(_) => {
            vec![RuleAtom::keyword("array")]
        }
    };
    Ok(atoms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::property;
    use serde_json::json;

    fn built(builder: crate::schema::PropertyBuilder) -> PropertyDescriptor {
        // Round-trip through a one-property schema to get the descriptor.
        crate::schema::SchemaDescriptor::builder("T")
            .property(builder)
            .build()
            .properties()[0]
            .clone()
    }

    fn rendered(prop: PropertyDescriptor) -> Vec<String> {
        baseline_atoms("T", &prop)
            .unwrap()
            .iter()
            .map(RuleAtom::canonical)
            .collect()
    }

    #[test]
    fn test_scalar_baselines() {
        assert_eq!(rendered(built(property("p").string())), vec!["string"]);
        assert_eq!(rendered(built(property("p").integer())), vec!["numeric"]);
        assert_eq!(rendered(built(property("p").float())), vec!["numeric"]);
        assert_eq!(rendered(built(property("p").boolean())), vec!["boolean"]);
        assert_eq!(rendered(built(property("p").array())), vec!["array"]);
    }

    #[test]
    fn test_enumeration_baseline_is_membership_atom() {
        let prop = built(property("status").enumeration("Status", vec![json!("a"), json!("b")]));
        let atoms = baseline_atoms("T", &prop).unwrap();
        assert_eq!(atoms.len(), 1);
        assert!(atoms[0].engine_rule().is_some());
        assert_eq!(atoms[0].canonical(), "in:a,b");
    }

    #[test]
    fn test_unresolved_kind_is_schema_error() {
        let prop = built(property("mystery"));
        let err = baseline_atoms("SomeDto", &prop).unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnresolvedType {
                dto: "SomeDto".into(),
                property: "mystery".into(),
            }
        );
    }
}
