//! Integration tests for rule derivation: schema declarations in, rule
//! mappings out.

use proviso_core::prelude::*;
use serde_json::json;

// ============================================================================
// Test DTOs
// ============================================================================

struct ScalarsDto;

impl Dto for ScalarsDto {
    fn schema() -> SchemaDescriptor {
        SchemaDescriptor::builder("ScalarsDto")
            .property(property("title").string())
            .property(property("count").integer())
            .property(property("ratio").float())
            .property(property("active").boolean())
            .property(property("tags").array())
            .property(
                property("status").enumeration("Status", vec![json!("draft"), json!("active")]),
            )
            .build()
    }
}

struct FlagsDto;

impl Dto for FlagsDto {
    fn schema() -> SchemaDescriptor {
        SchemaDescriptor::builder("FlagsDto")
            .property(property("plain").string())
            .property(property("maybe_null").string().nullable())
            .property(property("maybe_absent").string().optional())
            .property(property("loose").string().nullable().optional())
            .build()
    }
}

struct AuthorDto;

impl Dto for AuthorDto {
    fn schema() -> SchemaDescriptor {
        SchemaDescriptor::builder("AuthorDto")
            .property(property("name").string())
            .build()
    }
}

struct PostDto;

impl Dto for PostDto {
    fn schema() -> SchemaDescriptor {
        SchemaDescriptor::builder("PostDto")
            .property(property("parent").nested::<AuthorDto>())
            .build()
    }
}

struct ItemDto;

impl Dto for ItemDto {
    fn schema() -> SchemaDescriptor {
        SchemaDescriptor::builder("ItemDto")
            .property(property("string").string())
            .build()
    }
}

struct OrderDto;

impl Dto for OrderDto {
    fn schema() -> SchemaDescriptor {
        SchemaDescriptor::builder("OrderDto")
            .property(property("collection").collection_of::<ItemDto>())
            .build()
    }
}

struct SuppressedDto;

impl Dto for SuppressedDto {
    fn schema() -> SchemaDescriptor {
        SchemaDescriptor::builder("SuppressedDto")
            .property(property("kept").string())
            .property(property("skipped").string().without_validation())
            .property(property("skipped_tree").nested::<AuthorDto>().without_validation())
            .build()
    }
}

struct MappedDto;

impl Dto for MappedDto {
    fn schema() -> SchemaDescriptor {
        SchemaDescriptor::builder("MappedDto")
            .property(property("property").string().input_name("some_property"))
            .build()
    }
}

struct SnakeDto;

impl Dto for SnakeDto {
    fn schema() -> SchemaDescriptor {
        SchemaDescriptor::builder("SnakeDto")
            .name_strategy(NameStrategy::SnakeCase)
            .property(property("someProperty").string())
            .property(property("explicitName").string().input_name("kept_as_is"))
            .build()
    }
}

struct ListOverrideDto;

impl Dto for ListOverrideDto {
    fn schema() -> SchemaDescriptor {
        SchemaDescriptor::builder("ListOverrideDto")
            .property(property("items").array())
            .custom_rules(|| {
                RuleOverrides::new().rule(
                    "items",
                    vec![RuleAtom::keyword("array"), RuleAtom::keyword("min:5")],
                )
            })
            .build()
    }
}

struct JoinedOverrideDto;

impl Dto for JoinedOverrideDto {
    fn schema() -> SchemaDescriptor {
        SchemaDescriptor::builder("JoinedOverrideDto")
            .property(property("items").array())
            .custom_rules(|| RuleOverrides::new().rule("items", "array|min:5"))
            .build()
    }
}

struct MixedOverrideDto;

impl Dto for MixedOverrideDto {
    fn schema() -> SchemaDescriptor {
        SchemaDescriptor::builder("MixedOverrideDto")
            .property(property("items").array())
            .custom_rules(|| {
                RuleOverrides::new().rule(
                    "items",
                    RuleSpec::List(vec!["array".into(), RuleAtom::keyword("min:5").into()]),
                )
            })
            .build()
    }
}

struct BranchingDto;

impl Dto for BranchingDto {
    fn schema() -> SchemaDescriptor {
        SchemaDescriptor::builder("BranchingDto")
            .property(property("is_company").boolean())
            .property(property("company_name").string().optional())
            .custom_rules_with_payload(|payload| {
                if payload["is_company"] == json!(true) {
                    RuleOverrides::new().rule("company_name", "required|string")
                } else {
                    RuleOverrides::new().rule("company_name", "sometimes|string")
                }
            })
            .build()
    }
}

struct DeepLeafDto;
struct DeepMidDto;
struct DeepRootDto;

impl Dto for DeepLeafDto {
    fn schema() -> SchemaDescriptor {
        SchemaDescriptor::builder("DeepLeafDto")
            .property(property("value").string())
            .build()
    }
}

impl Dto for DeepMidDto {
    fn schema() -> SchemaDescriptor {
        SchemaDescriptor::builder("DeepMidDto")
            .property(property("leaf").nested::<DeepLeafDto>())
            .build()
    }
}

impl Dto for DeepRootDto {
    fn schema() -> SchemaDescriptor {
        SchemaDescriptor::builder("DeepRootDto")
            .property(property("mid").nested::<DeepMidDto>())
            .build()
    }
}

fn rendered<T: Dto>(path: &str) -> Vec<String> {
    resolve_rules::<T>(None)
        .unwrap()
        .atoms_rendered(path)
        .unwrap_or_else(|| panic!("no entry for `{path}`"))
}

// ============================================================================
// Baseline & Presence
// ============================================================================

#[test]
fn test_required_scalars_get_baseline_plus_required() {
    assert_eq!(rendered::<ScalarsDto>("title"), vec!["string", "required"]);
    assert_eq!(rendered::<ScalarsDto>("count"), vec!["numeric", "required"]);
    assert_eq!(rendered::<ScalarsDto>("ratio"), vec!["numeric", "required"]);
    assert_eq!(rendered::<ScalarsDto>("tags"), vec!["array", "required"]);
}

#[test]
fn test_boolean_never_gets_required() {
    assert_eq!(rendered::<ScalarsDto>("active"), vec!["boolean"]);
}

#[test]
fn test_enum_membership_atom() {
    assert_eq!(rendered::<ScalarsDto>("status"), vec!["in:draft,active", "required"]);
}

#[test]
fn test_presence_decision_table() {
    assert_eq!(rendered::<FlagsDto>("plain"), vec!["string", "required"]);
    assert_eq!(rendered::<FlagsDto>("maybe_null"), vec!["string", "nullable"]);
    assert_eq!(rendered::<FlagsDto>("maybe_absent"), vec!["sometimes", "string"]);
    assert_eq!(
        rendered::<FlagsDto>("loose"),
        vec!["sometimes", "string", "nullable"]
    );
}

// ============================================================================
// Nested & Collection Expansion
// ============================================================================

#[test]
fn test_nested_dto_expansion() {
    let map = resolve_rules::<PostDto>(None).unwrap();
    let paths: Vec<_> = map.paths().cloned().collect();
    assert_eq!(paths, vec!["parent", "parent.name"]);
    assert_eq!(map.atoms_rendered("parent").unwrap(), vec!["required", "array"]);
    assert_eq!(
        map.atoms_rendered("parent.name").unwrap(),
        vec!["string", "required"]
    );
}

#[test]
fn test_collection_expansion_uses_present_and_wildcard() {
    let map = resolve_rules::<OrderDto>(None).unwrap();
    let paths: Vec<_> = map.paths().cloned().collect();
    assert_eq!(paths, vec!["collection", "collection.*.string"]);
    assert_eq!(
        map.atoms_rendered("collection").unwrap(),
        vec!["present", "array"]
    );
    assert_eq!(
        map.atoms_rendered("collection.*.string").unwrap(),
        vec!["string", "required"]
    );
}

#[test]
fn test_three_level_nesting() {
    let map = resolve_rules::<DeepRootDto>(None).unwrap();
    let paths: Vec<_> = map.paths().cloned().collect();
    assert_eq!(paths, vec!["mid", "mid.leaf", "mid.leaf.value"]);
    assert_eq!(
        map.atoms_rendered("mid.leaf.value").unwrap(),
        vec!["string", "required"]
    );
}

#[test]
fn test_nesting_depth_limit_via_config() {
    let config = DeriveConfig { max_depth: 2 };
    let err = resolve_rules_with::<DeepRootDto>(None, &config).unwrap_err();
    assert!(matches!(err, SchemaError::DepthExceeded { limit: 2, .. }));
}

// ============================================================================
// Suppression
// ============================================================================

#[test]
fn test_suppressed_properties_emit_nothing() {
    let map = resolve_rules::<SuppressedDto>(None).unwrap();
    let paths: Vec<_> = map.paths().cloned().collect();
    // The suppressed scalar and the whole suppressed subtree are absent.
    assert_eq!(paths, vec!["kept"]);
}

// ============================================================================
// Name Mapping
// ============================================================================

#[test]
fn test_explicit_input_name_keys_the_mapping() {
    let map = resolve_rules::<MappedDto>(None).unwrap();
    assert!(map.contains_path("some_property"));
    assert!(!map.contains_path("property"));
}

#[test]
fn test_snake_case_strategy() {
    let map = resolve_rules::<SnakeDto>(None).unwrap();
    assert!(map.contains_path("some_property"));
    // Explicit overrides beat the strategy.
    assert!(map.contains_path("kept_as_is"));
    assert!(!map.contains_path("explicit_name"));
}

// ============================================================================
// Custom Rule Overrides
// ============================================================================

#[test]
fn test_all_override_forms_normalize_identically() {
    let expected = vec!["array".to_string(), "min:5".to_string()];
    assert_eq!(rendered::<ListOverrideDto>("items"), expected);
    assert_eq!(rendered::<JoinedOverrideDto>("items"), expected);
    assert_eq!(rendered::<MixedOverrideDto>("items"), expected);
}

#[test]
fn test_payload_dependent_rules_branch_per_payload() {
    let company = resolve_rules::<BranchingDto>(Some(&json!({"is_company": true}))).unwrap();
    assert_eq!(
        company.atoms_rendered("company_name").unwrap(),
        vec!["required", "string"]
    );

    let person = resolve_rules::<BranchingDto>(Some(&json!({"is_company": false}))).unwrap();
    assert_eq!(
        person.atoms_rendered("company_name").unwrap(),
        vec!["sometimes", "string"]
    );

    // The non-overridden sibling is unaffected by the branch.
    assert_eq!(company.atoms_rendered("is_company"), person.atoms_rendered("is_company"));
}
