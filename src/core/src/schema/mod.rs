//! Typed DTO schema descriptors.
//!
//! A [`SchemaDescriptor`] is the in-memory representation of one DTO's
//! property declarations: name, kind, nullability/optionality flags,
//! constraint attributes, input-name mapping, and an optional custom-rules
//! routine. Descriptors are built once per DTO type through the [`Dto`]
//! trait, cached process-wide, and immutable after construction.

pub mod builder;

pub use builder::{property, PropertyBuilder, SchemaBuilder};

use crate::derive::overrides::CustomRules;
use dashmap::DashMap;
use serde_json::Value;
use std::any::TypeId;
use std::sync::{Arc, LazyLock};

// ═══════════════════════════════════════════════════════════════════════════════
// Dto Trait & Descriptor Cache
// ═══════════════════════════════════════════════════════════════════════════════

/// A type with a declarable validation schema.
///
/// This is the registration seam for the schema-producing collaborator: any
/// mechanism that can describe a DTO's properties satisfies it. Schemas are
/// declared with [`SchemaBuilder`] and must not resolve nested references
/// eagerly; [`SchemaRef`] handles that lazily during derivation.
pub trait Dto: 'static {
    /// Build this type's schema descriptor. Called at most once per process;
    /// the result is cached behind [`schema_of`].
    fn schema() -> SchemaDescriptor;
}

static SCHEMA_CACHE: LazyLock<DashMap<TypeId, Arc<SchemaDescriptor>>> =
    LazyLock::new(DashMap::new);

/// The cached schema descriptor for a DTO type, building it on first access.
///
/// Population is at-most-once per type via the map entry; a concurrent first
/// access may build a duplicate descriptor, which is simply discarded
/// (descriptors are pure and immutable). The build runs outside the shard
/// lock so `T::schema()` is free to reference other DTO types.
pub fn schema_of<T: Dto>() -> Arc<SchemaDescriptor> {
    let type_id = TypeId::of::<T>();
    if let Some(descriptor) = SCHEMA_CACHE.get(&type_id) {
        return Arc::clone(&descriptor);
    }
    let built = Arc::new(T::schema());
    tracing::debug!(dto = built.type_name(), "built schema descriptor");
    Arc::clone(&SCHEMA_CACHE.entry(type_id).or_insert(built))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Schema Reference
// ═══════════════════════════════════════════════════════════════════════════════

/// A lazy handle to another DTO type's cached schema descriptor.
///
/// Carries the type identity for cycle detection and a resolver function
/// that goes through the descriptor cache. Resolution happens during rule
/// derivation, never while the referencing schema is being built.
#[derive(Debug, Clone, Copy)]
pub struct SchemaRef {
    type_id: TypeId,
    type_name: &'static str,
    resolve: fn() -> Arc<SchemaDescriptor>,
}

impl SchemaRef {
    /// Create a reference to `T`'s schema.
    pub fn of<T: Dto>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            resolve: schema_of::<T>,
        }
    }

    /// The referenced type's identity.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The referenced type's name (diagnostics only).
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Resolve the referenced descriptor through the cache.
    pub fn descriptor(&self) -> Arc<SchemaDescriptor> {
        (self.resolve)()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Property Kind & Constraint Attributes
// ═══════════════════════════════════════════════════════════════════════════════

/// The declared type variant of a property, minus the nullable/optional
/// markers (those are independent flags on [`PropertyDescriptor`]).
#[derive(Debug, Clone)]
pub enum PropertyKind {
    String,
    Integer,
    Float,
    Boolean,
    /// An untyped array.
    Array,
    /// A backed enum with a fixed allowed value set.
    Enumeration {
        type_name: &'static str,
        allowed: Vec<Value>,
    },
    /// A single nested DTO.
    Nested(SchemaRef),
    /// A collection of nested DTOs.
    Collection(SchemaRef),
}

impl PropertyKind {
    /// True for nested-DTO and DTO-collection kinds.
    pub fn is_compound(&self) -> bool {
        matches!(self, PropertyKind::Nested(_) | PropertyKind::Collection(_))
    }
}

/// A constraint attribute declared on a property.
///
/// Converted to rule atoms appended after the baseline atoms, preserving
/// declaration order.
#[derive(Debug, Clone)]
pub enum ConstraintAttr {
    /// Minimum size (length, magnitude, item count).
    Min(u64),
    /// Maximum size.
    Max(u64),
    /// Regex the value must match.
    Pattern(String),
    /// Membership in a fixed value set.
    In(Vec<Value>),
    /// A pre-rendered keyword or `|`-joined run, normalized through the
    /// shared atom parser.
    Raw(String),
    /// Suppress validation for the property and its entire expanded subtree.
    WithoutValidation,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Name Strategy
// ═══════════════════════════════════════════════════════════════════════════════

/// Schema-level input-name mapping, applied to properties without an
/// explicit `input_name` override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameStrategy {
    /// Convert camelCase/PascalCase property names to snake_case.
    SnakeCase,
}

impl NameStrategy {
    /// Apply the strategy to a property name.
    pub fn apply(&self, name: &str) -> String {
        match self {
            NameStrategy::SnakeCase => to_snake_case(name),
        }
    }
}

fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for ch in name.chars() {
        if ch.is_uppercase() {
            if prev_lower {
                out.push('_');
            }
            for lower in ch.to_lowercase() {
                out.push(lower);
            }
            prev_lower = false;
        } else {
            out.push(ch);
            prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        }
    }
    out
}

// ═══════════════════════════════════════════════════════════════════════════════
// Property Descriptor
// ═══════════════════════════════════════════════════════════════════════════════

/// One property declaration within a schema.
#[derive(Debug, Clone)]
pub struct PropertyDescriptor {
    /// The declared property name.
    pub name: String,
    /// Explicit input-name override; wins over the schema-level strategy.
    pub input_name: Option<String>,
    /// The declared type variant. `None` surfaces as
    /// [`SchemaError::UnresolvedType`](crate::error::SchemaError) at
    /// derivation time.
    pub kind: Option<PropertyKind>,
    /// The key may be present with an explicit null value.
    pub nullable: bool,
    /// The key may be entirely absent from the payload.
    pub optional: bool,
    /// Constraint attributes in declaration order.
    pub attrs: Vec<ConstraintAttr>,
}

impl PropertyDescriptor {
    /// The payload key this property is addressed by: explicit override,
    /// then the schema-level strategy, then the property name itself.
    pub fn resolved_input_name(&self, strategy: Option<NameStrategy>) -> String {
        if let Some(input_name) = &self.input_name {
            return input_name.clone();
        }
        match strategy {
            Some(strategy) => strategy.apply(&self.name),
            None => self.name.clone(),
        }
    }

    /// True if a `WithoutValidation` attribute excludes this property (and
    /// any expanded subtree) from the rule mapping.
    pub fn is_suppressed(&self) -> bool {
        self.attrs
            .iter()
            .any(|attr| matches!(attr, ConstraintAttr::WithoutValidation))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Schema Descriptor
// ═══════════════════════════════════════════════════════════════════════════════

/// The full schema of one DTO type: an ordered property sequence plus
/// schema-level name mapping and custom rules.
pub struct SchemaDescriptor {
    type_name: &'static str,
    properties: Vec<PropertyDescriptor>,
    name_strategy: Option<NameStrategy>,
    custom_rules: Option<CustomRules>,
}

impl SchemaDescriptor {
    pub(crate) fn from_parts(
        type_name: &'static str,
        properties: Vec<PropertyDescriptor>,
        name_strategy: Option<NameStrategy>,
        custom_rules: Option<CustomRules>,
    ) -> Self {
        Self {
            type_name,
            properties,
            name_strategy,
            custom_rules,
        }
    }

    /// Start declaring a schema for the named DTO type.
    pub fn builder(type_name: &'static str) -> SchemaBuilder {
        SchemaBuilder::new(type_name)
    }

    /// The DTO type's name (diagnostics and error messages).
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The ordered property declarations.
    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    /// The schema-level name-mapping strategy, if any.
    pub fn name_strategy(&self) -> Option<NameStrategy> {
        self.name_strategy
    }

    /// The custom rule-producing routine, if the DTO declares one.
    pub fn custom_rules(&self) -> Option<&CustomRules> {
        self.custom_rules.as_ref()
    }
}

impl std::fmt::Debug for SchemaDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaDescriptor")
            .field("type_name", &self.type_name)
            .field("properties", &self.properties)
            .field("name_strategy", &self.name_strategy)
            .field("custom_rules", &self.custom_rules.is_some())
            .finish()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
