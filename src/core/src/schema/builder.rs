//! Fluent builders for declaring DTO schemas.
//!
//! This is the crate's registration layer: in place of language-level
//! reflection, a DTO declares its schema with chained builder calls.
//!
//! ```rust,ignore
//! use proviso_core::schema::{property, Dto, SchemaDescriptor};
//!
//! struct CreatePostDto;
//!
//! impl Dto for CreatePostDto {
//!     fn schema() -> SchemaDescriptor {
//!         SchemaDescriptor::builder("CreatePostDto")
//!             .property(property("title").string().min(2).max(120))
//!             .property(property("summary").string().nullable())
//!             .property(property("tags").array().optional())
//!             .property(property("author").nested::<AuthorDto>())
//!             .build()
//!     }
//! }
//! ```

use crate::derive::overrides::{CustomRules, RuleOverrides};
use crate::schema::{
    ConstraintAttr, Dto, NameStrategy, PropertyDescriptor, PropertyKind, SchemaDescriptor,
    SchemaRef,
};
use serde_json::Value;
use std::sync::Arc;

// ═══════════════════════════════════════════════════════════════════════════════
// Schema Builder
// ═══════════════════════════════════════════════════════════════════════════════

/// Builder for a [`SchemaDescriptor`].
pub struct SchemaBuilder {
    type_name: &'static str,
    properties: Vec<PropertyDescriptor>,
    name_strategy: Option<NameStrategy>,
    custom_rules: Option<CustomRules>,
}

impl SchemaBuilder {
    /// Start a schema for the named DTO type.
    pub fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            properties: Vec::new(),
            name_strategy: None,
            custom_rules: None,
        }
    }

    /// Apply an input-name mapping strategy to properties without an
    /// explicit override.
    pub fn name_strategy(mut self, strategy: NameStrategy) -> Self {
        self.name_strategy = Some(strategy);
        self
    }

    /// Add a property declaration.
    pub fn property(mut self, property: PropertyBuilder) -> Self {
        self.properties.push(property.build());
        self
    }

    /// Attach a payload-independent custom rule routine. Its output fully
    /// replaces derived rules for the paths it names.
    pub fn custom_rules<F>(mut self, routine: F) -> Self
    where
        F: Fn() -> RuleOverrides + Send + Sync + 'static,
    {
        self.custom_rules = Some(CustomRules::Fixed(Arc::new(routine)));
        self
    }

    /// Attach a payload-dependent custom rule routine.
    pub fn custom_rules_with_payload<F>(mut self, routine: F) -> Self
    where
        F: Fn(&Value) -> RuleOverrides + Send + Sync + 'static,
    {
        self.custom_rules = Some(CustomRules::WithPayload(Arc::new(routine)));
        self
    }

    /// Finish the declaration.
    pub fn build(self) -> SchemaDescriptor {
        SchemaDescriptor::from_parts(
            self.type_name,
            self.properties,
            self.name_strategy,
            self.custom_rules,
        )
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Property Builder
// ═══════════════════════════════════════════════════════════════════════════════

/// Start declaring a property.
pub fn property(name: impl Into<String>) -> PropertyBuilder {
    PropertyBuilder {
        name: name.into(),
        input_name: None,
        kind: None,
        nullable: false,
        optional: false,
        attrs: Vec::new(),
    }
}

/// Builder for one [`PropertyDescriptor`].
pub struct PropertyBuilder {
    name: String,
    input_name: Option<String>,
    kind: Option<PropertyKind>,
    nullable: bool,
    optional: bool,
    attrs: Vec<ConstraintAttr>,
}

impl PropertyBuilder {
    /// Declare a string property.
    pub fn string(mut self) -> Self {
        self.kind = Some(PropertyKind::String);
        self
    }

    /// Declare an integer property.
    pub fn integer(mut self) -> Self {
        self.kind = Some(PropertyKind::Integer);
        self
    }

    /// Declare a float property.
    pub fn float(mut self) -> Self {
        self.kind = Some(PropertyKind::Float);
        self
    }

    /// Declare a boolean property.
    pub fn boolean(mut self) -> Self {
        self.kind = Some(PropertyKind::Boolean);
        self
    }

    /// Declare an untyped array property.
    pub fn array(mut self) -> Self {
        self.kind = Some(PropertyKind::Array);
        self
    }

    /// Declare a backed-enum property with its allowed value set.
    pub fn enumeration(mut self, type_name: &'static str, allowed: Vec<Value>) -> Self {
        self.kind = Some(PropertyKind::Enumeration { type_name, allowed });
        self
    }

    /// Declare a single nested DTO property.
    pub fn nested<T: Dto>(mut self) -> Self {
        self.kind = Some(PropertyKind::Nested(SchemaRef::of::<T>()));
        self
    }

    /// Declare a DTO-collection property.
    pub fn collection_of<T: Dto>(mut self) -> Self {
        self.kind = Some(PropertyKind::Collection(SchemaRef::of::<T>()));
        self
    }

    /// The key may be present with an explicit null value.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// The key may be entirely absent from the payload.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Map the property to a different payload key.
    pub fn input_name(mut self, name: impl Into<String>) -> Self {
        self.input_name = Some(name.into());
        self
    }

    /// Minimum size constraint (length, magnitude, item count).
    pub fn min(mut self, min: u64) -> Self {
        self.attrs.push(ConstraintAttr::Min(min));
        self
    }

    /// Maximum size constraint.
    pub fn max(mut self, max: u64) -> Self {
        self.attrs.push(ConstraintAttr::Max(max));
        self
    }

    /// The value must match a regex.
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.attrs.push(ConstraintAttr::Pattern(pattern.into()));
        self
    }

    /// The value must be in a fixed set.
    pub fn one_of(mut self, allowed: Vec<Value>) -> Self {
        self.attrs.push(ConstraintAttr::In(allowed));
        self
    }

    /// Append a pre-rendered keyword or `|`-joined rule run.
    pub fn raw(mut self, run: impl Into<String>) -> Self {
        self.attrs.push(ConstraintAttr::Raw(run.into()));
        self
    }

    /// Exclude the property (and any expanded subtree) from validation.
    pub fn without_validation(mut self) -> Self {
        self.attrs.push(ConstraintAttr::WithoutValidation);
        self
    }

    fn build(self) -> PropertyDescriptor {
        PropertyDescriptor {
            name: self.name,
            input_name: self.input_name,
            kind: self.kind,
            nullable: self.nullable,
            optional: self.optional,
            attrs: self.attrs,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
