//! # Proviso Core
//!
//! Schema-driven validation rule derivation for typed payload DTOs.
//!
//! Given a DTO schema annotated with constraints (type, nullability,
//! optionality, custom rule overrides, name mapping, nested and collection
//! composition), the crate derives a flat, path-addressed rule mapping and
//! applies it against a JSON payload.
//!
//! ## Architecture
//!
//! - **Schema**: per-type [`schema::SchemaDescriptor`]s declared through the
//!   [`schema::Dto`] trait and fluent builders, cached process-wide
//! - **Rules**: the [`rules::RuleAtom`] constraint vocabulary and the
//!   ordered [`rules::RuleMap`] output contract
//! - **Derive**: baseline/constraint/presence resolvers, recursive
//!   nested-path expansion with cycle and depth guards, custom-rule
//!   overrides
//! - **Engine**: interprets a rule mapping against a payload, producing a
//!   pass/fail [`error::Verdict`] with field-level errors
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use proviso_core::prelude::*;
//! use serde_json::json;
//!
//! struct CreateUserDto;
//!
//! impl Dto for CreateUserDto {
//!     fn schema() -> SchemaDescriptor {
//!         SchemaDescriptor::builder("CreateUserDto")
//!             .property(property("name").string().min(2))
//!             .property(property("age").integer().nullable())
//!             .build()
//!     }
//! }
//!
//! let verdict = validate::<CreateUserDto>(&json!({"name": "Ada", "age": null}))?;
//! assert!(verdict.is_pass());
//! ```

pub mod derive;
pub mod engine;
pub mod error;
pub mod facade;
pub mod rules;
pub mod schema;

pub use error::{FieldError, SchemaError, ValidationErrorKind, ValidationErrors, Verdict};
pub use facade::{resolve_rules, resolve_rules_with, validate, validate_with};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::derive::{CustomRules, DeriveConfig, RuleOverrides};
    pub use crate::error::{
        FieldError, SchemaError, ValidationErrorKind, ValidationErrors, Verdict,
    };
    pub use crate::facade::{resolve_rules, resolve_rules_with, validate, validate_with};
    pub use crate::rules::{
        parse_atoms, EngineRule, MembershipRule, RuleAtom, RuleMap, RuleSpec,
    };
    pub use crate::schema::{
        property, schema_of, ConstraintAttr, Dto, NameStrategy, PropertyBuilder,
        PropertyDescriptor, PropertyKind, SchemaBuilder, SchemaDescriptor, SchemaRef,
    };
}
