//! # Model Registry
//!
//! The data model a schema is synthesized against: models (name to ordered
//! fields), their fields, and enums (name to ordered members).
//!
//! A field's `fieldType` is one of three things:
//!
//! | Kind | Example | Meaning |
//! |------|---------|---------|
//! | Scalar tag | `String`, `Int` | one of the nine [`ScalarType`] tags |
//! | Enum name | `Role` | a key of the [`EnumRegistry`] |
//! | Model name | `Post` | a relation to another model |
//!
//! ## Serialization
//!
//! The registry document mirrors the shape produced by a schema-definition
//! parser:
//!
//! ```json
//! {
//!   "models": {
//!     "user": {
//!       "id":    { "fieldType": "String", "isOptional": false, "isList": false, "isId": true },
//!       "posts": { "fieldType": "post",   "isOptional": false, "isList": true }
//!     }
//!   },
//!   "enums": { "Role": ["ADMIN", "USER"] }
//! }
//! ```
//!
//! Flags default to `false` when absent. Field and model order is the
//! document order.

use std::path::Path;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::document::load_document;
use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Scalar tags
// ---------------------------------------------------------------------------

/// The closed set of scalar field type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarType {
    /// Text.
    String,
    /// 32-bit integer.
    Int,
    /// Floating point number.
    Float,
    /// True or false.
    Boolean,
    /// Timestamp.
    DateTime,
    /// Arbitrary JSON value.
    Json,
    /// 64-bit integer.
    BigInt,
    /// Arbitrary-precision decimal.
    Decimal,
    /// Raw bytes.
    Bytes,
}

/// Number of scalar tags.
pub const SCALAR_TYPE_COUNT: usize = 9;

impl ScalarType {
    /// All scalar tags in canonical order.
    pub fn all() -> &'static [ScalarType] {
        &[
            Self::String,
            Self::Int,
            Self::Float,
            Self::Boolean,
            Self::DateTime,
            Self::Json,
            Self::BigInt,
            Self::Decimal,
            Self::Bytes,
        ]
    }

    /// The tag as it appears in a registry document.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Int => "Int",
            Self::Float => "Float",
            Self::Boolean => "Boolean",
            Self::DateTime => "DateTime",
            Self::Json => "Json",
            Self::BigInt => "BigInt",
            Self::Decimal => "Decimal",
            Self::Bytes => "Bytes",
        }
    }

    /// Whether `tag` names a scalar type.
    pub fn is_scalar(tag: &str) -> bool {
        tag.parse::<ScalarType>().is_ok()
    }
}

impl std::fmt::Display for ScalarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScalarType {
    type Err = CoreError;

    /// Parse a scalar tag. Tags are case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "String" => Ok(Self::String),
            "Int" => Ok(Self::Int),
            "Float" => Ok(Self::Float),
            "Boolean" => Ok(Self::Boolean),
            "DateTime" => Ok(Self::DateTime),
            "Json" => Ok(Self::Json),
            "BigInt" => Ok(Self::BigInt),
            "Decimal" => Ok(Self::Decimal),
            "Bytes" => Ok(Self::Bytes),
            other => Err(CoreError::UnknownScalar(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Fields and models
// ---------------------------------------------------------------------------

/// One field of a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Scalar tag, enum name, or related model name.
    pub field_type: String,
    /// The field may be null or absent.
    #[serde(default)]
    pub is_optional: bool,
    /// The field holds a list.
    #[serde(default)]
    pub is_list: bool,
    /// The field carries a uniqueness constraint.
    #[serde(default)]
    pub is_unique: bool,
    /// The field is the model's primary identifier.
    #[serde(default)]
    pub is_id: bool,
}

impl Field {
    /// A required, single-valued field of the given type.
    pub fn new(field_type: impl Into<String>) -> Self {
        Self {
            field_type: field_type.into(),
            is_optional: false,
            is_list: false,
            is_unique: false,
            is_id: false,
        }
    }

    /// Mark the field optional.
    pub fn optional(mut self) -> Self {
        self.is_optional = true;
        self
    }

    /// Mark the field as a list.
    pub fn list(mut self) -> Self {
        self.is_list = true;
        self
    }

    /// Mark the field unique.
    pub fn unique(mut self) -> Self {
        self.is_unique = true;
        self
    }

    /// Mark the field as the identifier.
    pub fn id(mut self) -> Self {
        self.is_id = true;
        self
    }

    /// The scalar tag of this field, if its type is a scalar.
    pub fn scalar_type(&self) -> Option<ScalarType> {
        self.field_type.parse().ok()
    }

    /// A scalar field flagged unique or id can identify a related record.
    pub fn is_unique_identifier(&self) -> bool {
        self.scalar_type().is_some() && (self.is_unique || self.is_id)
    }
}

/// A model: field name to field, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Model {
    fields: IndexMap<String, Field>,
}

impl Model {
    /// An empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field insertion.
    pub fn with_field(mut self, name: impl Into<String>, field: Field) -> Self {
        self.fields.insert(name.into(), field);
        self
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// Iterate fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the model has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The first scalar field flagged unique or id, in declaration order.
    ///
    /// Relation operations address related records through this field.
    pub fn unique_scalar_field(&self) -> Option<(&str, &Field)> {
        self.fields().find(|(_, f)| f.is_unique_identifier())
    }
}

/// Enum name to ordered member names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnumRegistry {
    enums: IndexMap<String, Vec<String>>,
}

impl EnumRegistry {
    /// Builder-style enum insertion.
    pub fn with_enum<I, S>(mut self, name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enums
            .insert(name.into(), members.into_iter().map(Into::into).collect());
        self
    }

    /// Members of an enum.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.enums.get(name).map(Vec::as_slice)
    }

    /// Whether `name` is a known enum.
    pub fn contains(&self, name: &str) -> bool {
        self.enums.contains_key(name)
    }

    /// Number of enums.
    pub fn len(&self) -> usize {
        self.enums.len()
    }

    /// Whether no enums are registered.
    pub fn is_empty(&self) -> bool {
        self.enums.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Every model and enum of one schema-definition source.
///
/// Built once per generation run and shared by reference across targets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRegistry {
    /// Model name to model.
    #[serde(default)]
    pub models: IndexMap<String, Model>,
    /// Enum name to members.
    #[serde(default)]
    pub enums: EnumRegistry,
}

impl ModelRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style model insertion.
    pub fn with_model(mut self, name: impl Into<String>, model: Model) -> Self {
        self.models.insert(name.into(), model);
        self
    }

    /// Builder-style enum insertion.
    pub fn with_enum<I, S>(mut self, name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enums = self.enums.with_enum(name, members);
        self
    }

    /// Load a registry document (JSON or YAML, by extension).
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let registry: Self = load_document(path)?;
        tracing::debug!(
            path = %path.display(),
            models = registry.models.len(),
            enums = registry.enums.len(),
            "loaded model registry"
        );
        Ok(registry)
    }

    /// Look up a model.
    pub fn model(&self, name: &str) -> Option<&Model> {
        self.models.get(name)
    }

    /// Whether `name` is a registered model.
    pub fn contains_model(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    /// Look up a field on a model.
    pub fn field(&self, model: &str, field: &str) -> Option<&Field> {
        self.model(model).and_then(|m| m.field(field))
    }

    /// Members of an enum.
    pub fn enum_values(&self, name: &str) -> Option<&[String]> {
        self.enums.get(name)
    }

    /// Whether `name` is a registered enum.
    pub fn is_enum(&self, name: &str) -> bool {
        self.enums.contains(name)
    }
}
