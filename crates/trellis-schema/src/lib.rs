//! Data-contract schemas for Trellis partials.
//!
//! A [`Schema`] describes the props a partial accepts: field names, types,
//! required/optional status, defaults, and human-readable descriptions used
//! by external tooling for introspection.
//!
//! Validation is side-effect-free and total: [`Schema::validate`] never
//! panics for well-formed schemas and returns either defaulted, validated
//! data or a structured list of [`Issue`]s.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use trellis_schema::{FieldType, Schema};
//!
//! let schema = Schema::builder()
//!     .required("title", FieldType::String, "Heading text")
//!     .defaulted("level", FieldType::Integer, json!(2), "Heading level")
//!     .build();
//!
//! let data = schema.validate(&json!({"title": "Overview"})).unwrap();
//! assert_eq!(data["level"], json!(2));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Type of a schema field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// JSON string.
    String,
    /// JSON integer number.
    Integer,
    /// JSON number (integer or float).
    Float,
    /// JSON boolean.
    Boolean,
    /// JSON array.
    Array,
    /// JSON object.
    Object,
    /// Any JSON value, including null.
    Any,
}

impl FieldType {
    /// Check whether a JSON value matches this type.
    ///
    /// `Float` accepts any JSON number; `Integer` only values representable
    /// as `i64`/`u64`.
    #[must_use]
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Float => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Array => value.is_array(),
            Self::Object => value.is_object(),
            Self::Any => true,
        }
    }

    /// Human-readable type name for issue messages.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
            Self::Any => "any",
        }
    }
}

/// Specification of a single schema field.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field name (key in the props object).
    pub name: String,
    /// Expected value type.
    pub field_type: FieldType,
    /// Whether the field must be present in the candidate.
    pub required: bool,
    /// Default applied when the field is absent.
    ///
    /// Only meaningful for optional fields. Defaults appear in validated
    /// output even when absent from the candidate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Human-readable description, surfaced to external tooling.
    pub description: String,
}

/// A single validation failure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Issue {
    /// Path of the offending field (field name, or `"."` for the root).
    pub path: String,
    /// Human-readable message.
    pub message: String,
}

impl Issue {
    fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Data contract for partial props.
///
/// Field order is preserved from construction and reflected in issue
/// ordering, so validation output is deterministic.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Schema {
    fields: Vec<FieldSpec>,
}

impl Schema {
    /// Start building a schema.
    #[must_use]
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder { fields: Vec::new() }
    }

    /// Create an empty schema accepting only an empty or absent props object.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Field specifications, in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Look up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Validate a candidate props value against this schema.
    ///
    /// On success, returns the validated data with defaults applied for
    /// absent optional fields. On failure, returns every issue found
    /// (missing required fields, type mismatches, unknown fields) rather
    /// than stopping at the first.
    ///
    /// The candidate must be a JSON object; `null` is treated as an empty
    /// object so that partials without props can be rendered with no
    /// arguments.
    ///
    /// # Errors
    ///
    /// Returns the list of [`Issue`]s when the candidate does not satisfy
    /// the contract.
    pub fn validate(&self, candidate: &Value) -> Result<Value, Vec<Issue>> {
        let empty = serde_json::Map::new();
        let object = match candidate {
            Value::Object(map) => map,
            Value::Null => &empty,
            other => {
                return Err(vec![Issue::new(
                    ".",
                    format!("expected an object of props, got {}", json_kind(other)),
                )]);
            }
        };

        let mut issues = Vec::new();
        let mut output = serde_json::Map::new();

        for spec in &self.fields {
            match object.get(&spec.name) {
                Some(value) => {
                    if spec.field_type.matches(value) {
                        output.insert(spec.name.clone(), value.clone());
                    } else {
                        issues.push(Issue::new(
                            &spec.name,
                            format!(
                                "expected {}, got {}",
                                spec.field_type.name(),
                                json_kind(value)
                            ),
                        ));
                    }
                }
                None if spec.required => {
                    issues.push(Issue::new(&spec.name, "required field is missing"));
                }
                None => {
                    if let Some(default) = &spec.default {
                        output.insert(spec.name.clone(), default.clone());
                    }
                }
            }
        }

        // Unknown fields are surfaced, not silently dropped.
        for key in object.keys() {
            if self.field(key).is_none() {
                issues.push(Issue::new(key, "unknown field"));
            }
        }

        if issues.is_empty() {
            Ok(Value::Object(output))
        } else {
            Err(issues)
        }
    }
}

/// Builder for [`Schema`].
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    fields: Vec<FieldSpec>,
}

impl SchemaBuilder {
    /// Add a required field.
    #[must_use]
    pub fn required(
        mut self,
        name: impl Into<String>,
        field_type: FieldType,
        description: impl Into<String>,
    ) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            field_type,
            required: true,
            default: None,
            description: description.into(),
        });
        self
    }

    /// Add an optional field without a default.
    #[must_use]
    pub fn optional(
        mut self,
        name: impl Into<String>,
        field_type: FieldType,
        description: impl Into<String>,
    ) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            field_type,
            required: false,
            default: None,
            description: description.into(),
        });
        self
    }

    /// Add an optional field with a default value.
    ///
    /// The default appears in validated output whenever the candidate omits
    /// the field.
    #[must_use]
    pub fn defaulted(
        mut self,
        name: impl Into<String>,
        field_type: FieldType,
        default: Value,
        description: impl Into<String>,
    ) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            field_type,
            required: false,
            default: Some(default),
            description: description.into(),
        });
        self
    }

    /// Finish building the schema.
    #[must_use]
    pub fn build(self) -> Schema {
        Schema {
            fields: self.fields,
        }
    }
}

/// JSON value kind name for issue messages.
fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
