//! Big Table column schema types
//!
//! A [`Column`] is a plain immutable record. Its REST encoding
//! (`{id, displayName, type: {kind}}`) lives in [`crate::protocol::ColumnWire`].

use crate::error::{BigTableError, Result};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Semantic column types accepted by the Big Tables API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    String,
    Number,
    Boolean,
    Url,
    DateTime,
    Json,
}

impl ColumnType {
    /// Every allowed type, in the order the API documents them.
    pub const ALL: [ColumnType; 6] = [
        ColumnType::String,
        ColumnType::Number,
        ColumnType::Boolean,
        ColumnType::Url,
        ColumnType::DateTime,
        ColumnType::Json,
    ];

    /// Wire name used as the `kind` of a column type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::String => "string",
            ColumnType::Number => "number",
            ColumnType::Boolean => "boolean",
            ColumnType::Url => "url",
            ColumnType::DateTime => "dateTime",
            ColumnType::Json => "json",
        }
    }

    /// Map a JSON-schema `type` to a column type.
    ///
    /// Nullable unions such as `["null", "integer"]` resolve to their first
    /// supported non-null member. Anything unsupported falls back to
    /// [`ColumnType::String`].
    pub fn from_json_schema(json_type: &Value) -> ColumnType {
        let mapped = match json_type {
            Value::String(name) => primitive_for_json_schema(name),
            Value::Array(members) => members
                .iter()
                .filter_map(Value::as_str)
                .filter(|name| *name != "null")
                .find_map(primitive_for_json_schema),
            _ => None,
        };

        match mapped {
            Some(column_type) => {
                debug!(json_type = %json_type, column_type = %column_type, "mapped json schema type");
                column_type
            }
            None => {
                warn!(json_type = %json_type, "unsupported json schema type, using string");
                ColumnType::String
            }
        }
    }
}

fn primitive_for_json_schema(name: &str) -> Option<ColumnType> {
    match name {
        "string" => Some(ColumnType::String),
        "number" | "integer" => Some(ColumnType::Number),
        "boolean" => Some(ColumnType::Boolean),
        _ => None,
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = BigTableError;

    fn from_str(s: &str) -> Result<Self> {
        ColumnType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| BigTableError::InvalidSchemaType {
                kind: s.to_string(),
            })
    }
}

/// A schema entry mapping a column id to its semantic type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Column {
    id: String,
    column_type: ColumnType,
    display_name: String,
}

impl Column {
    /// Create a column, rejecting types outside the allowed set.
    pub fn new(id: impl Into<String>, column_type: &str) -> Result<Self> {
        Ok(Self::with_type(id, column_type.parse()?))
    }

    /// Create a column from an already validated type.
    pub fn with_type(id: impl Into<String>, column_type: ColumnType) -> Self {
        let id = id.into();
        Self {
            display_name: id.clone(),
            id,
            column_type,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}

/// Build a schema from a JSON-schema `properties` object, one column per
/// property, in the order the properties are declared.
///
/// Properties without a `type` become string columns.
pub fn columns_from_json_schema(properties: &serde_json::Map<String, Value>) -> Vec<Column> {
    properties
        .iter()
        .map(|(name, property)| {
            let column_type = property
                .get("type")
                .map(ColumnType::from_json_schema)
                .unwrap_or(ColumnType::String);
            Column::with_type(name.as_str(), column_type)
        })
        .collect()
}
