//! Big Tables REST API request bodies
//!
//! Field names follow the API exactly; serde renames keep the Rust side
//! snake_case.

use crate::column::Column;
use serde::Serialize;

/// Wire form of a column: `{id, displayName, type: {kind}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnWire<'a> {
    pub id: &'a str,
    pub display_name: &'a str,
    #[serde(rename = "type")]
    pub column_type: ColumnKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnKind {
    pub kind: &'static str,
}

impl<'a> From<&'a Column> for ColumnWire<'a> {
    fn from(column: &'a Column) -> Self {
        Self {
            id: column.id(),
            display_name: column.display_name(),
            column_type: ColumnKind {
                kind: column.column_type().as_str(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaBody<'a> {
    pub columns: Vec<ColumnWire<'a>>,
}

impl<'a> SchemaBody<'a> {
    pub fn from_columns(columns: &'a [Column]) -> Self {
        Self {
            columns: columns.iter().map(ColumnWire::from).collect(),
        }
    }
}

/// Reference to a stash as the source of a table's rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StashRef<'a> {
    #[serde(rename = "$stashID")]
    pub stash_id: &'a str,
}

/// Body of `POST tables?onSchemaError=dropColumns`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateTableRequest<'a> {
    pub name: &'a str,
    pub schema: SchemaBody<'a>,
    pub rows: StashRef<'a>,
}

/// Body of `PUT tables/{id}?onSchemaError=dropColumns`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverwriteTableRequest<'a> {
    pub schema: SchemaBody<'a>,
    pub rows: StashRef<'a>,
}
