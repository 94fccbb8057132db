//! Big Tables REST API response types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response of `GET tables`
///
/// `data` is optional here so a body without it can be reported as a
/// list-tables failure instead of a parse error. Entries stay untyped:
/// only the matching entry has to carry a usable `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListTablesResponse {
    #[serde(default)]
    pub data: Option<Vec<Value>>,
}

/// A table as reported by the table listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRef {
    pub id: String,
    pub name: String,
}

impl TableRef {
    /// Typed view of a listing entry, `None` when `id` or `name` is not a string.
    pub fn from_entry(entry: &Value) -> Option<Self> {
        serde_json::from_value(entry.clone()).ok()
    }
}

impl ListTablesResponse {
    /// First entry whose `name` matches exactly.
    pub fn find_by_name(&self, name: &str) -> Option<&Value> {
        self.data
            .as_deref()?
            .iter()
            .find(|entry| entry.get("name").and_then(Value::as_str) == Some(name))
    }
}
