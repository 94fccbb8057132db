//! Big Tables REST API protocol types

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{
    ColumnKind, ColumnWire, CreateTableRequest, OverwriteTableRequest, SchemaBody, StashRef,
};
pub use responses::{ListTablesResponse, TableRef};
