//! Staged-commit client for Glide Big Tables
//!
//! Rows are buffered in memory, written to a server-side stash in numbered
//! chunks, and on commit the stash becomes the full content of a table:
//! a new table if none has the name yet, otherwise the first table with
//! that name is overwritten.
//!
//! ```no_run
//! use glide_bigtable::{BigTableClient, Column, InitOptions, ReqwestHttpClient};
//! use serde_json::json;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let mut client = BigTableClient::new(ReqwestHttpClient::new()?);
//! client.init(InitOptions::new(
//!     "api-key",
//!     "orders",
//!     vec![Column::new("id", "string")?, Column::new("total", "number")?],
//! ))?;
//!
//! if let serde_json::Value::Object(row) = json!({"id": "a1", "total": 12.5}) {
//!     client.add_row(row).await?;
//! }
//! client.commit().await?;
//! # Ok(())
//! # }
//! ```

mod client;
mod column;
mod committer;
mod error;
mod gateway;
mod http;
mod init;
pub mod protocol;
mod stash;

#[cfg(test)]
mod testing;

pub use client::{BigTableClient, InitOptions, Lifecycle};
pub use column::{columns_from_json_schema, Column, ColumnType};
pub use committer::CommitOutcome;
pub use error::{BigTableError, ErrorCode, Result};
pub use http::{HttpClient, HttpResponse, ReqwestHttpClient};
pub use init::init_tracing;
pub use stash::Row;

pub use glide_bigtable_config as config;
pub use glide_bigtable_config::{ApiConfig, GlideConfig, LogConfig, LogFormat};
