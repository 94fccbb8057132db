//! Table committer
//!
//! Turns a filled stash into a table's live content: look up the table by
//! name, flush whatever is still buffered, then overwrite the match or create
//! a new table. The lookup happens before the final flush.

use crate::column::Column;
use crate::error::{BigTableError, Result};
use crate::gateway::RestGateway;
use crate::http::HttpClient;
use crate::protocol::{
    CreateTableRequest, ListTablesResponse, OverwriteTableRequest, SchemaBody, StashRef, TableRef,
};
use crate::stash::StashBuffer;
use tracing::{debug, info, instrument};

/// Columns in uploaded rows that the schema does not declare (or that have
/// the wrong type) are dropped by the API instead of failing the commit.
const ON_SCHEMA_ERROR: &str = "onSchemaError=dropColumns";

/// Which path a commit took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Created,
    Overwritten { table_id: String },
}

pub(crate) struct TableCommitter<'a, T: HttpClient> {
    gateway: RestGateway<'a, T>,
    table_name: &'a str,
    columns: &'a [Column],
}

impl<'a, T: HttpClient> TableCommitter<'a, T> {
    pub(crate) fn new(
        gateway: RestGateway<'a, T>,
        table_name: &'a str,
        columns: &'a [Column],
    ) -> Self {
        Self {
            gateway,
            table_name,
            columns,
        }
    }

    #[instrument(skip(self, buffer), fields(table = %self.table_name, stash_id = %buffer.stash_id()))]
    pub(crate) async fn commit(&self, buffer: &mut StashBuffer) -> Result<CommitOutcome> {
        let existing = self.find_table().await?;

        buffer.flush(&self.gateway).await?;

        let outcome = match existing {
            Some(table) => {
                self.overwrite_from_stash(&table.id, buffer.stash_id()).await?;
                CommitOutcome::Overwritten { table_id: table.id }
            }
            None => {
                self.create_from_stash(buffer.stash_id()).await?;
                CommitOutcome::Created
            }
        };

        info!(
            table = %self.table_name,
            stash_id = %buffer.stash_id(),
            "committed record stash"
        );
        Ok(outcome)
    }

    /// `GET tables`, first entry whose name matches.
    async fn find_table(&self) -> Result<Option<TableRef>> {
        let response = self.gateway.get("tables").await?;
        let list_failed = || BigTableError::ListTablesFailed {
            status: response.status,
            body: response.body_text(),
        };

        if !response.is_success() {
            return Err(list_failed());
        }

        let listing: ListTablesResponse = response.json().map_err(|e| {
            debug!(error = %e, "table list body is not valid JSON");
            list_failed()
        })?;
        if listing.data.is_none() {
            return Err(list_failed());
        }

        let found = match listing.find_by_name(self.table_name) {
            Some(entry) => Some(TableRef::from_entry(entry).ok_or_else(|| {
                debug!(entry = %entry, "matching table entry has no usable id");
                list_failed()
            })?),
            None => None,
        };
        match &found {
            Some(table) => info!(
                table = %self.table_name,
                table_id = %table.id,
                "found existing table to reuse"
            ),
            None => debug!(table = %self.table_name, "no existing table with this name"),
        }
        Ok(found)
    }

    async fn create_from_stash(&self, stash_id: &str) -> Result<()> {
        info!(table = %self.table_name, "creating new table");
        let request = CreateTableRequest {
            name: self.table_name,
            schema: SchemaBody::from_columns(self.columns),
            rows: StashRef { stash_id },
        };

        let response = self
            .gateway
            .post_json(&format!("tables?{}", ON_SCHEMA_ERROR), &request)
            .await?;
        if !response.is_success() {
            return Err(BigTableError::CreateFailed {
                table_name: self.table_name.to_string(),
                status: response.status,
                body: response.body_text(),
            });
        }

        info!(table = %self.table_name, "created table");
        Ok(())
    }

    /// Replaces both schema and rows of `table_id` with the stash.
    async fn overwrite_from_stash(&self, table_id: &str, stash_id: &str) -> Result<()> {
        let request = OverwriteTableRequest {
            schema: SchemaBody::from_columns(self.columns),
            rows: StashRef { stash_id },
        };

        let response = self
            .gateway
            .put_json(&format!("tables/{}?{}", table_id, ON_SCHEMA_ERROR), &request)
            .await?;
        if !response.is_success() {
            return Err(BigTableError::OverwriteFailed {
                table_id: table_id.to_string(),
                status: response.status,
                body: response.body_text(),
            });
        }

        info!(table = %self.table_name, table_id = %table_id, "overwrote table");
        Ok(())
    }
}
