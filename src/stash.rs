//! Row staging buffer
//!
//! Rows accumulate in memory and are written to a server-side stash in
//! numbered chunks (`stashes/{stash_id}/{serial}`). A chunk rejected with
//! 413 Payload Too Large is retried at half the size until it fits or the
//! size reaches one row.

use crate::error::{BigTableError, Result};
use crate::gateway::RestGateway;
use crate::http::HttpClient;
use serde_json::Value;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// A row keyed by column id. The API enforces the schema, not the client.
pub type Row = serde_json::Map<String, Value>;

#[derive(Debug)]
pub(crate) struct StashBuffer {
    stash_id: String,
    /// Serial of the next chunk. Only advanced once a whole flush succeeds.
    serial: u64,
    batch_size: usize,
    rows: Vec<Row>,
}

impl StashBuffer {
    /// Buffer for a freshly generated stash.
    pub(crate) fn new(batch_size: usize) -> Self {
        Self::with_stash_id(Uuid::new_v4().to_string(), batch_size)
    }

    pub(crate) fn with_stash_id(stash_id: impl Into<String>, batch_size: usize) -> Self {
        Self {
            stash_id: stash_id.into(),
            serial: 0,
            batch_size,
            rows: Vec::new(),
        }
    }

    pub(crate) fn stash_id(&self) -> &str {
        &self.stash_id
    }

    pub(crate) fn serial(&self) -> u64 {
        self.serial
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append one row. Returns true when the buffer is due for a flush.
    pub(crate) fn push(&mut self, row: Row) -> bool {
        self.rows.push(row);
        self.should_flush()
    }

    /// Append all rows, then check the flush threshold once.
    pub(crate) fn extend<I>(&mut self, rows: I) -> bool
    where
        I: IntoIterator<Item = Row>,
    {
        self.rows.extend(rows);
        self.should_flush()
    }

    fn should_flush(&self) -> bool {
        self.rows.len() >= self.batch_size
    }

    /// Drain the buffer into the stash. Returns the number of rows written.
    ///
    /// The buffer is emptied before the first request. On failure the
    /// drained rows are gone and the serial keeps its pre-flush value, so a
    /// later flush never reuses a serial that may already hold rows.
    #[instrument(skip(self, gateway), fields(stash_id = %self.stash_id, rows = self.rows.len()))]
    pub(crate) async fn flush<T: HttpClient>(
        &mut self,
        gateway: &RestGateway<'_, T>,
    ) -> Result<usize> {
        if self.is_empty() {
            return Ok(0);
        }
        let rows = std::mem::take(&mut self.rows);

        let mut start = 0;
        let mut chunk_size = rows.len();
        let mut serial = self.serial;
        while start < rows.len() {
            let end = (start + chunk_size).min(rows.len());
            let chunk = &rows[start..end];
            let path = format!("stashes/{}/{}", self.stash_id, serial);
            debug!(path = %path, rows = chunk.len(), "flushing rows to stash");

            let response = gateway.put_json(&path, chunk).await?;
            if response.is_success() {
                info!(path = %path, rows = chunk.len(), "put rows to stash");
                serial += 1;
                start = end;
                continue;
            }

            if response.is_payload_too_large() && chunk_size > 1 {
                chunk_size = (chunk_size / 2).max(1);
                info!(
                    path = %path,
                    chunk_size,
                    "413 Payload Too Large, reducing chunk size and retrying"
                );
                continue;
            }

            return Err(BigTableError::FlushFailed {
                path,
                status: response.status,
                body: response.body_text(),
            });
        }

        self.serial = serial;
        Ok(rows.len())
    }
}
