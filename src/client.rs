//! Big Table client facade
//!
//! One client is one upload session: `init`, then any number of
//! `add_row`/`add_rows`, then a single `commit`. Calls out of that order
//! fail with [`BigTableError::InvalidState`] instead of touching the API.

use crate::column::Column;
use crate::committer::{CommitOutcome, TableCommitter};
use crate::error::{BigTableError, Result};
use crate::gateway::{ApiEndpoint, RestGateway};
use crate::http::{HttpClient, ReqwestHttpClient};
use crate::stash::{Row, StashBuffer};
use glide_bigtable_config::{redact_secret, ApiConfig, DEFAULT_API_HOST, DEFAULT_BATCH_SIZE};
use std::fmt;
use tracing::{debug, info};

/// Lifecycle state of a client session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Initialized,
    Committed,
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lifecycle::Uninitialized => f.write_str("uninitialized"),
            Lifecycle::Initialized => f.write_str("initialized"),
            Lifecycle::Committed => f.write_str("committed"),
        }
    }
}

/// Connection and table parameters for [`BigTableClient::init`].
#[derive(Clone)]
pub struct InitOptions {
    pub api_key: String,
    pub table_name: String,
    pub columns: Vec<Column>,
    pub api_host: String,
    pub api_path_root: String,
    pub batch_size: usize,
}

impl InitOptions {
    /// Options targeting the public API host with the default batch size.
    pub fn new(
        api_key: impl Into<String>,
        table_name: impl Into<String>,
        columns: Vec<Column>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            table_name: table_name.into(),
            columns,
            api_host: DEFAULT_API_HOST.to_string(),
            api_path_root: String::new(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn from_config(
        config: &ApiConfig,
        table_name: impl Into<String>,
        columns: Vec<Column>,
    ) -> Self {
        Self {
            api_key: config.api_key.clone(),
            table_name: table_name.into(),
            columns,
            api_host: config.api_host.clone(),
            api_path_root: config.api_path_root.clone(),
            batch_size: config.batch_size,
        }
    }

    pub fn api_host(mut self, api_host: impl Into<String>) -> Self {
        self.api_host = api_host.into();
        self
    }

    pub fn api_path_root(mut self, api_path_root: impl Into<String>) -> Self {
        self.api_path_root = api_path_root.into();
        self
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }
}

impl fmt::Debug for InitOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InitOptions")
            .field("api_key", &redact_secret(&self.api_key))
            .field("table_name", &self.table_name)
            .field("columns", &self.columns)
            .field("api_host", &self.api_host)
            .field("api_path_root", &self.api_path_root)
            .field("batch_size", &self.batch_size)
            .finish()
    }
}

#[derive(Debug)]
struct Session {
    endpoint: ApiEndpoint,
    table_name: String,
    columns: Vec<Column>,
    buffer: StashBuffer,
}

#[derive(Debug)]
enum ClientState {
    Uninitialized,
    Initialized(Session),
    Committed,
}

impl ClientState {
    fn lifecycle(&self) -> Lifecycle {
        match self {
            ClientState::Uninitialized => Lifecycle::Uninitialized,
            ClientState::Initialized(_) => Lifecycle::Initialized,
            ClientState::Committed => Lifecycle::Committed,
        }
    }

    fn session(&self) -> Option<&Session> {
        match self {
            ClientState::Initialized(session) => Some(session),
            _ => None,
        }
    }
}

fn session_mut<'s>(
    state: &'s mut ClientState,
    operation: &'static str,
) -> Result<&'s mut Session> {
    match state {
        ClientState::Initialized(session) => Ok(session),
        other => Err(BigTableError::InvalidState {
            operation,
            state: other.lifecycle(),
        }),
    }
}

/// Staged-commit client for a single Big Table.
///
/// Requests are issued one at a time; the client is not meant to be shared
/// between tasks. Use one client per table upload.
pub struct BigTableClient<T: HttpClient> {
    http: T,
    state: ClientState,
}

impl BigTableClient<ReqwestHttpClient> {
    /// Initialized client for `table_name` using the reqwest transport.
    pub fn from_config(
        config: &ApiConfig,
        table_name: impl Into<String>,
        columns: Vec<Column>,
    ) -> anyhow::Result<Self> {
        let mut client = Self::new(ReqwestHttpClient::new()?);
        client.init(InitOptions::from_config(config, table_name, columns))?;
        Ok(client)
    }
}

impl<T: HttpClient> BigTableClient<T> {
    pub fn new(http: T) -> Self {
        Self {
            http,
            state: ClientState::Uninitialized,
        }
    }

    /// Start the session and generate a fresh stash id.
    pub fn init(&mut self, options: InitOptions) -> Result<()> {
        if !matches!(self.state, ClientState::Uninitialized) {
            return Err(BigTableError::InvalidState {
                operation: "init",
                state: self.state.lifecycle(),
            });
        }

        let buffer = StashBuffer::new(options.batch_size);
        info!(
            table = %options.table_name,
            stash_id = %buffer.stash_id(),
            columns = options.columns.len(),
            batch_size = options.batch_size,
            "initialized big table session"
        );

        self.state = ClientState::Initialized(Session {
            endpoint: ApiEndpoint::new(options.api_host, options.api_key, options.api_path_root),
            table_name: options.table_name,
            columns: options.columns,
            buffer,
        });
        Ok(())
    }

    /// Buffer one row, flushing to the stash once the batch size is reached.
    pub async fn add_row(&mut self, row: Row) -> Result<()> {
        let session = session_mut(&mut self.state, "add rows")?;
        if session.buffer.push(row) {
            let gateway = RestGateway::new(&self.http, &session.endpoint);
            session.buffer.flush(&gateway).await?;
        }
        Ok(())
    }

    /// Buffer all rows, then flush once if the batch size is reached.
    pub async fn add_rows<I>(&mut self, rows: I) -> Result<()>
    where
        I: IntoIterator<Item = Row>,
    {
        let session = session_mut(&mut self.state, "add rows")?;
        if session.buffer.extend(rows) {
            let gateway = RestGateway::new(&self.http, &session.endpoint);
            session.buffer.flush(&gateway).await?;
        }
        Ok(())
    }

    /// Flush remaining rows and make the stash the table's content.
    ///
    /// The session ends here whether or not the commit succeeds; a second
    /// call fails with `InvalidState`.
    pub async fn commit(&mut self) -> Result<CommitOutcome> {
        let mut session = match std::mem::replace(&mut self.state, ClientState::Committed) {
            ClientState::Initialized(session) => session,
            other => {
                let state = other.lifecycle();
                self.state = other;
                return Err(BigTableError::InvalidState {
                    operation: "commit",
                    state,
                });
            }
        };

        debug!(
            table = %session.table_name,
            buffered = session.buffer.len(),
            "committing big table session"
        );
        let committer = TableCommitter::new(
            RestGateway::new(&self.http, &session.endpoint),
            &session.table_name,
            &session.columns,
        );
        committer.commit(&mut session.buffer).await
    }

    pub fn state(&self) -> Lifecycle {
        self.state.lifecycle()
    }

    pub fn table_name(&self) -> Option<&str> {
        self.state.session().map(|s| s.table_name.as_str())
    }

    pub fn columns(&self) -> Option<&[Column]> {
        self.state.session().map(|s| s.columns.as_slice())
    }

    pub fn stash_id(&self) -> Option<&str> {
        self.state.session().map(|s| s.buffer.stash_id())
    }

    /// Serial the next stash chunk will be written to.
    pub fn stash_serial(&self) -> Option<u64> {
        self.state.session().map(|s| s.buffer.serial())
    }

    pub fn buffered_rows(&self) -> usize {
        self.state.session().map_or(0, |s| s.buffer.len())
    }

    pub fn http(&self) -> &T {
        &self.http
    }
}
