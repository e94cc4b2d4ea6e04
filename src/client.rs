//! Native client library seam.
//!
//! The driver core does not own a socket. It drives a collaborator that
//! provides the link- and statement-level primitives of the server's
//! native client library: connect/close/query on a link, and the
//! prepare/bind/execute/fetch cycle on a statement handle. The core is
//! generic over this seam, which is what makes the pipeline testable
//! against a scripted in-memory server.

use std::future::Future;

use crate::protocol::bind::BindSlot;
use crate::protocol::constants::DEFAULT_PORT;
use crate::protocol::types::ColumnMetadata;

/// Error reported by the client library's last-error facility.
///
/// Fallible collaborator operations return this in their `Err` arm; the
/// code and message travel verbatim into [`crate::Error::Connection`] and
/// [`crate::Error::Statement`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerError {
    /// Server/library error code.
    pub code: u32,
    /// Server/library error message.
    pub message: String,
}

impl ServerError {
    /// Create a server error.
    pub fn new(code: u32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Result type for collaborator operations.
pub type LinkResult<T> = std::result::Result<T, ServerError>;

/// Outcome of a row fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    /// A row was delivered into the receive slots.
    Ok,
    /// End of result set.
    NoData,
    /// A row was delivered but at least one cell did not fit its buffer.
    Truncated,
}

/// Parameters for establishing a server link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectParams {
    /// Server host name or address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// User name.
    pub user: String,
    /// Password.
    pub password: String,
    /// Database to select on connect.
    pub database: String,
    /// Unix socket path, preferred over TCP when set.
    pub socket: Option<String>,
}

impl ConnectParams {
    /// Create connect parameters with the default port and no socket path.
    pub fn new(
        host: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            user: user.into(),
            password: password.into(),
            database: database.into(),
            socket: None,
        }
    }

    /// Set a non-default port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set a Unix socket path.
    pub fn with_socket(mut self, socket: impl Into<String>) -> Self {
        self.socket = Some(socket.into());
        self
    }
}

/// Client library entry point: initializes the library state and opens
/// server links.
///
/// `Clone` is required so a connection can re-run connect with its
/// original credentials when cloned; for a real client-library wrapper
/// this is a cheap handle copy.
pub trait Connector: Clone + Send + Sync {
    /// Link type produced by this connector.
    type Link: ServerLink;

    /// Open a new server link.
    fn connect(
        &self,
        params: &ConnectParams,
    ) -> impl Future<Output = LinkResult<Self::Link>> + Send;
}

/// One server-side link and the statement primitives that operate on it.
///
/// Handles are owned resource types: a statement handle is created by
/// [`stmt_init`](ServerLink::stmt_init), released exactly once by
/// [`stmt_close`](ServerLink::stmt_close), and the link itself is released
/// by [`close`](ServerLink::close). All operations are serialized through
/// `&mut self`; the link never has overlapping in-flight operations.
pub trait ServerLink: Send {
    /// Opaque server-side statement handle.
    type Stmt: Send;

    /// Release the link.
    fn close(self) -> impl Future<Output = ()> + Send;

    /// Run a plain (unprepared) query, discarding any result set.
    fn query(&mut self, sql: &str) -> impl Future<Output = LinkResult<()>> + Send;

    /// Allocate a fresh statement handle.
    fn stmt_init(&mut self) -> LinkResult<Self::Stmt>;

    /// Parse the query text server-side.
    fn stmt_prepare(
        &mut self,
        stmt: &mut Self::Stmt,
        sql: &str,
    ) -> impl Future<Output = LinkResult<()>> + Send;

    /// Number of `?` placeholders the server found in the statement.
    fn stmt_param_count(&mut self, stmt: &Self::Stmt) -> usize;

    /// Field descriptors for the statement's result set; empty when the
    /// statement produces no rows.
    fn stmt_result_metadata(&mut self, stmt: &Self::Stmt) -> Vec<ColumnMetadata>;

    /// Register the receive-slot shape for row fetches.
    fn stmt_bind_result(&mut self, stmt: &mut Self::Stmt, slots: &[BindSlot]) -> LinkResult<()>;

    /// Transmit encoded parameter slots for the next execution. The slots
    /// stay alive in the caller until execute returns.
    fn stmt_bind_param(&mut self, stmt: &mut Self::Stmt, slots: &[BindSlot]) -> LinkResult<()>;

    /// Execute the prepared statement with the currently bound parameters.
    fn stmt_execute(&mut self, stmt: &mut Self::Stmt) -> impl Future<Output = LinkResult<()>> + Send;

    /// Rows affected by the most recent execution.
    fn stmt_affected_rows(&mut self, stmt: &Self::Stmt) -> u64;

    /// Pull the next row into the receive slots.
    fn stmt_fetch(
        &mut self,
        stmt: &mut Self::Stmt,
        slots: &mut [BindSlot],
    ) -> impl Future<Output = LinkResult<FetchStatus>> + Send;

    /// Release a statement handle.
    fn stmt_close(&mut self, stmt: Self::Stmt) -> impl Future<Output = ()> + Send;
}
