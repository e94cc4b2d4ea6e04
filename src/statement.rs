//! Prepared-statement execution pipeline.
//!
//! A [`Statement`] is created by `Connection::prepare` already parsed
//! server-side, with its result metadata described and one persistent
//! receive slot allocated per column. Each execution binds fresh
//! parameter scratch, runs server-side, and the fetch loop overwrites the
//! receive slots row by row until the server reports no more data.
//!
//! The statement holds a mutable reference to the connection, so only one
//! execute/fetch cycle can be active per connection at a time.

use std::future::Future;
use std::sync::Arc;

use futures::Stream;
use tracing::{debug, warn};

use crate::client::{Connector, FetchStatus, ServerError, ServerLink};
use crate::connection::Connection;
use crate::error::{Error, Result};
use crate::protocol::bind::{encode_params, BindSlot};
use crate::protocol::decode::decode_row;
use crate::protocol::types::{ColumnMetadata, Row, Value};

/// Server-side statement handle type of a connector's link.
pub(crate) type StmtHandle<C> = <<C as Connector>::Link as ServerLink>::Stmt;

/// Interface of a prepared statement.
///
/// Implemented by [`Statement`]; expressed as a trait so future drivers
/// can share the capability set without inheritance.
pub trait SqlStatement {
    /// Bind parameters and execute, returning the affected-row count.
    ///
    /// May be called repeatedly; batch execution is repeated single
    /// executes.
    fn execute(&mut self, params: &[Value]) -> impl Future<Output = Result<u64>> + Send;

    /// Execute once per parameter list, returning the summed
    /// affected-row count.
    fn execute_many(&mut self, batches: &[Vec<Value>]) -> impl Future<Output = Result<u64>> + Send;

    /// Pull and decode the next row, or `None` at end of result.
    ///
    /// Keeps returning `None` once the end has been reached.
    fn fetch_row(&mut self) -> impl Future<Output = Result<Option<Row>>> + Send;

    /// Names of the result columns, in order.
    fn column_names(&self) -> Vec<&str>;

    /// Release the server-side handle. The statement must not be used
    /// afterward; operations on a finished statement fail fast.
    fn finish(&mut self) -> impl Future<Output = Result<()>> + Send;
}

/// A prepared statement bound to its connection.
pub struct Statement<'conn, C: Connector> {
    /// Mutable reference to the owning connection.
    conn: &'conn mut Connection<C>,
    /// Server-side handle; `None` once finished.
    handle: Option<StmtHandle<C>>,
    /// Immutable field descriptors, shared with every decoded row.
    columns: Arc<Vec<ColumnMetadata>>,
    /// Persistent receive slots, overwritten in place on every fetch.
    result_slots: Vec<BindSlot>,
    /// Placeholder count the server reported at prepare time.
    param_count: usize,
    /// Original query text.
    query: String,
    /// Whether an execution has run since prepare (or re-execute).
    executed: bool,
    /// Whether the server has reported end of result.
    at_end: bool,
    /// Set when an execute or fetch failed; cleared only by re-prepare.
    poisoned: bool,
    /// Rows fetched by the current execution.
    rows_fetched: u64,
    /// Affected-row count of the most recent execution.
    affected: u64,
}

impl<C: Connector> std::fmt::Debug for Statement<'_, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Statement")
            .field("query", &self.query)
            .field("columns", &self.columns)
            .field("result_slots", &self.result_slots)
            .field("param_count", &self.param_count)
            .field("executed", &self.executed)
            .field("at_end", &self.at_end)
            .field("poisoned", &self.poisoned)
            .field("rows_fetched", &self.rows_fetched)
            .field("affected", &self.affected)
            .field("finished", &self.handle.is_none())
            .finish()
    }
}

impl<'conn, C: Connector> Statement<'conn, C> {
    pub(crate) fn new(
        conn: &'conn mut Connection<C>,
        handle: StmtHandle<C>,
        columns: Vec<ColumnMetadata>,
        result_slots: Vec<BindSlot>,
        param_count: usize,
        query: &str,
    ) -> Self {
        Self {
            conn,
            handle: Some(handle),
            columns: Arc::new(columns),
            result_slots,
            param_count,
            query: query.to_string(),
            executed: false,
            at_end: false,
            poisoned: false,
            rows_fetched: 0,
            affected: 0,
        }
    }

    /// Field descriptors of the result set (empty for statements that
    /// yield no rows).
    pub fn columns(&self) -> &[ColumnMetadata] {
        &self.columns
    }

    /// Placeholder count the server reported for this statement.
    pub fn param_count(&self) -> usize {
        self.param_count
    }

    /// Original query text.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Affected-row count of the most recent execution.
    pub fn affected_rows(&self) -> u64 {
        self.affected
    }

    /// Rows fetched by the current execution.
    pub fn rows_fetched(&self) -> u64 {
        self.rows_fetched
    }

    /// Whether `finish` has released the server-side handle.
    pub fn is_finished(&self) -> bool {
        self.handle.is_none()
    }

    fn fail(&mut self, e: ServerError) -> Error {
        self.poisoned = true;
        Error::statement(e.code, e.message)
    }
}

impl<'conn, C: Connector> SqlStatement for Statement<'conn, C> {
    async fn execute(&mut self, params: &[Value]) -> Result<u64> {
        if self.poisoned {
            return Err(Error::StatementState {
                state: "in a failed state; finish and re-prepare",
            });
        }
        let Some(stmt) = self.handle.as_mut() else {
            return Err(Error::StatementState { state: "finished" });
        };

        // Parameter scratch is owned by this call frame and released on
        // every exit path once the execute roundtrip returns.
        let slots = encode_params(self.param_count, params)?;

        let link = self.conn.link_mut();
        if let Err(e) = link.stmt_bind_param(stmt, &slots) {
            return Err(self.fail(e));
        }
        if let Err(e) = link.stmt_execute(stmt).await {
            return Err(self.fail(e));
        }
        let affected = link.stmt_affected_rows(stmt);

        self.executed = true;
        self.at_end = false;
        self.rows_fetched = 0;
        self.affected = affected;
        debug!(query = %self.query, affected, "executed statement");
        Ok(affected)
    }

    async fn execute_many(&mut self, batches: &[Vec<Value>]) -> Result<u64> {
        let mut total = 0u64;
        for params in batches {
            total += self.execute(params).await?;
        }
        Ok(total)
    }

    async fn fetch_row(&mut self) -> Result<Option<Row>> {
        if self.poisoned {
            return Err(Error::StatementState {
                state: "in a failed state; finish and re-prepare",
            });
        }
        let Some(stmt) = self.handle.as_mut() else {
            return Err(Error::StatementState { state: "finished" });
        };
        // Statements without a result set complete immediately.
        if self.columns.is_empty() {
            return Ok(None);
        }
        if !self.executed {
            return Err(Error::StatementState { state: "not executed" });
        }
        if self.at_end {
            return Ok(None);
        }

        let link = self.conn.link_mut();
        let status = match link.stmt_fetch(stmt, &mut self.result_slots).await {
            Ok(status) => status,
            Err(e) => return Err(self.fail(e)),
        };
        match status {
            FetchStatus::NoData => {
                self.at_end = true;
                Ok(None)
            }
            FetchStatus::Ok | FetchStatus::Truncated => {
                if status == FetchStatus::Truncated {
                    // Buffers are sized from declared lengths; longer
                    // values arrive cut down and count as a fetched row.
                    warn!(query = %self.query, "fetch reported truncated cell data");
                }
                let row = decode_row(&self.result_slots, Arc::clone(&self.columns))?;
                self.rows_fetched += 1;
                Ok(Some(row))
            }
        }
    }

    fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    async fn finish(&mut self) -> Result<()> {
        if let Some(stmt) = self.handle.take() {
            self.conn.link_mut().stmt_close(stmt).await;
            debug!(query = %self.query, "finished statement");
        }
        Ok(())
    }
}

/// Extension trait for converting a statement into a [`Stream`] of rows.
///
/// The stream takes ownership of the statement; each `poll_next` calls
/// `fetch_row` internally.
pub trait RowStreamExt: SqlStatement + Sized {
    /// Convert this statement into a stream yielding `Result<Row>`.
    fn into_stream(self) -> impl Stream<Item = Result<Row>>;
}

impl<S: SqlStatement + Send> RowStreamExt for S {
    fn into_stream(self) -> impl Stream<Item = Result<Row>> {
        use futures::stream;

        stream::unfold(Some(self), |opt_stmt| async move {
            let mut stmt = opt_stmt?;
            match stmt.fetch_row().await {
                Ok(Some(row)) => Some((Ok(row), Some(stmt))),
                Ok(None) => None,
                Err(e) => Some((Err(e), Some(stmt))),
            }
        })
    }
}
