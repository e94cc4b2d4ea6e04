//! High-level connection API.
//!
//! A [`Connection`] owns exactly one server-side link. Autocommit is
//! disabled for the link's entire lifetime and a transaction is open from
//! the moment the connection is established: `commit` and `rollback`
//! close the current transaction and immediately start the next one.

use std::future::Future;

use tracing::debug;

use crate::client::{ConnectParams, Connector, ServerLink};
use crate::error::{Error, Result};
use crate::protocol::bind::allocate_result_slots;
use crate::protocol::types::Value;
use crate::statement::{SqlStatement, Statement};

/// Interface of a database connection.
///
/// The capability set is a trait so further drivers can implement it
/// against the same application code; [`Connection`] is the one concrete
/// implementation here.
pub trait SqlConnection: Sized {
    /// Prepared-statement type borrowed from this connection.
    type Stmt<'a>: SqlStatement + Send
    where
        Self: 'a;

    /// Prepare a query for execution.
    ///
    /// The statement takes exclusive access to the connection until
    /// finished or dropped.
    fn prepare(&mut self, sql: &str) -> impl Future<Output = Result<Self::Stmt<'_>>> + Send;

    /// Prepare, execute once and finish, returning the affected-row
    /// count.
    fn run(&mut self, sql: &str, params: &[Value]) -> impl Future<Output = Result<u64>> + Send;

    /// Commit the open transaction and start the next one.
    fn commit(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Roll back the open transaction and start the next one.
    fn rollback(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// List the table names visible in the connected database.
    fn list_tables(&mut self) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// Open an independent second link with the same credentials.
    fn try_clone(&mut self) -> impl Future<Output = Result<Self>> + Send;

    /// Release the server-side link.
    fn disconnect(self) -> impl Future<Output = Result<()>> + Send;
}

/// A database connection over one server link.
pub struct Connection<C: Connector> {
    /// Library entry point, kept for cloning.
    connector: C,
    /// The owned server-side link.
    link: C::Link,
    /// Connect parameters, kept for cloning.
    params: ConnectParams,
    /// Whether a transaction is currently open. True for the whole life
    /// of a healthy connection.
    transaction_open: bool,
}

impl<C: Connector> Connection<C> {
    /// Connect to the server.
    ///
    /// On success autocommit is disabled and the first transaction is
    /// opened before the connection is handed out.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use mysql_driver_rs::{ConnectParams, Connection, Connector, Result};
    ///
    /// async fn open<C: Connector>(lib: C) -> Result<Connection<C>> {
    ///     let params = ConnectParams::new("localhost", "app", "secret", "inventory");
    ///     Connection::connect(lib, params).await
    /// }
    /// ```
    pub async fn connect(connector: C, params: ConnectParams) -> Result<Self> {
        let link = connector
            .connect(&params)
            .await
            .map_err(|e| Error::connection(e.code, e.message))?;
        debug!(host = %params.host, database = %params.database, "link established");

        let mut conn = Self {
            connector,
            link,
            params,
            transaction_open: false,
        };
        conn.exec("SET autocommit=0").await?;
        conn.begin().await?;
        Ok(conn)
    }

    /// Whether a transaction is currently open.
    pub fn transaction_open(&self) -> bool {
        self.transaction_open
    }

    /// Connect parameters this connection was established with.
    pub fn params(&self) -> &ConnectParams {
        &self.params
    }

    pub(crate) fn link_mut(&mut self) -> &mut C::Link {
        &mut self.link
    }

    /// Run a plain query on the link, mapping failures to connection
    /// errors.
    async fn exec(&mut self, sql: &str) -> Result<()> {
        self.link
            .query(sql)
            .await
            .map_err(|e| Error::connection(e.code, e.message))
    }

    async fn begin(&mut self) -> Result<()> {
        self.exec("START TRANSACTION").await?;
        self.transaction_open = true;
        Ok(())
    }

    /// Close the current transaction with `sql`, then open the next one.
    async fn end_transaction(&mut self, sql: &str) -> Result<()> {
        self.exec(sql).await?;
        self.transaction_open = false;
        self.begin().await
    }

    async fn collect_first_column(stmt: &mut Statement<'_, C>) -> Result<Vec<String>> {
        stmt.execute(&[]).await?;
        let mut names = Vec::new();
        while let Some(row) = stmt.fetch_row().await? {
            match row.get(0) {
                Some(Value::Text(name)) => names.push(name.clone()),
                Some(other) => {
                    return Err(Error::decode(format!(
                        "catalog row yielded a non-text first column: {}",
                        other
                    )))
                }
                None => return Err(Error::decode("catalog row has no columns")),
            }
        }
        Ok(names)
    }
}

impl<C: Connector> SqlConnection for Connection<C> {
    type Stmt<'a>
        = Statement<'a, C>
    where
        Self: 'a;

    async fn prepare(&mut self, sql: &str) -> Result<Statement<'_, C>> {
        let mut stmt = self
            .link
            .stmt_init()
            .map_err(|e| Error::statement(e.code, e.message))?;

        // The handle is released before a parse failure propagates.
        if let Err(e) = self.link.stmt_prepare(&mut stmt, sql).await {
            self.link.stmt_close(stmt).await;
            return Err(Error::statement(e.code, e.message));
        }

        let param_count = self.link.stmt_param_count(&stmt);
        let columns = self.link.stmt_result_metadata(&stmt);
        let result_slots = allocate_result_slots(&columns);
        if !result_slots.is_empty() {
            if let Err(e) = self.link.stmt_bind_result(&mut stmt, &result_slots) {
                self.link.stmt_close(stmt).await;
                return Err(Error::statement(e.code, e.message));
            }
        }

        debug!(
            query = sql,
            params = param_count,
            columns = columns.len(),
            "prepared statement"
        );
        Ok(Statement::new(
            self,
            stmt,
            columns,
            result_slots,
            param_count,
            sql,
        ))
    }

    async fn run(&mut self, sql: &str, params: &[Value]) -> Result<u64> {
        let mut stmt = self.prepare(sql).await?;
        let executed = stmt.execute(params).await;
        // The handle is released even when the execution failed.
        stmt.finish().await?;
        executed
    }

    async fn commit(&mut self) -> Result<()> {
        self.end_transaction("COMMIT").await
    }

    async fn rollback(&mut self) -> Result<()> {
        self.end_transaction("ROLLBACK").await
    }

    async fn list_tables(&mut self) -> Result<Vec<String>> {
        let mut stmt = self.prepare("SHOW TABLES").await?;
        let collected = Self::collect_first_column(&mut stmt).await;
        stmt.finish().await?;
        collected
    }

    async fn try_clone(&mut self) -> Result<Self> {
        // A full new link, not a handle duplicate.
        Self::connect(self.connector.clone(), self.params.clone()).await
    }

    async fn disconnect(self) -> Result<()> {
        let Self { link, params, .. } = self;
        link.close().await;
        debug!(host = %params.host, "link released");
        Ok(())
    }
}
