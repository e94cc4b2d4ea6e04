//! Scripted in-memory collaborator for driver tests.
//!
//! `MockServer` plays the native client library: scripts are registered
//! per query text, and every link/statement handle the driver opens or
//! releases is counted so tests can assert the resource discipline.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use mysql_driver_rs::{
    BindSlot, ColumnMetadata, ConnectParams, Connection, Connector, FetchStatus, LinkResult,
    Result, ServerError, ServerLink,
};

/// One cell of a scripted row: raw wire bytes plus the null flag.
#[derive(Debug, Clone, Default)]
pub struct MockCell {
    pub bytes: Vec<u8>,
    pub null: bool,
}

impl MockCell {
    pub fn null() -> Self {
        Self {
            bytes: Vec::new(),
            null: true,
        }
    }

    pub fn raw(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            null: false,
        }
    }

    pub fn int32(v: i32) -> Self {
        Self::raw(v.to_le_bytes().to_vec())
    }

    pub fn int64(v: i64) -> Self {
        Self::raw(v.to_le_bytes().to_vec())
    }

    pub fn double(v: f64) -> Self {
        Self::raw(v.to_le_bytes().to_vec())
    }

    pub fn text(s: &str) -> Self {
        Self::raw(s.as_bytes().to_vec())
    }
}

/// Scripted behavior for one query text.
#[derive(Debug, Clone, Default)]
pub struct Script {
    pub param_count: usize,
    pub columns: Vec<ColumnMetadata>,
    pub rows: Vec<Vec<MockCell>>,
    pub affected: u64,
    pub prepare_error: Option<ServerError>,
    pub execute_error: Option<ServerError>,
    pub fetch_error: Option<ServerError>,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(mut self, n: usize) -> Self {
        self.param_count = n;
        self
    }

    pub fn with_columns(mut self, columns: Vec<ColumnMetadata>) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_rows(mut self, rows: Vec<Vec<MockCell>>) -> Self {
        self.rows = rows;
        self
    }

    pub fn with_affected(mut self, n: u64) -> Self {
        self.affected = n;
        self
    }

    pub fn with_prepare_error(mut self, code: u32, message: &str) -> Self {
        self.prepare_error = Some(ServerError::new(code, message));
        self
    }

    pub fn with_execute_error(mut self, code: u32, message: &str) -> Self {
        self.execute_error = Some(ServerError::new(code, message));
        self
    }

    pub fn with_fetch_error(mut self, code: u32, message: &str) -> Self {
        self.fetch_error = Some(ServerError::new(code, message));
        self
    }
}

#[derive(Debug, Default)]
struct State {
    scripts: HashMap<String, Script>,
    connect_error: Option<ServerError>,
    links_opened: usize,
    links_closed: usize,
    stmts_opened: usize,
    stmts_closed: usize,
    queries: Vec<String>,
}

/// The scripted client library.
#[derive(Debug, Clone, Default)]
pub struct MockServer {
    state: Arc<Mutex<State>>,
}

impl MockServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the script for a query text.
    pub fn script(&self, sql: &str, script: Script) {
        self.state
            .lock()
            .unwrap()
            .scripts
            .insert(sql.to_string(), script);
    }

    /// Make every connect attempt fail.
    pub fn fail_connect(&self, code: u32, message: &str) {
        self.state.lock().unwrap().connect_error = Some(ServerError::new(code, message));
    }

    /// Plain queries issued so far, across all links, in order.
    pub fn queries(&self) -> Vec<String> {
        self.state.lock().unwrap().queries.clone()
    }

    pub fn links_opened(&self) -> usize {
        self.state.lock().unwrap().links_opened
    }

    pub fn links_closed(&self) -> usize {
        self.state.lock().unwrap().links_closed
    }

    /// Statement handles currently held by the driver.
    pub fn stmts_live(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.stmts_opened - state.stmts_closed
    }
}

impl Connector for MockServer {
    type Link = MockLink;

    async fn connect(&self, _params: &ConnectParams) -> LinkResult<MockLink> {
        let mut state = self.state.lock().unwrap();
        if let Some(e) = state.connect_error.clone() {
            return Err(e);
        }
        state.links_opened += 1;
        Ok(MockLink {
            server: self.clone(),
        })
    }
}

/// One scripted server link.
#[derive(Debug)]
pub struct MockLink {
    server: MockServer,
}

/// One scripted statement handle.
#[derive(Debug, Default)]
pub struct MockStmt {
    script: Script,
    prepared: bool,
    executed: bool,
    next_row: usize,
    bound_params: Vec<(u8, Vec<u8>, bool)>,
}

impl ServerLink for MockLink {
    type Stmt = MockStmt;

    async fn close(self) {
        self.server.state.lock().unwrap().links_closed += 1;
    }

    async fn query(&mut self, sql: &str) -> LinkResult<()> {
        self.server
            .state
            .lock()
            .unwrap()
            .queries
            .push(sql.to_string());
        Ok(())
    }

    fn stmt_init(&mut self) -> LinkResult<MockStmt> {
        self.server.state.lock().unwrap().stmts_opened += 1;
        Ok(MockStmt::default())
    }

    async fn stmt_prepare(&mut self, stmt: &mut MockStmt, sql: &str) -> LinkResult<()> {
        let script = match self.server.state.lock().unwrap().scripts.get(sql) {
            Some(script) => script.clone(),
            None => {
                return Err(ServerError::new(
                    1064,
                    format!("You have an error in your SQL syntax near '{}'", sql),
                ))
            }
        };
        if let Some(e) = script.prepare_error.clone() {
            return Err(e);
        }
        stmt.script = script;
        stmt.prepared = true;
        Ok(())
    }

    fn stmt_param_count(&mut self, stmt: &MockStmt) -> usize {
        stmt.script.param_count
    }

    fn stmt_result_metadata(&mut self, stmt: &MockStmt) -> Vec<ColumnMetadata> {
        stmt.script.columns.clone()
    }

    fn stmt_bind_result(&mut self, stmt: &mut MockStmt, slots: &[BindSlot]) -> LinkResult<()> {
        if slots.len() != stmt.script.columns.len() {
            return Err(ServerError::new(2036, "Wrong number of result bindings"));
        }
        Ok(())
    }

    fn stmt_bind_param(&mut self, stmt: &mut MockStmt, slots: &[BindSlot]) -> LinkResult<()> {
        if slots.len() != stmt.script.param_count {
            return Err(ServerError::new(2031, "No data supplied for parameters"));
        }
        stmt.bound_params = slots
            .iter()
            .map(|s| (s.type_code, s.data().to_vec(), s.is_null))
            .collect();
        Ok(())
    }

    async fn stmt_execute(&mut self, stmt: &mut MockStmt) -> LinkResult<()> {
        if let Some(e) = stmt.script.execute_error.clone() {
            return Err(e);
        }
        stmt.executed = true;
        stmt.next_row = 0;
        Ok(())
    }

    fn stmt_affected_rows(&mut self, stmt: &MockStmt) -> u64 {
        stmt.script.affected
    }

    async fn stmt_fetch(
        &mut self,
        stmt: &mut MockStmt,
        slots: &mut [BindSlot],
    ) -> LinkResult<FetchStatus> {
        if let Some(e) = stmt.script.fetch_error.clone() {
            return Err(e);
        }
        if !stmt.executed || stmt.next_row >= stmt.script.rows.len() {
            return Ok(FetchStatus::NoData);
        }

        let row = &stmt.script.rows[stmt.next_row];
        stmt.next_row += 1;

        let mut truncated = false;
        for (slot, cell) in slots.iter_mut().zip(row) {
            slot.is_null = cell.null;
            slot.error = false;
            slot.length = cell.bytes.len() as u32;
            let n = cell.bytes.len().min(slot.capacity);
            slot.buffer[..n].copy_from_slice(&cell.bytes[..n]);
            if cell.bytes.len() > slot.capacity {
                slot.error = true;
                truncated = true;
            }
        }
        Ok(if truncated {
            FetchStatus::Truncated
        } else {
            FetchStatus::Ok
        })
    }

    async fn stmt_close(&mut self, _stmt: MockStmt) {
        self.server.state.lock().unwrap().stmts_closed += 1;
    }
}

/// Connect parameters used by every test.
pub fn test_params() -> ConnectParams {
    ConnectParams::new("localhost", "app", "secret", "testdb")
}

/// Open a connection against the scripted server.
pub async fn connect(server: &MockServer) -> Result<Connection<MockServer>> {
    Connection::connect(server.clone(), test_params()).await
}
