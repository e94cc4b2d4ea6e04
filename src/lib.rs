//! MySQL driver core for Rust
//!
//! A prepared-statement binary-protocol pipeline over the server's native
//! client primitives: typed parameters are encoded into binary bind
//! slots, result metadata sizes one persistent receive buffer per column,
//! and fetched rows decode back into dynamically-typed [`Value`]s.
//!
//! The socket and handshake layer is not part of this crate; the core is
//! generic over a [`Connector`] providing the link- and statement-level
//! primitives of the native client library.
//!
//! # Example
//!
//! ```no_run
//! use mysql_driver_rs::{
//!     ConnectParams, Connection, Connector, Result, SqlConnection, SqlStatement, Value,
//! };
//!
//! async fn report<C: Connector>(lib: C) -> Result<()> {
//!     let params = ConnectParams::new("localhost", "app", "secret", "inventory");
//!     let mut conn = Connection::connect(lib, params).await?;
//!
//!     let mut stmt = conn.prepare("SELECT id, name FROM widgets WHERE id = ?").await?;
//!     stmt.execute(&[Value::Int64(5)]).await?;
//!     while let Some(row) = stmt.fetch_row().await? {
//!         println!("{:?}", row.values());
//!     }
//!     stmt.finish().await?;
//!
//!     conn.commit().await?;
//!     conn.disconnect().await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod connection;
pub mod error;
pub mod protocol;
pub mod statement;

// Re-export main types
pub use client::{ConnectParams, Connector, FetchStatus, LinkResult, ServerError, ServerLink};
pub use connection::{Connection, SqlConnection};
pub use error::{Error, Result};
pub use protocol::{BindSlot, ColumnMetadata, Row, Value};
pub use statement::{RowStreamExt, SqlStatement, Statement};
