//! Error types for the MySQL driver core.

use thiserror::Error;

/// Result type alias for driver operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for driver operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Link-level failure: connect refused, or a plain query rejected by
    /// the server. Carries the server's error code and message verbatim.
    #[error("connection error {code}: {message}")]
    Connection { code: u32, message: String },

    /// Statement-level failure: prepare, bind, execute or fetch rejected
    /// by the server. Carries the server's error code and message verbatim.
    #[error("statement error {code}: {message}")]
    Statement { code: u32, message: String },

    /// The number of supplied parameters does not match the number of
    /// placeholders the server reported for the statement.
    #[error("parameter count mismatch: statement has {expected} placeholders, got {actual} values")]
    ParameterCountMismatch { expected: usize, actual: usize },

    /// A value kind the binder does not transmit (opaque binary,
    /// time-difference).
    #[error("unsupported value kind for binding: {kind}")]
    UnsupportedValueKind { kind: &'static str },

    /// A value that cannot be represented in its wire type without losing
    /// bits.
    #[error("value out of range: {message}")]
    ValueOutOfRange { message: String },

    /// Received cell data that does not decode as the expected type.
    #[error("decode error: {message}")]
    Decode { message: String },

    /// Statement used outside its legal lifecycle: after `finish`, fetch
    /// before execute, or after an unrecovered execution failure.
    #[error("statement is {state}")]
    StatementState { state: &'static str },
}

impl Error {
    /// Create a connection error from a server code and message.
    pub fn connection(code: u32, message: impl Into<String>) -> Self {
        Self::Connection {
            code,
            message: message.into(),
        }
    }

    /// Create a statement error from a server code and message.
    pub fn statement(code: u32, message: impl Into<String>) -> Self {
        Self::Statement {
            code,
            message: message.into(),
        }
    }

    /// Create a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a value-out-of-range error.
    pub fn out_of_range(message: impl Into<String>) -> Self {
        Self::ValueOutOfRange {
            message: message.into(),
        }
    }
}
