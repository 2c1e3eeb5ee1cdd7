//! Error types for snmpclient.
//!
//! This module provides:
//!
//! - [`Error`] - The main error type covering name resolution, MIB loading,
//!   requests, SET type matching and table joins
//! - [`ErrorStatus`] - SNMP protocol errors returned by agents (RFC 3416)
//! - [`WalkAbortReason`] - Reasons a walk operation was aborted
//!
//! # Error Handling
//!
//! Errors are boxed for efficiency: `Result<T> = Result<T, Box<Error>>`.
//!
//! ```rust
//! use snmpclient::{Error, Result};
//! use snmpclient::transport::TransportError;
//!
//! fn handle_error(result: Result<()>) {
//!     match result {
//!         Ok(()) => println!("Success"),
//!         Err(e) => match &*e {
//!             Error::UnresolvedSymbol { module, symbol } => {
//!                 println!("{}::{} is not defined in any loaded module", module, symbol);
//!             }
//!             Error::RequestFailed { source: TransportError::Timeout, target, .. } => {
//!                 println!("{} did not answer", target);
//!             }
//!             _ => println!("Error: {}", e),
//!         }
//!     }
//! }
//! ```
//!
//! A session whose authentication negotiation failed is *not* an error: check
//! [`Session::is_alive`](crate::Session::is_alive) after construction.

use std::path::PathBuf;

use crate::oid::Oid;
use crate::session::Target;
use crate::transport::{Operation, TransportError};
use crate::value::ValueKind;

/// Result type alias using the library's boxed Error type.
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Reason a walk operation was aborted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkAbortReason {
    /// Agent returned an OID that is not greater than the previous OID.
    NonIncreasing,
    /// Agent returned an OID that was already seen (cycle detected).
    Cycle,
}

impl std::fmt::Display for WalkAbortReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonIncreasing => write!(f, "non-increasing OID"),
            Self::Cycle => write!(f, "cycle detected"),
        }
    }
}

/// Why a symbolic or dotted name could not be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameErrorKind {
    /// An index or OID component is not a non-negative 32-bit integer.
    InvalidArc,
    /// The `MODULE::` part is missing or empty.
    MissingModule,
    /// The symbol after `::` is missing or empty.
    MissingSymbol,
    /// More than one `::` separator.
    TooManySeparators,
}

impl std::fmt::Display for NameErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArc => write!(f, "index components must be non-negative integers"),
            Self::MissingModule => write!(f, "missing module name"),
            Self::MissingSymbol => write!(f, "missing object name"),
            Self::TooManySeparators => write!(f, "expected exactly one '::' separator"),
        }
    }
}

/// The main error type for all snmpclient operations.
///
/// Errors are boxed (via [`Result`]) to keep the size small on the stack.
///
/// # Common Patterns
///
/// ```
/// use snmpclient::Error;
/// use snmpclient::transport::TransportError;
///
/// fn is_timeout(error: &Error) -> bool {
///     matches!(error, Error::RequestFailed { source: TransportError::Timeout, .. })
/// }
///
/// fn is_schema_problem(error: &Error) -> bool {
///     matches!(error,
///         Error::UnresolvedSymbol { .. } |
///         Error::UnknownOid { .. } |
///         Error::ModuleNotFound { .. }
///     )
/// }
/// ```
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Name is neither `MODULE::symbol[.index...]` nor a dotted OID.
    #[error("invalid name '{input}': {kind}")]
    InvalidName { input: Box<str>, kind: NameErrorKind },

    /// No loaded module defines the symbol.
    #[error("unresolved symbol {module}::{symbol}")]
    UnresolvedSymbol { module: Box<str>, symbol: Box<str> },

    /// No registered node is a prefix of the OID.
    #[error("no registered MIB node covers {oid}")]
    UnknownOid { oid: Oid },

    /// Module is neither on the search path nor built in.
    #[error("MIB module {module} not found")]
    ModuleNotFound { module: Box<str> },

    /// An OID index file could not be parsed.
    #[error("malformed MIB module {module} at line {line}: {reason}")]
    MalformedModule {
        module: Box<str>,
        line: usize,
        reason: Box<str>,
    },

    /// An OID index file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Transport reported a timeout, an agent error status, or garbage.
    #[error("{operation} of {oid} on {target} failed: {source}")]
    RequestFailed {
        target: Target,
        operation: Operation,
        oid: Oid,
        #[source]
        source: TransportError,
    },

    /// The new value cannot be written with the SET target's existing type:
    /// text for a type with no text form, or a typed value of another type.
    #[error("cannot set {oid}: value does not fit existing type {kind}")]
    TypeMismatch { oid: Oid, kind: ValueKind },

    /// The new value's text does not parse as the target's type.
    #[error("'{input}' is not a valid {kind} value")]
    InvalidValue { kind: ValueKind, input: Box<str> },

    /// A write was attempted on a session without write credentials.
    #[error("no write profile configured for {target}")]
    NoWriteProfile { target: Target },

    /// A read was attempted on a session whose negotiation failed.
    #[error("session with {target} is not alive")]
    NotAlive { target: Target },

    /// A column table row has an index that the index population lacks.
    #[error("row {index} of {table} has no matching index")]
    UnmatchedIndex { table: Box<str>, index: Oid },

    /// Two rows of a column table map to the same row index.
    #[error("{table} has more than one row for index {index}")]
    DuplicateIndex { table: Box<str>, index: Oid },

    /// Walk aborted due to agent misbehavior.
    #[error("walk of {oid} on {target} aborted: {reason}")]
    WalkAborted {
        target: Target,
        oid: Oid,
        reason: WalkAbortReason,
    },

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(Box<str>),
}

impl Error {
    /// Box this error (convenience for constructing boxed errors).
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    /// Boxed [`Error::InvalidName`].
    pub(crate) fn invalid_name(input: &str, kind: NameErrorKind) -> Box<Self> {
        Self::InvalidName {
            input: input.into(),
            kind,
        }
        .boxed()
    }

    /// Boxed [`Error::UnresolvedSymbol`].
    pub(crate) fn unresolved(module: &str, symbol: &str) -> Box<Self> {
        Self::UnresolvedSymbol {
            module: module.into(),
            symbol: symbol.into(),
        }
        .boxed()
    }

    /// Get the target if this error is bound to one.
    pub fn target(&self) -> Option<&Target> {
        match self {
            Self::RequestFailed { target, .. }
            | Self::NoWriteProfile { target }
            | Self::NotAlive { target }
            | Self::WalkAborted { target, .. } => Some(target),
            _ => None,
        }
    }
}

/// SNMP protocol error status codes (RFC 3416).
///
/// Carried by [`TransportError::Agent`] when an agent answers with a
/// non-zero error status.
///
/// ```
/// use snmpclient::ErrorStatus;
///
/// let status = ErrorStatus::from_i32(2);
/// assert_eq!(status, ErrorStatus::NoSuchName);
/// assert_eq!(status.as_i32(), 2);
/// assert_eq!(status.to_string(), "noSuchName");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorStatus {
    /// Operation completed successfully (status = 0).
    NoError,
    /// Response message would be too large for transport (status = 1).
    TooBig,
    /// Requested OID not found (status = 2). SNMPv1 only; v2c+ uses exception values.
    NoSuchName,
    /// Invalid value provided in SET request (status = 3).
    BadValue,
    /// Attempted to SET a read-only object (status = 4).
    ReadOnly,
    /// Unspecified error occurred (status = 5).
    GenErr,
    /// Object exists but access is denied (status = 6).
    NoAccess,
    /// SET value has wrong ASN.1 type (status = 7).
    WrongType,
    /// SET value has incorrect length (status = 8).
    WrongLength,
    /// SET value uses wrong encoding (status = 9).
    WrongEncoding,
    /// SET value is out of range or otherwise invalid (status = 10).
    WrongValue,
    /// Object does not support row creation (status = 11).
    NoCreation,
    /// Value is inconsistent with other managed objects (status = 12).
    InconsistentValue,
    /// Resource required for SET is unavailable (status = 13).
    ResourceUnavailable,
    /// SET commit phase failed (status = 14).
    CommitFailed,
    /// SET undo phase failed (status = 15).
    UndoFailed,
    /// Access denied by VACM (status = 16).
    AuthorizationError,
    /// Object does not support modification (status = 17).
    NotWritable,
    /// Named object cannot be created (status = 18).
    InconsistentName,
    /// Unknown or future error status code.
    Unknown(i32),
}

impl ErrorStatus {
    /// Create from raw status code.
    pub fn from_i32(value: i32) -> Self {
        match value {
            0 => Self::NoError,
            1 => Self::TooBig,
            2 => Self::NoSuchName,
            3 => Self::BadValue,
            4 => Self::ReadOnly,
            5 => Self::GenErr,
            6 => Self::NoAccess,
            7 => Self::WrongType,
            8 => Self::WrongLength,
            9 => Self::WrongEncoding,
            10 => Self::WrongValue,
            11 => Self::NoCreation,
            12 => Self::InconsistentValue,
            13 => Self::ResourceUnavailable,
            14 => Self::CommitFailed,
            15 => Self::UndoFailed,
            16 => Self::AuthorizationError,
            17 => Self::NotWritable,
            18 => Self::InconsistentName,
            other => {
                tracing::warn!(target: "snmpclient::error", { snmp.error_status = other }, "unknown SNMP error status");
                Self::Unknown(other)
            }
        }
    }

    /// Convert to raw status code.
    pub fn as_i32(&self) -> i32 {
        match self {
            Self::NoError => 0,
            Self::TooBig => 1,
            Self::NoSuchName => 2,
            Self::BadValue => 3,
            Self::ReadOnly => 4,
            Self::GenErr => 5,
            Self::NoAccess => 6,
            Self::WrongType => 7,
            Self::WrongLength => 8,
            Self::WrongEncoding => 9,
            Self::WrongValue => 10,
            Self::NoCreation => 11,
            Self::InconsistentValue => 12,
            Self::ResourceUnavailable => 13,
            Self::CommitFailed => 14,
            Self::UndoFailed => 15,
            Self::AuthorizationError => 16,
            Self::NotWritable => 17,
            Self::InconsistentName => 18,
            Self::Unknown(code) => *code,
        }
    }
}

impl std::fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoError => write!(f, "noError"),
            Self::TooBig => write!(f, "tooBig"),
            Self::NoSuchName => write!(f, "noSuchName"),
            Self::BadValue => write!(f, "badValue"),
            Self::ReadOnly => write!(f, "readOnly"),
            Self::GenErr => write!(f, "genErr"),
            Self::NoAccess => write!(f, "noAccess"),
            Self::WrongType => write!(f, "wrongType"),
            Self::WrongLength => write!(f, "wrongLength"),
            Self::WrongEncoding => write!(f, "wrongEncoding"),
            Self::WrongValue => write!(f, "wrongValue"),
            Self::NoCreation => write!(f, "noCreation"),
            Self::InconsistentValue => write!(f, "inconsistentValue"),
            Self::ResourceUnavailable => write!(f, "resourceUnavailable"),
            Self::CommitFailed => write!(f, "commitFailed"),
            Self::UndoFailed => write!(f, "undoFailed"),
            Self::AuthorizationError => write!(f, "authorizationError"),
            Self::NotWritable => write!(f, "notWritable"),
            Self::InconsistentName => write!(f, "inconsistentName"),
            Self::Unknown(code) => write!(f, "unknown({})", code),
        }
    }
}
