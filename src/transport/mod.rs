//! Transport layer abstraction.
//!
//! The session never touches the wire. It hands a [`Transport`] an OID (or a
//! varbind for SET) plus the credentials to use, and gets back the single
//! varbind the agent answered with, or a [`TransportError`]. Encoding,
//! sockets and retransmission belong to the implementation.
//!
//! [`MockTransport`] implements the trait as an in-memory agent.

mod mock;

pub use mock::*;

use std::fmt;
use std::future::Future;

use crate::error::ErrorStatus;
use crate::oid::Oid;
use crate::session::AuthProfile;
use crate::varbind::VarBind;

/// Request kinds issued by a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// GetRequest.
    Get,
    /// GetNextRequest.
    GetNext,
    /// SetRequest.
    Set,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::GetNext => write!(f, "GETNEXT"),
            Self::Set => write!(f, "SET"),
        }
    }
}

/// Why a single request produced no usable varbind.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TransportError {
    /// No response before the transport gave up (retries included).
    ///
    /// Agents silently drop requests carrying an unknown community, so this
    /// is also how bad credentials surface.
    #[error("request timed out")]
    Timeout,

    /// The agent answered with a non-zero error status.
    #[error("agent returned {status} (index {index})")]
    Agent {
        /// Error status from the response PDU.
        status: ErrorStatus,
        /// 1-based index of the offending varbind, 0 if unspecified.
        index: u32,
    },

    /// A response arrived but could not be understood.
    #[error("malformed response: {0}")]
    MalformedResponse(Box<str>),

    /// Socket-level failure.
    #[error("network error: {0}")]
    Network(#[from] std::io::Error),
}

impl TransportError {
    /// Whether this is a [`TransportError::Timeout`].
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// The agent's error status, if the agent answered with one.
    pub fn status(&self) -> Option<ErrorStatus> {
        match self {
            Self::Agent { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result of a single transport request.
pub type TransportResult = std::result::Result<VarBind, TransportError>;

/// Client-side transport abstraction.
///
/// Each method performs exactly one request/response exchange for one
/// varbind. Implementations may retry internally; a returned
/// [`TransportError::Timeout`] means they have given up.
pub trait Transport: Send + Sync {
    /// GET `oid`.
    fn get(
        &self,
        oid: &Oid,
        auth: &AuthProfile,
    ) -> impl Future<Output = TransportResult> + Send;

    /// GETNEXT from `oid`.
    fn get_next(
        &self,
        oid: &Oid,
        auth: &AuthProfile,
    ) -> impl Future<Output = TransportResult> + Send;

    /// SET `varbind`. The returned varbind is the agent's confirmation.
    fn set(
        &self,
        varbind: &VarBind,
        auth: &AuthProfile,
    ) -> impl Future<Output = TransportResult> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_display() {
        assert_eq!(Operation::Get.to_string(), "GET");
        assert_eq!(Operation::GetNext.to_string(), "GETNEXT");
        assert_eq!(Operation::Set.to_string(), "SET");
    }

    #[test]
    fn transport_error_accessors() {
        assert!(TransportError::Timeout.is_timeout());
        let err = TransportError::Agent {
            status: ErrorStatus::NoSuchName,
            index: 1,
        };
        assert!(!err.is_timeout());
        assert_eq!(err.status(), Some(ErrorStatus::NoSuchName));
        assert_eq!(err.to_string(), "agent returned noSuchName (index 1)");

        let err: TransportError = std::io::Error::other("refused").into();
        assert!(matches!(err, TransportError::Network(_)));
    }
}
