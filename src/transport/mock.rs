//! In-memory agent.
//!
//! [`MockTransport`] answers GET / GETNEXT / SET from a sorted object store,
//! honouring community access and SNMPv1 vs v2c error conventions. Scripted
//! failures can be queued ahead of normal processing, and every request is
//! recorded so tests can assert on what a session actually sent.

use std::collections::{BTreeMap, VecDeque};
use std::future::Future;
use std::ops::Bound;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{Operation, Transport, TransportError, TransportResult};
use crate::error::ErrorStatus;
use crate::oid::Oid;
use crate::session::{AuthProfile, CommunityVersion};
use crate::value::Value;
use crate::varbind::VarBind;

/// Access granted to an accepted community.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// GET and GETNEXT only.
    ReadOnly,
    /// GET, GETNEXT and SET.
    ReadWrite,
}

/// A scripted outcome consumed by the next request.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Simulate a timeout.
    Timeout,
    /// Answer with an error status.
    AgentError {
        /// Error status.
        status: ErrorStatus,
        /// Error index.
        index: u32,
    },
    /// Answer with a varbind, bypassing the object store.
    VarBind(VarBind),
    /// Simulate an undecodable response.
    Malformed(String),
    /// Simulate an IO error.
    IoError(String),
}

/// A recorded request sent through the mock transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    /// Request kind.
    pub operation: Operation,
    /// Requested OID.
    pub oid: Oid,
    /// Value carried by a SET, `None` otherwise.
    pub value: Option<Value>,
    /// Credentials the request was sent with.
    pub auth: AuthProfile,
}

#[derive(Debug, Default)]
struct MockTransportInner {
    objects: BTreeMap<Oid, Value>,
    read_only: Vec<Oid>,
    /// `None` accepts every community with read-write access.
    communities: Option<Vec<(AuthProfile, Access)>>,
    responses: VecDeque<MockResponse>,
    requests: Vec<RecordedRequest>,
}

impl MockTransportInner {
    fn access(&self, auth: &AuthProfile) -> Option<Access> {
        match &self.communities {
            None => Some(Access::ReadWrite),
            Some(list) => list
                .iter()
                .find(|(profile, _)| profile == auth)
                .map(|(_, access)| *access),
        }
    }

    fn get(&self, oid: &Oid, version: CommunityVersion) -> TransportResult {
        if let Some(value) = self.objects.get(oid) {
            return Ok(VarBind::new(oid.clone(), value.clone()));
        }
        match version {
            CommunityVersion::V1 => Err(agent_error(ErrorStatus::NoSuchName)),
            CommunityVersion::V2c => {
                // An instance is missing when its object (the parent) has
                // other instances; otherwise the object itself is missing.
                let object_exists = oid
                    .parent()
                    .is_some_and(|parent| self.next_after(&parent).is_some_and(|(o, _)| o.starts_with(&parent)));
                let value = if object_exists {
                    Value::NoSuchInstance
                } else {
                    Value::NoSuchObject
                };
                Ok(VarBind::new(oid.clone(), value))
            }
        }
    }

    fn get_next(&self, oid: &Oid, version: CommunityVersion) -> TransportResult {
        match self.next_after(oid) {
            Some((next, value)) => Ok(VarBind::new(next.clone(), value.clone())),
            None => match version {
                CommunityVersion::V1 => Err(agent_error(ErrorStatus::NoSuchName)),
                CommunityVersion::V2c => Ok(VarBind::new(oid.clone(), Value::EndOfMibView)),
            },
        }
    }

    fn set(&mut self, varbind: &VarBind, version: CommunityVersion) -> TransportResult {
        let v1 = version == CommunityVersion::V1;
        let Some(current) = self.objects.get(&varbind.oid) else {
            let status = if v1 {
                ErrorStatus::NoSuchName
            } else {
                ErrorStatus::NoCreation
            };
            return Err(agent_error(status));
        };
        if self.read_only.contains(&varbind.oid) {
            let status = if v1 {
                ErrorStatus::NoSuchName
            } else {
                ErrorStatus::NotWritable
            };
            return Err(agent_error(status));
        }
        if current.kind() != varbind.value.kind() {
            let status = if v1 {
                ErrorStatus::BadValue
            } else {
                ErrorStatus::WrongType
            };
            return Err(agent_error(status));
        }

        self.objects.insert(varbind.oid.clone(), varbind.value.clone());
        Ok(varbind.clone())
    }

    fn next_after(&self, oid: &Oid) -> Option<(&Oid, &Value)> {
        self.objects
            .range((Bound::Excluded(oid), Bound::Unbounded))
            .next()
    }
}

fn agent_error(status: ErrorStatus) -> TransportError {
    TransportError::Agent { status, index: 1 }
}

/// In-memory agent implementing [`Transport`].
///
/// Clones share state, so a test can keep a handle for assertions while a
/// session owns another.
///
/// # Example
///
/// ```rust
/// use snmpclient::transport::{Access, MockTransport};
/// use snmpclient::{AuthProfile, Value, oid};
///
/// let mock = MockTransport::new();
/// mock.insert(oid!(1, 3, 6, 1, 2, 1, 1, 5, 0), Value::from("core-sw1"));
///
/// // Only "public" is answered; anything else times out
/// mock.accept(AuthProfile::v2c("public"), Access::ReadOnly);
///
/// // Or simulate a timeout on the next request
/// mock.queue_timeout();
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

impl MockTransport {
    /// Create an empty agent that accepts every community.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an agent holding `objects`.
    pub fn with_objects(objects: impl IntoIterator<Item = (Oid, Value)>) -> Self {
        let mock = Self::new();
        mock.lock().objects.extend(objects);
        mock
    }

    fn lock(&self) -> MutexGuard<'_, MockTransportInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store or replace an object instance.
    pub fn insert(&self, oid: Oid, value: Value) {
        self.lock().objects.insert(oid, value);
    }

    /// Current value of an object instance.
    pub fn value(&self, oid: &Oid) -> Option<Value> {
        self.lock().objects.get(oid).cloned()
    }

    /// Reject SETs to `oid`.
    pub fn set_read_only(&self, oid: Oid) {
        self.lock().read_only.push(oid);
    }

    /// Answer requests carrying `profile`.
    ///
    /// The first call switches the agent from accepting everything to
    /// accepting only listed profiles. Requests with any other community
    /// are dropped, which the client sees as a timeout.
    pub fn accept(&self, profile: AuthProfile, access: Access) {
        self.lock()
            .communities
            .get_or_insert_with(Vec::new)
            .push((profile, access));
    }

    /// Queue a scripted outcome for the next request.
    pub fn queue(&self, response: MockResponse) {
        self.lock().responses.push_back(response);
    }

    /// Queue a timeout.
    pub fn queue_timeout(&self) {
        self.queue(MockResponse::Timeout);
    }

    /// Queue an agent error status.
    pub fn queue_agent_error(&self, status: ErrorStatus) {
        self.queue(MockResponse::AgentError { status, index: 1 });
    }

    /// Queue an IO error.
    pub fn queue_io_error(&self, msg: impl Into<String>) {
        self.queue(MockResponse::IoError(msg.into()));
    }

    /// Get all recorded requests.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    /// Clear recorded requests.
    pub fn clear_requests(&self) {
        self.lock().requests.clear();
    }

    /// Get the number of queued responses remaining.
    pub fn queued_response_count(&self) -> usize {
        self.lock().responses.len()
    }

    fn handle(
        &self,
        operation: Operation,
        oid: &Oid,
        value: Option<&Value>,
        auth: &AuthProfile,
    ) -> TransportResult {
        let mut inner = self.lock();
        inner.requests.push(RecordedRequest {
            operation,
            oid: oid.clone(),
            value: value.cloned(),
            auth: auth.clone(),
        });

        if let Some(response) = inner.responses.pop_front() {
            return match response {
                MockResponse::Timeout => Err(TransportError::Timeout),
                MockResponse::AgentError { status, index } => {
                    Err(TransportError::Agent { status, index })
                }
                MockResponse::VarBind(vb) => Ok(vb),
                MockResponse::Malformed(msg) => Err(TransportError::MalformedResponse(msg.into())),
                MockResponse::IoError(msg) => {
                    Err(TransportError::Network(std::io::Error::other(msg)))
                }
            };
        }

        let access = match inner.access(auth) {
            Some(access) => access,
            None => return Err(TransportError::Timeout),
        };
        let version = auth.version;

        match (operation, value) {
            (Operation::Get, _) => inner.get(oid, version),
            (Operation::GetNext, _) => inner.get_next(oid, version),
            (Operation::Set, _) if access == Access::ReadOnly => Err(agent_error(match version {
                CommunityVersion::V1 => ErrorStatus::NoSuchName,
                CommunityVersion::V2c => ErrorStatus::NoAccess,
            })),
            (Operation::Set, Some(value)) => {
                inner.set(&VarBind::new(oid.clone(), value.clone()), version)
            }
            (Operation::Set, None) => Err(TransportError::MalformedResponse(
                "SET without a value".into(),
            )),
        }
    }
}

impl Transport for MockTransport {
    fn get(&self, oid: &Oid, auth: &AuthProfile) -> impl Future<Output = TransportResult> + Send {
        let result = self.handle(Operation::Get, oid, None, auth);
        async move { result }
    }

    fn get_next(
        &self,
        oid: &Oid,
        auth: &AuthProfile,
    ) -> impl Future<Output = TransportResult> + Send {
        let result = self.handle(Operation::GetNext, oid, None, auth);
        async move { result }
    }

    fn set(
        &self,
        varbind: &VarBind,
        auth: &AuthProfile,
    ) -> impl Future<Output = TransportResult> + Send {
        let result = self.handle(Operation::Set, &varbind.oid, Some(&varbind.value), auth);
        async move { result }
    }
}
