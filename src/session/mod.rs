//! Agent sessions.
//!
//! A [`Session`] binds one agent to a read profile chosen by probing and a
//! write profile taken on trust. All requests go through a [`Transport`]
//! and every name goes through an [`OidCodec`].

mod auth;
mod builder;
mod walk;

pub use auth::{AuthProfile, CommunityVersion};
pub use builder::SessionBuilder;
pub use walk::{ConceptualTable, OidOrdering};

use std::fmt;
use std::future::Future;

use tracing::instrument;

use crate::codec::OidCodec;
use crate::error::{Error, ErrorStatus, Result};
use crate::oid::Oid;
use crate::transport::{Operation, Transport, TransportError};
use crate::value::{EncodeError, SetValue, Value};
use crate::varbind::VarBind;
use walk::OidTracker;

/// Default object fetched to decide whether a read profile works.
pub const DEFAULT_LIVENESS_OBJECT: &str = "SNMPv2-MIB::sysName.0";

/// Agent identity used in logs and errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target {
    /// Host name or address.
    pub host: String,
    /// UDP port.
    pub port: u16,
}

impl Target {
    /// Create a target.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Read-profile negotiation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No negotiation has run yet.
    Unauthenticated,
    /// Negotiation is in progress.
    Probing,
    /// A read profile was committed.
    Alive,
    /// Every read candidate timed out, or there were none.
    Dead,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "unauthenticated"),
            Self::Probing => write!(f, "probing"),
            Self::Alive => write!(f, "alive"),
            Self::Dead => write!(f, "dead"),
        }
    }
}

/// Session configuration.
///
/// Most users should use [`SessionBuilder`] rather than constructing this directly.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Read candidates, tried in order (default: empty)
    pub read_profiles: Vec<AuthProfile>,
    /// Write candidates; only the first is used (default: empty)
    pub write_profiles: Vec<AuthProfile>,
    /// Object fetched while probing (default: `SNMPv2-MIB::sysName.0`)
    pub liveness_object: String,
    /// OID ordering behavior during walk operations (default: Strict)
    pub oid_ordering: OidOrdering,
    /// Maximum results from a single walk operation (default: None/unlimited)
    pub max_walk_results: Option<usize>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            read_profiles: Vec::new(),
            write_profiles: Vec::new(),
            liveness_object: DEFAULT_LIVENESS_OBJECT.to_string(),
            oid_ordering: OidOrdering::Strict,
            max_walk_results: None,
        }
    }
}

/// A management session with one agent.
///
/// Open one with [`SessionBuilder::new`]. Construction probes the read
/// candidates. A session whose probe failed is still returned; check
/// [`is_alive`](Self::is_alive) before use, or let reads fail with
/// [`Error::NotAlive`].
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use snmpclient::transport::{Access, MockTransport};
/// use snmpclient::{AuthProfile, OidCodec, SchemaRegistry, SessionBuilder, Value, oid};
///
/// # async fn example() -> snmpclient::Result<()> {
/// let agent = MockTransport::new();
/// agent.insert(oid!(1, 3, 6, 1, 2, 1, 1, 5, 0), Value::from("core-sw1"));
/// agent.accept(AuthProfile::v2c("public"), Access::ReadOnly);
///
/// let codec = OidCodec::new(Arc::new(SchemaRegistry::standard()?));
/// let session = SessionBuilder::new("192.0.2.1", 161)
///     .read_profiles([AuthProfile::v2c("secret"), AuthProfile::v2c("public")])
///     .connect(agent, codec)
///     .await?;
///
/// assert!(session.is_alive());
/// assert_eq!(session.read_profile(), Some(&AuthProfile::v2c("public")));
/// assert_eq!(session.get("SNMPv2-MIB::sysName.0").await?, Value::from("core-sw1"));
/// # Ok(())
/// # }
/// ```
pub struct Session<T: Transport> {
    target: Target,
    transport: T,
    codec: OidCodec,
    config: SessionConfig,
    state: SessionState,
    read_profile: Option<AuthProfile>,
}

impl<T: Transport> fmt::Debug for Session<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("target", &self.target)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<T: Transport> Session<T> {
    /// Create a session and run read-profile negotiation.
    ///
    /// Fails only if the liveness object name cannot be resolved. An agent
    /// that never answers yields a dead session, not an error.
    pub async fn new(
        target: Target,
        transport: T,
        codec: OidCodec,
        config: SessionConfig,
    ) -> Result<Self> {
        let mut session = Self {
            target,
            transport,
            codec,
            config,
            state: SessionState::Unauthenticated,
            read_profile: None,
        };
        session.probe().await?;
        Ok(session)
    }

    /// Re-run read-profile negotiation.
    ///
    /// The liveness object is fetched with each read candidate in order.
    /// The first candidate that gets any answer other than a timeout is
    /// committed, even if the answer is an error status: the agent
    /// recognized the community. Later candidates are not tried.
    #[instrument(skip(self), err, fields(snmp.target = %self.target))]
    pub async fn probe(&mut self) -> Result<SessionState> {
        let oid = self.codec.resolve(&self.config.liveness_object)?;

        self.state = SessionState::Probing;
        self.read_profile = None;

        let mut chosen = None;
        for (idx, profile) in self.config.read_profiles.iter().enumerate() {
            match self.transport.get(&oid, profile).await {
                Err(TransportError::Timeout) => {
                    tracing::debug!(target: "snmpclient::session", { snmp.candidate = idx, snmp.version = %profile.version }, "read candidate timed out");
                }
                Ok(_) => {
                    chosen = Some(profile.clone());
                    break;
                }
                Err(e) => {
                    tracing::debug!(target: "snmpclient::session", { snmp.candidate = idx, error = %e }, "read candidate answered with an error");
                    chosen = Some(profile.clone());
                    break;
                }
            }
        }

        match chosen {
            Some(profile) => {
                tracing::info!(target: "snmpclient::session", { snmp.target = %self.target, snmp.version = %profile.version }, "session alive");
                self.read_profile = Some(profile);
                self.state = SessionState::Alive;
            }
            None => {
                tracing::warn!(target: "snmpclient::session", { snmp.target = %self.target, snmp.candidates = self.config.read_profiles.len() }, "no read candidate answered; session dead");
                self.state = SessionState::Dead;
            }
        }
        Ok(self.state)
    }

    /// The agent this session talks to.
    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Negotiation state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether a read profile was committed.
    pub fn is_alive(&self) -> bool {
        self.state == SessionState::Alive
    }

    /// The committed read profile.
    pub fn read_profile(&self) -> Option<&AuthProfile> {
        self.read_profile.as_ref()
    }

    /// The write profile (first write candidate, never validated).
    pub fn write_profile(&self) -> Option<&AuthProfile> {
        self.config.write_profiles.first()
    }

    /// The codec used to resolve names.
    pub fn codec(&self) -> &OidCodec {
        &self.codec
    }

    /// Session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Get a reference to the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch one object.
    ///
    /// `name` is either `MODULE::symbol[.index]` or a dotted OID.
    /// Exception values (`noSuchObject`, `noSuchInstance`) are returned as
    /// values, not errors.
    #[instrument(skip(self), err, fields(snmp.target = %self.target))]
    pub async fn get(&self, name: &str) -> Result<Value> {
        let auth = self.read_auth()?;
        let oid = self.codec.resolve(name)?;
        let vb = self
            .request(Operation::Get, &oid, self.transport.get(&oid, auth))
            .await?;
        Ok(vb.value)
    }

    /// Write one object, preserving its current type.
    ///
    /// The current value is fetched first. Text (and plain numbers) is
    /// encoded as that type. A typed [`Value`] is sent unchanged and must
    /// already have that type, so a value read with [`get`](Self::get) can
    /// be written back as-is. The SET uses the write profile; the value the
    /// agent confirmed is returned.
    #[instrument(skip(self, value), err, fields(snmp.target = %self.target))]
    pub async fn set(&self, name: &str, value: impl Into<SetValue>) -> Result<Value> {
        let write = self.write_profile().ok_or_else(|| {
            Error::NoWriteProfile {
                target: self.target.clone(),
            }
            .boxed()
        })?;
        let read = self.read_auth()?;
        let oid = self.codec.resolve(name)?;

        let current = self
            .request(Operation::Get, &oid, self.transport.get(&oid, read))
            .await?
            .value;
        let kind = current.kind();
        let mismatch = || {
            Error::TypeMismatch {
                oid: oid.clone(),
                kind,
            }
            .boxed()
        };

        let new_value = match value.into() {
            SetValue::Value(value) if value.kind() == kind && !value.is_exception() => value,
            SetValue::Value(_) => return Err(mismatch()),
            SetValue::Text(input) => kind.encode(&input).map_err(|e| match e {
                EncodeError::Unsupported => mismatch(),
                EncodeError::Invalid => Error::InvalidValue {
                    kind,
                    input: input.as_str().into(),
                }
                .boxed(),
            })?,
        };
        tracing::debug!(target: "snmpclient::session", { snmp.oid = %oid, snmp.kind = %kind }, "encoded SET value");

        let varbind = VarBind::new(oid.clone(), new_value);
        let confirmed = self
            .request(Operation::Set, &oid, self.transport.set(&varbind, write))
            .await?;
        Ok(confirmed.value)
    }

    /// Walk the subtree under `name` with GETNEXT.
    ///
    /// The walk ends at the first OID outside the subtree, at
    /// `endOfMibView`, at an SNMPv1 `noSuchName` error, or after
    /// [`SessionConfig::max_walk_results`] rows. An empty subtree yields an
    /// empty table.
    #[instrument(skip(self), err, fields(snmp.target = %self.target))]
    pub async fn walk_table(&self, name: &str) -> Result<ConceptualTable> {
        let auth = self.read_auth()?;
        let base = self.codec.resolve(name)?;

        let mut tracker = OidTracker::new(self.config.oid_ordering);
        let mut varbinds = Vec::new();
        let mut current = base.clone();

        loop {
            if let Some(max) = self.config.max_walk_results
                && varbinds.len() >= max
            {
                tracing::debug!(target: "snmpclient::session", { snmp.oid = %base, snmp.max_walk_results = max }, "walk stopped at result limit");
                break;
            }

            let vb = match self.transport.get_next(&current, auth).await {
                Ok(vb) => vb,
                Err(TransportError::Agent {
                    status: ErrorStatus::NoSuchName,
                    ..
                }) if auth.version == CommunityVersion::V1 => break,
                Err(source) => return Err(self.request_failed(Operation::GetNext, &current, source)),
            };

            if vb.value == Value::EndOfMibView || !vb.oid.starts_with(&base) {
                break;
            }

            tracker.check(&vb.oid).map_err(|reason| {
                tracing::warn!(target: "snmpclient::session", { snmp.oid = %vb.oid, %reason }, "walk aborted");
                Error::WalkAborted {
                    target: self.target.clone(),
                    oid: vb.oid.clone(),
                    reason,
                }
                .boxed()
            })?;

            tracing::trace!(target: "snmpclient::session", { snmp.oid = %vb.oid }, "walk row");
            current = vb.oid.clone();
            varbinds.push(vb);
        }

        tracing::debug!(target: "snmpclient::session", { snmp.oid = %base, snmp.rows = varbinds.len() }, "walk complete");
        Ok(ConceptualTable::new(name, base, varbinds))
    }

    fn read_auth(&self) -> Result<&AuthProfile> {
        match (&self.state, &self.read_profile) {
            (SessionState::Alive, Some(profile)) => Ok(profile),
            _ => Err(Error::NotAlive {
                target: self.target.clone(),
            }
            .boxed()),
        }
    }

    async fn request(
        &self,
        operation: Operation,
        oid: &Oid,
        fut: impl Future<Output = std::result::Result<VarBind, TransportError>>,
    ) -> Result<VarBind> {
        tracing::debug!(target: "snmpclient::session", { snmp.operation = %operation, snmp.oid = %oid }, "sending request");
        fut.await
            .map_err(|source| self.request_failed(operation, oid, source))
    }

    fn request_failed(&self, operation: Operation, oid: &Oid, source: TransportError) -> Box<Error> {
        tracing::debug!(target: "snmpclient::session", { snmp.operation = %operation, snmp.oid = %oid, error = %source }, "request failed");
        Error::RequestFailed {
            target: self.target.clone(),
            operation,
            oid: oid.clone(),
            source,
        }
        .boxed()
    }
}
