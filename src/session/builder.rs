//! Session builder.

use crate::codec::OidCodec;
use crate::error::{Error, Result};
use crate::name::Name;
use crate::transport::Transport;

use super::{AuthProfile, OidOrdering, Session, SessionConfig, Target};

/// Builder for constructing sessions.
///
/// This is the entry point for opening a session over any [`Transport`]:
/// configure the target and candidates, then hand the transport to
/// [`connect`](Self::connect).
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use snmpclient::transport::MockTransport;
/// use snmpclient::{AuthProfile, OidCodec, OidOrdering, SchemaRegistry, SessionBuilder};
///
/// # async fn example() -> snmpclient::Result<()> {
/// let codec = OidCodec::new(Arc::new(SchemaRegistry::standard()?));
/// let _session = SessionBuilder::new("192.0.2.1", 161)
///     .read_profiles([AuthProfile::v2c("public"), AuthProfile::v1("public")])
///     .write_profile(AuthProfile::v2c("private"))
///     .oid_ordering(OidOrdering::AllowNonIncreasing)
///     .max_walk_results(10_000)
///     .connect(MockTransport::new(), codec)
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SessionBuilder {
    target: Target,
    config: SessionConfig,
}

impl SessionBuilder {
    /// Create a new session builder for `host:port`.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            target: Target::new(host, port),
            config: SessionConfig::default(),
        }
    }

    /// Replace the read candidates.
    ///
    /// Candidates are probed in order; the first one the agent answers is
    /// used for every read.
    pub fn read_profiles(mut self, profiles: impl IntoIterator<Item = AuthProfile>) -> Self {
        self.config.read_profiles = profiles.into_iter().collect();
        self
    }

    /// Append a read candidate.
    pub fn read_profile(mut self, profile: AuthProfile) -> Self {
        self.config.read_profiles.push(profile);
        self
    }

    /// Replace the write candidates. Only the first is used.
    pub fn write_profiles(mut self, profiles: impl IntoIterator<Item = AuthProfile>) -> Self {
        self.config.write_profiles = profiles.into_iter().collect();
        self
    }

    /// Append a write candidate.
    pub fn write_profile(mut self, profile: AuthProfile) -> Self {
        self.config.write_profiles.push(profile);
        self
    }

    /// Object fetched while probing (default: `SNMPv2-MIB::sysName.0`).
    ///
    /// Either a symbolic name or a dotted OID.
    pub fn liveness_object(mut self, name: impl Into<String>) -> Self {
        self.config.liveness_object = name.into();
        self
    }

    /// Set OID ordering behavior for walk operations (default: Strict).
    pub fn oid_ordering(mut self, ordering: OidOrdering) -> Self {
        self.config.oid_ordering = ordering;
        self
    }

    /// Set maximum results from a single walk operation (default: unlimited).
    ///
    /// Walk terminates normally when the limit is reached.
    pub fn max_walk_results(mut self, limit: usize) -> Self {
        self.config.max_walk_results = Some(limit);
        self
    }

    fn validate(&self) -> Result<()> {
        if self.target.host.is_empty() {
            return Err(Error::Config("target host is empty".into()).boxed());
        }
        if self.config.max_walk_results == Some(0) {
            return Err(Error::Config("max_walk_results must be at least 1".into()).boxed());
        }
        let liveness = &self.config.liveness_object;
        if liveness.contains("::") {
            Name::parse(liveness)?;
        }
        Ok(())
    }

    /// Build the session over `transport` and probe the read candidates.
    pub async fn connect<T: Transport>(self, transport: T, codec: OidCodec) -> Result<Session<T>> {
        self.validate()?;
        Session::new(self.target, transport, codec, self.config).await
    }
}
