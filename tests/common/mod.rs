//! Shared test infrastructure for snmpclient.
//!
//! Provides fixtures and helpers to stand up a MockTransport-backed session.

// Allow dead code and unused imports since not all test files use all utilities
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod fixtures;

use std::collections::BTreeMap;
use std::sync::{Arc, Once};

use snmpclient::transport::{Access, MockTransport};
use snmpclient::{AuthProfile, Oid, OidCodec, SchemaRegistry, Session, SessionBuilder, Value};

pub use fixtures::{
    combined, interface_table, ip_addr_table, loopback_and_eth0, sys_location, sys_name,
    sys_object_id, sys_uptime, system_mib,
};

/// Read-only community accepted by [`agent`].
pub const COMMUNITY_RO: &str = "public";
/// Read-write community accepted by [`agent`].
pub const COMMUNITY_RW: &str = "private";

/// Install a test subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Codec over a registry with the standard modules loaded.
pub fn codec() -> OidCodec {
    OidCodec::new(Arc::new(
        SchemaRegistry::standard().expect("built-in modules load"),
    ))
}

/// In-memory agent holding `data` that answers v2c `public` (read-only)
/// and v2c `private` (read-write).
pub fn agent(data: BTreeMap<Oid, Value>) -> MockTransport {
    let agent = MockTransport::with_objects(data);
    agent.accept(AuthProfile::v2c(COMMUNITY_RO), Access::ReadOnly);
    agent.accept(AuthProfile::v2c(COMMUNITY_RW), Access::ReadWrite);
    agent
}

/// Alive session over `agent` reading with `public` and writing with `private`.
pub async fn session(agent: MockTransport) -> Session<MockTransport> {
    init_tracing();
    let session = SessionBuilder::new("192.0.2.1", 161)
        .read_profile(AuthProfile::v2c(COMMUNITY_RO))
        .write_profile(AuthProfile::v2c(COMMUNITY_RW))
        .connect(agent, codec())
        .await
        .expect("session construction");
    assert!(session.is_alive());
    session
}
