//! # snmpclient
//!
//! SNMP management client with MIB name resolution and conceptual table joins.
//!
//! ## Features
//!
//! - Symbolic names (`IF-MIB::ifDescr.5`) resolved to OIDs and back through
//!   a shared [`SchemaRegistry`]
//! - Read-community negotiation: candidates are probed in order and the
//!   first one the agent answers is kept
//! - Type-preserving SET: new values are encoded as the type the agent
//!   currently reports
//! - Table joins that rebuild rows from column walks, keyed by an explicit
//!   index column or by the common OID suffix
//! - Pluggable [`Transport`]; [`MockTransport`](transport::MockTransport)
//!   is an in-memory agent
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use snmpclient::table::join_tables;
//! use snmpclient::transport::{Access, MockTransport};
//! use snmpclient::{AuthProfile, OidCodec, SchemaRegistry, SessionBuilder, Value, oid};
//!
//! # async fn example() -> snmpclient::Result<()> {
//! let agent = MockTransport::with_objects([
//!     (oid!(1, 3, 6, 1, 2, 1, 1, 5, 0), Value::from("core-sw1")),
//!     (oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 2, 1), Value::from("lo")),
//!     (oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 10, 1), Value::Counter32(100)),
//! ]);
//! agent.accept(AuthProfile::v2c("public"), Access::ReadOnly);
//!
//! let codec = OidCodec::new(Arc::new(SchemaRegistry::standard()?));
//! let session = SessionBuilder::new("192.0.2.1", 161)
//!     .read_profiles([AuthProfile::v2c("private"), AuthProfile::v2c("public")])
//!     .connect(agent, codec)
//!     .await?;
//!
//! if session.is_alive() {
//!     println!("sysName: {}", session.get("SNMPv2-MIB::sysName.0").await?);
//!
//!     let rows = join_tables(&session, Some("IF-MIB::ifDescr"), &["IF-MIB::ifInOctets"]).await?;
//!     for row in &rows {
//!         println!("{}: {:?}", row.label, row.values);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod error;
pub mod mib;
pub mod name;
pub mod oid;
pub mod prelude;
pub mod session;
pub mod table;
pub mod transport;
pub mod value;
pub mod varbind;

// Re-exports for convenience
pub use codec::{Description, OidCodec};
pub use error::{Error, ErrorStatus, NameErrorKind, Result, WalkAbortReason};
pub use mib::{LoadStatus, NodeLocation, SchemaRegistry};
pub use name::Name;
pub use oid::Oid;
pub use session::{
    AuthProfile, CommunityVersion, ConceptualTable, OidOrdering, Session, SessionBuilder,
    SessionConfig, SessionState, Target,
};
pub use table::{JoinedRow, JoinedRows, RowLabel, TableJoin, join_tables};
pub use transport::{Operation, Transport, TransportError};
pub use value::{SetValue, Value, ValueKind};
pub use varbind::VarBind;
