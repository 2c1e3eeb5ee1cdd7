//! Commonly used types.
//!
//! ```rust
//! use snmpclient::prelude::*;
//! ```

pub use crate::codec::OidCodec;
pub use crate::error::{Error, Result};
pub use crate::mib::SchemaRegistry;
pub use crate::name::Name;
pub use crate::oid;
pub use crate::oid::Oid;
pub use crate::session::{AuthProfile, Session};
pub use crate::table::join_tables;
pub use crate::transport::Transport;
pub use crate::value::{SetValue, Value};
pub use crate::varbind::VarBind;
