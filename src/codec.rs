//! Symbolic name <-> OID translation.

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::mib::SchemaRegistry;
use crate::name::Name;
use crate::oid::Oid;

/// Translates between [`Name`]s and [`Oid`]s using a shared registry.
///
/// Cloning is cheap; clones share the registry.
///
/// ```
/// use std::sync::Arc;
/// use snmpclient::{Name, OidCodec, SchemaRegistry, oid};
///
/// let codec = OidCodec::new(Arc::new(SchemaRegistry::new()));
///
/// // IF-MIB is loaded on first use
/// let name = Name::parse("IF-MIB::ifDescr.5").unwrap();
/// let oid = codec.to_oid(&name).unwrap();
/// assert_eq!(oid, oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 2, 5));
/// assert_eq!(codec.to_name(&oid).unwrap(), "IF-MIB::ifDescr.5");
/// ```
#[derive(Debug, Clone)]
pub struct OidCodec {
    registry: Arc<SchemaRegistry>,
}

/// Diagnostic breakdown of an OID, as produced by [`OidCodec::describe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description {
    /// Labels of every registered ancestor, root first.
    pub path: Vec<Box<str>>,
    /// Symbol of the deepest registered node.
    pub symbol: Box<str>,
    /// Module defining `symbol`.
    pub module: Box<str>,
    /// OID of the deepest registered node.
    pub base: Oid,
    /// Remaining arcs (the instance index).
    pub suffix: Oid,
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.module, self.symbol)?;
        if !self.suffix.is_empty() {
            write!(f, ".{}", self.suffix)?;
        }
        write!(f, " (")?;
        for (i, label) in self.path.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", label)?;
        }
        write!(f, ")")
    }
}

impl OidCodec {
    /// Create a codec over `registry`.
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self { registry }
    }

    /// The registry this codec resolves against.
    pub fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.registry
    }

    /// Resolve a symbolic name to its full OID.
    ///
    /// The name's module is loaded on demand. A module that cannot be
    /// found, or that does not define the symbol, yields
    /// [`Error::UnresolvedSymbol`]; a module file that exists but cannot be
    /// read or parsed reports that failure instead.
    pub fn to_oid(&self, name: &Name) -> Result<Oid> {
        let module = name.module();
        let symbol = name.symbol();

        if !self.registry.is_loaded(module) {
            match self.registry.load_module(module) {
                Ok(_) => {}
                Err(e) if matches!(*e, Error::ModuleNotFound { .. }) => {
                    tracing::debug!(target: "snmpclient::codec", { snmp.module = module }, "module not found during resolution");
                    return Err(Error::unresolved(module, symbol));
                }
                Err(e) => return Err(e),
            }
        }

        let base = self
            .registry
            .resolve(module, symbol)
            .ok_or_else(|| Error::unresolved(module, symbol))?;
        let oid = base.concat(name.index());
        tracing::trace!(target: "snmpclient::codec", { snmp.name = %name, snmp.oid = %oid }, "resolved name");
        Ok(oid)
    }

    /// Resolve either a symbolic name or a dotted numeric OID.
    ///
    /// ```
    /// # use std::sync::Arc;
    /// # use snmpclient::{OidCodec, SchemaRegistry, oid};
    /// let codec = OidCodec::new(Arc::new(SchemaRegistry::new()));
    /// assert_eq!(codec.resolve("1.3.6.1.2.1.1.5.0").unwrap(), oid!(1, 3, 6, 1, 2, 1, 1, 5, 0));
    /// assert_eq!(codec.resolve("SNMPv2-MIB::sysName.0").unwrap(), oid!(1, 3, 6, 1, 2, 1, 1, 5, 0));
    /// ```
    pub fn resolve(&self, input: &str) -> Result<Oid> {
        if input.contains("::") {
            self.to_oid(&Name::parse(input)?)
        } else {
            Oid::parse(input)
        }
    }

    /// Render an OID as `MODULE::symbol[.suffix]` using the longest
    /// registered prefix.
    pub fn to_name(&self, oid: &Oid) -> Result<String> {
        let loc = self
            .registry
            .reverse_resolve(oid)
            .ok_or_else(|| Error::UnknownOid { oid: oid.clone() }.boxed())?;

        let name = Name::new(loc.module, loc.symbol, loc.suffix);
        Ok(name.to_string())
    }

    /// Break an OID down into module, leaf symbol, ancestor path and
    /// numeric suffix.
    pub fn describe(&self, oid: &Oid) -> Result<Description> {
        let loc = self
            .registry
            .reverse_resolve(oid)
            .ok_or_else(|| Error::UnknownOid { oid: oid.clone() }.boxed())?;

        Ok(Description {
            path: loc.path,
            symbol: loc.symbol,
            module: loc.module,
            base: loc.base,
            suffix: loc.suffix,
        })
    }
}
