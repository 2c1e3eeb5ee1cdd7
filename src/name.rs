//! Symbolic object names.
//!
//! A [`Name`] is the textual form operators type: `IF-MIB::ifDescr.5`.
//! It pairs a module with one of its symbols and an optional instance index.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, NameErrorKind, Result};
use crate::oid::Oid;

/// A symbolic name: `MODULE::symbol` plus a numeric index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name {
    module: Box<str>,
    symbol: Box<str>,
    index: Oid,
}

impl Name {
    /// Build a name from its parts.
    pub fn new(module: impl Into<Box<str>>, symbol: impl Into<Box<str>>, index: Oid) -> Self {
        Self {
            module: module.into(),
            symbol: symbol.into(),
            index,
        }
    }

    /// Parse `MODULE::symbol` or `MODULE::symbol.i1.i2...`.
    ///
    /// ```
    /// use snmpclient::{Name, oid};
    ///
    /// let name = Name::parse("SNMPv2-MIB::sysName.0").unwrap();
    /// assert_eq!(name.module(), "SNMPv2-MIB");
    /// assert_eq!(name.symbol(), "sysName");
    /// assert_eq!(name.index(), &oid!(0));
    ///
    /// assert!(Name::parse("sysName.0").is_err());
    /// assert!(Name::parse("IF-MIB::ifDescr.x").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let (module, rest) = s
            .split_once("::")
            .ok_or_else(|| Error::invalid_name(s, NameErrorKind::MissingModule))?;
        if module.is_empty() {
            return Err(Error::invalid_name(s, NameErrorKind::MissingModule));
        }
        if rest.contains("::") {
            return Err(Error::invalid_name(s, NameErrorKind::TooManySeparators));
        }

        let (symbol, index) = match rest.split_once('.') {
            Some((symbol, index)) => (symbol, index),
            None => (rest, ""),
        };
        if symbol.is_empty() {
            return Err(Error::invalid_name(s, NameErrorKind::MissingSymbol));
        }

        let mut arcs = Vec::new();
        for part in index.split('.').filter(|p| !p.is_empty()) {
            let arc = part
                .parse()
                .map_err(|_| Error::invalid_name(s, NameErrorKind::InvalidArc))?;
            arcs.push(arc);
        }

        Ok(Self::new(module, symbol, Oid::new(arcs)))
    }

    /// Module name (e.g. `IF-MIB`).
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Symbol within the module (e.g. `ifDescr`).
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Trailing instance index; empty for a bare object.
    pub fn index(&self) -> &Oid {
        &self.index
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.module, self.symbol)?;
        if !self.index.is_empty() {
            write!(f, ".{}", self.index)?;
        }
        Ok(())
    }
}

impl FromStr for Name {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
