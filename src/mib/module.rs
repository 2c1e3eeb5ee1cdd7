//! OID index file parsing.
//!
//! A module definition is a flat list of `label oid` pairs plus optional
//! `IMPORTS` lines. This is the format produced by `snmptranslate -Tz`
//! (quoted) and the format of the built-in tables (unquoted).

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::oid::Oid;

/// A parsed module: imports first, then its objects in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ModuleDefinition {
    pub(crate) name: Box<str>,
    pub(crate) imports: Vec<Box<str>>,
    pub(crate) objects: Vec<(Box<str>, Oid)>,
}

impl ModuleDefinition {
    /// Parse the text of an OID index file for module `name`.
    pub(crate) fn parse(name: &str, source: &str) -> Result<Self> {
        let mut imports = Vec::new();
        let mut objects: Vec<(Box<str>, Oid)> = Vec::new();
        let mut labels: HashSet<&str> = HashSet::new();

        for (idx, raw) in source.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(rest) = line.strip_prefix("IMPORTS") {
                if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
                    return Err(malformed(name, line_no, "expected whitespace after IMPORTS"));
                }
                imports.extend(
                    rest.split(|c: char| c.is_whitespace() || c == ',')
                        .map(unquote)
                        .filter(|m| !m.is_empty())
                        .map(Box::from),
                );
                continue;
            }

            let mut fields = line.split_whitespace();
            let (Some(label), Some(dotted), None) = (fields.next(), fields.next(), fields.next())
            else {
                return Err(malformed(name, line_no, "expected '<label> <oid>'"));
            };

            let label = unquote(label);
            if !is_valid_label(label) {
                return Err(malformed(name, line_no, &format!("invalid label '{label}'")));
            }
            let dotted = unquote(dotted);
            let oid = Oid::parse(dotted)
                .map_err(|_| malformed(name, line_no, &format!("invalid OID '{dotted}'")))?;
            if oid.is_empty() {
                return Err(malformed(name, line_no, "empty OID"));
            }
            if !labels.insert(label) {
                return Err(malformed(name, line_no, &format!("duplicate label '{label}'")));
            }

            objects.push((label.into(), oid));
        }

        Ok(Self {
            name: name.into(),
            imports,
            objects,
        })
    }
}

fn unquote(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(s)
}

/// SMI descriptors are letters, digits and hyphens; `_` shows up in
/// vendor modules often enough to allow it.
fn is_valid_label(label: &str) -> bool {
    let mut chars = label.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Module names double as file names on the search path.
pub(crate) fn is_valid_module_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn malformed(module: &str, line: usize, reason: &str) -> Box<Error> {
    Error::MalformedModule {
        module: module.into(),
        line,
        reason: reason.into(),
    }
    .boxed()
}
