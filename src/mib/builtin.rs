//! Compiled-in module tables.

/// Modules loaded by [`SchemaRegistry::standard`](super::SchemaRegistry::standard).
pub const STANDARD_MODULES: &[&str] = &[
    "SNMPv2-SMI",
    "SNMPv2-MIB",
    "IF-MIB",
    "IP-MIB",
    "UDP-MIB",
    "HOST-RESOURCES-MIB",
    "FIBRE-CHANNEL-FE-MIB",
];

const SOURCES: &[(&str, &str)] = &[
    ("SNMPv2-SMI", include_str!("builtin/SNMPv2-SMI.oids")),
    ("SNMPv2-MIB", include_str!("builtin/SNMPv2-MIB.oids")),
    ("IF-MIB", include_str!("builtin/IF-MIB.oids")),
    ("IP-MIB", include_str!("builtin/IP-MIB.oids")),
    ("UDP-MIB", include_str!("builtin/UDP-MIB.oids")),
    (
        "HOST-RESOURCES-MIB",
        include_str!("builtin/HOST-RESOURCES-MIB.oids"),
    ),
    (
        "FIBRE-CHANNEL-FE-MIB",
        include_str!("builtin/FIBRE-CHANNEL-FE-MIB.oids"),
    ),
];

/// Source text of a built-in module.
pub(crate) fn source(name: &str) -> Option<&'static str> {
    SOURCES
        .iter()
        .find(|(module, _)| *module == name)
        .map(|(_, text)| *text)
}
