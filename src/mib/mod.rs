//! Schema registry: symbol tables of loaded MIB modules.
//!
//! The registry maps `(module, symbol)` pairs to OIDs and OIDs back to the
//! node that covers them. It never parses SMI source; modules come from OID
//! index files on the search path or from the compiled-in table.
//!
//! ```
//! use snmpclient::mib::{LoadStatus, SchemaRegistry};
//! use snmpclient::oid;
//!
//! let registry = SchemaRegistry::new();
//! assert_eq!(registry.load_module("IF-MIB").unwrap(), LoadStatus::Loaded);
//! assert_eq!(registry.load_module("IF-MIB").unwrap(), LoadStatus::AlreadyLoaded);
//!
//! assert_eq!(
//!     registry.resolve("IF-MIB", "ifDescr"),
//!     Some(oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 2))
//! );
//! ```

mod builtin;
pub(crate) mod module;

pub use builtin::STANDARD_MODULES;

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{Error, Result};
use crate::oid::Oid;
use module::{ModuleDefinition, is_valid_module_name};

/// Outcome of [`SchemaRegistry::load_module`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// The module was registered by this call.
    Loaded,
    /// The module was already registered; nothing changed.
    AlreadyLoaded,
}

/// Where an OID sits in the registered tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeLocation {
    /// Module that registered the covering node.
    pub module: Box<str>,
    /// Symbol of the covering node.
    pub symbol: Box<str>,
    /// OID of the covering node.
    pub base: Oid,
    /// Arcs of the looked-up OID past `base`.
    pub suffix: Oid,
    /// Labels of every registered ancestor, root first, ending with `symbol`.
    pub path: Vec<Box<str>>,
}

#[derive(Debug, Clone)]
struct NodeLabel {
    module: Arc<str>,
    symbol: Box<str>,
}

#[derive(Debug, Default)]
struct RegistryState {
    search_paths: Vec<PathBuf>,
    /// Load order.
    loaded: Vec<Arc<str>>,
    symbols: HashMap<Arc<str>, HashMap<Box<str>, Oid>>,
    nodes: BTreeMap<Oid, NodeLabel>,
}

impl RegistryState {
    fn is_loaded(&self, module: &str) -> bool {
        self.symbols.contains_key(module)
    }

    fn register(&mut self, definition: ModuleDefinition) {
        let module: Arc<str> = Arc::from(definition.name);
        let mut table = HashMap::with_capacity(definition.objects.len());

        for (symbol, oid) in definition.objects {
            // First registration of an OID owns its reverse mapping.
            self.nodes.entry(oid.clone()).or_insert_with(|| NodeLabel {
                module: module.clone(),
                symbol: symbol.clone(),
            });
            table.insert(symbol, oid);
        }

        self.loaded.push(module.clone());
        self.symbols.insert(module, table);
    }
}

/// Registry of loaded MIB modules.
///
/// Create one per process (or per configuration) and share it through an
/// `Arc`. The registry only grows: modules are never unloaded, and loading a
/// module twice is a no-op.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    state: RwLock<RegistryState>,
}

impl SchemaRegistry {
    /// Empty registry with no search paths.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty registry that looks for modules in `paths`, in order, before
    /// falling back to the built-in table.
    pub fn with_search_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let registry = Self::new();
        registry.write().search_paths = paths.into_iter().map(Into::into).collect();
        registry
    }

    /// Registry with [`STANDARD_MODULES`] loaded.
    pub fn standard() -> Result<Self> {
        let registry = Self::new();
        registry.load_modules(STANDARD_MODULES)?;
        Ok(registry)
    }

    /// Append a directory to the search path.
    pub fn add_search_path(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        tracing::debug!(target: "snmpclient::mib", { path = %path.display() }, "adding MIB search path");
        self.write().search_paths.push(path);
    }

    /// Current search path, in lookup order.
    pub fn search_paths(&self) -> Vec<PathBuf> {
        self.read().search_paths.clone()
    }

    /// Load a module and, before it, everything it imports.
    ///
    /// Each search path directory is tried in order for `<name>.oids` and
    /// then `<name>`; the built-in table is consulted last.
    pub fn load_module(&self, name: &str) -> Result<LoadStatus> {
        let mut in_progress = Vec::new();
        self.load_recursive(name, &mut in_progress)
    }

    /// Load several modules in order. Already-loaded modules are skipped.
    pub fn load_modules<S: AsRef<str>>(&self, names: &[S]) -> Result<()> {
        for name in names {
            self.load_module(name.as_ref())?;
        }
        Ok(())
    }

    fn load_recursive(&self, name: &str, in_progress: &mut Vec<Box<str>>) -> Result<LoadStatus> {
        if self.is_loaded(name) || in_progress.iter().any(|m| &**m == name) {
            tracing::trace!(target: "snmpclient::mib", { snmp.module = name }, "module already loaded");
            return Ok(LoadStatus::AlreadyLoaded);
        }

        let definition = self.find_module(name)?;

        in_progress.push(name.into());
        for import in &definition.imports {
            self.load_recursive(import, in_progress)?;
        }
        in_progress.pop();

        let mut state = self.write();
        // Another thread may have won the race while the file was read.
        if state.is_loaded(name) {
            return Ok(LoadStatus::AlreadyLoaded);
        }
        let count = definition.objects.len();
        state.register(definition);
        drop(state);

        tracing::debug!(target: "snmpclient::mib", { snmp.module = name, snmp.symbol_count = count }, "loaded MIB module");
        Ok(LoadStatus::Loaded)
    }

    fn find_module(&self, name: &str) -> Result<ModuleDefinition> {
        if !is_valid_module_name(name) {
            return Err(Error::ModuleNotFound {
                module: name.into(),
            }
            .boxed());
        }

        for dir in self.search_paths() {
            for file in [format!("{name}.oids"), name.to_string()] {
                let path = dir.join(file);
                if path.is_file() {
                    tracing::trace!(target: "snmpclient::mib", { snmp.module = name, path = %path.display() }, "reading OID index file");
                    return read_module(name, &path);
                }
            }
        }

        match builtin::source(name) {
            Some(text) => ModuleDefinition::parse(name, text),
            None => Err(Error::ModuleNotFound {
                module: name.into(),
            }
            .boxed()),
        }
    }

    /// Whether `module` has been loaded.
    pub fn is_loaded(&self, module: &str) -> bool {
        self.read().is_loaded(module)
    }

    /// Loaded module names, in load order.
    pub fn loaded_modules(&self) -> Vec<String> {
        self.read().loaded.iter().map(|m| m.to_string()).collect()
    }

    /// OID of `module::symbol`, if that module is loaded and defines it.
    pub fn resolve(&self, module: &str, symbol: &str) -> Option<Oid> {
        self.read().symbols.get(module)?.get(symbol).cloned()
    }

    /// The registered node with the longest OID that prefixes `oid`.
    ///
    /// ```
    /// use snmpclient::mib::SchemaRegistry;
    /// use snmpclient::oid;
    ///
    /// let registry = SchemaRegistry::standard().unwrap();
    /// let loc = registry.reverse_resolve(&oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 2, 5)).unwrap();
    /// assert_eq!(&*loc.module, "IF-MIB");
    /// assert_eq!(&*loc.symbol, "ifDescr");
    /// assert_eq!(loc.suffix, oid!(5));
    /// ```
    pub fn reverse_resolve(&self, oid: &Oid) -> Option<NodeLocation> {
        let state = self.read();
        let arcs = oid.arcs();

        let mut path = Vec::new();
        let mut deepest: Option<(usize, &NodeLabel)> = None;
        for len in 1..=arcs.len() {
            if let Some(label) = state.nodes.get(&Oid::from_slice(&arcs[..len])) {
                path.push(label.symbol.clone());
                deepest = Some((len, label));
            }
        }

        let (len, label) = deepest?;
        Some(NodeLocation {
            module: Box::from(&*label.module),
            symbol: label.symbol.clone(),
            base: Oid::from_slice(&arcs[..len]),
            suffix: Oid::from_slice(&arcs[len..]),
            path,
        })
    }

    /// Total number of registered symbols across all modules.
    pub fn symbol_count(&self) -> usize {
        self.read().symbols.values().map(HashMap::len).sum()
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn read_module(name: &str, path: &Path) -> Result<ModuleDefinition> {
    let text = std::fs::read_to_string(path).map_err(|source| {
        Error::Io {
            path: path.to_path_buf(),
            source,
        }
        .boxed()
    })?;
    ModuleDefinition::parse(name, &text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;
    use std::fs;

    #[test]
    fn standard_registry_resolves_common_objects() {
        let registry = SchemaRegistry::standard().unwrap();
        assert_eq!(
            registry.resolve("SNMPv2-MIB", "sysName"),
            Some(oid!(1, 3, 6, 1, 2, 1, 1, 5))
        );
        assert_eq!(
            registry.resolve("IF-MIB", "ifName"),
            Some(oid!(1, 3, 6, 1, 2, 1, 31, 1, 1, 1, 1))
        );
        assert_eq!(registry.resolve("IF-MIB", "sysName"), None);
        assert_eq!(registry.resolve("NOT-LOADED", "x"), None);
        assert_eq!(registry.loaded_modules(), STANDARD_MODULES);
    }

    #[test]
    fn load_is_idempotent() {
        let registry = SchemaRegistry::new();
        assert_eq!(registry.load_module("UDP-MIB").unwrap(), LoadStatus::Loaded);
        let count = registry.symbol_count();
        assert_eq!(
            registry.load_module("UDP-MIB").unwrap(),
            LoadStatus::AlreadyLoaded
        );
        assert_eq!(registry.symbol_count(), count);
        assert_eq!(registry.loaded_modules(), vec!["SNMPv2-SMI", "UDP-MIB"]);
    }

    #[test]
    fn imports_load_first() {
        let registry = SchemaRegistry::new();
        registry.load_module("IF-MIB").unwrap();
        assert_eq!(
            registry.loaded_modules(),
            vec!["SNMPv2-SMI", "SNMPv2-MIB", "IF-MIB"]
        );
    }

    #[test]
    fn missing_module() {
        let registry = SchemaRegistry::new();
        let err = registry.load_module("NO-SUCH-MIB").unwrap_err();
        assert!(matches!(*err, Error::ModuleNotFound { ref module } if &**module == "NO-SUCH-MIB"));
        assert!(registry.loaded_modules().is_empty());
    }

    #[test]
    fn search_path_is_consulted_in_order() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        fs::write(first.path().join("ACME-MIB"), "acmeWidget 1.3.6.1.4.1.99999.1\n").unwrap();
        fs::write(
            second.path().join("ACME-MIB.oids"),
            "acmeWidget 1.3.6.1.4.1.99999.2\n",
        )
        .unwrap();

        let registry = SchemaRegistry::with_search_paths([first.path(), second.path()]);
        registry.load_module("ACME-MIB").unwrap();
        assert_eq!(
            registry.resolve("ACME-MIB", "acmeWidget"),
            Some(oid!(1, 3, 6, 1, 4, 1, 99999, 1))
        );
    }

    #[test]
    fn oids_extension_wins_within_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ACME-MIB"), "acmeWidget 1.3.6.1.4.1.99999.1\n").unwrap();
        fs::write(dir.path().join("ACME-MIB.oids"), "acmeWidget 1.3.6.1.4.1.99999.7\n").unwrap();

        let registry = SchemaRegistry::new();
        registry.add_search_path(dir.path());
        registry.load_module("ACME-MIB").unwrap();
        assert_eq!(
            registry.resolve("ACME-MIB", "acmeWidget"),
            Some(oid!(1, 3, 6, 1, 4, 1, 99999, 7))
        );
    }

    #[test]
    fn search_path_overrides_builtin() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("UDP-MIB.oids"), "udpCustom 1.3.6.1.2.1.7.99\n").unwrap();

        let registry = SchemaRegistry::with_search_paths([dir.path()]);
        registry.load_module("UDP-MIB").unwrap();
        assert!(registry.resolve("UDP-MIB", "udpNoPorts").is_none());
        assert!(registry.resolve("UDP-MIB", "udpCustom").is_some());
    }

    #[test]
    fn malformed_file_is_not_registered() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("BROKEN-MIB"), "good 1.3.6.1.4.1.1\nbad 1.x\n").unwrap();

        let registry = SchemaRegistry::with_search_paths([dir.path()]);
        let err = registry.load_module("BROKEN-MIB").unwrap_err();
        assert!(matches!(*err, Error::MalformedModule { line: 2, .. }));
        assert!(!registry.is_loaded("BROKEN-MIB"));
    }

    #[test]
    fn mutual_imports_terminate() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("A-MIB"), "IMPORTS B-MIB\na 1.3.6.1.4.1.1\n").unwrap();
        fs::write(dir.path().join("B-MIB"), "IMPORTS A-MIB\nb 1.3.6.1.4.1.2\n").unwrap();

        let registry = SchemaRegistry::with_search_paths([dir.path()]);
        registry.load_module("A-MIB").unwrap();
        assert_eq!(registry.loaded_modules(), vec!["B-MIB", "A-MIB"]);
    }

    #[test]
    fn reverse_resolve_longest_prefix_and_path() {
        let registry = SchemaRegistry::standard().unwrap();
        let loc = registry
            .reverse_resolve(&oid!(1, 3, 6, 1, 2, 1, 1, 5, 0))
            .unwrap();
        assert_eq!(&*loc.module, "SNMPv2-MIB");
        assert_eq!(&*loc.symbol, "sysName");
        assert_eq!(loc.base, oid!(1, 3, 6, 1, 2, 1, 1, 5));
        assert_eq!(loc.suffix, oid!(0));
        let path: Vec<&str> = loc.path.iter().map(|s| &**s).collect();
        assert_eq!(
            path,
            ["iso", "org", "dod", "internet", "mgmt", "mib-2", "system", "sysName"]
        );
    }

    #[test]
    fn reverse_resolve_unknown() {
        let registry = SchemaRegistry::standard().unwrap();
        assert!(registry.reverse_resolve(&oid!(2, 999)).is_none());
        assert!(registry.reverse_resolve(&Oid::empty()).is_none());
    }

    #[test]
    fn first_registration_owns_reverse_mapping() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ALIAS-MIB"), "ifLabel 1.3.6.1.2.1.2.2.1.2\n").unwrap();

        let registry = SchemaRegistry::with_search_paths([dir.path()]);
        registry.load_modules(&["IF-MIB", "ALIAS-MIB"]).unwrap();

        let loc = registry
            .reverse_resolve(&oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 2, 1))
            .unwrap();
        assert_eq!(&*loc.symbol, "ifDescr");
        assert_eq!(
            registry.resolve("ALIAS-MIB", "ifLabel"),
            registry.resolve("IF-MIB", "ifDescr")
        );
    }

    #[test]
    fn concurrent_loads_register_once() {
        let registry = Arc::new(SchemaRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.load_module("HOST-RESOURCES-MIB").unwrap())
            })
            .collect();
        let loaded = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|s| *s == LoadStatus::Loaded)
            .count();
        assert_eq!(loaded, 1);
        assert_eq!(
            registry.loaded_modules(),
            vec!["SNMPv2-SMI", "HOST-RESOURCES-MIB"]
        );
    }
}
