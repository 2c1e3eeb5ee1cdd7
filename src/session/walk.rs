//! Table walk support.

use std::collections::HashSet;

use crate::error::WalkAbortReason;
use crate::oid::Oid;
use crate::value::Value;
use crate::varbind::VarBind;

/// OID ordering behavior during walk operations.
///
/// SNMP walks rely on agents returning OIDs in strictly increasing
/// lexicographic order. However, some buggy agents violate this requirement,
/// returning OIDs out of order or even repeating OIDs (which would cause
/// infinite loops).
///
/// - [`Strict`](Self::Strict) (default): aborts with
///   [`WalkAbortReason::NonIncreasing`] on any violation.
///
/// - [`AllowNonIncreasing`](Self::AllowNonIncreasing): tolerates out-of-order
///   OIDs but tracks all seen OIDs, aborting with [`WalkAbortReason::Cycle`]
///   if the same OID appears twice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OidOrdering {
    /// Require strictly increasing OIDs (default).
    #[default]
    Strict,

    /// Allow non-increasing OIDs, with cycle detection.
    ///
    /// **Warning**: This uses O(n) memory where n = number of walk results.
    /// Pair it with [`SessionBuilder::max_walk_results`] to bound memory
    /// usage. Cycle detection only catches duplicate OIDs; a pathological
    /// agent could still return an infinite sequence of unique OIDs within
    /// the subtree.
    ///
    /// [`SessionBuilder::max_walk_results`]: crate::SessionBuilder::max_walk_results
    AllowNonIncreasing,
}

/// Tracks returned OIDs to detect misbehaving agents.
///
/// - `Strict`: O(1) memory, compares against previous OID
/// - `Relaxed`: O(n) memory, tracks all seen OIDs in a HashSet
pub(crate) enum OidTracker {
    Strict { last: Option<Oid> },
    Relaxed { seen: HashSet<Oid> },
}

impl OidTracker {
    pub(crate) fn new(ordering: OidOrdering) -> Self {
        match ordering {
            OidOrdering::Strict => OidTracker::Strict { last: None },
            OidOrdering::AllowNonIncreasing => OidTracker::Relaxed {
                seen: HashSet::new(),
            },
        }
    }

    /// Check if OID is valid according to ordering rules.
    pub(crate) fn check(&mut self, oid: &Oid) -> Result<(), WalkAbortReason> {
        match self {
            OidTracker::Strict { last } => {
                if let Some(prev) = last.as_ref()
                    && oid <= prev
                {
                    return Err(WalkAbortReason::NonIncreasing);
                }
                *last = Some(oid.clone());
                Ok(())
            }
            OidTracker::Relaxed { seen } => {
                if !seen.insert(oid.clone()) {
                    return Err(WalkAbortReason::Cycle);
                }
                Ok(())
            }
        }
    }
}

/// The varbinds under one column (or any subtree), in agent order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConceptualTable {
    /// The name the walk was requested with.
    pub name: String,
    /// Root of the walked subtree.
    pub base: Oid,
    /// Returned varbinds.
    pub varbinds: Vec<VarBind>,
}

impl ConceptualTable {
    /// Create a table from walk results.
    pub fn new(name: impl Into<String>, base: Oid, varbinds: Vec<VarBind>) -> Self {
        Self {
            name: name.into(),
            base,
            varbinds,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.varbinds.len()
    }

    /// Whether the subtree was empty.
    pub fn is_empty(&self) -> bool {
        self.varbinds.is_empty()
    }

    /// Iterate over the varbinds.
    pub fn iter(&self) -> std::slice::Iter<'_, VarBind> {
        self.varbinds.iter()
    }

    /// Iterate over `(index, value)` pairs, the index being every arc past
    /// the base.
    pub fn rows(&self) -> impl Iterator<Item = (Oid, &Value)> + '_ {
        self.varbinds.iter().map(move |vb| {
            let index = vb
                .oid
                .strip_prefix(&self.base)
                .unwrap_or_else(|| vb.oid.clone());
            (index, &vb.value)
        })
    }
}

impl IntoIterator for ConceptualTable {
    type Item = VarBind;
    type IntoIter = std::vec::IntoIter<VarBind>;

    fn into_iter(self) -> Self::IntoIter {
        self.varbinds.into_iter()
    }
}

impl<'a> IntoIterator for &'a ConceptualTable {
    type Item = &'a VarBind;
    type IntoIter = std::slice::Iter<'a, VarBind>;

    fn into_iter(self) -> Self::IntoIter {
        self.varbinds.iter()
    }
}
