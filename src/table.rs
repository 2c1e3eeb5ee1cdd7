//! Conceptual table joins.
//!
//! SNMP tables come back one column at a time. [`join_tables`] walks a set
//! of columns and stitches them back into rows, matching rows by the
//! trailing arcs of each instance OID.
//!
//! Two strategies pick the row set and labels:
//!
//! - **Explicit index**: an index column is walked first. Each row is keyed
//!   by the last arc of its OID and labelled with the index column's value
//!   (e.g. `ifDescr` values label interface rows).
//! - **Inferred**: the first requested column defines the rows. The index
//!   length is taken from its first row, and rows are labelled with their
//!   OID suffix.
//!
//! [`TableJoin`] holds the matching logic and works on already-walked
//! tables, so it can be driven without a session.

use std::collections::HashMap;
use std::fmt;

use crate::error::{Error, Result};
use crate::oid::Oid;
use crate::session::{ConceptualTable, Session};
use crate::transport::Transport;
use crate::value::Value;

/// How a joined row is identified.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowLabel {
    /// The row's value in the index column (explicit strategy).
    Value(Value),
    /// The row's OID suffix (inferred strategy).
    Index(Oid),
}

impl fmt::Display for RowLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => write!(f, "{}", value),
            Self::Index(index) => write!(f, "{}", index),
        }
    }
}

/// One reconstructed row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedRow {
    /// Row label.
    pub label: RowLabel,
    /// Row index (trailing arcs shared by every column of the row).
    pub index: Oid,
    /// Column values in request order.
    pub values: Vec<Value>,
}

/// Result of a join, in index-table (or first-column) row order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JoinedRows {
    index_len: usize,
    rows: Vec<JoinedRow>,
}

impl JoinedRows {
    /// Number of trailing arcs used to match rows.
    pub fn index_len(&self) -> usize {
        self.index_len
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no rows were found.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over rows in order.
    pub fn iter(&self) -> std::slice::Iter<'_, JoinedRow> {
        self.rows.iter()
    }

    /// First row with the given label.
    pub fn get(&self, label: &RowLabel) -> Option<&JoinedRow> {
        self.rows.iter().find(|row| &row.label == label)
    }

    /// Values of the row whose index-column value is `value`.
    ///
    /// ```
    /// # use snmpclient::table::TableJoin;
    /// # use snmpclient::session::ConceptualTable;
    /// # use snmpclient::{Value, VarBind, oid};
    /// let index = ConceptualTable::new("IF-MIB::ifDescr", oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 2), vec![
    ///     VarBind::new(oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 2, 1), Value::from("lo")),
    /// ]);
    /// let rows = TableJoin::explicit(&index).finish();
    /// assert_eq!(rows.get_by_value(&Value::from("lo")), Some(&[][..]));
    /// ```
    pub fn get_by_value(&self, value: &Value) -> Option<&[Value]> {
        self.rows
            .iter()
            .find(|row| matches!(&row.label, RowLabel::Value(v) if v == value))
            .map(|row| row.values.as_slice())
    }

    /// Values of the row with the given index.
    pub fn get_by_index(&self, index: &Oid) -> Option<&[Value]> {
        self.rows
            .iter()
            .find(|row| &row.index == index)
            .map(|row| row.values.as_slice())
    }

    /// Consume into the rows.
    pub fn into_rows(self) -> Vec<JoinedRow> {
        self.rows
    }

    /// Label-to-values map. When labels repeat, the last row wins.
    pub fn into_map(self) -> HashMap<RowLabel, Vec<Value>> {
        self.rows
            .into_iter()
            .map(|row| (row.label, row.values))
            .collect()
    }
}

impl IntoIterator for JoinedRows {
    type Item = JoinedRow;
    type IntoIter = std::vec::IntoIter<JoinedRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a JoinedRows {
    type Item = &'a JoinedRow;
    type IntoIter = std::slice::Iter<'a, JoinedRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Row accumulator for a join in progress.
#[derive(Debug, Clone)]
pub struct TableJoin {
    index_len: usize,
    rows: Vec<JoinedRow>,
    positions: HashMap<Oid, usize>,
}

impl TableJoin {
    /// Start a join keyed by the last arc of each row of `index`, labelled
    /// with the index column's values.
    pub fn explicit(index: &ConceptualTable) -> Self {
        let mut join = Self::with_index_len(1);
        for vb in index {
            let key = vb.oid.suffix(1);
            join.push_row(RowLabel::Value(vb.value.clone()), key, Vec::new());
        }
        tracing::debug!(target: "snmpclient::table", { snmp.table = %index.name, snmp.rows = join.rows.len() }, "index table loaded");
        join
    }

    /// Start a join from the first column, labelling rows by OID suffix.
    ///
    /// The index length is taken from the first row only. Rows whose
    /// suffix length differs are still keyed with that length, and a
    /// warning is logged.
    pub fn inferred(first: &ConceptualTable) -> Self {
        let base_len = first.base.len();
        let index_len = first
            .varbinds
            .first()
            .map_or(1, |vb| vb.oid.len().saturating_sub(base_len).max(1));

        let mut join = Self::with_index_len(index_len);
        for vb in first {
            let actual = vb.oid.len().saturating_sub(base_len);
            if actual != index_len {
                tracing::warn!(target: "snmpclient::table", { snmp.table = %first.name, snmp.oid = %vb.oid, snmp.index_len = index_len, snmp.actual_len = actual }, "row index length differs from first row");
            }
            let key = vb.oid.suffix(index_len);
            join.push_row(RowLabel::Index(key.clone()), key, vec![vb.value.clone()]);
        }
        tracing::debug!(target: "snmpclient::table", { snmp.table = %first.name, snmp.rows = join.rows.len(), snmp.index_len = index_len }, "inferred row index");
        join
    }

    fn with_index_len(index_len: usize) -> Self {
        Self {
            index_len,
            rows: Vec::new(),
            positions: HashMap::new(),
        }
    }

    fn push_row(&mut self, label: RowLabel, key: Oid, values: Vec<Value>) {
        tracing::trace!(target: "snmpclient::table", { snmp.index = %key, %label }, "row");
        self.positions.insert(key.clone(), self.rows.len());
        self.rows.push(JoinedRow {
            label,
            index: key,
            values,
        });
    }

    /// Trailing arcs used to match rows.
    pub fn index_len(&self) -> usize {
        self.index_len
    }

    /// Append one column, one value per row.
    ///
    /// Every row of `column` must match an existing row, and no row may be
    /// matched twice. Rows the column lacks get [`Value::NoSuchInstance`] so
    /// each row keeps one slot per column. On error the join is unchanged.
    pub fn add_column(&mut self, column: &ConceptualTable) -> Result<()> {
        let mut slots: Vec<Option<&Value>> = vec![None; self.rows.len()];
        for vb in column {
            let key = vb.oid.suffix(self.index_len);
            let Some(&pos) = self.positions.get(&key) else {
                tracing::debug!(target: "snmpclient::table", { snmp.table = %column.name, snmp.index = %key }, "unmatched row index");
                return Err(Error::UnmatchedIndex {
                    table: column.name.as_str().into(),
                    index: key,
                }
                .boxed());
            };
            if slots[pos].replace(&vb.value).is_some() {
                tracing::debug!(target: "snmpclient::table", { snmp.table = %column.name, snmp.index = %key }, "duplicate row index");
                return Err(Error::DuplicateIndex {
                    table: column.name.as_str().into(),
                    index: key,
                }
                .boxed());
            }
        }

        for (row, slot) in self.rows.iter_mut().zip(slots) {
            match slot {
                Some(value) => row.values.push(value.clone()),
                None => {
                    tracing::trace!(target: "snmpclient::table", { snmp.table = %column.name, snmp.index = %row.index }, "column has no value for row");
                    row.values.push(Value::NoSuchInstance);
                }
            }
        }
        Ok(())
    }

    /// Finish the join.
    pub fn finish(self) -> JoinedRows {
        JoinedRows {
            index_len: self.index_len,
            rows: self.rows,
        }
    }
}

/// Walk `columns` (and `index`, if given) and join them into rows.
///
/// With an index table, rows come from it and are labelled with its values;
/// every column is matched on the last arc. Without one, the first column
/// defines the rows and their index length. Column values appear in the
/// order the columns were requested, one per column: a row a column lacks
/// holds [`Value::NoSuchInstance`] there.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use snmpclient::table::join_tables;
/// use snmpclient::transport::MockTransport;
/// use snmpclient::{AuthProfile, OidCodec, SchemaRegistry, SessionBuilder, Value, oid};
///
/// # async fn example() -> snmpclient::Result<()> {
/// let agent = MockTransport::with_objects([
///     (oid!(1, 3, 6, 1, 2, 1, 1, 5, 0), Value::from("core-sw1")),
///     (oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 2, 1), Value::from("lo")),
///     (oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 2, 2), Value::from("eth0")),
///     (oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 10, 1), Value::Counter32(100)),
///     (oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 10, 2), Value::Counter32(200)),
/// ]);
/// let codec = OidCodec::new(Arc::new(SchemaRegistry::standard()?));
/// let session = SessionBuilder::new("192.0.2.1", 161)
///     .read_profile(AuthProfile::v2c("public"))
///     .connect(agent, codec)
///     .await?;
///
/// let rows = join_tables(&session, Some("IF-MIB::ifDescr"), &["IF-MIB::ifInOctets"]).await?;
/// assert_eq!(rows.get_by_value(&Value::from("eth0")), Some(&[Value::Counter32(200)][..]));
/// # Ok(())
/// # }
/// ```
pub async fn join_tables<T: Transport>(
    session: &Session<T>,
    index: Option<&str>,
    columns: &[&str],
) -> Result<JoinedRows> {
    let (mut join, rest) = match index {
        Some(index) => {
            let table = session.walk_table(index).await?;
            (TableJoin::explicit(&table), columns)
        }
        None => match columns.split_first() {
            Some((first, rest)) => {
                let table = session.walk_table(first).await?;
                (TableJoin::inferred(&table), rest)
            }
            None => return Ok(JoinedRows::default()),
        },
    };

    for column in rest {
        let table = session.walk_table(column).await?;
        join.add_column(&table)?;
    }

    let rows = join.finish();
    tracing::debug!(target: "snmpclient::table", { snmp.target = %session.target(), snmp.rows = rows.len(), snmp.columns = columns.len() }, "join complete");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;
    use crate::varbind::VarBind;

    fn column(name: &str, base: Oid, rows: &[(Oid, Value)]) -> ConceptualTable {
        let varbinds = rows
            .iter()
            .map(|(index, value)| VarBind::new(base.concat(index), value.clone()))
            .collect();
        ConceptualTable::new(name, base, varbinds)
    }

    fn if_descr() -> ConceptualTable {
        column(
            "IF-MIB::ifDescr",
            oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 2),
            &[(oid!(1), Value::from("lo")), (oid!(2), Value::from("eth0"))],
        )
    }

    fn if_in_octets() -> ConceptualTable {
        column(
            "IF-MIB::ifInOctets",
            oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 10),
            &[(oid!(1), Value::Counter32(100)), (oid!(2), Value::Counter32(200))],
        )
    }

    #[test]
    fn explicit_join_labels_by_value() {
        let mut join = TableJoin::explicit(&if_descr());
        join.add_column(&if_in_octets()).unwrap();
        let rows = join.finish();

        assert_eq!(rows.index_len(), 1);
        let map = rows.into_map();
        assert_eq!(map.len(), 2);
        assert_eq!(
            map[&RowLabel::Value(Value::from("lo"))],
            vec![Value::Counter32(100)]
        );
        assert_eq!(
            map[&RowLabel::Value(Value::from("eth0"))],
            vec![Value::Counter32(200)]
        );
    }

    #[test]
    fn explicit_join_without_columns_has_empty_rows() {
        let rows = TableJoin::explicit(&if_descr()).finish();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| row.values.is_empty()));
    }

    #[test]
    fn inferred_join_uses_multi_arc_index() {
        let base = oid!(1, 3, 6, 1, 2, 1, 4, 20, 1, 2);
        let if_index = column(
            "IP-MIB::ipAdEntIfIndex",
            base,
            &[
                (oid!(10, 0, 0, 1), Value::Integer(2)),
                (oid!(127, 0, 0, 1), Value::Integer(1)),
            ],
        );
        let mask = column(
            "IP-MIB::ipAdEntNetMask",
            oid!(1, 3, 6, 1, 2, 1, 4, 20, 1, 3),
            &[
                (oid!(10, 0, 0, 1), Value::IpAddress([255, 255, 255, 0])),
                (oid!(127, 0, 0, 1), Value::IpAddress([255, 0, 0, 0])),
            ],
        );

        let mut join = TableJoin::inferred(&if_index);
        assert_eq!(join.index_len(), 4);
        join.add_column(&mask).unwrap();
        let rows = join.finish();

        assert_eq!(
            rows.get_by_index(&oid!(127, 0, 0, 1)),
            Some(&[Value::Integer(1), Value::IpAddress([255, 0, 0, 0])][..])
        );
        let labels: Vec<_> = rows.iter().map(|row| row.label.to_string()).collect();
        assert_eq!(labels, ["10.0.0.1", "127.0.0.1"]);
    }

    #[test]
    fn unmatched_index_names_table() {
        let mut join = TableJoin::explicit(&if_descr());
        let stray = column(
            "IF-MIB::ifInOctets",
            oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 10),
            &[(oid!(1), Value::Counter32(1)), (oid!(9), Value::Counter32(9))],
        );
        let err = join.add_column(&stray).unwrap_err();
        match *err {
            Error::UnmatchedIndex { ref table, ref index } => {
                assert_eq!(&**table, "IF-MIB::ifInOctets");
                assert_eq!(index, &oid!(9));
            }
            ref other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn sparse_column_keeps_slots_aligned() {
        let mtu = column(
            "IF-MIB::ifMtu",
            oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 4),
            &[(oid!(1), Value::Integer(65536))],
        );
        let mut join = TableJoin::explicit(&if_descr());
        join.add_column(&mtu).unwrap();
        join.add_column(&if_in_octets()).unwrap();
        let rows = join.finish();

        assert_eq!(
            rows.get_by_value(&Value::from("lo")),
            Some(&[Value::Integer(65536), Value::Counter32(100)][..])
        );
        assert_eq!(
            rows.get_by_value(&Value::from("eth0")),
            Some(&[Value::NoSuchInstance, Value::Counter32(200)][..])
        );
    }

    #[test]
    fn duplicate_index_is_rejected() {
        // Two address rows share the last arc when keyed by one arc
        let addrs = column(
            "IP-MIB::ipAdEntIfIndex",
            oid!(1, 3, 6, 1, 2, 1, 4, 20, 1, 2),
            &[
                (oid!(10, 0, 0, 1), Value::Integer(2)),
                (oid!(127, 0, 0, 1), Value::Integer(1)),
            ],
        );
        let mut join = TableJoin::explicit(&if_descr());
        let err = join.add_column(&addrs).unwrap_err();
        match *err {
            Error::DuplicateIndex { ref table, ref index } => {
                assert_eq!(&**table, "IP-MIB::ipAdEntIfIndex");
                assert_eq!(index, &oid!(1));
            }
            ref other => panic!("unexpected error {other}"),
        }

        // the failed column left no partial values behind
        join.add_column(&if_in_octets()).unwrap();
        let rows = join.finish();
        assert!(rows.iter().all(|row| row.values.len() == 1));
    }

    #[test]
    fn row_and_column_order_preserved() {
        let descr = column(
            "IF-MIB::ifDescr",
            oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 2),
            &[
                (oid!(3), Value::from("c")),
                (oid!(1), Value::from("a")),
                (oid!(2), Value::from("b")),
            ],
        );
        let mtu = column(
            "IF-MIB::ifMtu",
            oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 4),
            &[
                (oid!(1), Value::Integer(1500)),
                (oid!(2), Value::Integer(9000)),
                (oid!(3), Value::Integer(65536)),
            ],
        );
        let mut join = TableJoin::inferred(&descr);
        join.add_column(&mtu).unwrap();
        join.add_column(&descr).unwrap();
        let rows = join.finish();

        let indexes: Vec<_> = rows.iter().map(|row| row.index.clone()).collect();
        assert_eq!(indexes, [oid!(3), oid!(1), oid!(2)]);
        assert_eq!(
            rows.get_by_index(&oid!(3)),
            Some(&[Value::from("c"), Value::Integer(65536), Value::from("c")][..])
        );
    }

    #[test]
    fn empty_first_table_keeps_default_index_len() {
        let empty = ConceptualTable::new("IF-MIB::ifDescr", oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 2), Vec::new());
        let join = TableJoin::inferred(&empty);
        assert_eq!(join.index_len(), 1);
        assert!(join.finish().is_empty());
    }

    #[test]
    fn row_label_display() {
        assert_eq!(RowLabel::Value(Value::from("eth0")).to_string(), "eth0");
        assert_eq!(RowLabel::Index(oid!(10, 0, 0, 1)).to_string(), "10.0.0.1");
    }
}
