//! Table join tests against an in-memory agent.

mod common;

use snmpclient::table::join_tables;
use snmpclient::{Error, Oid, RowLabel, Value, oid};

#[tokio::test]
async fn explicit_index_labels_rows_by_value() {
    let session = common::session(common::agent(common::loopback_and_eth0())).await;

    let rows = join_tables(&session, Some("IF-MIB::ifDescr"), &["IF-MIB::ifInOctets"])
        .await
        .unwrap();

    assert_eq!(rows.index_len(), 1);
    assert_eq!(rows.len(), 2);
    assert_eq!(
        rows.get_by_value(&Value::from("lo")),
        Some(&[Value::Counter32(100)][..])
    );
    assert_eq!(
        rows.get_by_value(&Value::from("eth0")),
        Some(&[Value::Counter32(200)][..])
    );

    let map = rows.into_map();
    assert_eq!(
        map[&RowLabel::Value(Value::from("eth0"))],
        vec![Value::Counter32(200)]
    );
}

#[tokio::test]
async fn explicit_index_keeps_request_order() {
    let session = common::session(common::agent(common::interface_table(3))).await;

    let rows = join_tables(
        &session,
        Some("IF-MIB::ifDescr"),
        &["IF-MIB::ifInOctets", "IF-MIB::ifMtu"],
    )
    .await
    .unwrap();

    let labels: Vec<_> = rows.iter().map(|row| row.label.to_string()).collect();
    assert_eq!(labels, ["eth0", "eth1", "eth2"]);

    let row = rows.get(&RowLabel::Value(Value::from("eth2"))).unwrap();
    assert_eq!(row.index, oid!(3));
    assert_eq!(row.values, [Value::Counter32(300), Value::Integer(1500)]);
}

#[tokio::test]
async fn inferred_index_uses_oid_suffix() {
    let session = common::session(common::agent(common::interface_table(5))).await;

    let rows = join_tables(&session, None, &["IF-MIB::ifDescr", "IF-MIB::ifInOctets"])
        .await
        .unwrap();

    assert_eq!(rows.index_len(), 1);
    assert_eq!(rows.len(), 5);
    assert_eq!(
        rows.get_by_index(&oid!(5)),
        Some(&[Value::from("eth4"), Value::Counter32(500)][..])
    );
    assert_eq!(
        rows.get(&RowLabel::Index(oid!(1))).map(|row| row.values.len()),
        Some(2)
    );
}

/// ipAddrTable rows are indexed by a four-arc IPv4 address.
#[tokio::test]
async fn inferred_multi_arc_index() {
    let session = common::session(common::agent(common::ip_addr_table())).await;

    let rows = join_tables(
        &session,
        None,
        &["IP-MIB::ipAdEntIfIndex", "IP-MIB::ipAdEntNetMask"],
    )
    .await
    .unwrap();

    assert_eq!(rows.index_len(), 4);
    let indexes: Vec<Oid> = rows.iter().map(|row| row.index.clone()).collect();
    assert_eq!(indexes, [oid!(10, 0, 0, 1), oid!(127, 0, 0, 1)]);
    assert_eq!(
        rows.get_by_index(&oid!(127, 0, 0, 1)),
        Some(&[Value::Integer(1), Value::IpAddress([255, 0, 0, 0])][..])
    );
}

#[tokio::test]
async fn unmatched_column_row_fails() {
    let agent = common::agent(common::loopback_and_eth0());
    agent.insert(oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 10, 3), Value::Counter32(300));
    let session = common::session(agent).await;

    let err = join_tables(&session, Some("IF-MIB::ifDescr"), &["IF-MIB::ifInOctets"])
        .await
        .unwrap_err();
    match *err {
        Error::UnmatchedIndex {
            ref table,
            ref index,
        } => {
            assert_eq!(&**table, "IF-MIB::ifInOctets");
            assert_eq!(index, &oid!(3));
        }
        ref other => panic!("unexpected error {other}"),
    }
}

/// A column missing a row gets noSuchInstance in that slot; later columns
/// stay in their own slots.
#[tokio::test]
async fn sparse_column_does_not_shift_values() {
    let agent = common::agent(common::loopback_and_eth0());
    agent.insert(oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 4, 1), Value::Integer(65536));
    let session = common::session(agent).await;

    let rows = join_tables(
        &session,
        Some("IF-MIB::ifDescr"),
        &["IF-MIB::ifMtu", "IF-MIB::ifInOctets"],
    )
    .await
    .unwrap();

    assert_eq!(
        rows.get_by_value(&Value::from("lo")),
        Some(&[Value::Integer(65536), Value::Counter32(100)][..])
    );
    assert_eq!(
        rows.get_by_value(&Value::from("eth0")),
        Some(&[Value::NoSuchInstance, Value::Counter32(200)][..])
    );
}

/// Index rows without column values stay in the result.
#[tokio::test]
async fn index_rows_without_columns() {
    let agent = common::agent(common::loopback_and_eth0());
    let session = common::session(agent).await;

    let rows = join_tables(&session, Some("IF-MIB::ifDescr"), &[]).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| row.values.is_empty()));
}

#[tokio::test]
async fn no_index_and_no_columns_is_empty() {
    let agent = common::agent(common::loopback_and_eth0());
    let session = common::session(agent.clone()).await;
    agent.clear_requests();

    let rows = join_tables(&session, None, &[]).await.unwrap();
    assert!(rows.is_empty());
    assert!(agent.requests().is_empty());
}

#[tokio::test]
async fn join_on_dead_session_fails() {
    let agent = common::agent(common::loopback_and_eth0());
    let session = snmpclient::SessionBuilder::new("192.0.2.1", 161)
        .read_profile(snmpclient::AuthProfile::v2c("unknown"))
        .connect(agent, common::codec())
        .await
        .unwrap();

    let err = join_tables(&session, Some("IF-MIB::ifDescr"), &["IF-MIB::ifInOctets"])
        .await
        .unwrap_err();
    assert!(matches!(*err, Error::NotAlive { .. }));
}
