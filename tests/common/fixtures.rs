//! Standard test fixtures with realistic MIB data.

use snmpclient::{Oid, Value, oid};
use std::collections::BTreeMap;

// =============================================================================
// MIB data fixtures (for MockTransport)
// =============================================================================

/// Standard system MIB entries (1.3.6.1.2.1.1).
///
/// Returns OIDs for:
/// - sysDescr.0 (1.3.6.1.2.1.1.1.0)
/// - sysObjectID.0 (1.3.6.1.2.1.1.2.0)
/// - sysUpTime.0 (1.3.6.1.2.1.1.3.0)
/// - sysContact.0 (1.3.6.1.2.1.1.4.0)
/// - sysName.0 (1.3.6.1.2.1.1.5.0)
/// - sysLocation.0 (1.3.6.1.2.1.1.6.0)
/// - sysServices.0 (1.3.6.1.2.1.1.7.0)
pub fn system_mib() -> BTreeMap<Oid, Value> {
    let mut data = BTreeMap::new();

    data.insert(
        oid!(1, 3, 6, 1, 2, 1, 1, 1, 0),
        Value::OctetString("Test SNMP Agent".into()),
    );
    data.insert(
        oid!(1, 3, 6, 1, 2, 1, 1, 2, 0),
        Value::ObjectIdentifier(oid!(1, 3, 6, 1, 4, 1, 99999)),
    );
    data.insert(oid!(1, 3, 6, 1, 2, 1, 1, 3, 0), Value::TimeTicks(123456));
    data.insert(
        oid!(1, 3, 6, 1, 2, 1, 1, 4, 0),
        Value::OctetString("admin@test.local".into()),
    );
    data.insert(
        oid!(1, 3, 6, 1, 2, 1, 1, 5, 0),
        Value::OctetString("test-agent".into()),
    );
    data.insert(
        oid!(1, 3, 6, 1, 2, 1, 1, 6, 0),
        Value::OctetString("Test Lab".into()),
    );
    data.insert(oid!(1, 3, 6, 1, 2, 1, 1, 7, 0), Value::Integer(72));

    data
}

/// Interface table entries for walks and joins.
///
/// Creates `count` interface entries with ifIndex, ifDescr, ifType, ifMtu,
/// ifSpeed, ifPhysAddress, ifAdminStatus, ifOperStatus and ifInOctets.
/// Interface `i` is named `eth{i-1}` and has `i * 100` input octets.
pub fn interface_table(count: usize) -> BTreeMap<Oid, Value> {
    let mut data = BTreeMap::new();

    // ifNumber.0
    data.insert(
        oid!(1, 3, 6, 1, 2, 1, 2, 1, 0),
        Value::Integer(count as i32),
    );

    for i in 1..=count {
        let idx = i as u32;

        // ifIndex.{i}
        data.insert(
            oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 1, idx),
            Value::Integer(i as i32),
        );

        // ifDescr.{i}
        data.insert(
            oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 2, idx),
            Value::OctetString(format!("eth{}", i - 1).into()),
        );

        // ifType.{i} - ethernetCsmacd(6)
        data.insert(oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 3, idx), Value::Integer(6));

        // ifMtu.{i}
        data.insert(
            oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 4, idx),
            Value::Integer(1500),
        );

        // ifSpeed.{i} - 1 Gbps
        data.insert(
            oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 5, idx),
            Value::Gauge32(1_000_000_000),
        );

        // ifPhysAddress.{i}
        data.insert(
            oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 6, idx),
            Value::OctetString(vec![0x00, 0x11, 0x22, 0x33, 0x44, i as u8].into()),
        );

        // ifAdminStatus.{i} - up(1)
        data.insert(oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 7, idx), Value::Integer(1));

        // ifOperStatus.{i} - up(1)
        data.insert(oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 8, idx), Value::Integer(1));

        // ifInOctets.{i}
        data.insert(
            oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 10, idx),
            Value::Counter32(idx * 100),
        );
    }

    data
}

/// The two-interface host used by the join examples: `lo` (ifIndex 1,
/// 100 octets in) and `eth0` (ifIndex 2, 200 octets in).
pub fn loopback_and_eth0() -> BTreeMap<Oid, Value> {
    let mut data = BTreeMap::new();
    data.insert(oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 2, 1), Value::from("lo"));
    data.insert(oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 2, 2), Value::from("eth0"));
    data.insert(oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 10, 1), Value::Counter32(100));
    data.insert(oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 10, 2), Value::Counter32(200));
    data
}

/// IP address table (ipAddrTable) indexed by IPv4 address.
///
/// Rows: 10.0.0.1 on ifIndex 2 and 127.0.0.1 on ifIndex 1.
pub fn ip_addr_table() -> BTreeMap<Oid, Value> {
    let mut data = BTreeMap::new();
    for (addr, if_index, mask) in [
        ([10u32, 0, 0, 1], 2, [255u8, 255, 255, 0]),
        ([127, 0, 0, 1], 1, [255, 0, 0, 0]),
    ] {
        let index = Oid::from_slice(&addr);
        let column = |c: u32| oid!(1, 3, 6, 1, 2, 1, 4, 20, 1, c).concat(&index);
        let octets = [addr[0] as u8, addr[1] as u8, addr[2] as u8, addr[3] as u8];
        data.insert(column(1), Value::IpAddress(octets));
        data.insert(column(2), Value::Integer(if_index));
        data.insert(column(3), Value::IpAddress(mask));
    }
    data
}

/// Combine multiple fixture sets.
pub fn combined(fixtures: impl IntoIterator<Item = BTreeMap<Oid, Value>>) -> BTreeMap<Oid, Value> {
    let mut result = BTreeMap::new();
    for fixture in fixtures {
        result.extend(fixture);
    }
    result
}

// =============================================================================
// OID helper functions
// =============================================================================

/// sysName.0
pub fn sys_name() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 5, 0)
}

/// sysLocation.0
pub fn sys_location() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 6, 0)
}

/// sysUpTime.0
pub fn sys_uptime() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 3, 0)
}

/// sysObjectID.0
pub fn sys_object_id() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 2, 0)
}
