//! SNMP value types.
//!
//! The [`Value`] enum represents all SNMP data types including exceptions.
//! Every value carries its type implicitly in its variant; [`Value::kind`]
//! exposes that tag as a plain [`ValueKind`] so a SET can re-encode a new
//! value with exactly the type the agent already reports for the object.

use crate::oid::Oid;
use bytes::Bytes;
use std::fmt;
use std::net::Ipv4Addr;

/// SNMP value.
///
/// Represents all SNMP data types including SMIv2 types and exception values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Value {
    /// INTEGER / Integer32 (signed 32-bit)
    Integer(i32),

    /// OCTET STRING (arbitrary bytes)
    OctetString(Bytes),

    /// NULL
    Null,

    /// OBJECT IDENTIFIER
    ObjectIdentifier(Oid),

    /// IpAddress (4 bytes, big-endian)
    IpAddress([u8; 4]),

    /// Counter32 (unsigned 32-bit, wrapping)
    Counter32(u32),

    /// Gauge32 / Unsigned32 (unsigned 32-bit, non-wrapping)
    Gauge32(u32),

    /// TimeTicks (hundredths of seconds since epoch)
    TimeTicks(u32),

    /// Opaque (legacy, arbitrary bytes)
    Opaque(Bytes),

    /// Counter64 (unsigned 64-bit, wrapping). SNMPv2c only.
    Counter64(u64),

    /// noSuchObject exception - the requested OID exists in the MIB but has no value.
    NoSuchObject,

    /// noSuchInstance exception - the specific instance does not exist.
    NoSuchInstance,

    /// endOfMibView exception - end of the MIB has been reached.
    ///
    /// Returned by GETNEXT when there is nothing lexicographically greater
    /// than the requested OID. This is the normal termination of a walk.
    EndOfMibView,

    /// Unknown/unrecognized value type (for forward compatibility)
    Unknown { tag: u8, data: Bytes },
}

impl Value {
    /// The type tag of this value.
    ///
    /// ```
    /// use snmpclient::{Value, ValueKind};
    ///
    /// assert_eq!(Value::Counter32(7).kind(), ValueKind::Counter32);
    /// assert_eq!(Value::from("eth0").kind(), ValueKind::OctetString);
    /// ```
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Integer(_) => ValueKind::Integer,
            Value::OctetString(_) => ValueKind::OctetString,
            Value::Null => ValueKind::Null,
            Value::ObjectIdentifier(_) => ValueKind::ObjectIdentifier,
            Value::IpAddress(_) => ValueKind::IpAddress,
            Value::Counter32(_) => ValueKind::Counter32,
            Value::Gauge32(_) => ValueKind::Gauge32,
            Value::TimeTicks(_) => ValueKind::TimeTicks,
            Value::Opaque(_) => ValueKind::Opaque,
            Value::Counter64(_) => ValueKind::Counter64,
            Value::NoSuchObject => ValueKind::NoSuchObject,
            Value::NoSuchInstance => ValueKind::NoSuchInstance,
            Value::EndOfMibView => ValueKind::EndOfMibView,
            Value::Unknown { tag, .. } => ValueKind::Unknown(*tag),
        }
    }

    /// Try to get as i32.
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as u32.
    ///
    /// Returns `Some(u32)` for [`Value::Counter32`], [`Value::Gauge32`],
    /// [`Value::TimeTicks`], or non-negative [`Value::Integer`].
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Value::Counter32(v) | Value::Gauge32(v) | Value::TimeTicks(v) => Some(*v),
            Value::Integer(v) if *v >= 0 => Some(*v as u32),
            _ => None,
        }
    }

    /// Try to get as u64.
    ///
    /// Returns `Some(u64)` for [`Value::Counter64`], any 32-bit unsigned type,
    /// or non-negative [`Value::Integer`].
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Counter64(v) => Some(*v),
            Value::Counter32(v) | Value::Gauge32(v) | Value::TimeTicks(v) => Some(*v as u64),
            Value::Integer(v) if *v >= 0 => Some(*v as u64),
            _ => None,
        }
    }

    /// Try to get as bytes.
    ///
    /// Returns `Some(&[u8])` for [`Value::OctetString`] or [`Value::Opaque`].
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::OctetString(v) | Value::Opaque(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as string (UTF-8).
    ///
    /// ```
    /// use snmpclient::Value;
    /// use bytes::Bytes;
    ///
    /// let v = Value::OctetString(Bytes::from_static(b"Linux router1 5.4.0"));
    /// assert_eq!(v.as_str(), Some("Linux router1 5.4.0"));
    ///
    /// let v = Value::OctetString(Bytes::from_static(&[0xFF, 0xFE]));
    /// assert_eq!(v.as_str(), None);
    /// ```
    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
    }

    /// Try to get as OID.
    pub fn as_oid(&self) -> Option<&Oid> {
        match self {
            Value::ObjectIdentifier(oid) => Some(oid),
            _ => None,
        }
    }

    /// Try to get as IP address.
    pub fn as_ip(&self) -> Option<Ipv4Addr> {
        match self {
            Value::IpAddress(bytes) => Some(Ipv4Addr::from(*bytes)),
            _ => None,
        }
    }

    /// Check if this is an exception value.
    pub fn is_exception(&self) -> bool {
        matches!(
            self,
            Value::NoSuchObject | Value::NoSuchInstance | Value::EndOfMibView
        )
    }
}

/// Type tag of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Integer,
    OctetString,
    Null,
    ObjectIdentifier,
    IpAddress,
    Counter32,
    Gauge32,
    TimeTicks,
    Opaque,
    Counter64,
    NoSuchObject,
    NoSuchInstance,
    EndOfMibView,
    /// Unrecognized BER tag.
    Unknown(u8),
}

/// Why [`ValueKind::encode`] could not produce a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    /// The kind has no textual encoding (exceptions, NULL, OIDs, opaque data).
    Unsupported,
    /// The text is not a valid literal of the kind.
    Invalid,
}

impl ValueKind {
    /// Whether [`encode`](Self::encode) accepts this kind.
    pub fn is_settable(&self) -> bool {
        self.encode("0") != Err(EncodeError::Unsupported)
    }

    /// Encode textual input as a value of this kind.
    ///
    /// Integer kinds, counters, gauges, time-ticks, octet strings and IP
    /// addresses are encodable. Every other kind yields
    /// [`EncodeError::Unsupported`].
    ///
    /// ```
    /// use snmpclient::{Value, ValueKind};
    /// use snmpclient::value::EncodeError;
    ///
    /// assert_eq!(ValueKind::Counter32.encode("42"), Ok(Value::Counter32(42)));
    /// assert_eq!(ValueKind::IpAddress.encode("10.0.0.1"), Ok(Value::IpAddress([10, 0, 0, 1])));
    /// assert_eq!(ValueKind::Integer.encode("up"), Err(EncodeError::Invalid));
    /// assert_eq!(ValueKind::Opaque.encode("x"), Err(EncodeError::Unsupported));
    /// ```
    pub fn encode(self, input: &str) -> Result<Value, EncodeError> {
        match self {
            ValueKind::Integer => parse_number(input).map(Value::Integer),
            ValueKind::Counter32 => parse_number(input).map(Value::Counter32),
            ValueKind::Gauge32 => parse_number(input).map(Value::Gauge32),
            ValueKind::TimeTicks => parse_number(input).map(Value::TimeTicks),
            ValueKind::Counter64 => parse_number(input).map(Value::Counter64),
            ValueKind::OctetString => Ok(Value::OctetString(Bytes::copy_from_slice(
                input.as_bytes(),
            ))),
            ValueKind::IpAddress => input
                .trim()
                .parse::<Ipv4Addr>()
                .map(|addr| Value::IpAddress(addr.octets()))
                .map_err(|_| EncodeError::Invalid),
            ValueKind::Null
            | ValueKind::ObjectIdentifier
            | ValueKind::Opaque
            | ValueKind::NoSuchObject
            | ValueKind::NoSuchInstance
            | ValueKind::EndOfMibView
            | ValueKind::Unknown(_) => Err(EncodeError::Unsupported),
        }
    }
}

fn parse_number<N: std::str::FromStr>(input: &str) -> Result<N, EncodeError> {
    input.trim().parse().map_err(|_| EncodeError::Invalid)
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Integer => write!(f, "INTEGER"),
            ValueKind::OctetString => write!(f, "OCTET STRING"),
            ValueKind::Null => write!(f, "NULL"),
            ValueKind::ObjectIdentifier => write!(f, "OBJECT IDENTIFIER"),
            ValueKind::IpAddress => write!(f, "IpAddress"),
            ValueKind::Counter32 => write!(f, "Counter32"),
            ValueKind::Gauge32 => write!(f, "Gauge32"),
            ValueKind::TimeTicks => write!(f, "TimeTicks"),
            ValueKind::Opaque => write!(f, "Opaque"),
            ValueKind::Counter64 => write!(f, "Counter64"),
            ValueKind::NoSuchObject => write!(f, "noSuchObject"),
            ValueKind::NoSuchInstance => write!(f, "noSuchInstance"),
            ValueKind::EndOfMibView => write!(f, "endOfMibView"),
            ValueKind::Unknown(tag) => write!(f, "Unknown(tag=0x{:02X})", tag),
        }
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{}", v),
            Value::OctetString(data) => {
                // Try to display as string if it's valid UTF-8
                if let Ok(s) = std::str::from_utf8(data) {
                    write!(f, "{}", s)
                } else {
                    write!(f, "0x{}", hex(data))
                }
            }
            Value::Null => write!(f, "NULL"),
            Value::ObjectIdentifier(oid) => write!(f, "{}", oid),
            Value::IpAddress(addr) => {
                write!(f, "{}.{}.{}.{}", addr[0], addr[1], addr[2], addr[3])
            }
            Value::Counter32(v) => write!(f, "{}", v),
            Value::Gauge32(v) => write!(f, "{}", v),
            Value::TimeTicks(v) => {
                let secs = v / 100;
                let days = secs / 86400;
                let hours = (secs % 86400) / 3600;
                let mins = (secs % 3600) / 60;
                let s = secs % 60;
                write!(f, "{}d {}h {}m {}s", days, hours, mins, s)
            }
            Value::Opaque(data) => write!(f, "Opaque(0x{})", hex(data)),
            Value::Counter64(v) => write!(f, "{}", v),
            Value::NoSuchObject => write!(f, "noSuchObject"),
            Value::NoSuchInstance => write!(f, "noSuchInstance"),
            Value::EndOfMibView => write!(f, "endOfMibView"),
            Value::Unknown { tag, data } => {
                write!(f, "Unknown(tag=0x{:02X}, data=0x{})", tag, hex(data))
            }
        }
    }
}

/// Convenience conversions.
///
/// ```
/// use snmpclient::Value;
///
/// let v: Value = 42i32.into();
/// assert!(matches!(v, Value::Integer(42)));
///
/// let v: Value = "hello".into();
/// assert_eq!(v.as_str(), Some("hello"));
/// ```
impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::OctetString(Bytes::copy_from_slice(s.as_bytes()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::OctetString(Bytes::from(s))
    }
}

impl From<&[u8]> for Value {
    fn from(data: &[u8]) -> Self {
        Value::OctetString(Bytes::copy_from_slice(data))
    }
}

impl From<Oid> for Value {
    fn from(oid: Oid) -> Self {
        Value::ObjectIdentifier(oid)
    }
}

impl From<Ipv4Addr> for Value {
    fn from(addr: Ipv4Addr) -> Self {
        Value::IpAddress(addr.octets())
    }
}

impl From<Bytes> for Value {
    fn from(data: Bytes) -> Self {
        Value::OctetString(data)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Counter64(v)
    }
}

/// New value for a SET.
///
/// Text (including plain numbers) is encoded as whatever type the agent
/// currently reports for the object. A typed [`Value`] is sent unchanged
/// and must already have that type.
///
/// ```
/// use snmpclient::{SetValue, Value};
///
/// assert_eq!(SetValue::from(42), SetValue::Text("42".into()));
/// assert_eq!(SetValue::from("Lab 2"), SetValue::Text("Lab 2".into()));
/// assert_eq!(
///     SetValue::from(Value::TimeTicks(100)),
///     SetValue::Value(Value::TimeTicks(100))
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetValue {
    /// A value sent as-is.
    Value(Value),
    /// Text encoded with the object's current type.
    Text(String),
}

impl From<Value> for SetValue {
    fn from(value: Value) -> Self {
        SetValue::Value(value)
    }
}

impl From<&Value> for SetValue {
    fn from(value: &Value) -> Self {
        SetValue::Value(value.clone())
    }
}

impl From<&str> for SetValue {
    fn from(text: &str) -> Self {
        SetValue::Text(text.to_string())
    }
}

impl From<String> for SetValue {
    fn from(text: String) -> Self {
        SetValue::Text(text)
    }
}

impl From<&String> for SetValue {
    fn from(text: &String) -> Self {
        SetValue::Text(text.clone())
    }
}

macro_rules! set_value_from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for SetValue {
                fn from(n: $t) -> Self {
                    SetValue::Text(n.to_string())
                }
            }
        )*
    };
}

set_value_from_number!(i32, i64, u32, u64);

impl From<Ipv4Addr> for SetValue {
    fn from(addr: Ipv4Addr) -> Self {
        SetValue::Text(addr.to_string())
    }
}
