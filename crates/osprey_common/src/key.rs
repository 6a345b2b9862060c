use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single routing key value. This is the unit the sharding layer dispatches
/// on: the data-access layer extracts one field from an entity (named by the
/// strategy's `sharding_key_field`) and wraps it in a `ShardKey`.
///
/// Small enum, no heap alloc for fixed-size variants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShardKey {
    Int32(i32),
    Int64(i64),
    Text(String),
    /// UUID stored as a 128-bit value.
    Uuid(u128),
    /// Days since Unix epoch (1970-01-01).
    Date(i32),
    /// Microseconds since Unix epoch.
    Timestamp(i64),
    /// Arbitrary binary key.
    Bytes(Vec<u8>),
}

impl ShardKey {
    pub fn key_type(&self) -> KeyType {
        match self {
            ShardKey::Int32(_) => KeyType::Int32,
            ShardKey::Int64(_) => KeyType::Int64,
            ShardKey::Text(_) => KeyType::Text,
            ShardKey::Uuid(_) => KeyType::Uuid,
            ShardKey::Date(_) => KeyType::Date,
            ShardKey::Timestamp(_) => KeyType::Timestamp,
            ShardKey::Bytes(_) => KeyType::Bytes,
        }
    }

    /// Integer view of the key. Only Int32/Int64 coerce; everything else is
    /// a type mismatch the caller must surface.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ShardKey::Int32(v) => Some(*v as i64),
            ShardKey::Int64(v) => Some(*v),
            _ => None,
        }
    }

    /// Calendar year of a Date or Timestamp key, `None` for non-temporal keys.
    pub fn year(&self) -> Option<i32> {
        match self {
            ShardKey::Date(days) => {
                let epoch =
                    chrono::NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or(chrono::NaiveDate::MIN);
                epoch
                    .checked_add_signed(chrono::Duration::days(*days as i64))
                    .map(|d| d.year())
            }
            ShardKey::Timestamp(us) => {
                let secs = us.div_euclid(1_000_000);
                let nsecs = (us.rem_euclid(1_000_000) * 1000) as u32;
                chrono::DateTime::from_timestamp(secs, nsecs).map(|dt| dt.year())
            }
            _ => None,
        }
    }

    /// Date key from a calendar date. `None` for out-of-range inputs.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<ShardKey> {
        chrono::NaiveDate::from_ymd_opt(year, month, day).map(ShardKey::from)
    }

    /// Encode into a byte buffer for hashing. Uses a type tag + value
    /// encoding to avoid collisions across variants; strings and byte keys
    /// are NUL-terminated to avoid prefix collisions.
    pub fn encode_for_hash(&self, buf: &mut Vec<u8>) {
        match self {
            ShardKey::Int32(v) => {
                buf.push(0x01);
                buf.extend_from_slice(&v.to_le_bytes());
            }
            ShardKey::Int64(v) => {
                buf.push(0x02);
                buf.extend_from_slice(&v.to_le_bytes());
            }
            ShardKey::Text(s) => {
                buf.push(0x03);
                buf.extend_from_slice(s.as_bytes());
                buf.push(0x00);
            }
            ShardKey::Uuid(v) => {
                buf.push(0x04);
                buf.extend_from_slice(&v.to_le_bytes());
            }
            ShardKey::Date(v) => {
                buf.push(0x05);
                buf.extend_from_slice(&v.to_le_bytes());
            }
            ShardKey::Timestamp(v) => {
                buf.push(0x06);
                buf.extend_from_slice(&v.to_le_bytes());
            }
            ShardKey::Bytes(b) => {
                buf.push(0x07);
                buf.extend_from_slice(b);
                buf.push(0x00);
            }
        }
    }
}

impl fmt::Display for ShardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShardKey::Int32(v) => write!(f, "{v}"),
            ShardKey::Int64(v) => write!(f, "{v}"),
            ShardKey::Text(s) => write!(f, "{s}"),
            ShardKey::Uuid(v) => write!(f, "{v:032x}"),
            ShardKey::Date(days) => {
                let epoch =
                    chrono::NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or(chrono::NaiveDate::MIN);
                match epoch.checked_add_signed(chrono::Duration::days(*days as i64)) {
                    Some(d) => write!(f, "{}", d.format("%Y-%m-%d")),
                    None => write!(f, "date:{days}"),
                }
            }
            ShardKey::Timestamp(us) => write!(f, "ts:{us}"),
            ShardKey::Bytes(b) => {
                write!(f, "\\x")?;
                for byte in b {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<i32> for ShardKey {
    fn from(v: i32) -> Self {
        ShardKey::Int32(v)
    }
}

impl From<i64> for ShardKey {
    fn from(v: i64) -> Self {
        ShardKey::Int64(v)
    }
}

impl From<&str> for ShardKey {
    fn from(s: &str) -> Self {
        ShardKey::Text(s.to_string())
    }
}

impl From<String> for ShardKey {
    fn from(s: String) -> Self {
        ShardKey::Text(s)
    }
}

impl From<chrono::NaiveDate> for ShardKey {
    fn from(d: chrono::NaiveDate) -> Self {
        let epoch = chrono::NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or(chrono::NaiveDate::MIN);
        ShardKey::Date(d.signed_duration_since(epoch).num_days() as i32)
    }
}

/// Key type tag for diagnostics and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyType {
    Int32,
    Int64,
    Text,
    Uuid,
    Date,
    Timestamp,
    Bytes,
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyType::Int32 => write!(f, "int32"),
            KeyType::Int64 => write!(f, "int64"),
            KeyType::Text => write!(f, "text"),
            KeyType::Uuid => write!(f, "uuid"),
            KeyType::Date => write!(f, "date"),
            KeyType::Timestamp => write!(f, "timestamp"),
            KeyType::Bytes => write!(f, "bytes"),
        }
    }
}
