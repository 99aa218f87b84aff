//! Byte encodings for keys and rows.
//!
//! Key encodings are memcomparable: comparing two encoded keys byte-wise gives
//! the same order as comparing the values they were built from. Row encoding
//! only needs to be compact and self-describing.

use crate::table::Handle;
use estimate_core::{Datum, Row};

const TABLE_PREFIX: u8 = b't';
const RECORD_SEP: &[u8] = b"_r";
const INDEX_SEP: &[u8] = b"_i";

const ENC_GROUP_SIZE: usize = 8;
const ENC_MARKER: u8 = 0xFF;
const ENC_PAD: u8 = 0x00;

const SIGN_MASK: u64 = 0x8000_0000_0000_0000;

// Key flags, one per datum kind.
const BYTES_FLAG: u8 = 0x01;
const INT_FLAG: u8 = 0x03;
const UINT_FLAG: u8 = 0x04;
const FLOAT_FLAG: u8 = 0x05;
const DECIMAL_FLAG: u8 = 0x06;
const DURATION_FLAG: u8 = 0x07;
const TIME_FLAG: u8 = 0x08;

const ROW_FORMAT_VERSION: u8 = 0x80;

/// Length of a record key.
pub const RECORD_KEY_LEN: usize = 1 + 8 + 2 + 8;

/// Append an i64 so that byte order matches numeric order.
pub fn encode_int(buf: &mut Vec<u8>, v: i64) {
    buf.extend_from_slice(&((v as u64) ^ SIGN_MASK).to_be_bytes());
}

pub fn encode_uint(buf: &mut Vec<u8>, v: u64) {
    buf.extend_from_slice(&v.to_be_bytes());
}

/// Append an f64 so that byte order matches numeric order.
pub fn encode_float(buf: &mut Vec<u8>, v: f64) {
    let bits = v.to_bits();
    let ordered = if v >= 0.0 { bits | SIGN_MASK } else { !bits };
    buf.extend_from_slice(&ordered.to_be_bytes());
}

/// Append bytes in groups of eight, each followed by a marker byte telling
/// how many of the group's bytes are real.
pub fn encode_bytes(buf: &mut Vec<u8>, data: &[u8]) {
    let groups = data.len() / ENC_GROUP_SIZE + 1;
    buf.reserve(groups * (ENC_GROUP_SIZE + 1));

    let mut chunks = data.chunks_exact(ENC_GROUP_SIZE);
    for chunk in &mut chunks {
        buf.extend_from_slice(chunk);
        buf.push(ENC_MARKER);
    }

    let rest = chunks.remainder();
    let pad = ENC_GROUP_SIZE - rest.len();
    buf.extend_from_slice(rest);
    buf.extend(std::iter::repeat(ENC_PAD).take(pad));
    buf.push(ENC_MARKER - pad as u8);
}

/// Append one datum with its kind flag.
pub fn encode_key_datum(buf: &mut Vec<u8>, datum: &Datum) {
    match datum {
        Datum::Int(v) => {
            buf.push(INT_FLAG);
            encode_int(buf, *v);
        }
        Datum::Uint(v) => {
            buf.push(UINT_FLAG);
            encode_uint(buf, *v);
        }
        Datum::Float(v) => {
            buf.push(FLOAT_FLAG);
            encode_float(buf, *v);
        }
        Datum::Decimal(v) => {
            buf.push(DECIMAL_FLAG);
            buf.extend_from_slice(&v.serialize());
        }
        Datum::Bytes(v) => {
            buf.push(BYTES_FLAG);
            encode_bytes(buf, v);
        }
        Datum::Duration(v) => {
            buf.push(DURATION_FLAG);
            encode_int(buf, v.num_seconds());
            encode_uint(buf, u64::from(v.subsec_nanos().unsigned_abs()));
        }
        Datum::Time(v) => {
            buf.push(TIME_FLAG);
            encode_int(buf, v.timestamp_micros());
        }
    }
}

fn table_prefix(buf: &mut Vec<u8>, table_id: i64) {
    buf.push(TABLE_PREFIX);
    encode_int(buf, table_id);
}

/// Key of the record entry for `handle`.
pub fn record_key(table_id: i64, handle: Handle) -> Vec<u8> {
    let mut key = Vec::with_capacity(RECORD_KEY_LEN);
    table_prefix(&mut key, table_id);
    key.extend_from_slice(RECORD_SEP);
    encode_int(&mut key, handle.as_i64());
    key
}

/// Key of an index entry. Non-unique indexes pass the handle so that rows
/// sharing index values still get distinct keys.
pub fn index_key(
    table_id: i64,
    index_id: i64,
    values: &[&Datum],
    handle: Option<Handle>,
) -> Vec<u8> {
    let mut key = Vec::with_capacity(1 + 8 + 2 + 8 + values.len() * 10 + 9);
    table_prefix(&mut key, table_id);
    key.extend_from_slice(INDEX_SEP);
    encode_int(&mut key, index_id);
    for value in values {
        encode_key_datum(&mut key, value);
    }
    if let Some(handle) = handle {
        key.push(INT_FLAG);
        encode_int(&mut key, handle.as_i64());
    }
    key
}

/// Value stored under a unique index key.
pub fn handle_value(handle: Handle) -> Vec<u8> {
    handle.as_i64().to_be_bytes().to_vec()
}

/// Encode a full row as a record value.
pub fn encode_row(row: &Row) -> Vec<u8> {
    let mut buf = Vec::with_capacity(3 + row.len() * 9);
    buf.push(ROW_FORMAT_VERSION);
    // Column counts are bounded by the schema parser well below u16::MAX.
    buf.extend_from_slice(&(row.len() as u16).to_be_bytes());

    for datum in row {
        match datum {
            Datum::Int(v) => {
                buf.push(INT_FLAG);
                buf.extend_from_slice(&v.to_le_bytes());
            }
            Datum::Uint(v) => {
                buf.push(UINT_FLAG);
                buf.extend_from_slice(&v.to_le_bytes());
            }
            Datum::Float(v) => {
                buf.push(FLOAT_FLAG);
                buf.extend_from_slice(&v.to_le_bytes());
            }
            Datum::Decimal(v) => {
                buf.push(DECIMAL_FLAG);
                buf.extend_from_slice(&v.serialize());
            }
            Datum::Bytes(v) => {
                buf.push(BYTES_FLAG);
                buf.extend_from_slice(&(v.len() as u32).to_le_bytes());
                buf.extend_from_slice(v);
            }
            Datum::Duration(v) => {
                buf.push(DURATION_FLAG);
                buf.extend_from_slice(&v.num_seconds().to_le_bytes());
                buf.extend_from_slice(&v.subsec_nanos().to_le_bytes());
            }
            Datum::Time(v) => {
                buf.push(TIME_FLAG);
                buf.extend_from_slice(&v.timestamp_micros().to_le_bytes());
            }
        }
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeDelta};

    fn key_of(datum: &Datum) -> Vec<u8> {
        let mut buf = Vec::new();
        encode_key_datum(&mut buf, datum);
        buf
    }

    #[test]
    fn test_record_key_layout() {
        let key = record_key(1, Handle::new(42));

        assert_eq!(key.len(), RECORD_KEY_LEN);
        assert_eq!(key[0], b't');
        assert_eq!(&key[9..11], b"_r");
    }

    #[test]
    fn test_record_keys_sort_by_handle() {
        let handles = [-5i64, -1, 0, 1, 2, 300, i64::MAX];
        let keys: Vec<Vec<u8>> = handles
            .iter()
            .map(|h| record_key(1, Handle::new(*h)))
            .collect();

        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn test_int_and_float_order() {
        let ints = [i64::MIN, -2, -1, 0, 1, i64::MAX];
        let encoded: Vec<Vec<u8>> = ints.iter().map(|v| key_of(&Datum::Int(*v))).collect();
        assert!(encoded.windows(2).all(|w| w[0] < w[1]));

        let floats = [-1.5f64, -0.25, 0.0, 0.25, 3.0, 1e300];
        let encoded: Vec<Vec<u8>> = floats
            .iter()
            .map(|v| key_of(&Datum::Float(*v)))
            .collect();
        assert!(encoded.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_bytes_group_encoding() {
        let mut buf = Vec::new();
        encode_bytes(&mut buf, b"abc");
        assert_eq!(buf, [b'a', b'b', b'c', 0, 0, 0, 0, 0, 0xFF - 5]);

        let mut buf = Vec::new();
        encode_bytes(&mut buf, b"");
        assert_eq!(buf, [0, 0, 0, 0, 0, 0, 0, 0, 0xFF - 8]);

        // A full group is followed by an empty trailing group
        let mut buf = Vec::new();
        encode_bytes(&mut buf, b"12345678");
        assert_eq!(buf.len(), 18);
        assert_eq!(buf[8], 0xFF);
        assert_eq!(buf[17], 0xFF - 8);
    }

    #[test]
    fn test_bytes_order_with_prefixes() {
        let values: [&[u8]; 5] = [b"", b"a", b"a\x00", b"ab", b"abcdefghi"];
        let encoded: Vec<Vec<u8>> = values
            .iter()
            .map(|v| key_of(&Datum::Bytes(v.to_vec())))
            .collect();
        assert!(encoded.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_index_key_with_handle_is_longer() {
        let value = Datum::Uint(7);
        let unique = index_key(1, 1, &[&value], None);
        let plain = index_key(1, 1, &[&value], Some(Handle::new(3)));

        assert_eq!(&unique[9..11], b"_i");
        assert_eq!(plain.len(), unique.len() + 9);
        assert!(plain.starts_with(&unique));
    }

    #[test]
    fn test_row_encoding_size() {
        let row = vec![
            Datum::Uint(1),
            Datum::Bytes(b"hello".to_vec()),
            Datum::Duration(TimeDelta::seconds(3)),
            Datum::Time(DateTime::UNIX_EPOCH),
        ];

        let encoded = encode_row(&row);

        assert_eq!(encoded[0], ROW_FORMAT_VERSION);
        assert_eq!(u16::from_be_bytes([encoded[1], encoded[2]]), 4);
        assert_eq!(encoded.len(), 3 + 9 + (1 + 4 + 5) + (1 + 8 + 4) + 9);
    }

    #[test]
    fn test_handle_value_is_eight_bytes() {
        assert_eq!(handle_value(Handle::new(1)), vec![0, 0, 0, 0, 0, 0, 0, 1]);
    }
}
