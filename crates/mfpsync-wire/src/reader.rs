use std::collections::BTreeMap;

use bytes::{Buf, Bytes};
use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use crate::config::WireConfig;
use crate::error::{Result, WireError};

/// `YYYY-MM-DD`
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// `YYYY-MM-DD HH:MM:SS`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const DATE_LEN: usize = 10;
pub const TIMESTAMP_LEN: usize = 19;
pub const UUID_LEN: usize = 16;

// `d` marks a position that must hold an ASCII digit.
const DATE_PATTERN: &[u8; DATE_LEN] = b"dddd-dd-dd";
const TIMESTAMP_PATTERN: &[u8; TIMESTAMP_LEN] = b"dddd-dd-dd dd:dd:dd";

/// Reads big-endian wire primitives from a fully buffered response.
///
/// The cursor only moves forward on success. A short read fails with
/// [`WireError::Truncated`] and leaves the cursor at the end of the buffer.
#[derive(Debug, Clone)]
pub struct WireReader {
    buf: Bytes,
    pos: usize,
    config: WireConfig,
}

impl WireReader {
    /// Create a reader over `buf` with default configuration.
    pub fn new(buf: impl Into<Bytes>) -> Self {
        Self::with_config(buf, WireConfig::default())
    }

    /// Create a reader over `buf` with explicit configuration.
    pub fn with_config(buf: impl Into<Bytes>, config: WireConfig) -> Self {
        Self {
            buf: buf.into(),
            pos: 0,
            config,
        }
    }

    /// Current cursor offset from the start of the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Move the cursor to an absolute offset.
    pub fn seek(&mut self, position: usize) -> Result<()> {
        if position > self.buf.len() {
            return Err(WireError::InvalidSeek {
                position,
                len: self.buf.len(),
            });
        }
        self.pos = position;
        Ok(())
    }

    /// Bytes left between the cursor and the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Total buffer length.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The whole underlying buffer, independent of the cursor.
    pub fn get_ref(&self) -> &Bytes {
        &self.buf
    }

    /// Reader configuration.
    pub fn config(&self) -> &WireConfig {
        &self.config
    }

    /// Read exactly `count` raw bytes without copying.
    pub fn read_bytes(&mut self, count: usize) -> Result<Bytes> {
        let available = self.remaining();
        if available < count {
            self.pos = self.buf.len();
            return Err(WireError::Truncated {
                needed: count,
                available,
            });
        }
        let bytes = self.buf.slice(self.pos..self.pos + count);
        self.pos += count;
        Ok(bytes)
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(self.read_bytes(2)?.get_i16())
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(self.read_bytes(2)?.get_u16())
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.read_bytes(4)?.get_i32())
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(self.read_bytes(8)?.get_i64())
    }

    /// IEEE 754 binary32, big-endian.
    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(self.read_bytes(4)?.get_f32())
    }

    /// A u16 byte-length prefix followed by UTF-8 text.
    pub fn read_string(&mut self) -> Result<String> {
        let len = usize::from(self.read_u16()?);
        let bytes = self.read_bytes(len)?;
        Ok(String::from_utf8(bytes.to_vec())?)
    }

    /// 16 raw bytes, no separators.
    pub fn read_uuid(&mut self) -> Result<Uuid> {
        let mut bytes = self.read_bytes(UUID_LEN)?;
        let mut raw = [0u8; UUID_LEN];
        bytes.copy_to_slice(&mut raw);
        Ok(Uuid::from_bytes(raw))
    }

    /// 10 ASCII bytes in the form `YYYY-MM-DD`.
    pub fn read_date(&mut self) -> Result<NaiveDate> {
        let bytes = self.read_bytes(DATE_LEN)?;
        fixed_width_text(&bytes, DATE_PATTERN)
            .and_then(|text| NaiveDate::parse_from_str(text, DATE_FORMAT).ok())
            .ok_or_else(|| WireError::InvalidDate {
                text: String::from_utf8_lossy(&bytes).into_owned(),
            })
    }

    /// 19 ASCII bytes in the form `YYYY-MM-DD HH:MM:SS`.
    pub fn read_timestamp(&mut self) -> Result<NaiveDateTime> {
        let bytes = self.read_bytes(TIMESTAMP_LEN)?;
        fixed_width_text(&bytes, TIMESTAMP_PATTERN)
            .and_then(|text| NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT).ok())
            .ok_or_else(|| WireError::InvalidTimestamp {
                text: String::from_utf8_lossy(&bytes).into_owned(),
            })
    }

    /// Read `count` key/value pairs.
    ///
    /// The count is never read here: depending on the packet type it sits
    /// directly before the pairs or earlier in the body. A later duplicate key
    /// replaces the earlier value.
    pub fn read_map<K, V, RK, RV>(
        &mut self,
        count: usize,
        mut read_key: RK,
        mut read_value: RV,
    ) -> Result<BTreeMap<K, V>>
    where
        K: Ord,
        RK: FnMut(&mut Self) -> Result<K>,
        RV: FnMut(&mut Self) -> Result<V>,
    {
        let mut items = BTreeMap::new();
        for _ in 0..count {
            let key = read_key(self)?;
            let value = read_value(self)?;
            items.insert(key, value);
        }
        Ok(items)
    }
}

fn fixed_width_text<'a>(bytes: &'a [u8], pattern: &[u8]) -> Option<&'a str> {
    let matches = bytes.len() == pattern.len()
        && bytes.iter().zip(pattern).all(|(byte, expected)| match *expected {
            b'd' => byte.is_ascii_digit(),
            literal => *byte == literal,
        });
    if !matches {
        return None;
    }
    std::str::from_utf8(bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_big_endian_integers() {
        let mut reader = WireReader::new(vec![
            0xFF, 0xFE, // -2
            0x00, 0x00, 0x01, 0x00, // 256
            0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01,
        ]);

        assert_eq!(reader.read_i16().unwrap(), -2);
        assert_eq!(reader.read_i32().unwrap(), 256);
        assert_eq!(reader.read_i64().unwrap(), i64::MIN + 1);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn reads_float() {
        let mut reader = WireReader::new(1.5f32.to_be_bytes().to_vec());
        assert_eq!(reader.read_f32().unwrap(), 1.5);
    }

    #[test]
    fn short_read_is_truncated_and_moves_to_end() {
        let mut reader = WireReader::new(vec![0x00, 0x01, 0x02]);
        let err = reader.read_i32().unwrap_err();

        assert!(matches!(
            err,
            WireError::Truncated {
                needed: 4,
                available: 3
            }
        ));
        assert_eq!(reader.position(), 3);
    }

    #[test]
    fn reads_length_prefixed_string() {
        let mut wire = vec![0x00, 0x06];
        wire.extend_from_slice("café!".as_bytes());
        let mut reader = WireReader::new(wire);

        assert_eq!(reader.read_string().unwrap(), "café!");
    }

    #[test]
    fn string_with_short_body_is_truncated() {
        let mut reader = WireReader::new(vec![0x00, 0x05, b'a', b'b']);
        let err = reader.read_string().unwrap_err();
        assert!(err.is_truncated());
    }

    #[test]
    fn invalid_utf8_string_rejected() {
        let mut reader = WireReader::new(vec![0x00, 0x02, 0xC3, 0x28]);
        let err = reader.read_string().unwrap_err();
        assert!(matches!(err, WireError::InvalidUtf8(_)));
    }

    #[test]
    fn reads_uuid_bytes_verbatim() {
        let raw: Vec<u8> = (0u8..16).collect();
        let mut reader = WireReader::new(raw.clone());
        let id = reader.read_uuid().unwrap();
        assert_eq!(id.as_bytes().as_slice(), raw.as_slice());
    }

    #[test]
    fn reads_date() {
        let mut reader = WireReader::new(b"2014-03-09".to_vec());
        assert_eq!(
            reader.read_date().unwrap(),
            NaiveDate::from_ymd_opt(2014, 3, 9).unwrap()
        );
    }

    #[test]
    fn rejects_malformed_dates() {
        for text in [&b"2014-3-091"[..], b"2014/03/09", b"2014-02-30", b"+014-03-09"] {
            let mut reader = WireReader::new(text.to_vec());
            let err = reader.read_date().unwrap_err();
            assert!(matches!(err, WireError::InvalidDate { .. }), "{text:?}");
        }
    }

    #[test]
    fn reads_timestamp() {
        let mut reader = WireReader::new(b"2014-03-09 23:05:59".to_vec());
        let ts = reader.read_timestamp().unwrap();
        assert_eq!(
            ts,
            NaiveDate::from_ymd_opt(2014, 3, 9)
                .unwrap()
                .and_hms_opt(23, 5, 59)
                .unwrap()
        );
    }

    #[test]
    fn rejects_timestamp_without_time() {
        let mut reader = WireReader::new(b"2014-03-09T23:05:59".to_vec());
        let err = reader.read_timestamp().unwrap_err();
        assert!(matches!(err, WireError::InvalidTimestamp { .. }));
    }

    #[test]
    fn map_duplicate_keys_keep_last_value() {
        let mut wire = Vec::new();
        for (key, value) in [(1i32, "a"), (2, "b"), (1, "c")] {
            wire.extend_from_slice(&key.to_be_bytes());
            wire.extend_from_slice(&(value.len() as u16).to_be_bytes());
            wire.extend_from_slice(value.as_bytes());
        }
        let mut reader = WireReader::new(wire);

        let map = reader
            .read_map(3, WireReader::read_i32, WireReader::read_string)
            .unwrap();

        assert_eq!(map.len(), 2);
        assert_eq!(map[&1], "c");
        assert_eq!(map[&2], "b");
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn seek_and_position() {
        let mut reader = WireReader::new(vec![0x00, 0x07, 0x00, 0x09]);
        reader.seek(2).unwrap();
        assert_eq!(reader.read_i16().unwrap(), 9);
        reader.seek(0).unwrap();
        assert_eq!(reader.read_i16().unwrap(), 7);

        let err = reader.seek(5).unwrap_err();
        assert!(matches!(err, WireError::InvalidSeek { position: 5, len: 4 }));
    }
}
