use std::ops::{Deref, DerefMut};

use bytes::{BufMut, Bytes, BytesMut};
use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use crate::config::WireConfig;
use crate::error::{Result, WireError};
use crate::reader::{DATE_FORMAT, DATE_LEN, TIMESTAMP_FORMAT, TIMESTAMP_LEN};

const INITIAL_BUFFER_CAPACITY: usize = 1024;

/// Writes big-endian wire primitives into an in-memory buffer.
///
/// Writing at the end of the buffer appends. After a [`seek`](Self::seek)
/// back into written data, writes overwrite in place and then keep appending
/// once they pass the end.
#[derive(Debug, Clone)]
pub struct WireWriter {
    buf: BytesMut,
    pos: usize,
    config: WireConfig,
}

impl Default for WireWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl WireWriter {
    /// Create an empty writer with default configuration.
    pub fn new() -> Self {
        Self::with_config(WireConfig::default())
    }

    /// Create an empty writer with explicit configuration.
    pub fn with_config(config: WireConfig) -> Self {
        Self {
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            pos: 0,
            config,
        }
    }

    /// Current cursor offset from the start of the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Move the cursor to an absolute offset inside the written data.
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

    /// Move the cursor to `position` until the returned guard is dropped.
    ///
    /// The previous cursor is restored on every exit path, including an early
    /// return through `?` while the guard is alive.
    pub fn temporary_position(&mut self, position: usize) -> Result<PositionGuard<'_>> {
        let previous = self.pos;
        self.seek(position)?;
        Ok(PositionGuard {
            writer: self,
            previous,
        })
    }

    /// Discard everything from `position` onwards and move the cursor there.
    pub fn truncate(&mut self, position: usize) {
        self.buf.truncate(position);
        self.pos = self.pos.min(self.buf.len());
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Written bytes, independent of the cursor.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Writer configuration.
    pub fn config(&self) -> &WireConfig {
        &self.config
    }

    /// Consume the writer and return the encoded bytes.
    pub fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        let overlap = (self.buf.len() - self.pos).min(bytes.len());
        if overlap > 0 {
            self.buf[self.pos..self.pos + overlap].copy_from_slice(&bytes[..overlap]);
        }
        self.buf.put_slice(&bytes[overlap..]);
        self.pos += bytes.len();
    }

    pub fn write_i16(&mut self, value: i16) {
        self.write_bytes(&value.to_be_bytes());
    }

    pub fn write_u16(&mut self, value: u16) {
        self.write_bytes(&value.to_be_bytes());
    }

    pub fn write_i32(&mut self, value: i32) {
        self.write_bytes(&value.to_be_bytes());
    }

    pub fn write_i64(&mut self, value: i64) {
        self.write_bytes(&value.to_be_bytes());
    }

    /// IEEE 754 binary32, big-endian.
    pub fn write_f32(&mut self, value: f32) {
        self.write_bytes(&value.to_be_bytes());
    }

    /// A u16 byte-length prefix followed by UTF-8 text.
    pub fn write_string(&mut self, value: &str) -> Result<()> {
        let len = u16::try_from(value.len()).map_err(|_| WireError::StringTooLong {
            len: value.len(),
            max: usize::from(u16::MAX),
        })?;
        self.write_u16(len);
        self.write_bytes(value.as_bytes());
        Ok(())
    }

    pub fn write_uuid(&mut self, value: &Uuid) {
        self.write_bytes(value.as_bytes());
    }

    /// 10 ASCII bytes in the form `YYYY-MM-DD`.
    pub fn write_date(&mut self, value: &NaiveDate) -> Result<()> {
        let text = value.format(DATE_FORMAT).to_string();
        self.write_fixed_width(text, DATE_LEN)
    }

    /// 19 ASCII bytes in the form `YYYY-MM-DD HH:MM:SS`.
    pub fn write_timestamp(&mut self, value: &NaiveDateTime) -> Result<()> {
        let text = value.format(TIMESTAMP_FORMAT).to_string();
        self.write_fixed_width(text, TIMESTAMP_LEN)
    }

    fn write_fixed_width(&mut self, text: String, width: usize) -> Result<()> {
        // Years outside 0..=9999 render with a sign or extra digits.
        if text.len() != width {
            return Err(WireError::DateOutOfRange { value: text, width });
        }
        self.write_bytes(text.as_bytes());
        Ok(())
    }

    /// Write key/value pairs in iteration order.
    ///
    /// The item count is not written; its position depends on the packet type.
    pub fn write_map<'a, K, V, I, WK, WV>(
        &mut self,
        items: I,
        mut write_key: WK,
        mut write_value: WV,
    ) -> Result<()>
    where
        K: 'a + ?Sized,
        V: 'a + ?Sized,
        I: IntoIterator<Item = (&'a K, &'a V)>,
        WK: FnMut(&mut Self, &K) -> Result<()>,
        WV: FnMut(&mut Self, &V) -> Result<()>,
    {
        for (key, value) in items {
            write_key(self, key)?;
            write_value(self, value)?;
        }
        Ok(())
    }
}

/// Scope guard returned by [`WireWriter::temporary_position`].
///
/// Dereferences to the writer; restores the saved cursor when dropped.
#[derive(Debug)]
pub struct PositionGuard<'a> {
    writer: &'a mut WireWriter,
    previous: usize,
}

impl PositionGuard<'_> {
    /// The cursor position that will be restored on drop.
    pub fn previous(&self) -> usize {
        self.previous
    }
}

impl Deref for PositionGuard<'_> {
    type Target = WireWriter;

    fn deref(&self) -> &WireWriter {
        &*self.writer
    }
}

impl DerefMut for PositionGuard<'_> {
    fn deref_mut(&mut self) -> &mut WireWriter {
        &mut *self.writer
    }
}

impl Drop for PositionGuard<'_> {
    fn drop(&mut self) {
        self.writer.pos = self.previous.min(self.writer.buf.len());
    }
}
