use tracing::{debug, trace};

use crate::error::{Result, WireError};
use crate::reader::WireReader;
use crate::writer::WireWriter;

/// Packet header: magic (2) + length (4) + reserved (2) + type tag (2) = 10 bytes.
pub const HEADER_SIZE: usize = 10;

/// Magic number that opens every packet.
pub const MAGIC: u16 = 0x04D3;

/// Value written into the reserved header field.
pub const RESERVED: u16 = 1;

/// Offset of the length field from the start of the packet.
const LENGTH_OFFSET: usize = 2;

/// A decoded packet header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketHeader {
    /// Buffer offset of the first header byte.
    pub start: usize,
    /// Total packet length, header included.
    pub length: usize,
    /// Reserved field; read but never validated.
    pub reserved: u16,
    /// Packet type tag.
    pub tag: u16,
}

impl PacketHeader {
    /// Offset the cursor must reach once the body has been decoded.
    pub fn expected_end(&self) -> usize {
        self.start + self.length
    }

    /// Offset of the first body byte.
    pub fn body_start(&self) -> usize {
        self.start + HEADER_SIZE
    }

    /// Declared body length.
    pub fn body_len(&self) -> usize {
        self.length - HEADER_SIZE
    }

    pub fn span(&self) -> PacketSpan {
        PacketSpan {
            start: self.start,
            length: self.length,
        }
    }
}

/// Where a packet sits in its buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PacketSpan {
    pub start: usize,
    pub length: usize,
}

impl PacketSpan {
    pub fn end(&self) -> usize {
        self.start + self.length
    }
}

impl WireReader {
    /// Read a packet header at the cursor.
    ///
    /// Wire format:
    /// ```text
    /// ┌──────────────┬──────────────┬──────────────┬──────────────┬──────────────┐
    /// │ Magic (2B)   │ Length (4B)  │ Reserved     │ Type (2B)    │ Body         │
    /// │ 0x04 0xD3    │ i32 BE,      │ (2B BE)      │ u16 BE       │ (Length - 10 │
    /// │              │ incl. header │              │              │  bytes)      │
    /// └──────────────┴──────────────┴──────────────┴──────────────┴──────────────┘
    /// ```
    ///
    /// A magic mismatch is fatal: the stream cannot be resynchronized.
    pub fn read_header(&mut self) -> Result<PacketHeader> {
        let start = self.position();

        let magic = self.read_u16()?;
        if magic != MAGIC {
            return Err(WireError::InvalidMagic { found: magic });
        }

        let length = self.read_i32()?;
        let length = usize::try_from(length)
            .ok()
            .filter(|len| *len >= HEADER_SIZE)
            .ok_or(WireError::InvalidLength { length })?;
        if length > self.config().max_packet_length {
            return Err(WireError::PacketTooLarge {
                size: length,
                max: self.config().max_packet_length,
            });
        }

        let reserved = self.read_u16()?;
        let tag = self.read_u16()?;

        trace!(start, length, tag, "read packet header");
        Ok(PacketHeader {
            start,
            length,
            reserved,
            tag,
        })
    }
}

impl WireWriter {
    /// Append one framed packet.
    ///
    /// The header goes out with a zero length, `body` writes the payload, then
    /// the length field is patched through a [`PositionGuard`](crate::PositionGuard)
    /// that puts the cursor back at the end of the packet. If `body` fails, or the
    /// packet ends up too large, everything written since `start` is discarded.
    pub fn write_packet<E, F>(&mut self, tag: u16, body: F) -> std::result::Result<PacketSpan, E>
    where
        E: From<WireError>,
        F: FnOnce(&mut WireWriter) -> std::result::Result<(), E>,
    {
        let start = self.position();
        self.write_u16(MAGIC);
        self.write_i32(0);
        self.write_u16(RESERVED);
        self.write_u16(tag);

        if let Err(err) = body(self) {
            self.truncate(start);
            return Err(err);
        }

        let length = self.position() - start;
        let max = self.config().max_packet_length.min(i32::MAX as usize);
        let encoded_length = match i32::try_from(length) {
            Ok(encoded) if length <= max => encoded,
            _ => {
                self.truncate(start);
                return Err(WireError::PacketTooLarge { size: length, max }.into());
            }
        };

        {
            let mut patch = self.temporary_position(start + LENGTH_OFFSET)?;
            patch.write_i32(encoded_length);
        }

        debug!(tag, start, length, "wrote packet");
        Ok(PacketSpan { start, length })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WireConfig;

    fn header_bytes(magic: u16, length: i32, tag: u16) -> Vec<u8> {
        let mut wire = Vec::new();
        wire.extend_from_slice(&magic.to_be_bytes());
        wire.extend_from_slice(&length.to_be_bytes());
        wire.extend_from_slice(&RESERVED.to_be_bytes());
        wire.extend_from_slice(&tag.to_be_bytes());
        wire
    }

    #[test]
    fn write_packet_patches_length() {
        let mut writer = WireWriter::new();
        let span = writer
            .write_packet::<WireError, _>(9, |w| {
                w.write_i32(42);
                w.write_string("hi")
            })
            .unwrap();

        assert_eq!(span, PacketSpan { start: 0, length: 18 });
        assert_eq!(writer.position(), 18);
        assert_eq!(&writer.as_slice()[..HEADER_SIZE], &header_bytes(MAGIC, 18, 9)[..]);
    }

    #[test]
    fn consecutive_packets_have_own_lengths() {
        let mut writer = WireWriter::new();
        writer
            .write_packet::<WireError, _>(1, |w| {
                w.write_i16(1);
                Ok(())
            })
            .unwrap();
        let second = writer
            .write_packet::<WireError, _>(2, |w| {
                w.write_i64(1);
                Ok(())
            })
            .unwrap();

        assert_eq!(second, PacketSpan { start: 12, length: 18 });

        let mut reader = WireReader::new(writer.into_bytes());
        let first = reader.read_header().unwrap();
        assert_eq!(first.length, 12);
        reader.seek(first.expected_end()).unwrap();
        let header = reader.read_header().unwrap();
        assert_eq!(header.span(), second);
        assert_eq!(header.tag, 2);
    }

    #[test]
    fn failed_body_discards_packet() {
        let mut writer = WireWriter::new();
        writer.write_i16(7);

        let err = writer
            .write_packet(3, |w| w.write_string(&"x".repeat(70_000)))
            .unwrap_err();

        assert!(matches!(err, WireError::StringTooLong { .. }));
        assert_eq!(writer.as_slice(), &[0, 7]);
        assert_eq!(writer.position(), 2);
    }

    #[test]
    fn oversized_packet_rejected() {
        let mut writer = WireWriter::with_config(WireConfig {
            max_packet_length: 16,
        });

        let err = writer
            .write_packet::<WireError, _>(3, |w| {
                w.write_bytes(&[0u8; 32]);
                Ok(())
            })
            .unwrap_err();

        assert!(matches!(err, WireError::PacketTooLarge { size: 42, max: 16 }));
        assert!(writer.is_empty());
    }

    #[test]
    fn reads_header_fields() {
        let mut wire = header_bytes(MAGIC, 14, 17);
        wire[6..8].copy_from_slice(&[0x00, 0x05]);
        wire.extend_from_slice(&[0, 0, 0, 0]);
        let mut reader = WireReader::new(wire);

        let header = reader.read_header().unwrap();
        assert_eq!(
            header,
            PacketHeader {
                start: 0,
                length: 14,
                reserved: 5,
                tag: 17,
            }
        );
        assert_eq!(header.body_start(), 10);
        assert_eq!(header.body_len(), 4);
        assert_eq!(reader.position(), HEADER_SIZE);
    }

    #[test]
    fn invalid_magic() {
        let mut reader = WireReader::new(header_bytes(0x4950, 10, 1));
        let err = reader.read_header().unwrap_err();
        assert!(matches!(err, WireError::InvalidMagic { found: 0x4950 }));
    }

    #[test]
    fn one_magic_byte_is_truncation() {
        let mut reader = WireReader::new(vec![0x04]);
        let err = reader.read_header().unwrap_err();
        assert!(err.is_truncated());
    }

    #[test]
    fn length_shorter_than_header() {
        for length in [-1, 0, 9] {
            let mut reader = WireReader::new(header_bytes(MAGIC, length, 1));
            let err = reader.read_header().unwrap_err();
            assert!(matches!(err, WireError::InvalidLength { length: l } if l == length));
        }
    }

    #[test]
    fn default_config_accepts_any_i32_length() {
        for length in [32 * 1024 * 1024, i32::MAX] {
            let mut reader = WireReader::new(header_bytes(MAGIC, length, 3));
            let header = reader.read_header().unwrap();
            assert_eq!(header.length, length as usize);
        }
    }

    #[test]
    fn length_above_configured_max() {
        let mut reader = WireReader::with_config(
            header_bytes(MAGIC, 1024, 1),
            WireConfig {
                max_packet_length: 64,
            },
        );
        let err = reader.read_header().unwrap_err();
        assert!(matches!(err, WireError::PacketTooLarge { size: 1024, max: 64 }));
    }
}
