use mfpsync_wire::{WireReader, WireWriter};

use crate::error::{RecordError, Result};

/// A framed record body with a fixed packet type tag.
pub trait Body: Sized {
    /// Packet type tag written in the header.
    const TAG: u16;

    /// Decode the body; the cursor sits just past the header.
    fn read_body(reader: &mut WireReader) -> Result<Self>;

    /// Encode the body; the header is written by the caller.
    fn write_body(&self, writer: &mut WireWriter) -> Result<()>;
}

/// Read a 2-byte item count. Negative counts mean no items.
pub(crate) fn read_count_i16(reader: &mut WireReader) -> Result<usize> {
    Ok(usize::try_from(reader.read_i16()?).unwrap_or(0))
}

/// Read a 4-byte item count. Negative counts mean no items.
pub(crate) fn read_count_i32(reader: &mut WireReader) -> Result<usize> {
    Ok(usize::try_from(reader.read_i32()?).unwrap_or(0))
}

pub(crate) fn write_count_i16(writer: &mut WireWriter, count: usize) -> Result<()> {
    let count = i16::try_from(count).map_err(|_| RecordError::CountOverflow {
        count,
        max: i16::MAX as usize,
    })?;
    writer.write_i16(count);
    Ok(())
}

pub(crate) fn write_count_i32(writer: &mut WireWriter, count: usize) -> Result<()> {
    let count = i32::try_from(count).map_err(|_| RecordError::CountOverflow {
        count,
        max: i32::MAX as usize,
    })?;
    writer.write_i32(count);
    Ok(())
}

/// Write a string/string map; the count is written separately.
pub(crate) fn write_string_map<'a>(
    writer: &mut WireWriter,
    items: impl IntoIterator<Item = (&'a String, &'a String)>,
) -> Result<()> {
    writer.write_map(
        items,
        |w, key: &String| w.write_string(key),
        |w, value: &String| w.write_string(value),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_count_reads_as_empty() {
        let mut reader = WireReader::new(vec![0xFF, 0xFF]);
        assert_eq!(read_count_i16(&mut reader).unwrap(), 0);
    }

    #[test]
    fn count_overflow() {
        let mut writer = WireWriter::new();
        let err = write_count_i16(&mut writer, 40_000).unwrap_err();
        assert!(matches!(
            err,
            RecordError::CountOverflow {
                count: 40_000,
                max: 32_767
            }
        ));
        assert!(writer.is_empty());
    }
}
