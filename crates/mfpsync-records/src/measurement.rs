//! Body measurement types and values.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use mfpsync_wire::{tag, WireReader, WireWriter};

use crate::error::Result;
use crate::packet::{read_count_i16, write_count_i16, Body};

/// The measurement names a user tracks, keyed by type id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeasurementTypes {
    pub types: BTreeMap<i32, String>,
}

impl Body for MeasurementTypes {
    const TAG: u16 = tag::MEASUREMENT_TYPES;

    fn read_body(reader: &mut WireReader) -> Result<Self> {
        let count = read_count_i16(reader)?;
        let types = reader.read_map(count, WireReader::read_i32, WireReader::read_string)?;
        Ok(Self { types })
    }

    fn write_body(&self, writer: &mut WireWriter) -> Result<()> {
        write_count_i16(writer, self.types.len())?;
        writer.write_map(
            &self.types,
            |w, id: &i32| {
                w.write_i32(*id);
                Ok(())
            },
            |w, name: &String| w.write_string(name),
        )?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeasurementValue {
    pub master_measurement_id: i64,
    pub type_name: String,
    pub entry_date: NaiveDate,
    pub value: f32,
}

impl Body for MeasurementValue {
    const TAG: u16 = tag::MEASUREMENT_VALUE;

    fn read_body(reader: &mut WireReader) -> Result<Self> {
        Ok(Self {
            master_measurement_id: reader.read_i64()?,
            type_name: reader.read_string()?,
            entry_date: reader.read_date()?,
            value: reader.read_f32()?,
        })
    }

    fn write_body(&self, writer: &mut WireWriter) -> Result<()> {
        writer.write_i64(self.master_measurement_id);
        writer.write_string(&self.type_name)?;
        writer.write_date(&self.entry_date)?;
        writer.write_f32(self.value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn types_count_precedes_map() {
        let mut types = MeasurementTypes::default();
        types.types.insert(2, "Neck".to_string());
        types.types.insert(1, "Weight".to_string());

        let mut writer = WireWriter::new();
        types.write_body(&mut writer).unwrap();
        let bytes = writer.into_bytes();
        assert_eq!(&bytes[..2], &[0, 2]);
        assert_eq!(&bytes[2..6], &[0, 0, 0, 1]);

        let mut reader = WireReader::new(bytes);
        assert_eq!(MeasurementTypes::read_body(&mut reader).unwrap(), types);
    }

    #[test]
    fn duplicate_type_ids_keep_last_name() {
        let mut writer = WireWriter::new();
        writer.write_i16(2);
        writer.write_i32(1);
        writer.write_string("Weight").unwrap();
        writer.write_i32(1);
        writer.write_string("Body weight").unwrap();

        let mut reader = WireReader::new(writer.into_bytes());
        let decoded = MeasurementTypes::read_body(&mut reader).unwrap();
        assert_eq!(decoded.types.len(), 1);
        assert_eq!(decoded.types[&1], "Body weight");
    }

    #[test]
    fn value_round_trips() {
        let value = MeasurementValue {
            master_measurement_id: 123_456_789_012,
            type_name: "Weight".to_string(),
            entry_date: NaiveDate::from_ymd_opt(2014, 1, 2).unwrap(),
            value: 81.5,
        };

        let mut writer = WireWriter::new();
        value.write_body(&mut writer).unwrap();
        assert_eq!(writer.len(), 8 + 8 + 10 + 4);

        let mut reader = WireReader::new(writer.into_bytes());
        assert_eq!(MeasurementValue::read_body(&mut reader).unwrap(), value);
    }
}
