//! User property updates and item deletions.

use std::collections::BTreeMap;

use mfpsync_wire::{tag, WireReader, WireWriter};

use crate::error::Result;
use crate::packet::{read_count_i16, write_count_i16, write_string_map, Body};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UserPropertyUpdate {
    pub properties: BTreeMap<String, String>,
}

impl Body for UserPropertyUpdate {
    const TAG: u16 = tag::USER_PROPERTY_UPDATE;

    fn read_body(reader: &mut WireReader) -> Result<Self> {
        let count = read_count_i16(reader)?;
        let properties =
            reader.read_map(count, WireReader::read_string, WireReader::read_string)?;
        Ok(Self { properties })
    }

    fn write_body(&self, writer: &mut WireWriter) -> Result<()> {
        write_count_i16(writer, self.properties.len())?;
        write_string_map(writer, &self.properties)
    }
}

/// `status` value of a destroyed item.
pub const DESTROYED_STATUS: i16 = 2;

/// Marks a previously synced item as deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeleteItem {
    pub item_type: i16,
    pub master_id: i64,
    pub status: i16,
}

impl DeleteItem {
    pub fn is_destroyed(&self) -> bool {
        self.status == DESTROYED_STATUS
    }

    pub fn set_destroyed(&mut self, destroyed: bool) {
        self.status = if destroyed { DESTROYED_STATUS } else { 0 };
    }
}

impl Body for DeleteItem {
    const TAG: u16 = tag::DELETE_ITEM;

    fn read_body(reader: &mut WireReader) -> Result<Self> {
        Ok(Self {
            item_type: reader.read_i16()?,
            master_id: reader.read_i64()?,
            status: reader.read_i16()?,
        })
    }

    fn write_body(&self, writer: &mut WireWriter) -> Result<()> {
        writer.write_i16(self.item_type);
        writer.write_i64(self.master_id);
        writer.write_i16(self.status);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_update_round_trips() {
        let mut update = UserPropertyUpdate::default();
        update
            .properties
            .insert("goal_weight".to_string(), "75".to_string());
        update
            .properties
            .insert("units".to_string(), "metric".to_string());

        let mut writer = WireWriter::new();
        update.write_body(&mut writer).unwrap();
        assert_eq!(&writer.as_slice()[..2], &[0, 2]);

        let mut reader = WireReader::new(writer.into_bytes());
        assert_eq!(UserPropertyUpdate::read_body(&mut reader).unwrap(), update);
    }

    #[test]
    fn delete_item_layout() {
        let item = DeleteItem {
            item_type: 5,
            master_id: 1 << 40,
            status: 2,
        };

        let mut writer = WireWriter::new();
        item.write_body(&mut writer).unwrap();
        assert_eq!(
            writer.as_slice(),
            &[0, 5, 0, 0, 1, 0, 0, 0, 0, 0, 0, 2]
        );

        let mut reader = WireReader::new(writer.into_bytes());
        assert_eq!(DeleteItem::read_body(&mut reader).unwrap(), item);
    }

    #[test]
    fn destroyed_status() {
        let mut item = DeleteItem::default();
        assert!(!item.is_destroyed());

        item.status = 1;
        assert!(!item.is_destroyed());

        item.set_destroyed(true);
        assert_eq!(item.status, 2);
        item.set_destroyed(false);
        assert_eq!(item.status, 0);
    }
}
