//! Exercises and diary exercise entries.

use chrono::NaiveDate;
use mfpsync_wire::{tag, WireReader, WireWriter};

use crate::error::Result;
use crate::flags::Flag;
use crate::packet::Body;

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Exercise {
    pub master_exercise_id: i32,
    pub owner_user_master_id: i32,
    pub original_master_exercise_id: i32,
    pub exercise_type: i16,
    pub description: String,
    pub flags: i32,
    /// Metabolic equivalent of the activity.
    pub mets: f32,
}

impl Exercise {
    pub const PUBLIC: Flag<i32> = Flag::new(0x1);
    pub const DELETED: Flag<i32> = Flag::new(0x2);

    pub fn is_public(&self) -> bool {
        Self::PUBLIC.is_set(self.flags)
    }

    pub fn set_public(&mut self, enabled: bool) {
        Self::PUBLIC.apply(&mut self.flags, enabled);
    }

    pub fn is_deleted(&self) -> bool {
        Self::DELETED.is_set(self.flags)
    }

    pub fn set_deleted(&mut self, enabled: bool) {
        Self::DELETED.apply(&mut self.flags, enabled);
    }
}

impl Body for Exercise {
    const TAG: u16 = tag::EXERCISE;

    fn read_body(reader: &mut WireReader) -> Result<Self> {
        Ok(Self {
            master_exercise_id: reader.read_i32()?,
            owner_user_master_id: reader.read_i32()?,
            original_master_exercise_id: reader.read_i32()?,
            exercise_type: reader.read_i16()?,
            description: reader.read_string()?,
            flags: reader.read_i32()?,
            mets: reader.read_f32()?,
        })
    }

    fn write_body(&self, writer: &mut WireWriter) -> Result<()> {
        writer.write_i32(self.master_exercise_id);
        writer.write_i32(self.owner_user_master_id);
        writer.write_i32(self.original_master_exercise_id);
        writer.write_i16(self.exercise_type);
        writer.write_string(&self.description)?;
        writer.write_i32(self.flags);
        writer.write_f32(self.mets);
        Ok(())
    }
}

/// An exercise logged in the diary.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExerciseEntry {
    pub master_exercise_entry_id: i64,
    pub exercise: Exercise,
    pub date: NaiveDate,
    /// Minutes for cardio, repetitions for strength exercises.
    pub quantity: i32,
    pub sets: i32,
    pub weight: i32,
    pub calories: i32,
}

impl Body for ExerciseEntry {
    const TAG: u16 = tag::EXERCISE_ENTRY;

    fn read_body(reader: &mut WireReader) -> Result<Self> {
        Ok(Self {
            master_exercise_entry_id: reader.read_i64()?,
            exercise: Exercise::read_body(reader)?,
            date: reader.read_date()?,
            quantity: reader.read_i32()?,
            sets: reader.read_i32()?,
            weight: reader.read_i32()?,
            calories: reader.read_i32()?,
        })
    }

    fn write_body(&self, writer: &mut WireWriter) -> Result<()> {
        writer.write_i64(self.master_exercise_entry_id);
        self.exercise.write_body(writer)?;
        writer.write_date(&self.date)?;
        writer.write_i32(self.quantity);
        writer.write_i32(self.sets);
        writer.write_i32(self.weight);
        writer.write_i32(self.calories);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rowing() -> Exercise {
        Exercise {
            master_exercise_id: 501,
            owner_user_master_id: 0,
            original_master_exercise_id: 500,
            exercise_type: 0,
            description: "Rowing, stationary".to_string(),
            flags: 0x1,
            mets: 7.0,
        }
    }

    #[test]
    fn exercise_body_layout() {
        let exercise = rowing();
        let mut writer = WireWriter::new();
        exercise.write_body(&mut writer).unwrap();
        let bytes = writer.into_bytes();

        assert_eq!(&bytes[12..14], &[0, 0]);
        assert_eq!(&bytes[14..16], &[0, 18]);
        assert_eq!(bytes.len(), 12 + 2 + 20 + 4 + 4);

        let mut reader = WireReader::new(bytes);
        assert_eq!(Exercise::read_body(&mut reader).unwrap(), exercise);
    }

    #[test]
    fn exercise_flags_are_independent() {
        let mut exercise = rowing();
        exercise.set_deleted(true);
        assert!(exercise.is_public());
        assert!(exercise.is_deleted());

        exercise.set_public(false);
        assert!(!exercise.is_public());
        assert_eq!(exercise.flags, 0x2);
    }

    #[test]
    fn entry_embeds_exercise_then_date() {
        let entry = ExerciseEntry {
            master_exercise_entry_id: -4,
            exercise: rowing(),
            date: NaiveDate::from_ymd_opt(2013, 12, 31).unwrap(),
            quantity: 30,
            sets: 0,
            weight: 0,
            calories: 315,
        };

        let mut writer = WireWriter::new();
        entry.write_body(&mut writer).unwrap();
        let bytes = writer.into_bytes();
        let date_at = 8 + 42;
        assert_eq!(&bytes[date_at..date_at + 10], b"2013-12-31");

        let mut reader = WireReader::new(bytes);
        assert_eq!(ExerciseEntry::read_body(&mut reader).unwrap(), entry);
        assert_eq!(reader.remaining(), 0);
    }
}
