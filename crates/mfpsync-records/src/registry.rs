use bytes::Bytes;
use mfpsync_wire::{tag, PacketHeader, PacketSpan, WireConfig, WireReader, WireWriter};
use tracing::{debug, warn};

use crate::error::{RecordError, Result};
use crate::exercise::{Exercise, ExerciseEntry};
use crate::food::{Food, FoodEntry, MealIngredients};
use crate::measurement::{MeasurementTypes, MeasurementValue};
use crate::opaque::OpaqueRecord;
use crate::record::{DecodedRecord, Record, RecordVariant};
use crate::sync::{SyncRequest, SyncResult};
use crate::user::{DeleteItem, UserPropertyUpdate};

/// Decodes a packet body; the cursor sits just past the header.
pub type DecodeFn = fn(&mut WireReader) -> Result<Record>;

/// Encodes a record body; the header is written by the caller.
pub type EncodeFn = fn(&Record, &mut WireWriter) -> Result<()>;

/// How one packet type tag is decoded and encoded.
#[derive(Debug, Clone, Copy)]
pub struct Registration {
    pub tag: u16,
    pub name: &'static str,
    pub decode: DecodeFn,
    pub encode: EncodeFn,
}

const fn implemented<T: RecordVariant>() -> Registration {
    Registration {
        tag: T::TAG,
        name: tag::type_name(T::TAG),
        decode: decode_variant::<T>,
        encode: encode_variant::<T>,
    }
}

const fn not_implemented(tag: u16) -> Registration {
    Registration {
        tag,
        name: tag::type_name(tag),
        decode: decode_not_implemented,
        encode: encode_not_implemented,
    }
}

fn decode_variant<T: RecordVariant>(reader: &mut WireReader) -> Result<Record> {
    Ok(T::read_body(reader)?.into())
}

fn encode_variant<T: RecordVariant>(record: &Record, writer: &mut WireWriter) -> Result<()> {
    match T::from_record_ref(record) {
        Some(inner) => inner.write_body(writer),
        None => Err(RecordError::EncodeNotImplemented { tag: record.tag() }),
    }
}

fn decode_not_implemented(_reader: &mut WireReader) -> Result<Record> {
    Err(RecordError::NotImplemented)
}

fn encode_not_implemented(record: &Record, _writer: &mut WireWriter) -> Result<()> {
    Err(RecordError::EncodeNotImplemented { tag: record.tag() })
}

static STANDARD: [Registration; 21] = [
    implemented::<SyncRequest>(),
    implemented::<SyncResult>(),
    implemented::<Food>(),
    implemented::<Exercise>(),
    implemented::<FoodEntry>(),
    implemented::<ExerciseEntry>(),
    not_implemented(tag::CLIENT_FOOD_ENTRY),
    not_implemented(tag::CLIENT_EXERCISE_ENTRY),
    implemented::<MeasurementTypes>(),
    implemented::<MeasurementValue>(),
    implemented::<MealIngredients>(),
    not_implemented(tag::MASTER_ID_ASSIGNMENT),
    implemented::<UserPropertyUpdate>(),
    not_implemented(tag::USER_REGISTRATION),
    not_implemented(tag::WATER_ENTRY),
    implemented::<DeleteItem>(),
    not_implemented(tag::SEARCH_REQUEST),
    not_implemented(tag::SEARCH_RESPONSE),
    not_implemented(tag::FAILED_ITEM_CREATION),
    not_implemented(tag::ADD_DELETED_MOST_USED_FOOD),
    not_implemented(tag::DIARY_NOTE),
];

/// Tag-keyed table of record codecs.
#[derive(Debug, Clone, Copy)]
pub struct Registry {
    entries: &'static [Registration],
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}

impl Registry {
    /// Every packet type of the sync protocol.
    pub const fn standard() -> Self {
        Self { entries: &STANDARD }
    }

    /// A registry over a caller-supplied table.
    pub const fn new(entries: &'static [Registration]) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &'static [Registration] {
        self.entries
    }

    pub fn lookup(&self, tag: u16) -> Option<&'static Registration> {
        self.entries.iter().find(|entry| entry.tag == tag)
    }

    /// Decode one framed record at the cursor.
    ///
    /// Unregistered tags, and registered tags without a body decoder, come
    /// back as [`Record::Opaque`] holding the whole declared body. The cursor
    /// must land exactly on the declared packet end.
    pub fn decode_record(&self, reader: &mut WireReader) -> Result<DecodedRecord> {
        let header = reader.read_header()?;

        let record = match self.lookup(header.tag) {
            Some(entry) => match (entry.decode)(reader) {
                Err(RecordError::NotImplemented) => read_opaque(reader, &header)?,
                other => other?,
            },
            None => read_opaque(reader, &header)?,
        };

        let actual_end = reader.position();
        if actual_end != header.expected_end() {
            return Err(RecordError::Inconsistent {
                tag: header.tag,
                expected_end: header.expected_end(),
                actual_end,
            });
        }

        debug!(
            tag = header.tag,
            name = record.name(),
            start = header.start,
            length = header.length,
            "decoded record"
        );
        Ok(DecodedRecord {
            span: header.span(),
            record,
        })
    }

    /// Append one framed record.
    pub fn encode_record(&self, record: &Record, writer: &mut WireWriter) -> Result<PacketSpan> {
        if let Record::Opaque(opaque) = record {
            return writer.write_packet(opaque.tag, |w| {
                w.write_bytes(&opaque.body);
                Ok::<(), RecordError>(())
            });
        }

        let tag = record.tag();
        let entry = self
            .lookup(tag)
            .ok_or(RecordError::EncodeNotImplemented { tag })?;
        writer.write_packet(tag, |w| (entry.encode)(record, w))
    }

    /// Encode `records` back to back into a fresh buffer.
    pub fn encode_all<'a>(
        &self,
        records: impl IntoIterator<Item = &'a Record>,
        config: WireConfig,
    ) -> Result<Bytes> {
        let mut writer = WireWriter::with_config(config);
        for record in records {
            self.encode_record(record, &mut writer)?;
        }
        Ok(writer.into_bytes())
    }
}

fn read_opaque(reader: &mut WireReader, header: &PacketHeader) -> Result<Record> {
    warn!(
        tag = header.tag,
        name = tag::type_name(header.tag),
        length = header.length,
        "no body decoder for packet type, keeping raw body"
    );
    reader.seek(header.body_start())?;
    let body = reader.read_bytes(header.body_len())?;
    Ok(OpaqueRecord::new(header.tag, body).into())
}

/// Encode one record with the standard registry.
pub fn encode(record: &Record) -> Result<Bytes> {
    encode_all([record])
}

/// Encode records back to back with the standard registry.
pub fn encode_all<'a>(records: impl IntoIterator<Item = &'a Record>) -> Result<Bytes> {
    Registry::standard().encode_all(records, WireConfig::default())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use mfpsync_wire::{WireError, HEADER_SIZE, MAGIC};
    use uuid::Uuid;

    use super::*;
    use crate::food::{FoodPortion, MealIngredient, Nutrient};

    fn round_trip(record: Record) {
        let bytes = encode(&record).unwrap();
        let length = i32::from_be_bytes([bytes[2], bytes[3], bytes[4], bytes[5]]);
        assert_eq!(length as usize, bytes.len());

        let mut reader = WireReader::new(bytes);
        let decoded = Registry::standard().decode_record(&mut reader).unwrap();
        assert_eq!(decoded.record, record);
        assert_eq!(decoded.span.start, 0);
        assert_eq!(decoded.span.end(), reader.position());
        assert_eq!(reader.remaining(), 0);
    }

    fn raw_packet(tag: u16, body: &[u8]) -> Vec<u8> {
        let mut wire = Vec::new();
        wire.extend_from_slice(&MAGIC.to_be_bytes());
        wire.extend_from_slice(&((HEADER_SIZE + body.len()) as i32).to_be_bytes());
        wire.extend_from_slice(&1u16.to_be_bytes());
        wire.extend_from_slice(&tag.to_be_bytes());
        wire.extend_from_slice(body);
        wire
    }

    fn food() -> Food {
        let mut food = Food {
            master_food_id: 1,
            owner_user_master_id: 2,
            original_master_id: 3,
            description: "Banana".to_string(),
            brand: String::new(),
            grams: 118.0,
            portions: vec![FoodPortion {
                amount: 1.0,
                gram_weight: 118.0,
                description: "medium".to_string(),
                fraction_int: 0,
            }],
            ..Food::default()
        };
        food.nutrients.set(Nutrient::Calories, 105.0);
        food.nutrients.set(Nutrient::Potassium, 422.0);
        food
    }

    fn exercise() -> Exercise {
        Exercise {
            master_exercise_id: 10,
            description: "Walking".to_string(),
            mets: 3.5,
            ..Exercise::default()
        }
    }

    #[test]
    fn every_implemented_variant_round_trips() {
        let date = NaiveDate::from_ymd_opt(2014, 6, 30).unwrap();

        let mut request = SyncRequest::new("bob", "pw", Uuid::from_u128(7));
        request
            .last_sync_pointers
            .insert("food".to_string(), "41".to_string());

        let mut result = SyncResult {
            master_id: 1234,
            expected_record_count: 3,
            ..SyncResult::default()
        };
        result.set_more_data_to_sync(true);
        result.set_upgrade_alert("Update now");
        result.set_upgrade_url("https://example.com");

        let mut types = MeasurementTypes::default();
        types.types.insert(1, "Weight".to_string());

        let mut properties = UserPropertyUpdate::default();
        properties
            .properties
            .insert("units".to_string(), "metric".to_string());

        let records: Vec<Record> = vec![
            request.into(),
            result.into(),
            food().into(),
            exercise().into(),
            FoodEntry {
                master_food_entry_id: 77,
                food: food(),
                date,
                meal_name: "Lunch".to_string(),
                quantity: 1.5,
                weight_index: 0,
            }
            .into(),
            ExerciseEntry {
                master_exercise_entry_id: 78,
                exercise: exercise(),
                date,
                quantity: 45,
                sets: 0,
                weight: 0,
                calories: 200,
            }
            .into(),
            types.into(),
            MeasurementValue {
                master_measurement_id: 5,
                type_name: "Weight".to_string(),
                entry_date: date,
                value: 70.2,
            }
            .into(),
            MealIngredients {
                master_food_id: 9,
                ingredients: vec![MealIngredient {
                    master_ingredient_id: 1,
                    master_food_id: 1,
                    fraction_int: 0,
                    quantity: 2.0,
                    weight_index: 0,
                }],
            }
            .into(),
            properties.into(),
            DeleteItem {
                item_type: 1,
                master_id: 99,
                status: 2,
            }
            .into(),
            OpaqueRecord::new(tag::DIARY_NOTE, vec![0, 1, 2, 3]).into(),
        ];

        for record in records {
            round_trip(record);
        }
    }

    #[test]
    fn standard_table_covers_every_named_tag() {
        let registry = Registry::standard();
        for tag in 0..=30u16 {
            assert_eq!(registry.lookup(tag).is_some(), tag::is_known(tag), "tag {tag}");
        }
        for entry in registry.entries() {
            assert_eq!(entry.name, tag::type_name(entry.tag));
        }
    }

    #[test]
    fn unregistered_tag_becomes_opaque() {
        let wire = raw_packet(42, &[9, 8, 7, 6, 5]);
        let mut reader = WireReader::new(wire);

        let decoded = Registry::standard().decode_record(&mut reader).unwrap();
        assert_eq!(decoded.span, PacketSpan { start: 0, length: 15 });
        assert_eq!(reader.position(), 15);
        assert_eq!(
            decoded.record,
            Record::Opaque(OpaqueRecord::new(42, vec![9, 8, 7, 6, 5]))
        );
    }

    #[test]
    fn unimplemented_tag_becomes_opaque() {
        let wire = raw_packet(tag::WATER_ENTRY, &[1, 2, 3]);
        let mut reader = WireReader::new(wire);

        let decoded = Registry::standard().decode_record(&mut reader).unwrap();
        assert_eq!(decoded.record.name(), "WaterEntry");
        assert!(decoded.record.is_opaque());
        assert_eq!(decoded.span.length, 13);
    }

    #[test]
    fn trailing_body_bytes_are_inconsistent() {
        let mut body = Vec::new();
        body.extend_from_slice(&5i16.to_be_bytes());
        body.extend_from_slice(&6i64.to_be_bytes());
        body.extend_from_slice(&2i16.to_be_bytes());
        body.push(0xFF);

        let mut reader = WireReader::new(raw_packet(tag::DELETE_ITEM, &body));
        let err = Registry::standard().decode_record(&mut reader).unwrap_err();
        assert!(matches!(
            err,
            RecordError::Inconsistent {
                tag: 17,
                expected_end: 23,
                actual_end: 22
            }
        ));
    }

    #[test]
    fn short_declared_length_is_inconsistent() {
        let mut wire = raw_packet(tag::DELETE_ITEM, &[0; 12]);
        wire[2..6].copy_from_slice(&20i32.to_be_bytes());

        let mut reader = WireReader::new(wire);
        let err = Registry::standard().decode_record(&mut reader).unwrap_err();
        assert!(matches!(err, RecordError::Inconsistent { actual_end: 22, .. }));
    }

    #[test]
    fn truncated_opaque_body() {
        let mut wire = raw_packet(42, &[1, 2]);
        wire[2..6].copy_from_slice(&30i32.to_be_bytes());

        let mut reader = WireReader::new(wire);
        let err = Registry::standard().decode_record(&mut reader).unwrap_err();
        assert!(matches!(
            err,
            RecordError::Wire(WireError::Truncated {
                needed: 20,
                available: 2
            })
        ));
    }

    #[test]
    fn failed_encode_leaves_buffer_untouched() {
        let mut writer = WireWriter::new();
        let mut types = MeasurementTypes::default();
        types.types.insert(1, "x".repeat(70_000));

        let err = Registry::standard()
            .encode_record(&types.into(), &mut writer)
            .unwrap_err();
        assert!(matches!(
            err,
            RecordError::Wire(WireError::StringTooLong { .. })
        ));
        assert!(writer.is_empty());
    }
}
