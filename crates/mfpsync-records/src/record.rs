use mfpsync_wire::{tag, PacketSpan};

use crate::exercise::{Exercise, ExerciseEntry};
use crate::food::{Food, FoodEntry, MealIngredients};
use crate::measurement::{MeasurementTypes, MeasurementValue};
use crate::opaque::OpaqueRecord;
use crate::packet::Body;
use crate::sync::{SyncRequest, SyncResult};
use crate::user::{DeleteItem, UserPropertyUpdate};

/// A record type with a body codec, convertible to and from [`Record`].
pub trait RecordVariant: Body + Into<Record> {
    fn from_record(record: Record) -> Option<Self>;

    fn from_record_ref(record: &Record) -> Option<&Self>;
}

macro_rules! record_variants {
    ($($variant:ident),* $(,)?) => {
        /// Every record the codec can produce.
        #[derive(Debug, Clone, PartialEq)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(tag = "type", content = "data"))]
        pub enum Record {
            $($variant($variant),)*
            /// Packet kept as raw bytes.
            Opaque(OpaqueRecord),
        }

        impl Record {
            /// Packet type tag this record is framed with.
            pub fn tag(&self) -> u16 {
                match self {
                    $(Record::$variant(_) => <$variant as Body>::TAG,)*
                    Record::Opaque(record) => record.tag,
                }
            }
        }

        $(
            impl From<$variant> for Record {
                fn from(record: $variant) -> Self {
                    Record::$variant(record)
                }
            }

            impl RecordVariant for $variant {
                fn from_record(record: Record) -> Option<Self> {
                    match record {
                        Record::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }

                fn from_record_ref(record: &Record) -> Option<&Self> {
                    match record {
                        Record::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }
            }
        )*
    };
}

record_variants!(
    SyncRequest,
    SyncResult,
    Food,
    Exercise,
    FoodEntry,
    ExerciseEntry,
    MeasurementTypes,
    MeasurementValue,
    MealIngredients,
    UserPropertyUpdate,
    DeleteItem,
);

impl Record {
    /// Variant name, or `"UNKNOWN"` for opaque records with an unregistered tag.
    pub fn name(&self) -> &'static str {
        tag::type_name(self.tag())
    }

    pub fn is_opaque(&self) -> bool {
        matches!(self, Record::Opaque(_))
    }

    pub fn as_sync_result(&self) -> Option<&SyncResult> {
        SyncResult::from_record_ref(self)
    }
}

impl From<OpaqueRecord> for Record {
    fn from(record: OpaqueRecord) -> Self {
        Record::Opaque(record)
    }
}

/// A decoded record and where its packet sat in the input.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRecord {
    pub span: PacketSpan,
    pub record: Record,
}

impl DecodedRecord {
    pub fn into_record(self) -> Record {
        self.record
    }
}
