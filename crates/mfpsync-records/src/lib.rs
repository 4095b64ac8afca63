//! Typed records and stream decoding for the MyFitnessPal sync protocol.
//!
//! Every packet type tag maps to a [`Record`] variant through the static
//! [`Registry`] table. Packet types without a known body layout decode to
//! [`OpaqueRecord`] so a response can always be walked end to end.
//! [`DecodeSession`] drives the registry over a whole response buffer and
//! checks the number of data records against the count announced by the
//! [`SyncResult`].

pub mod config;
pub mod error;
pub mod exercise;
pub mod flags;
pub mod food;
pub mod measurement;
pub mod opaque;
pub mod packet;
pub mod record;
pub mod registry;
pub mod session;
pub mod sync;
pub mod user;

pub use config::SessionConfig;
pub use error::{RecordError, Result};
pub use exercise::{Exercise, ExerciseEntry};
pub use flags::{Flag, FlagBits};
pub use food::{
    Food, FoodEntry, FoodPortion, MealIngredient, MealIngredients, Nutrient, Nutrients,
    NUTRIENT_COUNT,
};
pub use measurement::{MeasurementTypes, MeasurementValue};
pub use opaque::OpaqueRecord;
pub use packet::Body;
pub use record::{DecodedRecord, Record, RecordVariant};
pub use registry::{encode, encode_all, DecodeFn, EncodeFn, Registration, Registry};
pub use session::{decode_all, DecodeSession};
pub use sync::{SyncPointers, SyncRequest, SyncResult, SyncStatus};
pub use user::{DeleteItem, UserPropertyUpdate};
