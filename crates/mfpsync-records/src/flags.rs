//! Named boolean views over integer flag fields.

use std::ops::{BitAnd, BitOr, Not};

/// Integer types that can back a flag field.
pub trait FlagBits:
    Copy + PartialEq + Default + BitAnd<Output = Self> + BitOr<Output = Self> + Not<Output = Self>
{
}

impl FlagBits for i16 {}
impl FlagBits for i32 {}

/// One bit of an integer flag field.
///
/// Records keep the raw integer as their only stored value and expose each
/// bit through accessor methods built on a `Flag` constant:
///
/// ```
/// use mfpsync_records::Flag;
///
/// const PUBLIC: Flag<i32> = Flag::new(0x1);
/// const DELETED: Flag<i32> = Flag::new(0x2);
///
/// let mut flags = 0;
/// PUBLIC.apply(&mut flags, true);
/// DELETED.apply(&mut flags, true);
/// PUBLIC.apply(&mut flags, false);
/// assert_eq!(flags, 0x2);
/// assert!(DELETED.is_set(flags));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flag<T> {
    mask: T,
}

impl<T: FlagBits> Flag<T> {
    pub const fn new(mask: T) -> Self {
        Self { mask }
    }

    pub fn mask(self) -> T {
        self.mask
    }

    /// True if any bit of the mask is set in `bits`.
    pub fn is_set(self, bits: T) -> bool {
        bits & self.mask != T::default()
    }

    /// Set or clear the mask bits in `bits`, leaving every other bit alone.
    pub fn apply(self, bits: &mut T, enabled: bool) {
        *bits = if enabled {
            *bits | self.mask
        } else {
            *bits & !self.mask
        };
    }
}
