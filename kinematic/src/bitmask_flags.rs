use num_traits::{One, PrimInt};
use serde::{Deserialize, Serialize};

/// Trait implemented by flag enums whose discriminant selects a bit.
///
/// The enum's discriminant (via `#[repr(u8)]`) determines the bit index.
/// The backing integer type is chosen through the associated `Storage`.
pub trait FlagBitmask {
    type Storage: PrimInt;

    fn bit_index(&self) -> u8;

    fn mask(&self) -> Self::Storage {
        // NOTE: `bit_index()` must be < number of bits in `Storage`.
        Self::Storage::one() << (self.bit_index() as usize)
    }
}

/// A plain bitmask container over a primitive integer.
///
/// Serialized as the bare integer so configuration files can write `"ground_mask": 3`.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BitmaskFlags<T: PrimInt> {
    pub bits: T,
}

impl<T: PrimInt> BitmaskFlags<T> {
    pub fn new(bits: T) -> Self {
        Self { bits }
    }

    /// Every bit set.
    pub fn all() -> Self {
        Self {
            bits: T::max_value(),
        }
    }

    /// No bit set.
    pub fn empty() -> Self {
        Self { bits: T::zero() }
    }

    /// Build a mask from a list of flags.
    pub fn from_flags<U: FlagBitmask<Storage = T> + Copy>(flags: &[U]) -> Self {
        let mut out = Self::empty();
        out.add_many(flags);
        out
    }

    // --- Single Flag Operations ---
    pub fn add<U: FlagBitmask<Storage = T>>(&mut self, flag: U) {
        self.bits = self.bits | flag.mask();
    }

    pub fn remove<U: FlagBitmask<Storage = T>>(&mut self, flag: U) {
        self.bits = self.bits & !flag.mask();
    }

    pub fn has<U: FlagBitmask<Storage = T>>(&self, flag: U) -> bool {
        (self.bits & flag.mask()) != T::zero()
    }

    /// Builder-style `add`.
    pub fn with<U: FlagBitmask<Storage = T>>(mut self, flag: U) -> Self {
        self.add(flag);
        self
    }

    // --- Bulk Operations ---
    pub fn add_many<U: FlagBitmask<Storage = T> + Copy>(&mut self, flags: &[U]) {
        for &flag in flags {
            self.add(flag);
        }
    }

    // --- Mask vs Mask ---
    /// True if the two masks share at least one bit. Used as the layer filter of every query.
    pub fn intersects(&self, other: Self) -> bool {
        (self.bits & other.bits) != T::zero()
    }

    pub fn is_empty(&self) -> bool {
        self.bits == T::zero()
    }
}

/// Declare a bitmask-backed enum and implement `FlagBitmask` for it.
///
/// Example:
/// ```ignore
/// define_bitmask_flags!(CollisionLayer, u32, {
///     Environment,
///     Ground,
///     Actor,
/// });
/// ```
#[macro_export]
macro_rules! define_bitmask_flags {
    ($name:ident, $storage:ty, { $($variant:ident),* $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum $name {
            $($variant),*
        }

        impl $crate::bitmask_flags::FlagBitmask for $name {
            type Storage = $storage;

            fn bit_index(&self) -> u8 {
                *self as u8
            }
        }
    };
}
