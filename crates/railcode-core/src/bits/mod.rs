//! Bit-granular access to byte buffers.
//!
//! Barcode payloads are packed without byte alignment, so every layer above
//! this one addresses data in bits. Bit 0 is the most significant bit of
//! byte 0; all multi-bit reads are MSB first (big-endian throughout).
//!
//! [`BitView`] is a non-owning, cursor-free accessor: callers pass explicit
//! bit offsets, and out-of-range offsets are programming errors (asserted),
//! never silently truncated. The stateful cursor lives in the `uper` layer.

mod view;

pub use view::{Bitmap, BitView};

/// Unsigned accumulator types usable with [`BitView::read_msb_unsigned`].
pub trait BitAccumulator: Copy {
    /// Width of the accumulator in bits.
    const WIDTH: u32;

    /// The all-zero value.
    fn zero() -> Self;

    /// Shifts the accumulator left by one and ORs in `bit` (0 or 1).
    fn push_bit(self, bit: u8) -> Self;
}

macro_rules! impl_bit_accumulator {
    ($($ty:ty),*) => {
        $(impl BitAccumulator for $ty {
            const WIDTH: u32 = <$ty>::BITS;

            fn zero() -> Self {
                0
            }

            fn push_bit(self, bit: u8) -> Self {
                (self << 1) | bit as $ty
            }
        })*
    };
}

impl_bit_accumulator!(u8, u16, u32, u64);
