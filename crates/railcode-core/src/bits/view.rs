use super::BitAccumulator;

/// Immutable, non-owning view over a byte buffer with bit-level addressing.
///
/// The view has no cursor and no mutable state; it is `Copy` and safe to
/// share across threads. Reads past the end of the buffer are programming
/// errors and panic, matching slice indexing semantics. Input-driven bounds
/// checks belong to the decoder layer, which validates offsets before
/// touching the view.
#[derive(Debug, Clone, Copy)]
pub struct BitView<'a> {
    data: &'a [u8],
}

impl<'a> BitView<'a> {
    /// Creates a view over `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Total addressable size in bits, always `8 * data.len()`.
    pub fn size(&self) -> usize {
        self.data.len() * 8
    }

    /// Reads the bit at `index`, where bit 0 is the most significant bit of
    /// byte 0. Returns 0 or 1.
    ///
    /// # Panics
    ///
    /// Panics if `index >= size()`.
    pub fn bit_at(&self, index: usize) -> u8 {
        assert!(
            index < self.size(),
            "bit index {index} out of range for {} bits",
            self.size()
        );
        (self.data[index / 8] >> (7 - index % 8)) & 1
    }

    /// Reads `bit_count` bits starting at `index`, MSB first, packed into the
    /// low bits of `T`.
    ///
    /// Implemented bit by bit, so correctness does not depend on byte
    /// alignment of `index` or `bit_count`.
    ///
    /// # Panics
    ///
    /// Panics if `bit_count` exceeds the width of `T` or the read leaves the
    /// buffer.
    pub fn read_msb_unsigned<T: BitAccumulator>(&self, index: usize, bit_count: u32) -> T {
        assert!(
            bit_count <= T::WIDTH,
            "cannot pack {bit_count} bits into a {}-bit integer",
            T::WIDTH
        );
        let mut value = T::zero();
        for i in 0..bit_count as usize {
            value = value.push_bit(self.bit_at(index + i));
        }
        value
    }

    /// Reads `count` whole bytes starting at bit `index` (which need not be
    /// byte aligned).
    pub fn read_bytes(&self, index: usize, count: usize) -> Vec<u8> {
        (0..count)
            .map(|i| self.read_msb_unsigned::<u8>(index + i * 8, 8))
            .collect()
    }

    /// Reads `len` bits starting at `index` into a [`Bitmap`].
    ///
    /// The first bit read is stored at logical position `len - 1` (the most
    /// significant flag). This ordering matches the way presence preambles
    /// assign bits to declared fields: the first preamble bit on the wire
    /// reports the first declared optional field.
    pub fn read_bitmap(&self, index: usize, len: usize) -> Bitmap {
        let mut bits = 0u64;
        for i in 0..len {
            bits = (bits << 1) | self.bit_at(index + i) as u64;
        }
        Bitmap::new(bits, len)
    }
}

/// Fixed-length bitset of up to 64 flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bitmap {
    bits: u64,
    len: usize,
}

impl Bitmap {
    /// Builds a bitmap from the low `len` bits of `bits`.
    ///
    /// # Panics
    ///
    /// Panics if `len > 64`.
    pub fn new(bits: u64, len: usize) -> Self {
        assert!(len <= 64, "bitmap length {len} exceeds 64");
        let bits = if len == 64 {
            bits
        } else {
            bits & ((1u64 << len) - 1)
        };
        Self { bits, len }
    }

    /// Number of flags in the bitmap.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the bitmap holds no flags.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the flag at logical position `pos` (position 0 is the least
    /// significant, i.e. the *last* bit read from the wire).
    ///
    /// # Panics
    ///
    /// Panics if `pos >= len()`.
    pub fn get(&self, pos: usize) -> bool {
        assert!(pos < self.len, "bitmap position {pos} out of range");
        (self.bits >> pos) & 1 == 1
    }
}
