//! Test-only bit writer for composing UPER buffers.
//!
//! Mirrors the decoder's encoding rules (MSB-first packing, minimal-width
//! constrained integers, short-form length determinants) so tests can state
//! wire content declaratively instead of hand-packing bytes.

pub struct BitWriter {
    buf: Vec<u8>,
    accum: u64,
    accum_bits: u32,
}

impl BitWriter {
    pub fn new() -> Self {
        Self {
            buf: Vec::new(),
            accum: 0,
            accum_bits: 0,
        }
    }

    fn flush(&mut self) {
        while self.accum_bits >= 8 {
            self.accum_bits -= 8;
            self.buf.push((self.accum >> self.accum_bits) as u8);
        }
        if self.accum_bits > 0 {
            self.accum &= (1u64 << self.accum_bits) - 1;
        } else {
            self.accum = 0;
        }
    }

    pub fn write_bit(&mut self, bit: bool) -> &mut Self {
        self.write_bits(bit as u64, 1)
    }

    /// Writes the low `n` bits of `value`, MSB first.
    pub fn write_bits(&mut self, value: u64, n: u32) -> &mut Self {
        assert!(n <= 57, "test writer flushes every call; keep writes small");
        if n > 0 {
            let mask = if n == 64 { u64::MAX } else { (1u64 << n) - 1 };
            self.accum = (self.accum << n) | (value & mask);
            self.accum_bits += n;
            self.flush();
        }
        self
    }

    /// Writes `value` as a constrained whole number over `[min, max]` in the
    /// minimal width, zero bits when the range has a single value.
    pub fn write_constrained(&mut self, value: i64, min: i64, max: i64) -> &mut Self {
        assert!(min <= value && value <= max);
        let range_minus_one = (max - min) as u64;
        if range_minus_one == 0 {
            return self;
        }
        let width = 64 - range_minus_one.leading_zeros();
        self.write_bits((value - min) as u64, width)
    }

    /// Writes a short-form length determinant (0..=127).
    pub fn write_length(&mut self, len: usize) -> &mut Self {
        assert!(len <= 127, "short form only");
        self.write_bits(len as u64, 8)
    }

    /// Writes an IA5 string under the same size constraint the decoder will
    /// read it with.
    pub fn write_ia5(&mut self, text: &str, min_len: usize, max_len: usize) -> &mut Self {
        if min_len == max_len && max_len > 0 {
            assert_eq!(text.len(), min_len);
        } else if max_len > 0 {
            self.write_constrained(text.len() as i64, min_len as i64, max_len as i64);
        } else {
            self.write_length(text.len());
        }
        for byte in text.bytes() {
            assert!(byte < 0x80, "IA5 characters are 7-bit");
            self.write_bits(byte as u64, 7);
        }
        self
    }

    pub fn write_utf8(&mut self, text: &str) -> &mut Self {
        self.write_length(text.len());
        for byte in text.bytes() {
            self.write_bits(byte as u64, 8);
        }
        self
    }

    pub fn write_octets(&mut self, bytes: &[u8]) -> &mut Self {
        self.write_length(bytes.len());
        for byte in bytes {
            self.write_bits(*byte as u64, 8);
        }
        self
    }

    /// Pads the final partial byte with zero bits and returns the buffer.
    pub fn finish(mut self) -> Vec<u8> {
        if self.accum_bits > 0 {
            let pad = 8 - self.accum_bits;
            self.accum <<= pad;
            self.accum_bits += pad;
            self.flush();
        }
        self.buf
    }
}
