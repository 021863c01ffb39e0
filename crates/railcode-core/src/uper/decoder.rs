use crate::bits::{Bitmap, BitView};
use crate::records::FlexDecode;

use super::{UperEnum, UperError};

/// Stateful, forward-only cursor over a [`BitView`] implementing the UPER
/// primitive reads.
///
/// Every primitive advances the cursor by exactly the number of bits the
/// encoding rules prescribe, computed before the value is interpreted. Once
/// the poison flag is set the cursor stops advancing, reads return
/// zero/default values, and [`has_error`](Self::has_error) stays true; there
/// is no transition back because a desynchronized UPER stream cannot be
/// recovered.
#[derive(Debug, Clone)]
pub struct UperDecoder<'a> {
    view: BitView<'a>,
    offset: usize,
    error: Option<UperError>,
}

impl<'a> UperDecoder<'a> {
    /// Creates a decoder positioned at bit 0 of `view`.
    pub fn new(view: BitView<'a>) -> Self {
        Self {
            view,
            offset: 0,
            error: None,
        }
    }

    /// Bits consumed so far.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Bits left between the cursor and the end of the view.
    pub fn remaining(&self) -> usize {
        self.view.size() - self.offset
    }

    /// Whether the decoder has been poisoned. Data produced after (or by)
    /// the poisoning read is unreliable and the whole pass must be discarded.
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// The diagnostic recorded by the first poisoning read, if any.
    pub fn error(&self) -> Option<&UperError> {
        self.error.as_ref()
    }

    /// Moves the cursor to an absolute bit offset.
    ///
    /// Used only to jump directly into a sub-range addressed relative to an
    /// outer record; there is no rewind-based error recovery.
    pub fn seek(&mut self, bit_offset: usize) {
        if self.error.is_some() {
            return;
        }
        if bit_offset > self.view.size() {
            self.poison(UperError::SeekOutOfBounds {
                target: bit_offset,
                size: self.view.size(),
            });
            return;
        }
        self.offset = bit_offset;
    }

    fn poison(&mut self, error: UperError) {
        // First error wins; later reads must not overwrite the diagnostic.
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    /// Reserves `bits` ahead of the cursor, returning the start offset of the
    /// reserved range. Poisons and returns `None` when the decoder already
    /// failed or the view is too short.
    fn advance(&mut self, bits: usize) -> Option<usize> {
        if self.error.is_some() {
            return None;
        }
        if bits > self.remaining() {
            self.poison(UperError::OutOfBounds {
                needed: bits,
                available: self.remaining(),
            });
            return None;
        }
        let start = self.offset;
        self.offset += bits;
        Some(start)
    }

    /// Reads a single BOOLEAN (1 bit).
    pub fn read_boolean(&mut self) -> bool {
        match self.advance(1) {
            Some(start) => self.view.bit_at(start) == 1,
            None => false,
        }
    }

    /// Reads a constrained whole number declared over `[min, max]`.
    ///
    /// Consumes `ceil(log2(max - min + 1))` bits, or none at all when the
    /// range has exactly one value. The bit width must match the encoder
    /// exactly; one bit too many or too few desynchronizes every later field.
    ///
    /// # Panics
    ///
    /// Panics if `min > max` (a declaration bug, not an input error).
    pub fn read_constrained_whole_number(&mut self, min: i64, max: i64) -> i64 {
        assert!(min <= max, "constrained range [{min}, {max}] is empty");
        let range_minus_one = (max - min) as u64;
        if range_minus_one == 0 {
            return min;
        }
        let width = 64 - range_minus_one.leading_zeros();
        match self.advance(width as usize) {
            Some(start) => min + self.view.read_msb_unsigned::<u64>(start, width) as i64,
            None => min,
        }
    }

    /// Reads a length determinant, short form only.
    ///
    /// One byte; if its top bit is clear the remaining 7 bits are the length
    /// (0..=127). The multi-byte long form is an explicit unsupported case:
    /// the decoder poisons with a descriptive diagnostic rather than guess at
    /// the extent of the value.
    pub fn read_length_determinant(&mut self) -> usize {
        let Some(start) = self.advance(8) else {
            return 0;
        };
        let byte = self.view.read_msb_unsigned::<u8>(start, 8);
        if byte & 0x80 != 0 {
            self.poison(UperError::UnsupportedLengthForm);
            return 0;
        }
        byte as usize
    }

    /// Reads an IA5String with the declared size constraint.
    ///
    /// A nonzero `max_len` equal to `min_len` means a fixed length; a larger
    /// `max_len` means the length is a constrained whole number in
    /// `[min_len, max_len]`; `max_len == 0` means the length comes from a
    /// determinant. Characters are 7 bits each.
    pub fn read_ia5_string(&mut self, min_len: usize, max_len: usize) -> String {
        let len = if min_len == max_len && max_len > 0 {
            min_len
        } else if max_len > 0 {
            self.read_constrained_whole_number(min_len as i64, max_len as i64) as usize
        } else {
            self.read_length_determinant()
        };
        let mut out = String::with_capacity(len);
        for _ in 0..len {
            let Some(start) = self.advance(7) else {
                break;
            };
            out.push(self.view.read_msb_unsigned::<u8>(start, 7) as char);
        }
        out
    }

    /// Reads a UTF8String: a length determinant counting *bytes*, then that
    /// many bytes decoded as UTF-8.
    pub fn read_utf8_string(&mut self) -> String {
        let len = self.read_length_determinant();
        let Some(start) = self.advance(len * 8) else {
            return String::new();
        };
        match String::from_utf8(self.view.read_bytes(start, len)) {
            Ok(text) => text,
            Err(_) => {
                self.poison(UperError::InvalidUtf8);
                String::new()
            }
        }
    }

    /// Reads an OCTET STRING: a length determinant, then raw bytes.
    pub fn read_octet_string(&mut self) -> Vec<u8> {
        let len = self.read_length_determinant();
        match self.advance(len * 8) {
            Some(start) => self.view.read_bytes(start, len),
            None => Vec::new(),
        }
    }

    /// Reads `len` bits into a [`Bitmap`] (first bit read is the most
    /// significant flag).
    pub fn read_bitmap(&mut self, len: usize) -> Bitmap {
        match self.advance(len) {
            Some(start) => self.view.read_bitmap(start, len),
            None => Bitmap::new(0, len),
        }
    }

    /// Reads a SEQUENCE OF `T`: a length determinant, then that many
    /// elements decoded through `T`'s record decode routine.
    pub fn read_sequence_of<T: FlexDecode>(&mut self) -> Vec<T> {
        let count = self.read_length_determinant();
        let mut items = Vec::new();
        for _ in 0..count {
            if self.has_error() {
                break;
            }
            items.push(T::decode(self));
        }
        items
    }

    /// Reads an ENUMERATED value as a position in `E`'s declaration-order
    /// table. A position outside the table is a protocol violation.
    pub fn read_enumerated<E: UperEnum>(&mut self) -> E {
        let count = E::VARIANTS.len();
        let index = self.read_constrained_whole_number(0, count as i64 - 1) as usize;
        if self.has_error() {
            return E::VARIANTS[0];
        }
        if index >= count {
            self.poison(UperError::InvalidEnumIndex {
                what: E::NAME,
                index,
                variants: count,
            });
            return E::VARIANTS[0];
        }
        E::VARIANTS[index]
    }

    /// Reads an extensible ENUMERATED: one extension-marker bit, then the
    /// value. A set marker means the value lies outside the known set and
    /// poisons with a "not implemented" diagnostic rather than guessing.
    pub fn read_enumerated_with_extension_marker<E: UperEnum>(&mut self) -> E {
        if self.read_boolean() {
            self.poison(UperError::ExtensionNotImplemented { what: E::NAME });
            return E::VARIANTS[0];
        }
        self.read_enumerated()
    }

    /// Reads the selector of an extensible CHOICE over `variants` known
    /// alternatives: one extension-marker bit, then a constrained whole
    /// number in `[0, variants - 1]`.
    ///
    /// Returns `None` without consuming selector bits when the marker is set
    /// (poisoned as "extension not implemented"), and `None` after poisoning
    /// when the selector is out of range.
    pub fn read_choice_index(&mut self, what: &'static str, variants: usize) -> Option<usize> {
        if self.read_boolean() {
            self.poison(UperError::ExtensionNotImplemented { what });
            return None;
        }
        if self.has_error() {
            return None;
        }
        let index = self.read_constrained_whole_number(0, variants as i64 - 1) as usize;
        if self.has_error() {
            return None;
        }
        if index >= variants {
            self.poison(UperError::InvalidChoiceIndex {
                what,
                index,
                variants,
            });
            return None;
        }
        Some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::{UperDecoder, UperEnum, UperError};
    use crate::bits::BitView;
    use crate::records::FlexDecode;

    fn decoder(data: &[u8]) -> UperDecoder<'_> {
        UperDecoder::new(BitView::new(data))
    }

    #[test]
    fn read_boolean_consumes_one_bit() {
        let data = [0b1000_0000];
        let mut dec = decoder(&data);
        assert!(dec.read_boolean());
        assert_eq!(dec.offset(), 1);
        assert!(!dec.read_boolean());
        assert_eq!(dec.offset(), 2);
        assert!(!dec.has_error());
    }

    #[test]
    fn constrained_whole_number_unit_range_consumes_nothing() {
        let mut dec = decoder(&[]);
        assert_eq!(dec.read_constrained_whole_number(42, 42), 42);
        assert_eq!(dec.offset(), 0);
        assert!(!dec.has_error());
    }

    #[test]
    fn constrained_whole_number_minimal_widths() {
        // 2 bits (range 4) then 9 bits (range 366) then 1 bit (range 2).
        // 10 101101011 1 -> 1010_1101 0111_xxxx
        let data = [0b1010_1101, 0b0111_0000];
        let mut dec = decoder(&data);
        assert_eq!(dec.read_constrained_whole_number(0, 3), 2);
        assert_eq!(dec.offset(), 2);
        assert_eq!(dec.read_constrained_whole_number(1, 366), 0b1_0110_1011 + 1);
        assert_eq!(dec.offset(), 11);
        assert_eq!(dec.read_constrained_whole_number(0, 1), 1);
        assert_eq!(dec.offset(), 12);
        assert!(!dec.has_error());
    }

    #[test]
    fn constrained_whole_number_negative_min() {
        // Range [-2, 1] has 4 values, 2 bits; raw 3 maps to 1.
        let data = [0b1100_0000];
        let mut dec = decoder(&data);
        assert_eq!(dec.read_constrained_whole_number(-2, 1), 1);
        assert_eq!(dec.offset(), 2);
    }

    #[test]
    fn length_determinant_short_form() {
        let data = [0x7f, 0x00];
        let mut dec = decoder(&data);
        assert_eq!(dec.read_length_determinant(), 127);
        assert_eq!(dec.read_length_determinant(), 0);
        assert!(!dec.has_error());
    }

    #[test]
    fn length_determinant_long_form_poisons() {
        let data = [0x81, 0xff];
        let mut dec = decoder(&data);
        assert_eq!(dec.read_length_determinant(), 0);
        assert_eq!(dec.error(), Some(&UperError::UnsupportedLengthForm));
    }

    #[test]
    fn ia5_string_fixed_length() {
        // 'U' = 0x55 -> 1010101, '1' = 0x31 -> 0110001
        let data = [0b1010_1010, 0b1100_0100];
        let mut dec = decoder(&data);
        assert_eq!(dec.read_ia5_string(2, 2), "U1");
        assert_eq!(dec.offset(), 14);
    }

    #[test]
    fn ia5_string_determinant_length() {
        // Length 1, then 'A' = 0x41 -> 1000001.
        let data = [0x01, 0b1000_0010];
        let mut dec = decoder(&data);
        assert_eq!(dec.read_ia5_string(0, 0), "A");
        assert_eq!(dec.offset(), 15);
    }

    #[test]
    fn ia5_string_constrained_length() {
        // Length in [1, 3] is 2 bits; raw 1 -> length 2, then "OK".
        // 01 1001111 1001011 -> 0110_0111 1100_1011
        let data = [0b0110_0111, 0b1100_1011];
        let mut dec = decoder(&data);
        assert_eq!(dec.read_ia5_string(1, 3), "OK");
        assert_eq!(dec.offset(), 16);
    }

    #[test]
    fn utf8_string_counts_bytes() {
        let data = [0x02, b'h', b'i'];
        let mut dec = decoder(&data);
        assert_eq!(dec.read_utf8_string(), "hi");
        assert_eq!(dec.offset(), 24);
    }

    #[test]
    fn utf8_string_invalid_bytes_poison() {
        let data = [0x01, 0xff];
        let mut dec = decoder(&data);
        assert_eq!(dec.read_utf8_string(), "");
        assert_eq!(dec.error(), Some(&UperError::InvalidUtf8));
    }

    #[test]
    fn octet_string_round_trip() {
        let data = [0x04, 0xde, 0xad, 0xbe, 0xef];
        let mut dec = decoder(&data);
        assert_eq!(dec.read_octet_string(), vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(dec.offset(), 40);
    }

    #[test]
    fn out_of_bounds_poisons_and_sticks() {
        let data = [0x03];
        let mut dec = decoder(&data);
        // Claims 3 bytes, only 0 remain after the determinant.
        assert_eq!(dec.read_octet_string(), Vec::<u8>::new());
        assert_eq!(
            dec.error(),
            Some(&UperError::OutOfBounds {
                needed: 24,
                available: 0
            })
        );
        let offset = dec.offset();
        // Poison is monotone: later reads return defaults and keep the
        // original diagnostic, and the cursor no longer moves.
        assert!(!dec.read_boolean());
        assert_eq!(dec.read_constrained_whole_number(0, 7), 0);
        assert_eq!(dec.offset(), offset);
        assert_eq!(
            dec.error(),
            Some(&UperError::OutOfBounds {
                needed: 24,
                available: 0
            })
        );
    }

    #[derive(Debug, PartialEq)]
    struct Pair {
        left: bool,
        right: bool,
    }

    impl FlexDecode for Pair {
        fn decode(dec: &mut UperDecoder<'_>) -> Self {
            Self {
                left: dec.read_boolean(),
                right: dec.read_boolean(),
            }
        }
    }

    #[test]
    fn sequence_of_decodes_count_then_elements() {
        // Count 2, then pairs (1,0) and (0,1).
        let data = [0x02, 0b1001_0000];
        let mut dec = decoder(&data);
        let pairs: Vec<Pair> = dec.read_sequence_of();
        assert_eq!(
            pairs,
            vec![
                Pair {
                    left: true,
                    right: false
                },
                Pair {
                    left: false,
                    right: true
                },
            ]
        );
        assert!(!dec.has_error());
    }

    #[test]
    fn sequence_of_stops_at_poison() {
        // Count 2 but no element bits at all.
        let data = [0x02];
        let mut dec = decoder(&data);
        let pairs: Vec<Pair> = dec.read_sequence_of();
        assert!(pairs.len() < 2);
        assert!(dec.has_error());
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Signal {
        Red,
        Amber,
        Green,
    }

    impl UperEnum for Signal {
        const NAME: &'static str = "Signal";
        const VARIANTS: &'static [Self] = &[Self::Red, Self::Amber, Self::Green];
    }

    #[test]
    fn enumerated_maps_declaration_order() {
        // 2 bits per value: 00, 10.
        let data = [0b0010_0000];
        let mut dec = decoder(&data);
        assert_eq!(dec.read_enumerated::<Signal>(), Signal::Red);
        assert_eq!(dec.read_enumerated::<Signal>(), Signal::Green);
        assert!(!dec.has_error());
    }

    #[test]
    fn enumerated_out_of_range_poisons() {
        // Raw index 3 with 3 declared values.
        let data = [0b1100_0000];
        let mut dec = decoder(&data);
        assert_eq!(dec.read_enumerated::<Signal>(), Signal::Red);
        assert_eq!(
            dec.error(),
            Some(&UperError::InvalidEnumIndex {
                what: "Signal",
                index: 3,
                variants: 3
            })
        );
    }

    #[test]
    fn enumerated_extension_marker_poisons() {
        let data = [0b1000_0000];
        let mut dec = decoder(&data);
        assert_eq!(
            dec.read_enumerated_with_extension_marker::<Signal>(),
            Signal::Red
        );
        assert_eq!(
            dec.error(),
            Some(&UperError::ExtensionNotImplemented { what: "Signal" })
        );
        // Only the marker bit was consumed.
        assert_eq!(dec.offset(), 1);
    }

    #[test]
    fn choice_index_selects_last_variant() {
        // Marker 0, then 2 bits selecting index 2 of 3.
        let data = [0b0100_0000];
        let mut dec = decoder(&data);
        assert_eq!(dec.read_choice_index("Ticket", 3), Some(2));
        assert_eq!(dec.offset(), 3);
    }

    #[test]
    fn choice_index_out_of_range_poisons() {
        // Marker 0, raw index 3 with 3 variants.
        let data = [0b0110_0000];
        let mut dec = decoder(&data);
        assert_eq!(dec.read_choice_index("Ticket", 3), None);
        assert_eq!(
            dec.error(),
            Some(&UperError::InvalidChoiceIndex {
                what: "Ticket",
                index: 3,
                variants: 3
            })
        );
    }

    #[test]
    fn choice_extension_marker_consumes_no_selector_bits() {
        let data = [0b1111_1111];
        let mut dec = decoder(&data);
        assert_eq!(dec.read_choice_index("Ticket", 3), None);
        assert_eq!(
            dec.error(),
            Some(&UperError::ExtensionNotImplemented { what: "Ticket" })
        );
        assert_eq!(dec.offset(), 1);
    }

    #[test]
    fn seek_moves_the_cursor() {
        let data = [0x00, 0b1000_0000];
        let mut dec = decoder(&data);
        dec.seek(8);
        assert!(dec.read_boolean());
        assert_eq!(dec.offset(), 9);
    }

    #[test]
    fn seek_past_end_poisons() {
        let mut dec = decoder(&[0x00]);
        dec.seek(9);
        assert_eq!(
            dec.error(),
            Some(&UperError::SeekOutOfBounds { target: 9, size: 8 })
        );
    }
}
