//! ASN.1 UPER (Unaligned Packed Encoding Rules) primitive decoding.
//!
//! UPER packs every value into the minimum number of bits with no alignment
//! and no field tags, so declaration order *is* the wire format and there are
//! no resynchronization markers. The decoder is therefore a forward-only
//! cursor with a one-way poison flag: the first inconsistency (bounds,
//! unsupported encoding, protocol violation) is recorded and every later
//! read returns a default value. Callers check [`UperDecoder::has_error`]
//! once after a full pass and discard the result tree wholesale on error.
//!
//! Deliberately narrow: only the single-byte short form of length
//! determinants (0..=127) is implemented, and a set extension marker on a
//! CHOICE or ENUMERATED poisons with a distinct "not implemented" message
//! instead of guessing.

mod decoder;
mod error;

pub use decoder::UperDecoder;
pub use error::UperError;

/// Extensible ENUMERATED types decodable by [`UperDecoder::read_enumerated`].
///
/// `VARIANTS` lists every known value in *declaration order*; the wire
/// encodes the position in this table, not any underlying numeric value.
pub trait UperEnum: Copy + 'static {
    /// Type name used in diagnostics.
    const NAME: &'static str;

    /// Known values in declaration order. Must be non-empty.
    const VARIANTS: &'static [Self];
}
