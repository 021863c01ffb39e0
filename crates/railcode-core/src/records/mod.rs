//! The record-decoding protocol shared by every structured payload type.
//!
//! UPER records have no field tags: a SEQUENCE is decoded by reading its
//! fields in declaration order, preceded by a presence preamble holding one
//! bit per OPTIONAL or DEFAULT field. Each record type declares its fields
//! once, as an ordered [`RecordSpec`] (the analogue of a protocol's layout
//! table), from which both the preamble size and each optional field's bit
//! position are computed. The decode body then always has the same shape:
//!
//! 1. read the preamble (if the record declares any optional field),
//! 2. decode each field in declaration order, skipping optional fields whose
//!    presence bit is clear.
//!
//! Consuming bits for an absent field is a protocol violation, so presence
//! checks and declaration order must never drift apart; keeping both in one
//! table is what prevents that.

use crate::bits::Bitmap;
use crate::uper::UperDecoder;

/// A type decodable from a UPER stream through the record protocol.
///
/// `decode` never fails directly: inconsistencies poison the decoder, and
/// the caller inspects [`UperDecoder::has_error`] once after the full pass.
pub trait FlexDecode: Sized {
    fn decode(dec: &mut UperDecoder<'_>) -> Self;
}

/// Whether a declared field is always on the wire or guarded by a presence
/// bit. DEFAULT fields are declared `Optional`; an absent field keeps its
/// default value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
}

/// One declared field of a record, in wire (declaration) order.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub presence: Presence,
}

impl FieldSpec {
    pub const fn required(name: &'static str) -> Self {
        Self {
            name,
            presence: Presence::Required,
        }
    }

    pub const fn optional(name: &'static str) -> Self {
        Self {
            name,
            presence: Presence::Optional,
        }
    }
}

/// The ordered field list of a record type, built once as a `const`.
#[derive(Debug, Clone, Copy)]
pub struct RecordSpec {
    fields: &'static [FieldSpec],
}

impl RecordSpec {
    pub const fn new(fields: &'static [FieldSpec]) -> Self {
        Self { fields }
    }

    /// Number of presence bits in the record's preamble, i.e. the count of
    /// optional fields.
    pub const fn preamble_len(&self) -> usize {
        let mut count = 0;
        let mut i = 0;
        while i < self.fields.len() {
            if matches!(self.fields[i].presence, Presence::Optional) {
                count += 1;
            }
            i += 1;
        }
        count
    }

    /// Preamble bit index of the optional field named `name`: the number of
    /// optional fields declared before it.
    ///
    /// # Panics
    ///
    /// Panics if `name` is not a declared optional field (a declaration bug
    /// caught by any decode test touching the record).
    pub fn presence_index(&self, name: &str) -> usize {
        let mut index = 0;
        for field in self.fields {
            if field.presence == Presence::Optional {
                if field.name == name {
                    return index;
                }
                index += 1;
            } else if field.name == name {
                panic!("field '{name}' is required, not optional");
            }
        }
        panic!("no optional field named '{name}' declared");
    }
}

/// The presence preamble of one record instance, read once at the start of
/// its decode pass and retained so presence queries never re-read the
/// stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preamble {
    bits: Bitmap,
}

impl Preamble {
    /// Reads the preamble for `spec` from the decoder. Consumes zero bits
    /// when the record declares no optional field.
    pub fn read(dec: &mut UperDecoder<'_>, spec: &RecordSpec) -> Self {
        Self {
            bits: dec.read_bitmap(spec.preamble_len()),
        }
    }

    /// Whether the optional field named `name` is present on the wire.
    ///
    /// The first preamble bit on the wire reports the first declared
    /// optional field, matching the bitmap ordering in the `bits` layer.
    pub fn present(&self, spec: &RecordSpec, name: &str) -> bool {
        let index = spec.presence_index(name);
        let len = self.bits.len();
        index < len && self.bits.get(len - 1 - index)
    }
}
