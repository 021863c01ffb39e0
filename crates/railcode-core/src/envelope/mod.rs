//! Outermost envelope read directly from raw barcode bytes.
//!
//! The envelope record carries a fixed two-character version tag, a format
//! identifier and an opaque octet-string payload. When the format names the
//! flexible-content family, the payload is decoded as a [`UicRailTicket`]
//! through a fresh bit view scoped to the payload bytes; the envelope itself
//! stays valid even when that inner decode fails, so callers can still
//! round-trip the raw buffer (e.g. re-encode it into a new barcode).
//!
//! Validity is a single boolean derived from "was the raw buffer retained":
//! a poisoned outer decode or a version-tag mismatch leaves nothing behind
//! but the diagnostic.

mod error;

pub use error::EnvelopeError;

use serde::{Deserialize, Serialize};

use crate::bits::BitView;
use crate::flex::UicRailTicket;
use crate::records::{FieldSpec, FlexDecode, Preamble, RecordSpec};
use crate::uper::UperDecoder;

/// Format identifier of the flexible-content family version this codec
/// decodes.
pub const FLEX_FORMAT: &str = "FCB3";

/// Decoded outer record of an envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeRecord {
    pub version: String,
    pub format: String,
    #[serde(with = "serde_bytes_hex")]
    pub payload: Vec<u8>,
}

impl EnvelopeRecord {
    const FIELDS: RecordSpec = RecordSpec::new(&[
        FieldSpec::required("versionTag"),
        FieldSpec::required("formatId"),
        FieldSpec::required("payload"),
    ]);
}

impl FlexDecode for EnvelopeRecord {
    fn decode(dec: &mut UperDecoder<'_>) -> Self {
        // No optional fields, so this consumes zero preamble bits.
        let _ = Preamble::read(dec, &Self::FIELDS);
        Self {
            version: dec.read_ia5_string(2, 2),
            format: dec.read_ia5_string(0, 0),
            payload: dec.read_octet_string(),
        }
    }
}

/// A ticket barcode envelope: the raw buffer plus its decoded view.
///
/// Constructed in one pass from `(bytes, expected version tag)`; decoding
/// the same buffer twice yields the same validity and an identical tree.
#[derive(Debug, Clone, PartialEq)]
pub struct TicketEnvelope {
    raw: Option<Vec<u8>>,
    record: Option<EnvelopeRecord>,
    ticket: Option<UicRailTicket>,
    error: Option<EnvelopeError>,
}

impl TicketEnvelope {
    /// Decodes `data` as an envelope carrying `expected_version`.
    ///
    /// Never panics on malformed input: structural problems poison the
    /// underlying decoder and surface through [`error`](Self::error).
    pub fn decode(data: &[u8], expected_version: &str) -> Self {
        let view = BitView::new(data);
        let mut dec = UperDecoder::new(view);
        let record = EnvelopeRecord::decode(&mut dec);

        if let Some(error) = dec.error() {
            return Self::invalid(EnvelopeError::Decode(error.clone()));
        }
        if record.version != expected_version {
            return Self::invalid(EnvelopeError::VersionMismatch {
                found: record.version,
                expected: expected_version.to_string(),
            });
        }

        let ticket = decode_flex_payload(&record);
        Self {
            raw: Some(data.to_vec()),
            record: Some(record),
            ticket,
            error: None,
        }
    }

    fn invalid(error: EnvelopeError) -> Self {
        Self {
            raw: None,
            record: None,
            ticket: None,
            error: Some(error),
        }
    }

    /// Whether the envelope decoded and matched the expected version. There
    /// is no partially-valid state: invalid envelopes expose nothing else.
    pub fn is_valid(&self) -> bool {
        self.raw.is_some()
    }

    /// Diagnostic for an invalid envelope.
    pub fn error(&self) -> Option<&EnvelopeError> {
        self.error.as_ref()
    }

    /// The verbatim input buffer, retained for round-tripping.
    pub fn raw(&self) -> Option<&[u8]> {
        self.raw.as_deref()
    }

    /// The decoded version tag.
    pub fn version(&self) -> Option<&str> {
        self.record.as_ref().map(|record| record.version.as_str())
    }

    /// The decoded format identifier.
    pub fn format(&self) -> Option<&str> {
        self.record.as_ref().map(|record| record.format.as_str())
    }

    /// The opaque payload octet string.
    pub fn payload(&self) -> Option<&[u8]> {
        self.record.as_ref().map(|record| record.payload.as_slice())
    }

    /// The flexible-content ticket carried in the payload, when the format
    /// is known and the payload decodes cleanly.
    pub fn ticket(&self) -> Option<&UicRailTicket> {
        self.ticket.as_ref()
    }
}

/// Decodes the payload of `record` as a flexible-content ticket.
///
/// Uses a fresh [`BitView`] over the payload bytes: the payload is a
/// byte-aligned sub-buffer with its own bit numbering, never a continuation
/// of the outer cursor. Returns `None` for unknown formats or payloads that
/// poison their decoder.
fn decode_flex_payload(record: &EnvelopeRecord) -> Option<UicRailTicket> {
    if record.format != FLEX_FORMAT {
        return None;
    }
    let view = BitView::new(&record.payload);
    let mut dec = UperDecoder::new(view);
    let ticket = UicRailTicket::decode(&mut dec);
    if dec.has_error() { None } else { Some(ticket) }
}

/// Serializes octet strings as lowercase hex, the form control systems and
/// log pipelines expect for binary payloads.
mod serde_bytes_hex {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        let hex: String = bytes.iter().map(|byte| format!("{byte:02x}")).collect();
        serializer.serialize_str(&hex)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let hex = String::deserialize(deserializer)?;
        // Byte-index slicing below requires single-byte characters.
        if !hex.is_ascii() {
            return Err(D::Error::custom("invalid hex digit"));
        }
        if hex.len() % 2 != 0 {
            return Err(D::Error::custom("odd-length hex string"));
        }
        (0..hex.len())
            .step_by(2)
            .map(|i| {
                u8::from_str_radix(&hex[i..i + 2], 16)
                    .map_err(|_| D::Error::custom("invalid hex digit"))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{EnvelopeError, TicketEnvelope};
    use crate::testbits::BitWriter;
    use crate::uper::UperError;

    fn opaque_envelope(version: &str) -> Vec<u8> {
        let mut writer = BitWriter::new();
        writer
            .write_ia5(version, 2, 2)
            .write_ia5("FCB3", 0, 0)
            .write_octets(&[0xde, 0xad, 0xbe, 0xef]);
        writer.finish()
    }

    #[test]
    fn valid_envelope_exposes_record_and_raw_buffer() {
        let data = opaque_envelope("U1");
        let envelope = TicketEnvelope::decode(&data, "U1");
        assert!(envelope.is_valid());
        assert_eq!(envelope.version(), Some("U1"));
        assert_eq!(envelope.format(), Some("FCB3"));
        assert_eq!(envelope.payload(), Some(&[0xde, 0xad, 0xbe, 0xef][..]));
        assert_eq!(envelope.raw(), Some(data.as_slice()));
        // The payload is not a decodable ticket; the envelope stays valid.
        assert_eq!(envelope.ticket(), None);
    }

    #[test]
    fn version_mismatch_reports_invalid_without_panicking() {
        let data = opaque_envelope("U2");
        let envelope = TicketEnvelope::decode(&data, "U1");
        assert!(!envelope.is_valid());
        assert_eq!(envelope.raw(), None);
        assert_eq!(envelope.payload(), None);
        assert_eq!(
            envelope.error(),
            Some(&EnvelopeError::VersionMismatch {
                found: "U2".to_string(),
                expected: "U1".to_string(),
            })
        );
    }

    #[test]
    fn long_form_length_reports_unsupported() {
        let mut writer = BitWriter::new();
        writer.write_ia5("U1", 2, 2).write_bits(0x80, 8);
        let data = writer.finish();
        let envelope = TicketEnvelope::decode(&data, "U1");
        assert!(!envelope.is_valid());
        assert_eq!(
            envelope.error(),
            Some(&EnvelopeError::Decode(UperError::UnsupportedLengthForm))
        );
    }

    #[test]
    fn payload_hex_rejects_non_ascii_without_panicking() {
        let json = r#"{"version":"U1","format":"FCB3","payload":"a€"}"#;
        let result: Result<super::EnvelopeRecord, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn payload_hex_rejects_odd_length() {
        let json = r#"{"version":"U1","format":"FCB3","payload":"abc"}"#;
        let result: Result<super::EnvelopeRecord, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn decoding_twice_is_idempotent() {
        let data = opaque_envelope("U1");
        let first = TicketEnvelope::decode(&data, "U1");
        let second = TicketEnvelope::decode(&data, "U1");
        assert_eq!(first, second);
    }
}
