//! Railcode core library: bit-exact decoding of railway ticket barcodes.
//!
//! This crate implements the structured-record codec used by the CLI: a
//! generic ASN.1 UPER decoder (`bits` and `uper` layers) and the declarative
//! record-decoding protocol built on top of it (`records`), used to parse
//! the flexible-content ticket family (`flex`) out of its container
//! envelope (`envelope`). Decoding is a pure function from
//! `(bytes, expected version tag)` to a validity flag and a record tree; all
//! I/O stays in the CLI.
//!
//! Invariants:
//! - All bit positions are numbered from 0 at the most significant bit of
//!   byte 0, big-endian throughout.
//! - A poisoned decoder never recovers; the whole pass is discarded.
//! - Malformed input fails deterministically; decoding the same buffer
//!   twice yields identical results.
//!
//! # Examples
//! ```
//! use railcode_core::decode_envelope;
//!
//! // Not a decodable envelope; reported as invalid, never a panic.
//! let envelope = decode_envelope(&[0x00, 0x01], "U1");
//! assert!(!envelope.is_valid());
//! ```

use serde::{Deserialize, Serialize};

pub mod bits;
pub mod envelope;
pub mod flex;
pub mod records;
pub mod uper;

#[doc(hidden)]
pub mod testbits;

pub use envelope::{EnvelopeError, EnvelopeRecord, FLEX_FORMAT, TicketEnvelope};
pub use flex::UicRailTicket;

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Default timestamp used when the caller supplies no generation time.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Decodes a raw barcode payload as a ticket envelope.
///
/// Convenience wrapper over [`TicketEnvelope::decode`]; callers probing
/// several envelope versions call this once per expected tag.
///
/// # Examples
/// ```
/// use railcode_core::decode_envelope;
///
/// let envelope = decode_envelope(&[], "U1");
/// assert!(!envelope.is_valid());
/// assert!(envelope.error().is_some());
/// ```
pub fn decode_envelope(data: &[u8], expected_version: &str) -> TicketEnvelope {
    TicketEnvelope::decode(data, expected_version)
}

/// Decode report with deterministic content for a given input.
///
/// # Examples
/// ```
/// use railcode_core::{decode_envelope, make_report};
///
/// let envelope = decode_envelope(&[], "U1");
/// let report = make_report("ticket.bin", 0, &envelope);
/// assert_eq!(report.report_version, railcode_core::REPORT_VERSION);
/// assert!(!report.envelope.valid);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodeReport {
    /// Report schema version (not the barcode version).
    pub report_version: u32,
    /// Tool identification metadata.
    pub tool: ToolInfo,
    /// RFC3339 timestamp representing the report generation time.
    pub generated_at: String,
    /// Input payload metadata.
    pub input: InputInfo,
    /// Envelope-level outcome.
    pub envelope: EnvelopeSummary,
    /// Decoded ticket tree, when the payload carried one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket: Option<UicRailTicket>,
}

/// Tool metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name (e.g., "railcode").
    pub name: String,
    /// Tool version (semver).
    pub version: String,
}

/// Input payload metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided to the decoder.
    pub path: String,
    /// Input size in bytes.
    pub bytes: u64,
}

/// Envelope-level summary of a decode pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvelopeSummary {
    /// Whether the envelope decoded and matched the expected version.
    pub valid: bool,
    /// Decoded version tag, when valid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Decoded format identifier, when valid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Payload size in bytes, when valid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload_bytes: Option<u64>,
    /// Diagnostic for invalid envelopes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}

/// Builds a report for one decode pass over `envelope`.
///
/// `generated_at` is filled with [`DEFAULT_GENERATED_AT`]; callers wanting a
/// real timestamp overwrite it (the CLI does).
pub fn make_report(input_path: &str, input_bytes: u64, envelope: &TicketEnvelope) -> DecodeReport {
    DecodeReport {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "railcode".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: DEFAULT_GENERATED_AT.to_string(),
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
        },
        envelope: EnvelopeSummary {
            valid: envelope.is_valid(),
            version: envelope.version().map(str::to_string),
            format: envelope.format().map(str::to_string),
            payload_bytes: envelope.payload().map(|payload| payload.len() as u64),
            diagnostic: envelope.error().map(|error| error.to_string()),
        },
        ticket: envelope.ticket().cloned(),
    }
}
