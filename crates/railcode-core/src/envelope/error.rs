use thiserror::Error;

use crate::uper::UperError;

/// Why an envelope failed to validate.
///
/// `VersionMismatch` is the *expected* outcome when probing a buffer against
/// several envelope versions in sequence; only `Decode` indicates input this
/// codec could not read at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    #[error("envelope decode failed: {0}")]
    Decode(#[from] UperError),
    #[error("version tag '{found}' does not match expected '{expected}'")]
    VersionMismatch { found: String, expected: String },
}
