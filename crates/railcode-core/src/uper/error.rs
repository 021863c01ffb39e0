use thiserror::Error;

/// Errors recorded by a poisoned [`UperDecoder`](super::UperDecoder).
///
/// These are never propagated as `Result`s across the decode boundary: the
/// first error is stored on the decoder and read once after the pass. The
/// variants keep "this input uses a feature we deliberately do not
/// implement" distinct from "this input is corrupt".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UperError {
    #[error("read past end of data: need {needed} bits, {available} available")]
    OutOfBounds { needed: usize, available: usize },
    #[error("unsupported length form: multi-byte length determinant not implemented")]
    UnsupportedLengthForm,
    #[error("extension not implemented: {what} uses a variant outside the known set")]
    ExtensionNotImplemented { what: &'static str },
    #[error("invalid choice index {index} for {what}: {variants} variants declared")]
    InvalidChoiceIndex {
        what: &'static str,
        index: usize,
        variants: usize,
    },
    #[error("invalid enumerated index {index} for {what}: {variants} values declared")]
    InvalidEnumIndex {
        what: &'static str,
        index: usize,
        variants: usize,
    },
    #[error("invalid UTF-8 in string payload")]
    InvalidUtf8,
    #[error("seek to bit {target} past end of data ({size} bits)")]
    SeekOutOfBounds { target: usize, size: usize },
}
