use base64::DecodeError;
use thiserror::Error;

/// Errors that can occur when parsing or decoding PEM data.
///
/// A block needs a `BEGIN` boundary, at least one base64 line and an `END`
/// boundary carrying the same label.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Missing the opening boundary marker (e.g., `-----BEGIN PUBLIC KEY-----`)
    #[error("missing a pre encapsulation boundary")]
    MissingPreEncapsulationBoundary,

    /// Missing the closing boundary marker (e.g., `-----END PUBLIC KEY-----`)
    #[error("missing a post encapsulation boundary")]
    MissingPostEncapsulationBoundary,

    /// No data found between boundary markers
    #[error("missing PEM data")]
    MissingData,

    /// The label in the boundary marker is not recognized
    #[error("invalid label: {0}")]
    InvalidLabel(String),

    /// The BEGIN and END labels do not match
    #[error("label doesn't match")]
    LabelMissMatch,

    /// Blank line or non-base64 character inside the block
    #[error("invalid base64line")]
    InvalidBase64Line,

    #[error("base64 decode: {0}")]
    Base64Decode(DecodeError),
}
