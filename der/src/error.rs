use thiserror::Error;

use crate::Tag;

#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error("parser error {0:?}")]
    Parser(nom::error::ErrorKind),
    #[error("DER nesting deeper than {0} levels")]
    NestingTooDeep(usize),
    #[error("{0} trailing bytes after the DER element")]
    TrailingData(usize),
    #[error("key data is {len} bytes, shorter than the minimum of {min}")]
    TooShort { len: usize, min: usize },
    #[error("expected {expected:?}, got {actual:?}")]
    UnexpectedTag { expected: Tag, actual: Tag },
    #[error("unsupported key algorithm: {0:02x?}")]
    UnsupportedAlgorithm(Vec<u8>),
    #[error("bit string with {0} unused bits cannot hold a key")]
    InvalidBitString(u8),
    #[error("unrecognized key envelope")]
    UnrecognizedEnvelope,
    #[error("pem: {0}")]
    Pem(#[from] pem::error::Error),
}

impl From<nom::Err<nom::error::Error<&[u8]>>> for Error {
    fn from(err: nom::Err<nom::error::Error<&[u8]>>) -> Self {
        match err {
            // only complete parsers are used, so running out of input is
            // reported like any other parse failure.
            nom::Err::Incomplete(_) => Error::Parser(nom::error::ErrorKind::Complete),
            nom::Err::Error(e) | nom::Err::Failure(e) => Error::Parser(e.code),
        }
    }
}
