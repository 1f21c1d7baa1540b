use thiserror::Error;

/// Errors reported by a [`KeyStore`](crate::KeyStore) implementation.
///
/// Platform adapters map their native status codes onto these variants;
/// anything without a natural match goes into [`Error::Backend`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The store refused the key bytes as malformed.
    #[error("invalid key data: {0}")]
    InvalidKeyData(String),

    /// The key type or class is not supported by the store.
    #[error("unsupported key type")]
    UnsupportedKeyType,

    /// An entry with this identifier already exists.
    #[error("duplicate keystore item: {0}")]
    DuplicateItem(String),

    /// No entry with this identifier exists.
    #[error("keystore item not found: {0}")]
    ItemNotFound(String),

    #[error("keystore backend: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, Error>;
