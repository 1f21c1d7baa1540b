use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The wrapped handle does not refer to a public key.
    #[error("not a public key")]
    NotAPublicKey,

    #[error("malformed key envelope: {0}")]
    Format(#[from] der::error::Error),

    #[error("keystore rejected the key: {0}")]
    Import(#[source] keystore::Error),

    #[error("cannot retrieve key bytes: {0}")]
    Serialization(#[source] keystore::Error),

    #[error("cannot remove key from keystore: {0}")]
    Removal(#[source] keystore::Error),

    #[error("PEM: {0}")]
    Pem(#[from] pem::error::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
