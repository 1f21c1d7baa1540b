//! # keystore
//!
//! The contract between kagi and the secure store that actually holds key
//! material: an OS keychain, a PKCS#11 token, or the in-memory
//! [`MemoryKeyStore`] shipped here.
//!
//! A store hands out opaque handles. kagi never looks inside a handle; it
//! only passes it back to the store that produced it.
//!
//! ## Identifiers
//!
//! Every imported key lives under a caller-chosen identifier (a "tag").
//! The caller guarantees uniqueness, which is what makes concurrent imports
//! under distinct identifiers safe. Removing an identifier that does not
//! exist is not an error.
//!
//! ## Example
//!
//! ```
//! use keystore::{KeyClass, KeyStore, MemoryKeyStore};
//!
//! let store = MemoryKeyStore::new();
//! let rsa = [0x30, 0x06, 0x02, 0x01, 0x07, 0x02, 0x01, 0x03];
//!
//! let handle = store.import_key(&rsa, "example", KeyClass::Public).unwrap();
//! assert!(store.is_valid_key_reference(&handle, KeyClass::Public));
//!
//! store.remove_key("example").unwrap();
//! store.remove_key("example").unwrap();
//! assert!(!store.is_valid_key_reference(&handle, KeyClass::Public));
//! ```

#![forbid(unsafe_code)]

pub mod error;
mod memory;

use std::fmt::{self, Debug, Display, Formatter};

pub use error::{Error, Result};
pub use memory::{MemoryKeyRef, MemoryKeyStore};

/// The class attribute a store records for each key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyClass {
    Public,
    Private,
}

impl Display for KeyClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            KeyClass::Public => write!(f, "public"),
            KeyClass::Private => write!(f, "private"),
        }
    }
}

/// Capability set kagi needs from a secure key store.
///
/// Implementations must be shareable across threads; kagi holds stores
/// behind an `Arc`.
pub trait KeyStore: Send + Sync {
    /// Opaque reference to a key held by the store.
    type Handle: Clone + Debug;

    /// Imports DER key bytes under `identifier`.
    ///
    /// For [`KeyClass::Public`] the bytes are a PKCS#1 `RSAPublicKey`.
    ///
    /// # Errors
    ///
    /// Fails when the bytes are malformed, the key type is unsupported or
    /// the identifier is already taken.
    fn import_key(&self, der: &[u8], identifier: &str, class: KeyClass) -> Result<Self::Handle>;

    /// Deletes the entry stored under `identifier`.
    ///
    /// Idempotent: a missing identifier returns `Ok(())`.
    fn remove_key(&self, identifier: &str) -> Result<()>;

    /// Returns `true` when `handle` refers to a live key of class `expected`.
    fn is_valid_key_reference(&self, handle: &Self::Handle, expected: KeyClass) -> bool;

    /// Returns the DER bytes the store holds for `handle`.
    ///
    /// # Errors
    ///
    /// Fails when the store cannot or will not export the key, for example
    /// because its entry was removed.
    fn external_representation(&self, handle: &Self::Handle) -> Result<Vec<u8>>;
}
