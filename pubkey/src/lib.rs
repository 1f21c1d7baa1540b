//! # pubkey
//!
//! RSA public keys loaded from PEM text and held in a keystore.
//!
//! ```text
//! document ──scan──▶ PEM blocks ──base64──▶ DER ──strip──▶ PKCS#1 ──import──▶ KeyStore
//! ```
//!
//! Keys imported from bytes own their keystore entry and delete it when
//! dropped. Keys wrapped around an existing handle never delete anything.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use keystore::MemoryKeyStore;
//! use pubkey::PublicKey;
//!
//! let store = Arc::new(MemoryKeyStore::new());
//! let document = "\
//! -----BEGIN PUBLIC KEY-----
//! MCQwDQYJKoZIhvcNAQEBBQADEwAwEAIJAKu7L0k2ZOKhAgMBAAE=
//! -----END PUBLIC KEY-----
//! ";
//!
//! let keys = PublicKey::extract_all(&store, document);
//! assert_eq!(keys.len(), 1);
//! assert!(keys[0].to_pem_string().unwrap().starts_with("-----BEGIN RSA PUBLIC KEY-----\n"));
//!
//! drop(keys);
//! assert!(store.is_empty());
//! ```

#![forbid(unsafe_code)]

pub mod error;
mod public_key;

pub use error::{Error, Result};
pub use pem::{LineEnding, PemFormat};
pub use public_key::PublicKey;
