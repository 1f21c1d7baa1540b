//! RSA public keys held in a [`KeyStore`].
//!
//! A [`PublicKey`] comes from one of two places:
//!
//! - **an existing handle** ([`PublicKey::from_handle`]): the key already
//!   lives in the store and someone else owns its entry. Nothing is removed
//!   when the `PublicKey` goes away.
//! - **key bytes** ([`PublicKey::from_bytes`] and the PEM/base64 helpers):
//!   the bytes are stripped to PKCS#1 and imported under a fresh random
//!   tag. The `PublicKey` owns that entry and removes it when dropped or
//!   disposed.

use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use kagi::decoder::Decoder;
use keystore::{KeyClass, KeyStore};
use pem::{Label, Pem, PemFormat, ToPem};
use tracing::{debug, trace, warn};
use uuid::Uuid;

use crate::error::{Error, Result};

pub struct PublicKey<S: KeyStore> {
    store: Arc<S>,
    handle: S::Handle,
    /// Bytes as given to `from_bytes`, before header stripping.
    original_data: Option<Vec<u8>>,
    /// Identifier of the store entry this key owns.
    tag: Option<String>,
}

impl<S: KeyStore> PublicKey<S> {
    /// Wraps a handle that already refers to a public key in `store`.
    ///
    /// The entry is borrowed, not owned: no tag is kept and dropping the
    /// returned key leaves the store untouched.
    ///
    /// # Errors
    ///
    /// [`Error::NotAPublicKey`] when the store does not recognize `handle`
    /// as a public key.
    pub fn from_handle(store: Arc<S>, handle: S::Handle) -> Result<Self> {
        if !store.is_valid_key_reference(&handle, KeyClass::Public) {
            return Err(Error::NotAPublicKey);
        }

        Ok(PublicKey {
            store,
            handle,
            original_data: None,
            tag: None,
        })
    }

    /// Imports DER key bytes, either a `SubjectPublicKeyInfo` or a PKCS#1
    /// `RSAPublicKey`.
    ///
    /// Each call imports under a new random 128-bit tag, so importing the
    /// same bytes twice yields two independent entries.
    ///
    /// # Errors
    ///
    /// - [`Error::Format`] when the envelope cannot be stripped
    /// - [`Error::Import`] when the store rejects the key
    pub fn from_bytes(store: Arc<S>, data: &[u8]) -> Result<Self> {
        let tag = Uuid::new_v4().to_string();
        let stripped = der::strip_key_header(data)?;
        let handle = store
            .import_key(&stripped, &tag, KeyClass::Public)
            .map_err(Error::Import)?;
        debug!(%tag, len = stripped.len(), "imported public key");

        Ok(PublicKey {
            store,
            handle,
            original_data: Some(data.to_vec()),
            tag: Some(tag),
        })
    }

    /// Imports a single PEM block labelled `PUBLIC KEY` or `RSA PUBLIC KEY`.
    pub fn from_pem_str(store: Arc<S>, text: &str) -> Result<Self> {
        let pem: Pem = text.decode()?;
        let data: Vec<u8> = pem.decode()?;
        Self::from_bytes(store, &data)
    }

    /// Imports base64 encoded DER. Whitespace inside `encoded` is ignored.
    pub fn from_base64(store: Arc<S>, encoded: &str) -> Result<Self> {
        let data = pem::decode_base64(encoded)?;
        Self::from_bytes(store, &data)
    }

    /// Imports every public key found in `document`.
    ///
    /// Each `PUBLIC KEY` block located by [`pem::scan`] is imported on its
    /// own. A block that fails to import is logged and skipped, so
    /// decorative or broken PEM text next to real keys does not prevent
    /// those keys from loading. Returns an empty vector when nothing
    /// imports.
    pub fn extract_all(store: &Arc<S>, document: &str) -> Vec<Self> {
        let blocks = pem::scan(document);
        trace!(candidates = blocks.len(), "scanned document for public keys");

        blocks
            .iter()
            .filter_map(
                |block| match Self::from_pem_str(Arc::clone(store), block.as_str()) {
                    Ok(key) => Some(key),
                    Err(e) => {
                        debug!(start = block.start(), error = %e, "skipping public key candidate");
                        None
                    }
                },
            )
            .collect()
    }

    pub fn handle(&self) -> &S::Handle {
        &self.handle
    }

    pub fn original_data(&self) -> Option<&[u8]> {
        self.original_data.as_deref()
    }

    /// Store identifier of the owned entry; `None` for wrapped handles.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// PKCS#1 bytes of the key as exported by the store.
    ///
    /// # Errors
    ///
    /// [`Error::Serialization`] when the store cannot export the key.
    pub fn data(&self) -> Result<Vec<u8>> {
        self.store
            .external_representation(&self.handle)
            .map_err(Error::Serialization)
    }

    pub fn base64_string(&self) -> Result<String> {
        Ok(self.to_pem()?.data().to_string())
    }

    /// Encodes the key as an `RSA PUBLIC KEY` PEM block, 64 columns wide,
    /// every line terminated by `\n`.
    ///
    /// # Errors
    ///
    /// [`Error::Serialization`] when the store cannot export the key.
    pub fn to_pem_string(&self) -> Result<String> {
        self.to_pem_string_with(&PemFormat::default())
    }

    pub fn to_pem_string_with(&self, format: &PemFormat) -> Result<String> {
        Ok(self.to_pem()?.format(format))
    }

    /// Removes the owned store entry now instead of at drop time.
    ///
    /// A no-op for keys created from a handle.
    ///
    /// # Errors
    ///
    /// [`Error::Removal`] when the store fails to delete the entry. The
    /// removal is not retried on drop.
    pub fn dispose(mut self) -> Result<()> {
        match self.release() {
            Some(Err(e)) => Err(Error::Removal(e)),
            _ => Ok(()),
        }
    }

    fn release(&mut self) -> Option<keystore::Result<()>> {
        let tag = self.tag.take()?;
        let removed = self.store.remove_key(&tag);
        if removed.is_ok() {
            debug!(%tag, "removed public key");
        }
        Some(removed.map_err(|e| {
            warn!(%tag, error = %e, "failed to remove public key from keystore");
            e
        }))
    }
}

impl<S: KeyStore> Drop for PublicKey<S> {
    fn drop(&mut self) {
        let _ = self.release();
    }
}

impl<S: KeyStore> ToPem for PublicKey<S> {
    type Error = Error;

    fn pem_label(&self) -> Label {
        Label::RSAPublicKey
    }

    fn to_pem(&self) -> Result<Pem> {
        Ok(Pem::from_bytes(self.pem_label(), &self.data()?))
    }
}

impl<S: KeyStore> Debug for PublicKey<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKey")
            .field("handle", &self.handle)
            .field("tag", &self.tag)
            .field(
                "original_data",
                &self.original_data.as_ref().map(|d| d.len()),
            )
            .finish()
    }
}
