use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::trace;

use crate::error::{Error, Result};
use crate::{KeyClass, KeyStore};

/// Handle returned by [`MemoryKeyStore`].
///
/// It names the entry rather than owning the bytes, so a handle whose
/// entry was removed stops being valid. A handle is only valid in the
/// store that issued it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemoryKeyRef {
    store_id: u64,
    identifier: Arc<str>,
    class: KeyClass,
}

impl MemoryKeyRef {
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn class(&self) -> KeyClass {
        self.class
    }
}

#[derive(Debug, Clone)]
struct StoredKey {
    class: KeyClass,
    der: Arc<[u8]>,
}

/// A process-local key store.
///
/// Public keys are checked to be PKCS#1 `RSAPublicKey` on import; private
/// keys only need to be a well-formed DER SEQUENCE.
#[derive(Debug)]
pub struct MemoryKeyStore {
    id: u64,
    entries: DashMap<String, StoredKey>,
}

static NEXT_STORE_ID: AtomicU64 = AtomicU64::new(0);

impl Default for MemoryKeyStore {
    fn default() -> Self {
        MemoryKeyStore {
            id: NEXT_STORE_ID.fetch_add(1, Ordering::Relaxed),
            entries: DashMap::new(),
        }
    }
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lookup(&self, handle: &MemoryKeyRef) -> Option<StoredKey> {
        if handle.store_id != self.id {
            return None;
        }
        self.entries
            .get(handle.identifier())
            .map(|stored| stored.value().clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.entries.contains_key(identifier)
    }
}

fn check_key_data(bytes: &[u8], class: KeyClass) -> Result<()> {
    let checked = match class {
        KeyClass::Public => der::validate_rsa_public_key(bytes),
        KeyClass::Private => der::Der::parse(bytes).and_then(|parsed| {
            match parsed.elements() {
                [root] if root.tag() == der::Tag::Sequence => Ok(()),
                _ => Err(der::error::Error::UnrecognizedEnvelope),
            }
        }),
    };
    checked.map_err(|e| Error::InvalidKeyData(e.to_string()))
}

impl KeyStore for MemoryKeyStore {
    type Handle = MemoryKeyRef;

    fn import_key(&self, bytes: &[u8], identifier: &str, class: KeyClass) -> Result<MemoryKeyRef> {
        check_key_data(bytes, class)?;

        match self.entries.entry(identifier.to_string()) {
            Entry::Occupied(_) => Err(Error::DuplicateItem(identifier.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(StoredKey {
                    class,
                    der: Arc::from(bytes),
                });
                trace!(identifier, %class, len = bytes.len(), "stored key");
                Ok(MemoryKeyRef {
                    store_id: self.id,
                    identifier: Arc::from(identifier),
                    class,
                })
            }
        }
    }

    fn remove_key(&self, identifier: &str) -> Result<()> {
        if self.entries.remove(identifier).is_some() {
            trace!(identifier, "removed key");
        }
        Ok(())
    }

    fn is_valid_key_reference(&self, handle: &MemoryKeyRef, expected: KeyClass) -> bool {
        handle.class == expected
            && self
                .lookup(handle)
                .is_some_and(|stored| stored.class == expected)
    }

    fn external_representation(&self, handle: &MemoryKeyRef) -> Result<Vec<u8>> {
        self.lookup(handle)
            .map(|stored| stored.der.to_vec())
            .ok_or_else(|| Error::ItemNotFound(handle.identifier().to_string()))
    }
}
