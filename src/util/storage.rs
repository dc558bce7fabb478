//! Key-value persistence for the widget's message log.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session controller writes the full message list under one key per
//! site. In the browser that key lives in `localStorage`; natively (tests,
//! non-browser hosts) an in-memory map stands in.
//!
//! ERROR HANDLING
//! ==============
//! Every operation returns `StorageError` so callers decide whether a failure
//! is worth more than a console line. The controller only logs.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::cell::RefCell;
use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Errors raised by [`KeyValueStore`] backends and the JSON helpers.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No storage area is reachable (no window, storage disabled by policy).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Reading a key failed.
    #[error("storage read failed for {key}: {message}")]
    Read { key: String, message: String },

    /// Writing a key failed (quota exceeded, storage disabled).
    #[error("storage write failed for {key}: {message}")]
    Write { key: String, message: String },

    /// The stored value could not be decoded as the expected JSON shape.
    #[error("stored value for {key} is not valid: {source}")]
    Decode { key: String, source: serde_json::Error },

    /// The value could not be encoded as JSON.
    #[error("failed to encode value for {key}: {source}")]
    Encode { key: String, source: serde_json::Error },
}

/// A string-to-string storage area with `localStorage` semantics.
pub trait KeyValueStore {
    /// Read the raw value for `key`, `None` if it was never written.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing store cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the raw value for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing store rejects the write.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }
}

/// Load a JSON value stored under `key`.
///
/// # Errors
///
/// Returns [`StorageError::Decode`] when the stored text is not valid JSON
/// for `T`, or the store's own read error.
pub fn load_json<T: DeserializeOwned>(store: &impl KeyValueStore, key: &str) -> Result<Option<T>, StorageError> {
    let Some(raw) = store.get_item(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StorageError::Decode { key: key.to_owned(), source })
}

/// Serialize `value` and overwrite `key` with it.
///
/// # Errors
///
/// Returns [`StorageError::Encode`] or the store's own write error.
pub fn save_json<T: Serialize + ?Sized>(store: &impl KeyValueStore, key: &str, value: &T) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value).map_err(|source| StorageError::Encode { key: key.to_owned(), source })?;
    store.set_item(key, &raw)
}

/// In-process storage area used outside the browser.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// The page origin's `window.localStorage`.
#[cfg(feature = "csr")]
#[derive(Clone, Debug)]
pub struct BrowserStorage {
    inner: web_sys::Storage,
}

#[cfg(feature = "csr")]
impl BrowserStorage {
    /// Open `localStorage` for the current window.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] when there is no window or the
    /// browser refuses access.
    pub fn local() -> Result<Self, StorageError> {
        let window = web_sys::window().ok_or_else(|| StorageError::Unavailable("no window".to_owned()))?;
        match window.local_storage() {
            Ok(Some(inner)) => Ok(Self { inner }),
            Ok(None) => Err(StorageError::Unavailable("localStorage is disabled".to_owned())),
            Err(e) => Err(StorageError::Unavailable(format!("{e:?}"))),
        }
    }
}

#[cfg(feature = "csr")]
impl KeyValueStore for BrowserStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner
            .get_item(key)
            .map_err(|e| StorageError::Read { key: key.to_owned(), message: format!("{e:?}") })
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner
            .set_item(key, value)
            .map_err(|e| StorageError::Write { key: key.to_owned(), message: format!("{e:?}") })
    }
}
