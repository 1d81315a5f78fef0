//! A list of records persisted as one value under a string key.
//!
//! The list is loaded once at construction and written back in full after
//! every mutation. Persistence is best-effort: the in-memory items stay
//! authoritative for the life of the process, and storage problems are only
//! logged.

use crate::backend::KeyValueBackend;
use crate::error::{Error, Result};
use parking_lot::RwLock;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

/// Prefix applied to every key before it reaches the backend.
pub const KEY_PREFIX: &str = "UserDefaultsStore.";

/// Why a list announced a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeCause {
    /// Items were read from storage at construction.
    Loaded,
    /// Items were mutated in-process and written back.
    Saved,
    /// Storage was changed by someone else and the list reloaded.
    ExternalReload,
}

/// A change notification from a [`KeyedList`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListChanged {
    /// Unprefixed key of the list.
    pub key: String,
    /// Incremented on every notification.
    pub revision: u64,
    pub cause: ChangeCause,
}

/// An ordered list of `T` persisted under `key`.
pub struct KeyedList<T> {
    key: String,
    storage_key: String,
    items: Vec<T>,
    backend: Arc<dyn KeyValueBackend>,
    /// Bytes last read from or written to storage.
    raw: Option<Vec<u8>>,
    revision: u64,
    subscribers: RwLock<Vec<Sender<ListChanged>>>,
    external: Option<Receiver<String>>,
}

impl<T> std::fmt::Debug for KeyedList<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyedList")
            .field("key", &self.key)
            .field("len", &self.items.len())
            .field("revision", &self.revision)
            .field("watching", &self.external.is_some())
            .finish()
    }
}

impl<T> KeyedList<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Load the list stored under `key`, or start from `defaults`.
    ///
    /// Missing or undecodable data falls back to `defaults`; the defaults are
    /// not written until the first mutation.
    pub fn open(
        backend: Arc<dyn KeyValueBackend>,
        key: impl Into<String>,
        defaults: Vec<T>,
        watch_for_changes: bool,
    ) -> Self {
        let key = key.into();
        let storage_key = format!("{KEY_PREFIX}{key}");
        // Subscribe before reading so no external write slips between.
        let external = watch_for_changes.then(|| backend.subscribe());

        let mut list = Self {
            key,
            storage_key,
            items: Vec::new(),
            backend,
            raw: None,
            revision: 0,
            subscribers: RwLock::new(Vec::new()),
            external,
        };

        if !list.reload(ChangeCause::Loaded) {
            list.items = defaults;
        }
        list
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Receive a [`ListChanged`] for every future load, save or reload.
    pub fn subscribe(&self) -> Receiver<ListChanged> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.write().push(tx);
        rx
    }

    /// Mutate the items, then persist and notify exactly once.
    pub fn update<R>(&mut self, mutate: impl FnOnce(&mut Vec<T>) -> R) -> R {
        let result = mutate(&mut self.items);
        self.save();
        result
    }

    /// Serialize the full list and write it back.
    ///
    /// Always notifies, even when the write fails or nothing changed.
    pub fn save(&mut self) {
        match self.write() {
            Ok(len) => {
                tracing::debug!(key = %self.key, bytes = len, "saved list");
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "failed to persist list");
            }
        }
        self.notify(ChangeCause::Saved);
    }

    fn write(&mut self) -> Result<usize> {
        let encoded = serde_json::to_vec(&self.items).map_err(|e| Error::Encode(e.to_string()))?;
        let len = encoded.len();
        self.backend.set(&self.storage_key, &encoded)?;
        // Remember our own bytes so the echo is not taken for an external write.
        self.raw = Some(encoded);
        Ok(len)
    }

    /// Re-read storage; replaces the items when the stored bytes differ from
    /// the last known bytes and decode. Returns whether the items changed.
    fn reload(&mut self, cause: ChangeCause) -> bool {
        let fresh = match self.backend.get(&self.storage_key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return false,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "failed to read list");
                return false;
            }
        };
        if self.raw.as_deref() == Some(fresh.as_slice()) {
            return false;
        }
        match decode::<T>(&fresh) {
            Ok(items) => {
                tracing::debug!(key = %self.key, count = items.len(), "loaded list");
                self.items = items;
                self.raw = Some(fresh);
                self.notify(cause);
                true
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "ignoring undecodable list");
                false
            }
        }
    }

    /// In watch mode, reload if storage for this key changed underneath us.
    ///
    /// Returns `true` only when the items were actually replaced. Outside
    /// watch mode this is a no-op. Every queued key is consumed, so the
    /// queue holds at most the writes made since the previous poll.
    pub fn poll_external_changes(&mut self) -> bool {
        let Some(rx) = &self.external else {
            return false;
        };
        let touched = rx
            .try_iter()
            .filter(|key| *key == self.storage_key)
            .count()
            > 0;
        if !touched {
            return false;
        }
        let changed = self.reload(ChangeCause::ExternalReload);
        if changed {
            tracing::info!(key = %self.key, "reloaded list after external change");
        }
        changed
    }

    fn notify(&mut self, cause: ChangeCause) {
        self.revision += 1;
        let event = ListChanged {
            key: self.key.clone(),
            revision: self.revision,
            cause,
        };
        self.subscribers
            .write()
            .retain(|tx| tx.send(event.clone()).is_ok());
    }
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<Vec<T>> {
    serde_json::from_slice(bytes).map_err(|e| Error::Decode(e.to_string()))
}
