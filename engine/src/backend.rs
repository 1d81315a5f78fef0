//! Key/value byte stores the keyed lists persist into.
//!
//! Backends are **opaque byte stores**: they know nothing about palettes or
//! JSON. The list layer owns all encoding.
//!
//! # Implementors
//!
//! - [`MemoryBackend`] - For testing and ephemeral stores
//! - [`FileBackend`] - One file per key inside a directory

use crate::error::{Error, Result};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};

/// A key/value store of raw bytes.
///
/// # Invariants
///
/// - `get` returns exactly the bytes of the last successful `set` for that key
/// - `set` replaces the whole value; a reader never sees a partial write
/// - every successful `set` is announced to current subscribers by key
pub trait KeyValueBackend: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Replace the value stored under `key`.
    fn set(&self, key: &str, bytes: &[u8]) -> Result<()>;

    /// Stream of keys whose value changed.
    fn subscribe(&self) -> Receiver<String>;
}

/// Fan-out of changed keys to any number of receivers.
#[derive(Debug, Default)]
struct KeyNotifier {
    subscribers: RwLock<Vec<Sender<String>>>,
}

impl KeyNotifier {
    fn subscribe(&self) -> Receiver<String> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.write().push(tx);
        rx
    }

    fn notify(&self, key: &str) {
        // Drop receivers that have gone away.
        self.subscribers
            .write()
            .retain(|tx| tx.send(key.to_string()).is_ok());
    }
}

/// An in-memory backend.
///
/// Thread-safe; clones of the data are handed out on `get`.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    values: RwLock<HashMap<String, Vec<u8>>>,
    notifier: KeyNotifier,
}

impl MemoryBackend {
    /// Creates a new empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend with pre-existing values.
    ///
    /// Useful for testing reload and decode-failure paths.
    #[must_use]
    pub fn with_values(values: impl IntoIterator<Item = (String, Vec<u8>)>) -> Self {
        Self {
            values: RwLock::new(values.into_iter().collect()),
            notifier: KeyNotifier::default(),
        }
    }

    /// Write as if another process changed the value.
    ///
    /// Identical to `set`; named separately so tests read clearly.
    pub fn set_external(&self, key: &str, bytes: &[u8]) {
        self.values.write().insert(key.to_string(), bytes.to_vec());
        self.notifier.notify(key);
    }

    /// All keys currently stored.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.values.read().keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl KeyValueBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.values.read().get(key).cloned())
    }

    fn set(&self, key: &str, bytes: &[u8]) -> Result<()> {
        self.values.write().insert(key.to_string(), bytes.to_vec());
        self.notifier.notify(key);
        Ok(())
    }

    fn subscribe(&self) -> Receiver<String> {
        self.notifier.subscribe()
    }
}

/// A backend storing one file per key in a directory.
///
/// Writes go to a sibling temporary file which is then renamed over the
/// target, so a crash mid-write leaves the previous value intact.
#[derive(Debug)]
pub struct FileBackend {
    dir: PathBuf,
    notifier: KeyNotifier,
}

impl FileBackend {
    /// Opens (creating if needed) a backend rooted at `dir`.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        tracing::debug!(dir = %dir.display(), "opened file backend");
        Ok(Self {
            dir,
            notifier: KeyNotifier::default(),
        })
    }

    /// Root directory of this backend.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() {
            return Err(Error::InvalidArgument("empty key".into()));
        }
        Ok(self.dir.join(format!("{}.json", file_stem(key))))
    }
}

impl KeyValueBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, &path)?;
        self.notifier.notify(key);
        Ok(())
    }

    fn subscribe(&self) -> Receiver<String> {
        self.notifier.subscribe()
    }
}

/// Map a key onto a portable file stem.
///
/// Bytes outside `[A-Za-z0-9._-]` are written as `%XX`, so distinct keys
/// never share a file.
fn file_stem(key: &str) -> String {
    let mut stem = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'.' | b'-' | b'_' => {
                stem.push(char::from(byte));
            }
            _ => stem.push_str(&format!("%{byte:02X}")),
        }
    }
    stem
}
