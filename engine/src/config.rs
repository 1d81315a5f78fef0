//! Store configuration.

use crate::{default_palettes, Palette};

/// Key of the process-wide palette list.
pub const SHARED_KEY: &str = "PaletteStore.shared";

/// Suffix appended to a store key to name its recently-deleted bin.
pub const RECENTLY_DELETED_SUFFIX: &str = ".recentlyDeleted";

/// How to open a [`crate::PaletteStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Key of the live list.
    pub key: String,
    /// Key of the recently-deleted bin; `None` disables soft delete.
    pub recently_deleted_key: Option<String>,
    /// Reload when the backend reports writes from elsewhere.
    pub watch_for_changes: bool,
    /// Palettes used when nothing is stored under `key`.
    pub defaults: Vec<Palette>,
}

impl StoreConfig {
    /// An empty store under `key` with no bin and no defaults.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            recently_deleted_key: None,
            watch_for_changes: false,
            defaults: Vec::new(),
        }
    }

    /// The shared store: built-in defaults plus a recently-deleted bin.
    pub fn shared() -> Self {
        Self::new(SHARED_KEY)
            .with_defaults(default_palettes())
            .with_recently_deleted()
    }

    pub fn with_defaults(mut self, defaults: Vec<Palette>) -> Self {
        self.defaults = defaults;
        self
    }

    /// Keep deleted palettes in a bin named after the store key.
    pub fn with_recently_deleted(mut self) -> Self {
        self.recently_deleted_key = Some(format!("{}{}", self.key, RECENTLY_DELETED_SUFFIX));
        self
    }

    pub fn with_recently_deleted_key(mut self, key: impl Into<String>) -> Self {
        self.recently_deleted_key = Some(key.into());
        self
    }

    pub fn watch_for_changes(mut self, watch: bool) -> Self {
        self.watch_for_changes = watch;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::shared()
    }
}
