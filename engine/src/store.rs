//! Store - the palette list and its recently-deleted bin.
//!
//! The store is a thin layer over two [`KeyedList`]s. Every intent touches
//! exactly one list, except `delete` and `undelete` which move a palette
//! between the live list and the bin.

use crate::backend::{KeyValueBackend, MemoryBackend};
use crate::cursor::{self, wrap, Cursor};
use crate::error::{Error, Result};
use crate::list::{KeyedList, ListChanged};
use crate::record::next_id;
use crate::{Palette, PaletteId, StoreConfig};
use parking_lot::Mutex;
use std::sync::mpsc::Receiver;
use std::sync::Arc;

/// A store shared between the parts of an application.
///
/// Construct once at startup and hand out clones of the handle; holding
/// the lock makes `delete`/`undelete` atomic with respect to other holders.
pub type SharedPaletteStore = Arc<Mutex<PaletteStore>>;

/// The palette store.
#[derive(Debug)]
pub struct PaletteStore {
    live: KeyedList<Palette>,
    recently_deleted: Option<KeyedList<Palette>>,
}

impl PaletteStore {
    /// Open the store described by `config` over `backend`.
    pub fn open(backend: Arc<dyn KeyValueBackend>, config: StoreConfig) -> Self {
        let StoreConfig {
            key,
            recently_deleted_key,
            watch_for_changes,
            defaults,
        } = config;

        let recently_deleted = recently_deleted_key.map(|bin_key| {
            KeyedList::open(backend.clone(), bin_key, Vec::new(), watch_for_changes)
        });
        let live = KeyedList::open(backend, key, defaults, watch_for_changes);

        tracing::info!(
            key = %live.key(),
            palettes = live.len(),
            deleted = recently_deleted.as_ref().map_or(0, |bin| bin.len()),
            "opened palette store"
        );

        Self {
            live,
            recently_deleted,
        }
    }

    /// The shared configuration over a fresh in-memory backend.
    pub fn in_memory() -> Self {
        Self::open(Arc::new(MemoryBackend::new()), StoreConfig::shared())
    }

    /// Wrap the store in a lockable, cloneable handle.
    pub fn into_shared(self) -> SharedPaletteStore {
        Arc::new(Mutex::new(self))
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Live palettes in display order.
    pub fn palettes(&self) -> &[Palette] {
        self.live.items()
    }

    /// Contents of the bin, oldest first. Empty when the store has no bin.
    pub fn recently_deleted(&self) -> &[Palette] {
        self.recently_deleted
            .as_ref()
            .map(|bin| bin.items())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn find(&self, id: PaletteId) -> Option<&Palette> {
        self.palettes().iter().find(|p| p.id() == id)
    }

    /// Like [`find`](Self::find), for callers that treat absence as an error.
    pub fn require(&self, id: PaletteId) -> Result<&Palette> {
        self.find(id).ok_or(Error::PaletteNotFound(id))
    }

    /// Whether a live palette shares `palette`'s id.
    pub fn contains(&self, palette: Option<&Palette>) -> bool {
        palette.is_some_and(|p| self.position(p).is_some())
    }

    /// The last palette put in the bin.
    pub fn most_recently_deleted(&self) -> Option<&Palette> {
        self.recently_deleted.as_ref().and_then(|bin| bin.last())
    }

    fn position(&self, palette: &Palette) -> Option<usize> {
        self.palettes().iter().position(|p| p.same_as(palette))
    }

    /// Next id unused in both the live list and the bin.
    fn next_unique_id(&self) -> PaletteId {
        next_id(self.palettes().iter().chain(self.recently_deleted()))
    }

    // ------------------------------------------------------------------
    // Cursor
    // ------------------------------------------------------------------

    /// See [`cursor::resolve`].
    pub fn resolve_cursor(&self, cursor: &Cursor) -> Cursor {
        cursor::resolve(self.palettes(), cursor)
    }

    /// See [`cursor::offset`].
    pub fn offset_cursor(&self, cursor: &Cursor, by: i64) -> Cursor {
        cursor::offset(self.palettes(), cursor, by)
    }

    /// The palette under `cursor`; `None` only when the store is empty.
    pub fn palette_at(&self, cursor: &Cursor) -> Option<&Palette> {
        cursor::palette_at(self.palettes(), cursor)
    }

    // ------------------------------------------------------------------
    // Intents
    // ------------------------------------------------------------------

    /// Insert a new palette at the cursor's (wrapped) index.
    pub fn insert(&mut self, emojis: &str, name: &str, at: &Cursor) -> Palette {
        let palette = Palette::new(name, emojis, self.next_unique_id());
        let index = wrap(at.index, self.len()).unwrap_or(0);
        tracing::debug!(id = palette.id(), index, "inserting palette");
        self.live.update(|items| items.insert(index, palette.clone()));
        palette
    }

    /// Add a new palette after all others.
    pub fn append(&mut self, emojis: &str, name: &str) -> Palette {
        let palette = Palette::new(name, emojis, self.next_unique_id());
        tracing::debug!(id = palette.id(), "appending palette");
        self.live.update(|items| items.push(palette.clone()));
        palette
    }

    pub fn rename(&mut self, palette: &Palette, name: &str) -> Option<Palette> {
        self.modify(palette, |p| p.name = name.to_string())
    }

    /// Put `emojis` in front of the palette's emoji, dropping duplicates.
    pub fn add_emojis(&mut self, emojis: &str, palette: &Palette) -> Option<Palette> {
        self.modify(palette, |p| p.add_emojis(emojis))
    }

    /// Drop every character of `emojis` from the palette.
    pub fn remove_emojis(&mut self, emojis: &str, palette: &Palette) -> Option<Palette> {
        self.modify(palette, |p| p.remove_emojis(emojis))
    }

    fn modify(&mut self, palette: &Palette, change: impl FnOnce(&mut Palette)) -> Option<Palette> {
        let Some(index) = self.position(palette) else {
            tracing::debug!(id = palette.id(), "ignoring edit of unknown palette");
            return None;
        };
        Some(self.live.update(|items| {
            change(&mut items[index]);
            items[index].clone()
        }))
    }

    /// Remove a palette; non-empty palettes go to the bin first.
    ///
    /// The bin receives `palette` exactly as passed in, so a caller holding
    /// an older copy bins that copy. Returns the removed live palette, or
    /// `None` if it was not in the store.
    pub fn delete(&mut self, palette: &Palette) -> Option<Palette> {
        let index = self.position(palette)?;
        if !palette.is_empty() {
            if let Some(bin) = self.recently_deleted.as_mut() {
                bin.update(|items| items.push(palette.clone()));
            }
        }
        tracing::debug!(id = palette.id(), "deleting palette");
        Some(self.live.update(|items| items.remove(index)))
    }

    /// Delete only if the live palette has neither a name nor emoji.
    ///
    /// The check reads the live copy; the removal then goes through
    /// [`delete`](Self::delete) with the caller's copy.
    pub fn delete_if_empty(&mut self, palette: &Palette) -> Option<Palette> {
        let index = self.position(palette)?;
        if self.palettes()[index].is_empty() {
            self.delete(palette)
        } else {
            None
        }
    }

    /// Take a palette out of the bin and insert its content at `at`.
    ///
    /// The restored palette gets a fresh id. Returns `None` if the palette
    /// was not in the bin.
    pub fn undelete(&mut self, palette: &Palette, at: &Cursor) -> Option<Palette> {
        let bin = self.recently_deleted.as_mut()?;
        let index = bin.items().iter().position(|p| p.same_as(palette))?;
        let removed = bin.update(|items| {
            let removed = items.remove(index);
            items.retain(|p| !p.same_as(&removed));
            removed
        });
        tracing::debug!(id = removed.id(), "undeleting palette");
        Some(self.insert(removed.emojis(), removed.name(), at))
    }

    // ------------------------------------------------------------------
    // Notifications
    // ------------------------------------------------------------------

    /// Change notifications for the live list.
    pub fn subscribe(&self) -> Receiver<ListChanged> {
        self.live.subscribe()
    }

    /// Change notifications for the bin, if the store has one.
    pub fn subscribe_recently_deleted(&self) -> Option<Receiver<ListChanged>> {
        self.recently_deleted.as_ref().map(KeyedList::subscribe)
    }

    /// Pick up writes made by others (watch mode only).
    ///
    /// Returns whether either list was reloaded.
    pub fn poll_external_changes(&mut self) -> bool {
        let bin_changed = self
            .recently_deleted
            .as_mut()
            .is_some_and(KeyedList::poll_external_changes);
        let live_changed = self.live.poll_external_changes();
        live_changed || bin_changed
    }
}
