//! # Palette Engine
//!
//! A small persistent store of emoji palettes for editor UIs.
//!
//! The store keeps an ordered list of named emoji strings, persisted through a
//! pluggable key/value backend, plus a "recently deleted" bin so deletions can
//! be undone. Callers point into the list with a [`Cursor`], which keeps
//! working while palettes are inserted, deleted or reordered underneath it.
//!
//! ## Design Principles
//!
//! - **Never fails loudly**: missing or corrupt storage falls back to defaults,
//!   stale palettes turn intents into no-ops, cursors wrap instead of
//!   overflowing
//! - **Identity by id**: a palette is found by its id, so a caller holding an
//!   old copy still edits the live one
//! - **One write per intent**: each mutation re-serializes its list once and
//!   notifies subscribers once
//!
//! ## Core Concepts
//!
//! ### Keyed lists
//!
//! A [`KeyedList`] is an ordered list saved as one JSON array under a string
//! key. It loads at construction, writes back after every mutation, and can
//! optionally watch the backend for writes made elsewhere.
//!
//! ### Palettes and the store
//!
//! [`PaletteStore`] owns a live list and an optional bin:
//! - [`PaletteStore::insert`] / [`PaletteStore::append`] - create a palette
//! - [`PaletteStore::rename`], [`PaletteStore::add_emojis`],
//!   [`PaletteStore::remove_emojis`] - edit by id
//! - [`PaletteStore::delete`] / [`PaletteStore::undelete`] - move between the
//!   live list and the bin
//!
//! ### Cursors
//!
//! A [`Cursor`] pairs a palette with a fallback index. See [`cursor`] for the
//! resolution rules.
//!
//! ## Quick Start
//!
//! ```rust
//! use palette_engine::{Cursor, PaletteStore};
//!
//! // 1. Open the shared store (in memory here; use a FileBackend on disk)
//! let mut store = PaletteStore::in_memory();
//! assert_eq!(store.len(), 4);
//!
//! // 2. Step through palettes with a cursor
//! let cursor = store.resolve_cursor(&Cursor::new(0));
//! let next = store.offset_cursor(&cursor, 1);
//! assert_eq!(store.palette_at(&next).unwrap().name(), "Halloween");
//!
//! // 3. Delete and bring back
//! let halloween = store.palette_at(&next).cloned().unwrap();
//! store.delete(&halloween);
//! let restored = store.undelete(&halloween, &next).unwrap();
//! assert_eq!(restored.name(), "Halloween");
//! ```
//!
//! ## FFI
//!
//! The [`ffi`] module provides C-compatible functions for UI hosts in other
//! languages. All data is exchanged as JSON strings.

pub mod backend;
pub mod config;
pub mod cursor;
pub mod emoji;
pub mod error;
pub mod ffi;
pub mod history;
pub mod list;
pub mod record;
pub mod store;

// Re-export main types at crate root
pub use backend::{FileBackend, KeyValueBackend, MemoryBackend};
pub use config::StoreConfig;
pub use cursor::{wrap, Cursor};
pub use error::Error;
pub use history::{History, HistoryEntry, PaletteCommand};
pub use list::{ChangeCause, KeyedList, ListChanged};
pub use record::{default_palettes, Palette};
pub use store::{PaletteStore, SharedPaletteStore};

/// Palette identifier.
pub type PaletteId = u64;
