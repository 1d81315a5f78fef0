//! The palette record.

use crate::{emoji, PaletteId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A named string of emoji.
///
/// Identity is the `id` alone: two palettes with the same id are the same
/// palette even if one is a stale copy with an older name or emoji text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub(crate) name: String,
    pub(crate) emojis: String,
    id: PaletteId,
}

impl Palette {
    pub(crate) fn new(name: impl Into<String>, emojis: impl Into<String>, id: PaletteId) -> Self {
        Self {
            name: name.into(),
            emojis: emojis.into(),
            id,
        }
    }

    /// Unique identifier, never changes.
    pub fn id(&self) -> PaletteId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn emojis(&self) -> &str {
        &self.emojis
    }

    /// True when both the name and the emoji text are empty.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.emojis.is_empty()
    }

    /// Same palette (by id) regardless of content.
    pub fn same_as(&self, other: &Palette) -> bool {
        self.id == other.id
    }

    /// Number of emoji characters.
    pub fn emoji_count(&self) -> usize {
        emoji::count(&self.emojis)
    }

    /// New emoji go to the front; a character already present is kept once.
    pub(crate) fn add_emojis(&mut self, emojis: &str) {
        self.emojis = emoji::uniqued(&format!("{}{}", emojis, self.emojis));
    }

    pub(crate) fn remove_emojis(&mut self, emojis: &str) {
        self.emojis = emoji::without(&self.emojis, emojis);
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.emojis)
    }
}

/// Built-in palettes used when nothing has been stored yet.
pub fn default_palettes() -> Vec<Palette> {
    [
        ("Faces", "😀😇🥰😎🧐🥳🤯🥶😱🤔🤥🥱😴🤢🤮😷🤧🤠"),
        ("Halloween", "💀👻🎃🕷🕸😈"),
        ("Sports", "⚽️🏀🏈⚾️🎾🏐🏓🏏⛳️🥌⛷🏂🏄"),
        ("Vehicles", "🚕🏎🚓🚑🚒🚜🚲🏍🚂✈️🚀🚁"),
    ]
    .into_iter()
    .zip(1..)
    .map(|((name, emojis), id)| Palette::new(name, emojis, id))
    .collect()
}

/// Next free id in `palettes`: one past the largest, or 1 when empty.
///
/// If the largest id is already `PaletteId::MAX`, the lowest unused
/// positive id is taken instead.
pub(crate) fn next_id<'a>(palettes: impl IntoIterator<Item = &'a Palette>) -> PaletteId {
    let ids: BTreeSet<PaletteId> = palettes.into_iter().map(|p| p.id).collect();
    match ids.last() {
        None => 1,
        Some(&max) => max
            .checked_add(1)
            .unwrap_or_else(|| (1..).find(|id| !ids.contains(id)).unwrap_or(0)),
    }
}
