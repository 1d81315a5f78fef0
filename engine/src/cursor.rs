//! Cursors: resilient positions in a list of palettes.
//!
//! A cursor carries both a palette and an index. The palette is matched by
//! id; the index is the fallback used when that palette has gone away. The
//! index is never out of range because it is always wrapped into the list
//! before use, so a cursor keeps working while palettes are deleted,
//! inserted or reordered underneath it.

use crate::Palette;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wrap any integer into `[0, len)`.
///
/// Negative indices count back from the end, so `-1` is the last element.
/// Returns `None` for an empty range.
pub fn wrap(index: i64, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let n = len as i64;
    Some(index.rem_euclid(n) as usize)
}

/// A position in a palette list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    pub palette: Option<Palette>,
    pub index: i64,
}

impl Cursor {
    /// A cursor with no palette, relying on `index` alone.
    pub fn new(index: i64) -> Self {
        Self {
            palette: None,
            index,
        }
    }

    pub fn pointing_at(palette: Palette, index: i64) -> Self {
        Self {
            palette: Some(palette),
            index,
        }
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.palette.as_ref().map(Palette::name).unwrap_or("nil");
        write!(f, "@{} {}", self.index, name)
    }
}

fn position_of(palettes: &[Palette], cursor: &Cursor) -> Option<usize> {
    let palette = cursor.palette.as_ref()?;
    palettes.iter().position(|p| p.same_as(palette))
}

/// Re-anchor `cursor` to the current state of `palettes`.
///
/// If the cursor's palette is still present, the index is moved to it (or
/// left alone when it already wraps onto it). Otherwise the palette is
/// replaced by whatever sits at the wrapped index, and the index itself is
/// kept as is.
pub fn resolve(palettes: &[Palette], cursor: &Cursor) -> Cursor {
    if let Some(found) = position_of(palettes, cursor) {
        if Some(found) == wrap(cursor.index, palettes.len()) {
            cursor.clone()
        } else {
            Cursor {
                palette: cursor.palette.clone(),
                index: found as i64,
            }
        }
    } else {
        match wrap(cursor.index, palettes.len()) {
            None => cursor.clone(),
            Some(i) => Cursor {
                palette: Some(palettes[i].clone()),
                index: cursor.index,
            },
        }
    }
}

/// Move `cursor` by `delta` positions, wrapping around the ends.
///
/// The index accumulates unwrapped so repeated steps stay continuous. At
/// the ends of the `i64` range it wraps around instead of overflowing.
pub fn offset(palettes: &[Palette], cursor: &Cursor, delta: i64) -> Cursor {
    let len = palettes.len();
    match position_of(palettes, cursor) {
        Some(found) => {
            let next = step(found, delta, len).map(|i| palettes[i].clone());
            let index = if Some(found) == wrap(cursor.index, len) {
                cursor.index.wrapping_add(delta)
            } else {
                (found as i64).wrapping_add(delta)
            };
            Cursor {
                palette: next,
                index,
            }
        }
        None => Cursor {
            palette: cursor.palette.clone(),
            index: cursor.index.wrapping_add(delta),
        },
    }
}

/// `found + delta`, wrapped into `[0, len)` without overflowing.
fn step(found: usize, delta: i64, len: usize) -> Option<usize> {
    let delta = wrap(delta, len)?;
    Some((found + delta) % len)
}

/// The palette a cursor designates right now.
///
/// Prefers the live copy of the cursor's palette (fresh name and emoji),
/// then whatever sits at the wrapped index. `None` only when `palettes`
/// is empty.
pub fn palette_at<'a>(palettes: &'a [Palette], cursor: &Cursor) -> Option<&'a Palette> {
    match position_of(palettes, cursor) {
        Some(found) => palettes.get(found),
        None => wrap(cursor.index, palettes.len()).map(|i| &palettes[i]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::default_palettes;

    fn names(palettes: &[Palette]) -> Vec<&str> {
        palettes.iter().map(Palette::name).collect()
    }

    #[test]
    fn wrap_positive_and_negative() {
        assert_eq!(wrap(0, 4), Some(0));
        assert_eq!(wrap(5, 4), Some(1));
        assert_eq!(wrap(-1, 4), Some(3));
        assert_eq!(wrap(-4, 4), Some(0));
        assert_eq!(wrap(-5, 4), Some(3));
        assert_eq!(wrap(3, 0), None);
    }

    #[test]
    fn display_shows_index_and_name() {
        let palettes = default_palettes();
        assert_eq!(Cursor::new(2).to_string(), "@2 nil");
        assert_eq!(
            Cursor::pointing_at(palettes[0].clone(), -3).to_string(),
            "@-3 Faces"
        );
    }

    #[test]
    fn resolve_follows_moved_palette() {
        let mut palettes = default_palettes();
        let sports = palettes[2].clone();
        let cursor = Cursor::pointing_at(sports.clone(), 2);

        palettes.remove(0);
        let resolved = resolve(&palettes, &cursor);
        assert_eq!(resolved.index, 1);
        assert_eq!(resolved.palette, Some(sports));
    }

    #[test]
    fn resolve_keeps_cursor_that_wraps_onto_its_palette() {
        let palettes = default_palettes();
        let cursor = Cursor::pointing_at(palettes[1].clone(), 5);
        assert_eq!(resolve(&palettes, &cursor), cursor);
    }

    #[test]
    fn resolve_falls_back_to_index_when_palette_gone() {
        let mut palettes = default_palettes();
        let halloween = palettes.remove(1);
        let cursor = Cursor::pointing_at(halloween, 4);

        let resolved = resolve(&palettes, &cursor);
        assert_eq!(resolved.index, 4);
        assert_eq!(resolved.palette.as_ref().map(Palette::name), Some("Sports"));
    }

    #[test]
    fn resolve_on_empty_list_is_identity() {
        let cursor = Cursor::new(3);
        assert_eq!(resolve(&[], &cursor), cursor);
    }

    #[test]
    fn offset_steps_and_wraps() {
        let palettes = default_palettes();
        assert_eq!(names(&palettes), ["Faces", "Halloween", "Sports", "Vehicles"]);
        let cursor = Cursor::pointing_at(palettes[0].clone(), 0);

        let one = offset(&palettes, &cursor, 1);
        assert_eq!(one.palette.as_ref().map(Palette::name), Some("Halloween"));
        assert_eq!(one.index, 1);

        let five = offset(&palettes, &cursor, 5);
        assert_eq!(five.palette.as_ref().map(Palette::name), Some("Halloween"));
        assert_eq!(five.index, 5);

        let back = offset(&palettes, &cursor, -1);
        assert_eq!(back.palette.as_ref().map(Palette::name), Some("Vehicles"));
        assert_eq!(back.index, -1);
    }

    #[test]
    fn offset_uses_live_position_when_index_is_stale() {
        let palettes = default_palettes();
        // index 0 but palette actually at 2
        let cursor = Cursor::pointing_at(palettes[2].clone(), 0);
        let moved = offset(&palettes, &cursor, 1);
        assert_eq!(moved.index, 3);
        assert_eq!(moved.palette.as_ref().map(Palette::name), Some("Vehicles"));
    }

    #[test]
    fn offset_without_palette_only_moves_index() {
        let palettes = default_palettes();
        let moved = offset(&palettes, &Cursor::new(1), 2);
        assert_eq!(moved, Cursor::new(3));
    }

    #[test]
    fn palette_at_prefers_live_copy() {
        let mut palettes = default_palettes();
        let stale = palettes[1].clone();
        palettes[1].name = "Spooky".into();
        let cursor = Cursor::pointing_at(stale, 0);
        assert_eq!(palette_at(&palettes, &cursor).map(Palette::name), Some("Spooky"));
    }

    #[test]
    fn palette_at_empty_is_none() {
        assert_eq!(palette_at(&[], &Cursor::new(0)), None);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_wrap_in_range(index in -10_000i64..10_000, len in 1usize..64) {
                let wrapped = wrap(index, len).unwrap();
                prop_assert!(wrapped < len);
                prop_assert_eq!(Some(wrapped), wrap(index + len as i64, len));
            }

            #[test]
            fn prop_resolve_idempotent(index in -20i64..20, pick in 0usize..4, removed in 0usize..4) {
                let mut palettes = default_palettes();
                let cursor = Cursor::pointing_at(palettes[pick].clone(), index);
                palettes.remove(removed);

                let once = resolve(&palettes, &cursor);
                let twice = resolve(&palettes, &once);
                prop_assert_eq!(once, twice);
            }
        }
    }
}
