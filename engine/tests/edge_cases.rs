//! Edge case tests for palette-engine
//!
//! These tests cover boundary conditions and unusual inputs.

use palette_engine::{
    wrap, Cursor, History, MemoryBackend, Palette, PaletteStore, StoreConfig,
};
use std::sync::Arc;

fn empty_store() -> PaletteStore {
    PaletteStore::open(
        Arc::new(MemoryBackend::new()),
        StoreConfig::new("edge").with_recently_deleted(),
    )
}

// ============================================================================
// Index Edge Cases
// ============================================================================

#[test]
fn wrap_extremes() {
    assert_eq!(wrap(i64::MAX, 1), Some(0));
    assert_eq!(wrap(i64::MIN, 1), Some(0));
    assert_eq!(wrap(i64::MIN, 2), Some(0));
    assert_eq!(wrap(i64::MAX, 2), Some(1));
    assert_eq!(wrap(0, 0), None);
}

#[test]
fn offset_at_integer_limits_keeps_wrapping() {
    let store = PaletteStore::in_memory();

    // i64::MAX mod 4 == 3
    let last = store.resolve_cursor(&Cursor::new(i64::MAX));
    assert_eq!(last.palette.as_ref().map(Palette::name), Some("Vehicles"));
    let next = store.offset_cursor(&last, 1);
    assert_eq!(next.palette.as_ref().map(Palette::name), Some("Faces"));
    assert_eq!(next.index, i64::MIN);
    assert_eq!(store.palette_at(&next).map(Palette::name), Some("Faces"));

    let back = store.offset_cursor(&store.resolve_cursor(&Cursor::new(i64::MIN)), -1);
    assert_eq!(back.palette.as_ref().map(Palette::name), Some("Vehicles"));
    assert_eq!(back.index, i64::MAX);

    // i64::MIN is a multiple of 4, so the palette stays put
    let same = store.offset_cursor(&last, i64::MIN);
    assert_eq!(same.palette.as_ref().map(Palette::name), Some("Vehicles"));

    let bare = store.offset_cursor(&Cursor::new(i64::MAX), 1);
    assert_eq!(bare.index, i64::MIN);
    assert_eq!(bare.palette, None);
}

#[test]
fn huge_cursor_index_still_resolves() {
    let store = PaletteStore::in_memory();
    let cursor = Cursor::new(1_000_000_001);
    // 1_000_000_001 mod 4 == 1
    assert_eq!(store.palette_at(&cursor).map(Palette::name), Some("Halloween"));

    let cursor = Cursor::new(-1_000_000_001);
    assert_eq!(store.palette_at(&cursor).map(Palette::name), Some("Vehicles"));
}

#[test]
fn single_palette_wraps_onto_itself() {
    let mut store = empty_store();
    let only = store.append("🌵", "Desert");
    let cursor = Cursor::pointing_at(only.clone(), 0);
    for delta in [-3, -1, 1, 2, 100] {
        let moved = store.offset_cursor(&cursor, delta);
        assert_eq!(moved.palette, Some(only.clone()));
        assert_eq!(moved.index, delta);
    }
}

// ============================================================================
// Id Allocation
// ============================================================================

#[test]
fn first_id_is_one() {
    let mut store = empty_store();
    assert_eq!(store.insert("", "a", &Cursor::default()).id(), 1);
    assert_eq!(store.insert("", "b", &Cursor::default()).id(), 2);
}

#[test]
fn ids_never_collide_with_bin() {
    let mut store = empty_store();
    let a = store.append("🅰️", "a");
    let b = store.append("🅱️", "b");
    store.delete(&b);
    store.delete(&a);
    // live is empty, bin holds 1 and 2
    let c = store.append("©️", "c");
    assert_eq!(c.id(), 3);
}

#[test]
fn stored_max_id_does_not_overflow() {
    let key = "UserDefaultsStore.PaletteStore.shared".to_string();
    let stored = br#"[{"name":"Big","emojis":"x","id":18446744073709551615}]"#.to_vec();
    let mut store = PaletteStore::open(
        Arc::new(MemoryBackend::with_values([(key, stored)])),
        StoreConfig::shared(),
    );

    let first = store.append("🅰️", "a");
    let second = store.append("🅱️", "b");
    assert_eq!(first.id(), 1);
    assert_eq!(second.id(), 2);
    assert_eq!(store.len(), 3);
}

#[test]
fn id_zero_is_never_assigned() {
    let mut store = empty_store();
    for _ in 0..10 {
        let palette = store.insert("", "", &Cursor::new(0));
        assert_ne!(palette.id(), 0);
    }
}

// ============================================================================
// Emoji Text Edge Cases
// ============================================================================

#[test]
fn multi_scalar_emoji_are_single_characters() {
    let mut store = empty_store();
    let family = "👨\u{200D}👩\u{200D}👧";
    let flag = "🇯🇵";
    let palette = store.append(&format!("{family}{flag}"), "People");

    let updated = store.add_emojis(&format!("{flag}👨"), &palette).unwrap();
    assert_eq!(updated.emojis(), format!("{flag}👨{family}"));
    assert_eq!(updated.emoji_count(), 3);

    let updated = store.remove_emojis("👨", &palette).unwrap();
    assert_eq!(updated.emojis(), format!("{flag}{family}"));
}

#[test]
fn removing_nothing_keeps_text() {
    let mut store = PaletteStore::in_memory();
    let faces = store.find(1).cloned().unwrap();
    let updated = store.remove_emojis("", &faces).unwrap();
    assert_eq!(updated.emojis(), faces.emojis());
}

#[test]
fn adding_existing_emoji_moves_it_to_front() {
    let mut store = PaletteStore::in_memory();
    let halloween = store.find(2).cloned().unwrap();
    let updated = store.add_emojis("😈", &halloween).unwrap();
    assert_eq!(updated.emojis(), "😈💀👻🎃🕷🕸");
}

#[test]
fn non_emoji_text_is_accepted() {
    let mut store = empty_store();
    let palette = store.append("abcabc", "Letters\n\t");
    assert_eq!(palette.name(), "Letters\n\t");
    let updated = store.add_emojis("", &palette).unwrap();
    assert_eq!(updated.emojis(), "abc");
}

// ============================================================================
// Undo Edge Cases
// ============================================================================

#[test]
fn undo_after_bin_was_emptied_elsewhere() {
    let mut store = PaletteStore::in_memory();
    let mut history = History::new();
    let cursor = Cursor::new(0);

    let sports = store.find(3).cloned().unwrap();
    history.delete(&mut store, &sports, &cursor);
    // someone else restores it first
    store.undelete(&sports, &cursor);

    assert!(!history.undo(&mut store, &cursor));
    assert_eq!(store.len(), 4);
}

#[test]
fn long_undo_redo_chain_is_stable() {
    let mut store = PaletteStore::in_memory();
    let mut history = History::new();
    let cursor = Cursor::new(1);
    let halloween = store.find(2).cloned().unwrap();

    history.delete(&mut store, &halloween, &cursor);
    for _ in 0..25 {
        assert!(history.undo(&mut store, &cursor));
        assert!(history.redo(&mut store, &cursor));
    }
    assert_eq!(store.len(), 3);
    assert_eq!(store.recently_deleted().len(), 1);
    assert_eq!(store.most_recently_deleted().map(Palette::name), Some("Halloween"));
}
