//! Character-level helpers for emoji text.
//!
//! A "character" here is an extended grapheme cluster (UAX #29), so an emoji
//! built from several scalars (a variation selector, a ZWJ family, a flag)
//! is treated as one unit everywhere in the store.

use unicode_segmentation::UnicodeSegmentation;

/// Keep the first occurrence of every character, preserving order.
pub fn uniqued(text: &str) -> String {
    let mut seen: Vec<&str> = Vec::new();
    let mut out = String::with_capacity(text.len());
    for g in text.graphemes(true) {
        if !seen.contains(&g) {
            seen.push(g);
            out.push_str(g);
        }
    }
    out
}

/// Drop every character of `text` that also appears in `remove`.
pub fn without(text: &str, remove: &str) -> String {
    text.graphemes(true)
        .filter(|g| !contains_grapheme(remove, g))
        .collect()
}

/// Whether `text` contains `grapheme` as a whole character.
pub fn contains_grapheme(text: &str, grapheme: &str) -> bool {
    text.graphemes(true).any(|g| g == grapheme)
}

/// Number of characters in `text`.
pub fn count(text: &str) -> usize {
    text.graphemes(true).count()
}
