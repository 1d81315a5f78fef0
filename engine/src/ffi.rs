//! FFI layer for UI hosts.
//!
//! This module provides C-compatible functions that a native UI (Swift,
//! Dart, Kotlin) can call to drive a palette store. All data crosses the
//! boundary as JSON strings.
//!
//! # Memory Management
//!
//! - Strings returned by `palette_*` functions are allocated by Rust
//! - Caller must free them with `palette_string_free`
//! - Store pointers must be freed with `palette_store_free`
//!
//! # Error Handling
//!
//! Functions return JSON with either:
//! - `{"ok": <result>}` on success (a missing palette is `{"ok": null}`)
//! - `{"error": "<message>"}` on failure
//!
//! # Wire shapes
//!
//! - Palette: `{"name": "Faces", "emojis": "😀😇", "id": 1}`
//! - Cursor: `{"palette": <Palette or null>, "index": 0}`

use crate::{Cursor, FileBackend, Palette, PaletteStore, StoreConfig};
use serde::{de::DeserializeOwned, Serialize};
use std::ffi::{c_char, CStr, CString};
use std::ptr;
use std::sync::Arc;

/// Result wrapper for FFI responses.
#[derive(serde::Serialize)]
#[serde(untagged)]
enum FfiResult<T: serde::Serialize> {
    Ok { ok: T },
    Err { error: String },
}

impl<T: serde::Serialize> FfiResult<T> {
    fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|e| format!(r#"{{"error":"serialization failed: {}"}}"#, e))
    }
}

impl<T: Serialize> From<Result<T, String>> for FfiResult<T> {
    fn from(result: Result<T, String>) -> Self {
        match result {
            Ok(ok) => FfiResult::Ok { ok },
            Err(error) => FfiResult::Err { error },
        }
    }
}

/// Encode a result as a JSON C string. Caller must free it.
fn respond<T: Serialize>(result: Result<T, String>) -> *mut c_char {
    to_c_string(FfiResult::from(result).to_json())
}

/// Convert a Rust string to a C string pointer.
/// Caller must free with `palette_string_free`.
fn to_c_string(s: String) -> *mut c_char {
    match CString::new(s) {
        Ok(cs) => cs.into_raw(),
        Err(_) => {
            // String contained null bytes - return error JSON
            CString::from(c"{\"error\":\"string contained null bytes\"}").into_raw()
        }
    }
}

/// Convert a C string pointer to a Rust string.
/// Returns None if pointer is null or invalid UTF-8.
unsafe fn from_c_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

unsafe fn text_arg(ptr: *const c_char, what: &str) -> Result<String, String> {
    from_c_string(ptr).ok_or_else(|| format!("invalid {what}"))
}

unsafe fn json_arg<T: DeserializeOwned>(ptr: *const c_char, what: &str) -> Result<T, String> {
    let text = text_arg(ptr, what)?;
    serde_json::from_str(&text).map_err(|e| format!("parse error in {what}: {e}"))
}

unsafe fn store_ref<'a>(store: *const PaletteStore) -> Result<&'a PaletteStore, String> {
    store.as_ref().ok_or_else(|| "null store pointer".to_string())
}

unsafe fn store_mut<'a>(store: *mut PaletteStore) -> Result<&'a mut PaletteStore, String> {
    store.as_mut().ok_or_else(|| "null store pointer".to_string())
}

// ============================================================================
// Store Lifecycle
// ============================================================================

/// Open the shared palette store persisted in directory `dir`.
///
/// # Returns
/// Pointer to PaletteStore, or null on failure.
///
/// # Safety
/// - `dir` must be a valid null-terminated C string or null
/// - Caller must free the returned pointer with `palette_store_free`
#[no_mangle]
pub unsafe extern "C" fn palette_store_open(dir: *const c_char) -> *mut PaletteStore {
    let dir = match from_c_string(dir) {
        Some(d) => d,
        None => return ptr::null_mut(),
    };

    let backend = match FileBackend::open(&dir) {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(dir = %dir, error = %e, "cannot open palette directory");
            return ptr::null_mut();
        }
    };

    let store = PaletteStore::open(Arc::new(backend), StoreConfig::shared());
    Box::into_raw(Box::new(store))
}

/// Open a shared-configuration store that lives only in memory.
///
/// # Safety
/// - Caller must free the returned pointer with `palette_store_free`
#[no_mangle]
pub unsafe extern "C" fn palette_store_open_in_memory() -> *mut PaletteStore {
    Box::into_raw(Box::new(PaletteStore::in_memory()))
}

/// Free a store.
///
/// # Safety
/// - `store` must be a valid pointer from `palette_store_open*`
/// - Must not be called twice on the same pointer
#[no_mangle]
pub unsafe extern "C" fn palette_store_free(store: *mut PaletteStore) {
    if !store.is_null() {
        drop(Box::from_raw(store));
    }
}

/// Free a string allocated by the engine.
///
/// # Safety
/// - `s` must be a valid pointer from a `palette_*` function
/// - Must not be called twice on the same pointer
#[no_mangle]
pub unsafe extern "C" fn palette_string_free(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

// ============================================================================
// Queries
// ============================================================================

/// All live palettes.
///
/// # Returns
/// JSON string: `{"ok": [Palette, ...]}` or `{"error": "message"}`
///
/// # Safety
/// - `store` must be a valid pointer from `palette_store_open*` or null
/// - Caller must free the returned string with `palette_string_free`
#[no_mangle]
pub unsafe extern "C" fn palette_store_list(store: *const PaletteStore) -> *mut c_char {
    respond(store_ref(store).map(|s| s.palettes().to_vec()))
}

/// Palettes in the recently-deleted bin, oldest first.
///
/// # Safety
/// Same as `palette_store_list`.
#[no_mangle]
pub unsafe extern "C" fn palette_store_recently_deleted(store: *const PaletteStore) -> *mut c_char {
    respond(store_ref(store).map(|s| s.recently_deleted().to_vec()))
}

/// The palette most recently put in the bin.
///
/// # Returns
/// JSON string: `{"ok": Palette}` or `{"ok": null}` or `{"error": "message"}`
///
/// # Safety
/// Same as `palette_store_list`.
#[no_mangle]
pub unsafe extern "C" fn palette_store_most_recently_deleted(
    store: *const PaletteStore,
) -> *mut c_char {
    respond(store_ref(store).map(|s| s.most_recently_deleted().cloned()))
}

// ============================================================================
// Cursor
// ============================================================================

/// Re-anchor a cursor after the store changed.
///
/// # Returns
/// JSON string: `{"ok": Cursor}` or `{"error": "message"}`
///
/// # Safety
/// - `store` must be a valid pointer from `palette_store_open*` or null
/// - `cursor_json` must be a valid null-terminated C string or null
/// - Caller must free the returned string with `palette_string_free`
#[no_mangle]
pub unsafe extern "C" fn palette_store_resolve_cursor(
    store: *const PaletteStore,
    cursor_json: *const c_char,
) -> *mut c_char {
    respond((|| -> Result<_, String> {
        let store = store_ref(store)?;
        let cursor: Cursor = json_arg(cursor_json, "cursor")?;
        Ok(store.resolve_cursor(&cursor))
    })())
}

/// Step a cursor by `by` palettes, wrapping around.
///
/// # Safety
/// Same as `palette_store_resolve_cursor`.
#[no_mangle]
pub unsafe extern "C" fn palette_store_offset_cursor(
    store: *const PaletteStore,
    cursor_json: *const c_char,
    by: i64,
) -> *mut c_char {
    respond((|| -> Result<_, String> {
        let store = store_ref(store)?;
        let cursor: Cursor = json_arg(cursor_json, "cursor")?;
        Ok(store.offset_cursor(&cursor, by))
    })())
}

/// The palette under a cursor.
///
/// # Returns
/// JSON string: `{"ok": Palette}`, `{"ok": null}` when the store is empty,
/// or `{"error": "message"}`
///
/// # Safety
/// Same as `palette_store_resolve_cursor`.
#[no_mangle]
pub unsafe extern "C" fn palette_store_palette_at(
    store: *const PaletteStore,
    cursor_json: *const c_char,
) -> *mut c_char {
    respond((|| -> Result<_, String> {
        let store = store_ref(store)?;
        let cursor: Cursor = json_arg(cursor_json, "cursor")?;
        Ok(store.palette_at(&cursor).cloned())
    })())
}

// ============================================================================
// Intents
// ============================================================================

/// Insert a new palette at a cursor.
///
/// # Returns
/// JSON string: `{"ok": Palette}` or `{"error": "message"}`
///
/// # Safety
/// - `store` must be a valid pointer from `palette_store_open*` or null
/// - `emojis`, `name` and `cursor_json` must be valid null-terminated C
///   strings or null
/// - Caller must free the returned string with `palette_string_free`
#[no_mangle]
pub unsafe extern "C" fn palette_store_insert(
    store: *mut PaletteStore,
    emojis: *const c_char,
    name: *const c_char,
    cursor_json: *const c_char,
) -> *mut c_char {
    respond((|| -> Result<_, String> {
        let store = store_mut(store)?;
        let emojis = text_arg(emojis, "emojis")?;
        let name = text_arg(name, "name")?;
        let cursor: Cursor = json_arg(cursor_json, "cursor")?;
        Ok(store.insert(&emojis, &name, &cursor))
    })())
}

/// Append a new palette after all others.
///
/// # Safety
/// Same as `palette_store_insert`.
#[no_mangle]
pub unsafe extern "C" fn palette_store_append(
    store: *mut PaletteStore,
    emojis: *const c_char,
    name: *const c_char,
) -> *mut c_char {
    respond((|| -> Result<_, String> {
        let store = store_mut(store)?;
        let emojis = text_arg(emojis, "emojis")?;
        let name = text_arg(name, "name")?;
        Ok(store.append(&emojis, &name))
    })())
}

/// Rename a palette.
///
/// # Returns
/// JSON string: `{"ok": Palette}` (updated), `{"ok": null}` when the palette
/// is not in the store, or `{"error": "message"}`
///
/// # Safety
/// Same as `palette_store_insert`.
#[no_mangle]
pub unsafe extern "C" fn palette_store_rename(
    store: *mut PaletteStore,
    palette_json: *const c_char,
    name: *const c_char,
) -> *mut c_char {
    respond((|| -> Result<_, String> {
        let store = store_mut(store)?;
        let palette: Palette = json_arg(palette_json, "palette")?;
        let name = text_arg(name, "name")?;
        Ok(store.rename(&palette, &name))
    })())
}

/// Add emoji to the front of a palette.
///
/// # Safety
/// Same as `palette_store_insert`.
#[no_mangle]
pub unsafe extern "C" fn palette_store_add_emojis(
    store: *mut PaletteStore,
    emojis: *const c_char,
    palette_json: *const c_char,
) -> *mut c_char {
    respond((|| -> Result<_, String> {
        let store = store_mut(store)?;
        let emojis = text_arg(emojis, "emojis")?;
        let palette: Palette = json_arg(palette_json, "palette")?;
        Ok(store.add_emojis(&emojis, &palette))
    })())
}

/// Remove emoji from a palette.
///
/// # Safety
/// Same as `palette_store_insert`.
#[no_mangle]
pub unsafe extern "C" fn palette_store_remove_emojis(
    store: *mut PaletteStore,
    emojis: *const c_char,
    palette_json: *const c_char,
) -> *mut c_char {
    respond((|| -> Result<_, String> {
        let store = store_mut(store)?;
        let emojis = text_arg(emojis, "emojis")?;
        let palette: Palette = json_arg(palette_json, "palette")?;
        Ok(store.remove_emojis(&emojis, &palette))
    })())
}

/// Delete a palette (non-empty palettes go to the bin).
///
/// # Returns
/// JSON string: `{"ok": Palette}` (removed), `{"ok": null}`, or
/// `{"error": "message"}`
///
/// # Safety
/// Same as `palette_store_insert`.
#[no_mangle]
pub unsafe extern "C" fn palette_store_delete(
    store: *mut PaletteStore,
    palette_json: *const c_char,
) -> *mut c_char {
    respond((|| -> Result<_, String> {
        let store = store_mut(store)?;
        let palette: Palette = json_arg(palette_json, "palette")?;
        Ok(store.delete(&palette))
    })())
}

/// Delete a palette only if it has no name and no emoji.
///
/// # Safety
/// Same as `palette_store_insert`.
#[no_mangle]
pub unsafe extern "C" fn palette_store_delete_if_empty(
    store: *mut PaletteStore,
    palette_json: *const c_char,
) -> *mut c_char {
    respond((|| -> Result<_, String> {
        let store = store_mut(store)?;
        let palette: Palette = json_arg(palette_json, "palette")?;
        Ok(store.delete_if_empty(&palette))
    })())
}

/// Restore a palette from the bin at a cursor.
///
/// # Returns
/// JSON string: `{"ok": Palette}` (restored, with a new id), `{"ok": null}`
/// when the palette is not in the bin, or `{"error": "message"}`
///
/// # Safety
/// Same as `palette_store_insert`.
#[no_mangle]
pub unsafe extern "C" fn palette_store_undelete(
    store: *mut PaletteStore,
    palette_json: *const c_char,
    cursor_json: *const c_char,
) -> *mut c_char {
    respond((|| -> Result<_, String> {
        let store = store_mut(store)?;
        let palette: Palette = json_arg(palette_json, "palette")?;
        let cursor: Cursor = json_arg(cursor_json, "cursor")?;
        Ok(store.undelete(&palette, &cursor))
    })())
}

/// Reload lists changed by other writers (watch mode only).
///
/// # Returns
/// 1 if anything was reloaded, 0 if not, -1 for a null store.
///
/// # Safety
/// - `store` must be a valid pointer from `palette_store_open*` or null
#[no_mangle]
pub unsafe extern "C" fn palette_store_poll_external_changes(store: *mut PaletteStore) -> i32 {
    match store.as_mut() {
        Some(s) => i32::from(s.poll_external_changes()),
        None => -1,
    }
}

// ============================================================================
// Utilities
// ============================================================================

/// Get the engine version.
///
/// # Returns
/// Static string pointer (do not free)
#[no_mangle]
pub extern "C" fn palette_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
