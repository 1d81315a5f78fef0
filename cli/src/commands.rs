//! Command implementations.
//!
//! Each command takes the opened store and writes its result to `out`, so
//! the same code serves the binary and the tests.

use crate::error::{CliError, CliResult};
use palette_engine::{Cursor, Palette, PaletteId, PaletteStore};
use std::io::Write;

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    Text,
    Json,
}

/// One store action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    List,
    Show { at: i64, offset: i64 },
    New { at: i64, name: String, emojis: String },
    Rename { id: PaletteId, name: String },
    Add { id: PaletteId, emojis: String },
    Remove { id: PaletteId, emojis: String },
    Delete { id: PaletteId },
    Clean { id: PaletteId },
    Undelete { at: i64 },
    Trash,
}

pub fn run(
    action: Action,
    store: &mut PaletteStore,
    format: Format,
    out: &mut impl Write,
) -> CliResult<()> {
    match action {
        Action::List => print_list(store.palettes(), format, out),
        Action::Trash => print_list(store.recently_deleted(), format, out),
        Action::Show { at, offset } => {
            let cursor = store.resolve_cursor(&Cursor::new(at));
            let cursor = store.offset_cursor(&cursor, offset);
            match format {
                Format::Json => {
                    serde_json::to_writer(&mut *out, &cursor)?;
                    writeln!(out)?;
                }
                Format::Text => match store.palette_at(&cursor) {
                    Some(palette) => writeln!(out, "{} {}", cursor.index, palette)?,
                    None => writeln!(out, "(no palettes)")?,
                },
            }
            Ok(())
        }
        Action::New { at, name, emojis } => {
            let palette = store.insert(&emojis, &name, &Cursor::new(at));
            print_one(&palette, format, out)
        }
        Action::Rename { id, name } => {
            let palette = existing(store, id)?;
            let palette = store.rename(&palette, &name).ok_or(CliError::UnknownPalette(id))?;
            print_one(&palette, format, out)
        }
        Action::Add { id, emojis } => {
            let palette = existing(store, id)?;
            let palette = store
                .add_emojis(&emojis, &palette)
                .ok_or(CliError::UnknownPalette(id))?;
            print_one(&palette, format, out)
        }
        Action::Remove { id, emojis } => {
            let palette = existing(store, id)?;
            let palette = store
                .remove_emojis(&emojis, &palette)
                .ok_or(CliError::UnknownPalette(id))?;
            print_one(&palette, format, out)
        }
        Action::Delete { id } => {
            let palette = existing(store, id)?;
            let removed = store.delete(&palette).ok_or(CliError::UnknownPalette(id))?;
            print_one(&removed, format, out)
        }
        Action::Clean { id } => {
            let palette = existing(store, id)?;
            match store.delete_if_empty(&palette) {
                Some(removed) => print_one(&removed, format, out),
                None => {
                    tracing::info!(id, "palette not empty, kept");
                    Ok(())
                }
            }
        }
        Action::Undelete { at } => {
            let last = store
                .most_recently_deleted()
                .cloned()
                .ok_or(CliError::NothingDeleted)?;
            let restored = store
                .undelete(&last, &Cursor::new(at))
                .ok_or(CliError::NothingDeleted)?;
            print_one(&restored, format, out)
        }
    }
}

fn existing(store: &PaletteStore, id: PaletteId) -> CliResult<Palette> {
    Ok(store.require(id)?.clone())
}

fn print_one(palette: &Palette, format: Format, out: &mut impl Write) -> CliResult<()> {
    match format {
        Format::Json => serde_json::to_writer(&mut *out, palette)?,
        Format::Text => write!(out, "{:>4}  {}", palette.id(), palette)?,
    }
    writeln!(out)?;
    Ok(())
}

fn print_list(palettes: &[Palette], format: Format, out: &mut impl Write) -> CliResult<()> {
    match format {
        Format::Json => {
            serde_json::to_writer(&mut *out, palettes)?;
            writeln!(out)?;
        }
        Format::Text => {
            for palette in palettes {
                writeln!(out, "{:>4}  {}", palette.id(), palette)?;
            }
        }
    }
    Ok(())
}
