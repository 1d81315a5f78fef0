//! Undo/redo for palette deletion.
//!
//! History is an explicit command stack: each entry records the command that
//! reverses a user action and a label for menus ("Delete Sports"). Applying a
//! command produces its own inverse, which moves to the opposite stack.

use crate::{Cursor, Palette, PaletteStore};

/// A reversible store command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteCommand {
    Delete(Palette),
    Undelete(Palette),
}

impl PaletteCommand {
    /// Run against `store`, returning the command that reverses it.
    ///
    /// `None` means nothing happened or the effect cannot be reversed
    /// (an empty palette is deleted without going to the bin).
    pub fn apply(&self, store: &mut PaletteStore, at: &Cursor) -> Option<PaletteCommand> {
        match self {
            PaletteCommand::Delete(palette) => {
                let removed = store.delete(palette)?;
                let binned = store
                    .most_recently_deleted()
                    .is_some_and(|p| p.same_as(&removed));
                binned.then_some(PaletteCommand::Undelete(removed))
            }
            PaletteCommand::Undelete(palette) => store
                .undelete(palette, at)
                .map(PaletteCommand::Delete),
        }
    }
}

/// One step of history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub command: PaletteCommand,
    pub label: String,
}

/// Undo and redo stacks.
#[derive(Debug, Clone, Default)]
pub struct History {
    undo: Vec<HistoryEntry>,
    redo: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delete `palette`, remembering how to bring it back.
    pub fn delete(
        &mut self,
        store: &mut PaletteStore,
        palette: &Palette,
        at: &Cursor,
    ) -> Option<Palette> {
        let label = format!("Delete {}", palette.name());
        let command = PaletteCommand::Delete(palette.clone());
        let inverse = command.apply(store, at);
        let removed = match &inverse {
            Some(PaletteCommand::Undelete(p)) => Some(p.clone()),
            _ => None,
        };
        self.record(inverse, label);
        removed
    }

    /// Undelete `palette` at `at`, remembering how to delete it again.
    pub fn undelete(
        &mut self,
        store: &mut PaletteStore,
        palette: &Palette,
        at: &Cursor,
    ) -> Option<Palette> {
        let label = format!("Undelete {}", palette.name());
        let inverse = PaletteCommand::Undelete(palette.clone()).apply(store, at);
        let restored = match &inverse {
            Some(PaletteCommand::Delete(p)) => Some(p.clone()),
            _ => None,
        };
        self.record(inverse, label);
        restored
    }

    fn record(&mut self, inverse: Option<PaletteCommand>, label: String) {
        if let Some(command) = inverse {
            self.undo.push(HistoryEntry { command, label });
            self.redo.clear();
        }
    }

    /// Reverse the latest action. Returns whether anything changed.
    pub fn undo(&mut self, store: &mut PaletteStore, at: &Cursor) -> bool {
        Self::step(&mut self.undo, &mut self.redo, store, at)
    }

    /// Re-apply the latest undone action. Returns whether anything changed.
    pub fn redo(&mut self, store: &mut PaletteStore, at: &Cursor) -> bool {
        Self::step(&mut self.redo, &mut self.undo, store, at)
    }

    fn step(
        from: &mut Vec<HistoryEntry>,
        to: &mut Vec<HistoryEntry>,
        store: &mut PaletteStore,
        at: &Cursor,
    ) -> bool {
        let Some(entry) = from.pop() else {
            return false;
        };
        match entry.command.apply(store, at) {
            Some(command) => {
                to.push(HistoryEntry {
                    command,
                    label: entry.label,
                });
                true
            }
            None => {
                tracing::debug!(label = %entry.label, "history entry no longer applies");
                false
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_label(&self) -> Option<&str> {
        self.undo.last().map(|e| e.label.as_str())
    }

    pub fn redo_label(&self) -> Option<&str> {
        self.redo.last().map(|e| e.label.as_str())
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sports(store: &PaletteStore) -> Palette {
        store
            .palettes()
            .iter()
            .find(|p| p.name() == "Sports")
            .cloned()
            .unwrap()
    }

    #[test]
    fn undo_delete_restores_palette() {
        let mut store = PaletteStore::in_memory();
        let mut history = History::new();
        let cursor = Cursor::new(2);

        let sports = sports(&store);
        history.delete(&mut store, &sports, &cursor).unwrap();
        assert_eq!(history.undo_label(), Some("Delete Sports"));
        assert_eq!(store.len(), 3);

        assert!(history.undo(&mut store, &cursor));
        assert_eq!(store.len(), 4);
        assert_eq!(store.palettes()[2].name(), "Sports");
        assert_eq!(history.redo_label(), Some("Delete Sports"));
        assert!(!history.can_undo());
    }

    #[test]
    fn redo_deletes_restored_copy() {
        let mut store = PaletteStore::in_memory();
        let mut history = History::new();
        let cursor = Cursor::new(0);

        let sports = sports(&store);
        history.delete(&mut store, &sports, &cursor);
        history.undo(&mut store, &cursor);
        assert!(history.redo(&mut store, &cursor));

        assert_eq!(store.len(), 3);
        assert!(store.palettes().iter().all(|p| p.name() != "Sports"));
        assert_eq!(store.most_recently_deleted().map(Palette::name), Some("Sports"));
        assert!(history.can_undo());
    }

    #[test]
    fn empty_palette_delete_is_not_recorded() {
        let mut store = PaletteStore::in_memory();
        let mut history = History::new();
        let cursor = Cursor::new(0);

        let blank = store.insert("", "", &cursor);
        assert_eq!(history.delete(&mut store, &blank, &cursor), None);
        assert!(!history.can_undo());
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn new_action_clears_redo() {
        let mut store = PaletteStore::in_memory();
        let mut history = History::new();
        let cursor = Cursor::new(0);

        let sports = sports(&store);
        history.delete(&mut store, &sports, &cursor);
        history.undo(&mut store, &cursor);
        assert!(history.can_redo());

        let faces = store.find(1).cloned().unwrap();
        history.delete(&mut store, &faces, &cursor);
        assert!(!history.can_redo());
        assert_eq!(history.undo_label(), Some("Delete Faces"));
    }

    #[test]
    fn undelete_is_undoable() {
        let mut store = PaletteStore::in_memory();
        let mut history = History::new();
        let cursor = Cursor::new(0);

        let sports = sports(&store);
        store.delete(&sports);
        let restored = history.undelete(&mut store, &sports, &cursor).unwrap();
        assert_eq!(history.undo_label(), Some("Undelete Sports"));

        assert!(history.undo(&mut store, &cursor));
        assert!(!store.contains(Some(&restored)));
    }

    #[test]
    fn undo_with_empty_stack_is_false() {
        let mut store = PaletteStore::in_memory();
        let mut history = History::new();
        assert!(!history.undo(&mut store, &Cursor::default()));
        assert!(!history.redo(&mut store, &Cursor::default()));
    }
}
