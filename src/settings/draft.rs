//! Working copy of the engine order for reorderable list screens.

use super::{default_engine_order, EngineOrderEntry, SettingsStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    IndexOutOfRange { index: usize, len: usize },
}

impl std::fmt::Display for DraftError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DraftError::IndexOutOfRange { index, len } => {
                write!(f, "Index {} out of range for {} engines", index, len)
            }
        }
    }
}

impl std::error::Error for DraftError {}

/// Engine order being edited. Nothing is persisted until [`commit`](Self::commit).
#[derive(Debug, Clone)]
pub struct EngineOrderDraft {
    entries: Vec<EngineOrderEntry>,
    dirty: bool,
}

impl EngineOrderDraft {
    /// Copy the persisted order
    pub fn load(store: &SettingsStore) -> Self {
        Self::from_entries(store.engine_order())
    }

    pub fn from_entries(entries: Vec<EngineOrderEntry>) -> Self {
        Self {
            entries,
            dirty: false,
        }
    }

    pub fn entries(&self) -> &[EngineOrderEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry.name == name)
    }

    fn check_index(&self, index: usize) -> Result<(), DraftError> {
        if index < self.entries.len() {
            Ok(())
        } else {
            Err(DraftError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            })
        }
    }

    /// Drag-and-drop move: the entry at `from` ends up at position `to`
    pub fn move_entry(&mut self, from: usize, to: usize) -> Result<(), DraftError> {
        self.check_index(from)?;
        self.check_index(to)?;
        if from != to {
            let entry = self.entries.remove(from);
            self.entries.insert(to, entry);
            self.dirty = true;
        }
        Ok(())
    }

    /// Swap with the previous entry; no-op at the top
    pub fn move_up(&mut self, index: usize) -> Result<(), DraftError> {
        self.check_index(index)?;
        if index > 0 {
            self.move_entry(index, index - 1)?;
        }
        Ok(())
    }

    /// Swap with the next entry; no-op at the bottom
    pub fn move_down(&mut self, index: usize) -> Result<(), DraftError> {
        self.check_index(index)?;
        if index + 1 < self.entries.len() {
            self.move_entry(index, index + 1)?;
        }
        Ok(())
    }

    pub fn push(&mut self, entry: EngineOrderEntry) {
        self.entries.push(entry);
        self.dirty = true;
    }

    pub fn remove(&mut self, index: usize) -> Result<EngineOrderEntry, DraftError> {
        self.check_index(index)?;
        self.dirty = true;
        Ok(self.entries.remove(index))
    }

    pub fn reset_to_default(&mut self) {
        self.entries = default_engine_order();
        self.dirty = true;
    }

    /// Persist the full list, replacing the stored order
    pub fn commit(&mut self, store: &SettingsStore) {
        store.save_engine_order(&self.entries);
        self.dirty = false;
        log::debug!("Committed engine order draft ({} entries)", self.entries.len());
    }
}
