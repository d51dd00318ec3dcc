//! One-level undo.
//!
//! The snapshot is a full copy of the document (with its cursor) and the paste buffer.
//! Saving overwrites it; restoring copies it back and leaves it in place, so undoing
//! twice in a row lands on the same state.

use super::document::{Document, PasteBuffer};

#[derive(Debug, Clone)]
struct Saved {
    document: Document,
    paste: PasteBuffer,
}

/// Single-slot whole-state snapshot.
#[derive(Debug, Default)]
pub struct UndoSnapshot {
    saved: Option<Saved>,
}

impl UndoSnapshot {
    /// An empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` until the first [`save`](Self::save).
    pub fn is_empty(&self) -> bool {
        self.saved.is_none()
    }

    /// Copy `document` and `paste` into the slot.
    pub fn save(&mut self, document: &Document, paste: &PasteBuffer) {
        match &mut self.saved {
            Some(saved) => {
                saved.document.clone_from(document);
                saved.paste.clone_from(paste);
            }
            None => {
                self.saved = Some(Saved {
                    document: document.clone(),
                    paste: paste.clone(),
                });
            }
        }
    }

    /// Copy the slot back. Returns `false` if nothing was ever saved.
    pub fn restore(&self, document: &mut Document, paste: &mut PasteBuffer) -> bool {
        match &self.saved {
            Some(saved) => {
                document.clone_from(&saved.document);
                paste.clone_from(&saved.paste);
                true
            }
            None => false,
        }
    }
}
