use thiserror::Error;

/// Raised when time travel is requested in a direction with nothing recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("no past recorded")]
    NoPast,
    #[error("no future recorded")]
    NoFuture,
}

/// Linear undo/redo timeline of whole-collection snapshots.
///
/// The snapshot list is never empty and the cursor always points at one of
/// its entries. Entries before the cursor are undo states, entries after it
/// are redo states. Only the newest snapshot is ever handed out mutably,
/// through [`History::advance_history`].
#[derive(Debug, Clone)]
pub struct History<S> {
    snapshots: Vec<S>,
    cursor: usize,
}

impl<S: Clone> History<S> {
    pub fn new(present: S) -> Self {
        Self {
            snapshots: vec![present],
            cursor: 0,
        }
    }

    /// Snapshot at the cursor
    pub fn present(&self) -> &S {
        &self.snapshots[self.cursor]
    }

    pub fn has_past(&self) -> bool {
        self.cursor > 0
    }

    pub fn has_future(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    /// Number of recorded snapshots, including redo states
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Step back one snapshot
    pub fn undo(&mut self) -> Result<&S, HistoryError> {
        if !self.has_past() {
            return Err(HistoryError::NoPast);
        }
        self.cursor -= 1;
        Ok(self.present())
    }

    /// Step forward one snapshot
    pub fn redo(&mut self) -> Result<&S, HistoryError> {
        if !self.has_future() {
            return Err(HistoryError::NoFuture);
        }
        self.cursor += 1;
        Ok(self.present())
    }

    /// Record a new present and return it for editing.
    ///
    /// The new snapshot starts as a copy of the current present. Any redo
    /// states are discarded first.
    pub fn advance_history(&mut self) -> &mut S {
        let next = self.present().clone();
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(next);
        self.cursor += 1;
        &mut self.snapshots[self.cursor]
    }
}
