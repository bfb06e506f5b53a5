use crate::surface::{RasterSurface, Snapshot, SurfaceResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum HistoryAction {
    Undo,
    Redo,
}

impl HistoryAction {
    const fn applied_message(self) -> &'static str {
        match self {
            Self::Undo => "undo applied",
            Self::Redo => "redo applied",
        }
    }

    const fn empty_message(self) -> &'static str {
        match self {
            Self::Undo => "undo stack empty",
            Self::Redo => "redo stack empty",
        }
    }
}

/// What the display should show after an undo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Restore {
    Snapshot(Snapshot),
    /// Nothing older is recorded; the surface goes back to transparent.
    Blank,
}

/// Linear undo/redo over full-surface snapshots.
///
/// `undo_stack` is oldest-first and its top always mirrors what is on the
/// surface. `redo_stack` holds undone snapshots, most recently undone last.
#[derive(Debug, Default, Clone)]
pub struct HistoryManager {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
}

impl HistoryManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts over, optionally seeded with a previously persisted drawing.
    pub fn reset(&mut self, seed: Option<Snapshot>) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.undo_stack.extend(seed);
    }

    pub fn commit(&mut self, surface: &RasterSurface) -> SurfaceResult<()> {
        let snapshot = surface.encode_snapshot()?;
        self.record(snapshot);
        Ok(())
    }

    pub fn record(&mut self, snapshot: Snapshot) {
        self.undo_stack.push(snapshot);
        self.redo_stack.clear();
        tracing::debug!(
            undo = self.undo_stack.len(),
            "history snapshot recorded; redo cleared"
        );
    }

    /// What `undo` would restore, without touching the stacks.
    pub fn undo_target(&self) -> Option<Restore> {
        let (_, older) = self.undo_stack.split_last()?;
        Some(match older.last() {
            Some(previous) => Restore::Snapshot(previous.clone()),
            None => Restore::Blank,
        })
    }

    pub fn redo_target(&self) -> Option<&Snapshot> {
        self.redo_stack.last()
    }

    pub fn undo(&mut self) -> Option<Restore> {
        let Some(current) = self.undo_stack.pop() else {
            tracing::debug!("{}", HistoryAction::Undo.empty_message());
            return None;
        };
        self.redo_stack.push(current);
        self.log_applied(HistoryAction::Undo);

        Some(match self.undo_stack.last() {
            Some(previous) => Restore::Snapshot(previous.clone()),
            None => Restore::Blank,
        })
    }

    pub fn redo(&mut self) -> Option<Snapshot> {
        let Some(next) = self.redo_stack.pop() else {
            tracing::debug!("{}", HistoryAction::Redo.empty_message());
            return None;
        };
        self.undo_stack.push(next.clone());
        self.log_applied(HistoryAction::Redo);
        Some(next)
    }

    fn log_applied(&self, action: HistoryAction) {
        tracing::debug!(
            undo = self.undo_stack.len(),
            redo = self.redo_stack.len(),
            "{}",
            action.applied_message()
        );
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn latest(&self) -> Option<&Snapshot> {
        self.undo_stack.last()
    }
}
