//! Editing session: one surface, its history, and the pointer-driven stroke state.

pub mod history;
pub mod tools;

use crate::geometry::{CanvasPoint, Color};
use crate::state::{StateError, StrokeEvent, StrokeMachine, StrokeState};
use crate::surface::{RasterSurface, Snapshot, SurfaceError};
use thiserror::Error;

pub use history::{HistoryManager, Restore};
pub use tools::{
    flood_fill, render_segment, BrushProfile, BrushState, BrushStyle, FillOutcome, SegmentReport,
    ToolKind,
};

#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Surface(#[from] SurfaceError),
    #[error(transparent)]
    State(#[from] StateError),
}

pub type EditorResult<T> = std::result::Result<T, EditorError>;

/// Single owner of the pixel buffer. Strokes and fills borrow the surface
/// mutably through the session, so there is exactly one writer at a time.
#[derive(Debug)]
pub struct EditorSession {
    surface: RasterSurface,
    history: HistoryManager,
    stroke: StrokeMachine,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::with_surface(RasterSurface::default())
    }
}

impl EditorSession {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_surface(RasterSurface::new(width, height))
    }

    pub fn with_surface(surface: RasterSurface) -> Self {
        Self {
            surface,
            history: HistoryManager::new(),
            stroke: StrokeMachine::new(),
        }
    }

    pub fn surface(&self) -> &RasterSurface {
        &self.surface
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn stroke_state(&self) -> StrokeState {
        self.stroke.state()
    }

    pub fn pointer_down(&mut self, point: CanvasPoint, brush: &BrushState) -> EditorResult<()> {
        match brush.tool {
            ToolKind::Bucket => {
                if self.stroke.state().is_drawing() {
                    self.finish_stroke(StrokeEvent::End)?;
                }
                self.fill_at(point, brush.color)?;
            }
            ToolKind::Brush => {
                if self.stroke.state().is_drawing() {
                    // a lost pointer-up; close the open stroke before starting anew
                    self.finish_stroke(StrokeEvent::End)?;
                }
                self.stroke.transition(StrokeEvent::Begin(point))?;
                tracing::debug!(?point, style = ?brush.style, "stroke started");
            }
        }
        Ok(())
    }

    /// Renders `last -> point` while a stroke is active; ignored otherwise.
    pub fn pointer_move(&mut self, point: CanvasPoint, brush: &BrushState) -> EditorResult<()> {
        let Some(last) = self.stroke.state().last_point() else {
            return Ok(());
        };
        render_segment(&mut self.surface, last, point, brush);
        self.stroke.transition(StrokeEvent::Extend(point))?;
        Ok(())
    }

    /// Ends the active stroke and commits it, even if no pixel changed.
    pub fn pointer_up(&mut self) -> EditorResult<()> {
        if self.stroke.state().is_drawing() {
            self.finish_stroke(StrokeEvent::End)?;
        }
        Ok(())
    }

    /// Pointer left the canvas mid-stroke. Painted segments stay and are committed.
    pub fn pointer_leave(&mut self) -> EditorResult<()> {
        if self.stroke.state().is_drawing() {
            self.finish_stroke(StrokeEvent::Cancel)?;
        }
        Ok(())
    }

    fn finish_stroke(&mut self, event: StrokeEvent) -> EditorResult<()> {
        self.stroke.transition(event)?;
        self.history.commit(&self.surface)?;
        tracing::debug!(?event, undo = self.history.undo_len(), "stroke committed");
        Ok(())
    }

    /// Bucket fill; commits a snapshot only when pixels changed.
    pub fn fill_at(&mut self, point: CanvasPoint, color: Color) -> EditorResult<FillOutcome> {
        let outcome = flood_fill(&mut self.surface, point, color)?;
        if outcome.changed() {
            self.history.commit(&self.surface)?;
        }
        Ok(outcome)
    }

    /// Returns `false` when there was nothing to undo. The surface is
    /// restored before the stacks move, so a failed decode changes nothing.
    pub fn undo(&mut self) -> EditorResult<bool> {
        let Some(restore) = self.history.undo_target() else {
            self.history.undo();
            return Ok(false);
        };
        match &restore {
            Restore::Snapshot(snapshot) => self.surface.decode_snapshot(snapshot)?,
            Restore::Blank => self.surface.clear(),
        }
        self.history.undo();
        Ok(true)
    }

    /// Returns `false` when there was nothing to redo.
    pub fn redo(&mut self) -> EditorResult<bool> {
        let Some(snapshot) = self.history.redo_target() else {
            self.history.redo();
            return Ok(false);
        };
        self.surface.decode_snapshot(snapshot)?;
        self.history.redo();
        Ok(true)
    }

    /// Encodes the current surface for the persistence collaborator.
    pub fn snapshot(&self) -> EditorResult<Snapshot> {
        Ok(self.surface.encode_snapshot()?)
    }

    /// Replaces the canvas with a persisted drawing (or a blank one) and
    /// restarts history from it. A snapshot that fails to decode leaves the
    /// session untouched.
    pub fn load(&mut self, seed: Option<Snapshot>) -> EditorResult<()> {
        match &seed {
            Some(snapshot) => self.surface.decode_snapshot(snapshot)?,
            None => self.surface.clear(),
        }
        self.stroke = StrokeMachine::new();
        self.history.reset(seed);
        tracing::info!(
            seeded = self.history.can_undo(),
            width = self.surface.width(),
            height = self.surface.height(),
            "session loaded"
        );
        Ok(())
    }
}
