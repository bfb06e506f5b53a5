//! Line-oriented JSON command driver standing in for a pointer/toolbar UI.

use std::io::{self, BufRead};
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

use crate::editor::{BrushState, BrushStyle, EditorError, EditorSession, ToolKind};
use crate::geometry::{CanvasPoint, Color};
use crate::storage::{SnapshotStore, StorageError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum ScriptCommand {
    Down { x: i32, y: i32 },
    Move { x: i32, y: i32 },
    Up,
    Leave,
    Fill { x: i32, y: i32 },
    Undo,
    Redo,
    Tool { tool: ToolKind },
    Style { style: BrushStyle },
    Color { hex: Color },
    Size { size: u32 },
    Save,
}

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("line {line}: malformed command: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("line {line}: {source}")]
    Editor {
        line: usize,
        #[source]
        source: EditorError,
    },
    #[error("line {line}: {source}")]
    Storage {
        line: usize,
        #[source]
        source: StorageError,
    },
    #[error("failed to read script input: {0}")]
    Io(#[from] io::Error),
}

pub type ScriptResult<T> = std::result::Result<T, ScriptError>;

/// `None` for blank lines.
pub fn parse_line(line: usize, text: &str) -> ScriptResult<Option<ScriptCommand>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|source| ScriptError::Parse { line, source })
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScriptSummary {
    pub commands: usize,
    pub saved: Vec<PathBuf>,
}

/// Applies commands to a session with the live brush settings.
pub struct ScriptRunner<'a, S: SnapshotStore> {
    session: &'a mut EditorSession,
    brush: BrushState,
    store: &'a S,
}

impl<'a, S: SnapshotStore> ScriptRunner<'a, S> {
    pub fn new(session: &'a mut EditorSession, brush: BrushState, store: &'a S) -> Self {
        Self {
            session,
            brush,
            store,
        }
    }

    pub fn brush(&self) -> &BrushState {
        &self.brush
    }

    /// Returns the written path for `save`.
    pub fn apply(&mut self, line: usize, command: ScriptCommand) -> ScriptResult<Option<PathBuf>> {
        let editor = |source| ScriptError::Editor { line, source };
        tracing::trace!(line, ?command, "apply script command");
        match command {
            ScriptCommand::Down { x, y } => self
                .session
                .pointer_down(CanvasPoint::new(x, y), &self.brush)
                .map_err(editor)?,
            ScriptCommand::Move { x, y } => self
                .session
                .pointer_move(CanvasPoint::new(x, y), &self.brush)
                .map_err(editor)?,
            ScriptCommand::Up => self.session.pointer_up().map_err(editor)?,
            ScriptCommand::Leave => self.session.pointer_leave().map_err(editor)?,
            ScriptCommand::Fill { x, y } => {
                self.session
                    .fill_at(CanvasPoint::new(x, y), self.brush.color)
                    .map_err(editor)?;
            }
            ScriptCommand::Undo => {
                self.session.undo().map_err(editor)?;
            }
            ScriptCommand::Redo => {
                self.session.redo().map_err(editor)?;
            }
            ScriptCommand::Tool { tool } => self.brush.select_tool(tool),
            ScriptCommand::Style { style } => self.brush.select_style(style),
            ScriptCommand::Color { hex } => self.brush.set_color(hex),
            ScriptCommand::Size { size } => {
                self.brush.set_size(u8::try_from(size).unwrap_or(u8::MAX))
            }
            ScriptCommand::Save => {
                let snapshot = self.session.snapshot().map_err(editor)?;
                let path = self
                    .store
                    .save(&snapshot)
                    .map_err(|source| ScriptError::Storage { line, source })?;
                return Ok(Some(path));
            }
        }
        Ok(None)
    }

    pub fn replay<R: BufRead>(&mut self, reader: R) -> ScriptResult<ScriptSummary> {
        let mut summary = ScriptSummary::default();
        for (index, text) in reader.lines().enumerate() {
            let line = index + 1;
            let Some(command) = parse_line(line, &text?)? else {
                continue;
            };
            if let Some(path) = self.apply(line, command)? {
                summary.saved.push(path);
            }
            summary.commands += 1;
        }
        tracing::info!(
            commands = summary.commands,
            saves = summary.saved.len(),
            "script replay finished"
        );
        Ok(summary)
    }
}
