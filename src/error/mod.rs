use crate::editor::EditorError;
use crate::geometry::ColorParseError;
use crate::script::ScriptError;
use crate::state::StateError;
use crate::storage::StorageError;
use crate::surface::SurfaceError;
use thiserror::Error;

pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Surface(#[from] SurfaceError),
    #[error(transparent)]
    Editor(#[from] EditorError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Script(#[from] ScriptError),
    #[error(transparent)]
    ColorParse(#[from] ColorParseError),
}
