pub mod config;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod script;
pub mod state;
pub mod storage;
pub mod surface;
pub use error::{AppError, AppResult};

use crate::editor::EditorSession;
use crate::script::ScriptRunner;
use crate::storage::{FileSnapshotStore, SnapshotStore};

/// Entrypoint used by the CLI binary: replays an event script from stdin.
pub fn run() -> AppResult<()> {
    logging::init();
    tracing::info!("starting rasterpad");

    let config = config::load_app_config();
    let store = FileSnapshotStore::from_config(&config)?;
    let (width, height) = config.canvas_size();
    let mut session = EditorSession::new(width, height);

    let seed = store.load_latest()?;
    if let Err(err) = session.load(seed) {
        tracing::warn!(?err, "saved drawing could not be restored; starting blank");
        session.load(None)?;
    }

    let stdin = std::io::stdin();
    let summary = ScriptRunner::new(&mut session, config.initial_brush(), &store)
        .replay(stdin.lock())?;

    tracing::info!(
        commands = summary.commands,
        undo = session.history().undo_len(),
        "session finished"
    );
    Ok(())
}
