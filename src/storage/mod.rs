use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::config::{AppConfig, ConfigPathError};
use crate::surface::Snapshot;
use thiserror::Error;

const DRAWING_PREFIX: &str = "drawing_";
const DRAWING_EXTENSION: &str = "png";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("missing HOME environment variable")]
    MissingHomeDirectory,
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl From<ConfigPathError> for StorageError {
    fn from(error: ConfigPathError) -> Self {
        match error {
            ConfigPathError::MissingHomeDirectory => Self::MissingHomeDirectory,
        }
    }
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Persistence collaborator: keeps drawings and hands back the newest one.
pub trait SnapshotStore {
    fn save(&self, snapshot: &Snapshot) -> StorageResult<PathBuf>;
    fn load_latest(&self) -> StorageResult<Option<Snapshot>>;
}

/// Stores each save as `drawing_<unix millis>-<sequence>.png` inside one directory.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    drawings_dir: PathBuf,
}

impl FileSnapshotStore {
    pub const fn with_dir(drawings_dir: PathBuf) -> Self {
        Self { drawings_dir }
    }

    pub fn from_config(config: &AppConfig) -> StorageResult<Self> {
        Ok(Self::with_dir(config.resolve_drawings_dir()?))
    }

    pub fn drawings_dir(&self) -> &Path {
        &self.drawings_dir
    }

    fn next_drawing_path(&self) -> PathBuf {
        let millis = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis())
            .unwrap_or_default();

        // fixed-width millis and sequence keep lexical order equal to save order
        let mut sequence = 0u32;
        loop {
            let name =
                format!("{DRAWING_PREFIX}{millis:020}-{sequence:04}.{DRAWING_EXTENSION}");
            let path = self.drawings_dir.join(name);
            if !path.exists() {
                return path;
            }
            sequence += 1;
        }
    }

    fn latest_drawing_path(&self) -> StorageResult<Option<PathBuf>> {
        let entries = match fs::read_dir(&self.drawings_dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(StorageError::Io(err)),
        };

        let mut latest: Option<PathBuf> = None;
        for entry in entries {
            let path = entry?.path();
            if !path.is_file() || !is_drawing_file(&path) {
                continue;
            }
            let newer = match &latest {
                Some(current) => path.file_name() > current.file_name(),
                None => true,
            };
            if newer {
                latest = Some(path);
            }
        }
        Ok(latest)
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn save(&self, snapshot: &Snapshot) -> StorageResult<PathBuf> {
        fs::create_dir_all(&self.drawings_dir)?;
        let path = self.next_drawing_path();
        fs::write(&path, snapshot.as_bytes())?;
        tracing::info!(path = %path.display(), bytes = snapshot.len(), "drawing saved");
        Ok(path)
    }

    fn load_latest(&self) -> StorageResult<Option<Snapshot>> {
        let Some(path) = self.latest_drawing_path()? else {
            tracing::info!(dir = %self.drawings_dir.display(), "no saved drawing found");
            return Ok(None);
        };
        let bytes = fs::read(&path)?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "drawing retrieved");
        Ok(Some(Snapshot::from_bytes(bytes)))
    }
}

fn is_drawing_file(path: &Path) -> bool {
    let has_prefix = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with(DRAWING_PREFIX));
    let has_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == DRAWING_EXTENSION);
    has_prefix && has_extension
}
