use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::editor::tools::{BrushState, BrushStyle, ToolKind, DEFAULT_BRUSH_SIZE};
use crate::geometry::Color;
use crate::surface::{DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPathError {
    MissingHomeDirectory,
}

const APP_DIR: &str = "rasterpad";
const APP_CONFIG_FILE: &str = "config.json";
const DRAWINGS_SUBDIR: &str = "drawings";

/// Application-level settings from `config.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub canvas_width: Option<u32>,
    #[serde(default)]
    pub canvas_height: Option<u32>,
    #[serde(default)]
    pub default_color: Option<Color>,
    #[serde(default)]
    pub default_brush_size: Option<u8>,
    #[serde(default)]
    pub default_brush_style: Option<BrushStyle>,
    #[serde(default)]
    pub drawings_dir: Option<PathBuf>,
}

impl AppConfig {
    pub fn canvas_size(&self) -> (u32, u32) {
        (
            self.canvas_width.unwrap_or(DEFAULT_CANVAS_WIDTH),
            self.canvas_height.unwrap_or(DEFAULT_CANVAS_HEIGHT),
        )
    }

    pub fn initial_brush(&self) -> BrushState {
        BrushState::new(
            ToolKind::Brush,
            self.default_brush_style.unwrap_or_default(),
            self.default_color.unwrap_or_default(),
            self.default_brush_size.unwrap_or(DEFAULT_BRUSH_SIZE),
        )
    }

    /// Configured drawings directory, else `$XDG_DATA_HOME/rasterpad/drawings`.
    pub fn resolve_drawings_dir(&self) -> Result<PathBuf, ConfigPathError> {
        if let Some(dir) = &self.drawings_dir {
            return Ok(dir.clone());
        }
        let (xdg_data_home, home) = data_env_dirs();
        drawings_dir_with(xdg_data_home.as_deref(), home.as_deref())
    }
}

pub fn load_app_config() -> AppConfig {
    let (xdg_config_home, home) = config_env_dirs();
    load_app_config_with(xdg_config_home.as_deref(), home.as_deref())
}

fn load_app_config_with(xdg_config_home: Option<&Path>, home: Option<&Path>) -> AppConfig {
    let path = match app_config_path(APP_DIR, APP_CONFIG_FILE, xdg_config_home, home) {
        Ok(p) => p,
        Err(_) => return AppConfig::default(),
    };
    if !path.exists() {
        return AppConfig::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
            tracing::warn!(?err, ?path, "failed to parse config.json; using defaults");
            AppConfig::default()
        }),
        Err(err) => {
            tracing::warn!(?err, ?path, "failed to read config.json; using defaults");
            AppConfig::default()
        }
    }
}

pub(crate) fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

fn data_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_DATA_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub(crate) fn app_config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = xdg_root(xdg_config_home, home, ".config")?;
    path.push(app_dir);
    path.push(file_name);
    Ok(path)
}

fn drawings_dir_with(
    xdg_data_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = xdg_root(xdg_data_home, home, ".local/share")?;
    path.push(APP_DIR);
    path.push(DRAWINGS_SUBDIR);
    Ok(path)
}

fn xdg_root(
    xdg_dir: Option<&Path>,
    home: Option<&Path>,
    home_fallback: &str,
) -> Result<PathBuf, ConfigPathError> {
    if let Some(xdg) = xdg_dir.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigPathError::MissingHomeDirectory)?;
    Ok(home.join(home_fallback))
}
