mod bucket;
mod stroke;

use serde::{Deserialize, Serialize};

pub use crate::geometry::{CanvasPoint, Color};
pub use bucket::{flood_fill, FillOutcome};
pub use stroke::{render_segment, SegmentReport};

pub const BRUSH_SIZE_MIN: u8 = 1;
pub const BRUSH_SIZE_MAX: u8 = 50;
pub const DEFAULT_BRUSH_SIZE: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Brush,
    Bucket,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrushStyle {
    #[default]
    Marker,
    Pen,
    Airbrush,
}

/// Opacity and edge softness applied to every segment of a stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushProfile {
    pub opacity: f32,
    pub blur_radius: f32,
}

impl BrushStyle {
    pub fn profile(self, size: u8) -> BrushProfile {
        match self {
            Self::Marker => BrushProfile {
                opacity: 1.0,
                blur_radius: 0.0,
            },
            Self::Pen => BrushProfile {
                opacity: 0.4,
                blur_radius: 0.0,
            },
            Self::Airbrush => BrushProfile {
                opacity: 0.1,
                blur_radius: f32::from(size) / 2.0,
            },
        }
    }
}

/// Live tool settings, read by the session at the time of each pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrushState {
    pub tool: ToolKind,
    pub style: BrushStyle,
    pub color: Color,
    size: u8,
}

impl Default for BrushState {
    fn default() -> Self {
        Self {
            tool: ToolKind::Brush,
            style: BrushStyle::Marker,
            color: Color::BLACK,
            size: DEFAULT_BRUSH_SIZE,
        }
    }
}

impl BrushState {
    pub fn new(tool: ToolKind, style: BrushStyle, color: Color, size: u8) -> Self {
        let mut state = Self {
            tool,
            style,
            color,
            size: DEFAULT_BRUSH_SIZE,
        };
        state.set_size(size);
        state
    }

    pub const fn size(&self) -> u8 {
        self.size
    }

    pub fn set_size(&mut self, size: u8) {
        self.size = size.clamp(BRUSH_SIZE_MIN, BRUSH_SIZE_MAX);
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn select_tool(&mut self, tool: ToolKind) {
        self.tool = tool;
    }

    pub fn select_style(&mut self, style: BrushStyle) {
        self.style = style;
    }

    pub fn profile(&self) -> BrushProfile {
        self.style.profile(self.size)
    }
}
