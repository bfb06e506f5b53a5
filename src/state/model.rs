use crate::geometry::CanvasPoint;

/// Pointer-driven stroke state. `Drawing` remembers where the last segment ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrokeState {
    #[default]
    Idle,
    Drawing {
        last: CanvasPoint,
    },
}

impl StrokeState {
    pub const fn is_drawing(self) -> bool {
        matches!(self, Self::Drawing { .. })
    }

    pub const fn last_point(self) -> Option<CanvasPoint> {
        match self {
            Self::Drawing { last } => Some(last),
            Self::Idle => None,
        }
    }
}
