use crate::geometry::CanvasPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeEvent {
    /// Pointer pressed with the brush tool.
    Begin(CanvasPoint),
    /// Pointer moved while pressed.
    Extend(CanvasPoint),
    /// Pointer released.
    End,
    /// Pointer left the canvas mid-stroke.
    Cancel,
}
