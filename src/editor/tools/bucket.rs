use std::collections::VecDeque;

use super::{CanvasPoint, Color};
use crate::surface::{RasterSurface, SurfaceResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillOutcome {
    /// Seed already had the fill color; nothing was touched.
    Unchanged,
    Filled { pixels: usize },
}

impl FillOutcome {
    pub const fn changed(self) -> bool {
        matches!(self, Self::Filled { .. })
    }
}

/// 4-connected flood fill with exact color matching.
///
/// Membership is tested against the live buffer: a repainted pixel no longer
/// equals the target color, so it is never enqueued twice for repainting.
/// Neighbours outside the surface are skipped. Anti-aliased or translucent
/// edges count as boundaries because there is no tolerance.
pub fn flood_fill(
    surface: &mut RasterSurface,
    seed: CanvasPoint,
    fill_color: Color,
) -> SurfaceResult<FillOutcome> {
    let target_color = surface.get_pixel(seed.x, seed.y)?;
    if target_color == fill_color {
        tracing::debug!(?seed, color = %fill_color.to_hex(), "fill color equals target; skipping");
        return Ok(FillOutcome::Unchanged);
    }

    let mut queue = VecDeque::from([seed]);
    let mut pixels = 0usize;

    while let Some(point) = queue.pop_front() {
        match surface.get_pixel(point.x, point.y) {
            Ok(current) if current == target_color => {}
            _ => continue,
        }

        surface.set_pixel(point.x, point.y, fill_color)?;
        pixels += 1;

        queue.extend([
            CanvasPoint::new(point.x + 1, point.y),
            CanvasPoint::new(point.x - 1, point.y),
            CanvasPoint::new(point.x, point.y + 1),
            CanvasPoint::new(point.x, point.y - 1),
        ]);
    }

    tracing::debug!(
        ?seed,
        target = ?target_color,
        color = %fill_color.to_hex(),
        pixels,
        "flood fill complete"
    );
    Ok(FillOutcome::Filled { pixels })
}
