use image::{imageops, GrayImage, Luma};

use super::{BrushState, CanvasPoint};
use crate::surface::RasterSurface;

const MASK_ON: u8 = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SegmentReport {
    /// Pixels inside the hard line (width `size`, round caps), after clipping.
    pub covered_pixels: usize,
    /// Pixels whose stored value actually changed, glow included.
    pub changed_pixels: usize,
}

#[derive(Debug, Clone, Copy)]
struct MaskArea {
    left: i32,
    top: i32,
    width: u32,
    height: u32,
}

/// Paints the straight segment `from -> to` with round caps.
///
/// A pixel belongs to the line when the distance from its coordinate to the
/// segment is at most `size / 2`. Each covered pixel is composited once per
/// call, so overlapping joints between consecutive segments blend twice.
pub fn render_segment(
    surface: &mut RasterSurface,
    from: CanvasPoint,
    to: CanvasPoint,
    brush: &BrushState,
) -> SegmentReport {
    let radius = f32::from(brush.size()) / 2.0;
    let profile = brush.profile();
    let sigma = profile.blur_radius / 2.0;
    let glow_margin = if sigma > 0.0 {
        (sigma * 3.0).ceil() as i32 + 1
    } else {
        0
    };

    let Some(area) = mask_area(surface, from, to, radius.ceil() as i32 + glow_margin) else {
        return SegmentReport::default();
    };

    let mask = line_mask(area, from, to, radius);
    let mut changed = vec![false; mask.len()];
    let mut report = SegmentReport::default();

    if sigma > 0.0 {
        let glow = imageops::blur(&mask, sigma);
        for (mx, my, Luma([weight])) in glow.enumerate_pixels() {
            if *weight == 0 {
                continue;
            }
            let opacity = profile.opacity * f32::from(*weight) / 255.0;
            let (x, y) = (area.left + mx as i32, area.top + my as i32);
            if surface.blend_pixel(x, y, brush.color, opacity) {
                changed[(my * area.width + mx) as usize] = true;
            }
        }
    }

    for (mx, my, Luma([value])) in mask.enumerate_pixels() {
        if *value != MASK_ON {
            continue;
        }
        report.covered_pixels += 1;
        let (x, y) = (area.left + mx as i32, area.top + my as i32);
        if surface.blend_pixel(x, y, brush.color, profile.opacity) {
            changed[(my * area.width + mx) as usize] = true;
        }
    }

    report.changed_pixels = changed.into_iter().filter(|flag| *flag).count();
    tracing::trace!(
        ?from,
        ?to,
        style = ?brush.style,
        size = brush.size(),
        covered = report.covered_pixels,
        changed = report.changed_pixels,
        "rendered stroke segment"
    );
    report
}

fn mask_area(
    surface: &RasterSurface,
    from: CanvasPoint,
    to: CanvasPoint,
    reach: i32,
) -> Option<MaskArea> {
    let max_x = i32::try_from(surface.width()).unwrap_or(i32::MAX) - 1;
    let max_y = i32::try_from(surface.height()).unwrap_or(i32::MAX) - 1;

    let left = from.x.min(to.x).saturating_sub(reach).max(0);
    let right = from.x.max(to.x).saturating_add(reach).min(max_x);
    let top = from.y.min(to.y).saturating_sub(reach).max(0);
    let bottom = from.y.max(to.y).saturating_add(reach).min(max_y);

    if right < left || bottom < top {
        return None;
    }

    Some(MaskArea {
        left,
        top,
        width: u32::try_from(right - left + 1).ok()?,
        height: u32::try_from(bottom - top + 1).ok()?,
    })
}

fn line_mask(area: MaskArea, from: CanvasPoint, to: CanvasPoint, radius: f32) -> GrayImage {
    GrayImage::from_fn(area.width, area.height, |mx, my| {
        let x = (area.left + mx as i32) as f32;
        let y = (area.top + my as i32) as f32;
        if distance_to_segment(x, y, from, to) <= radius {
            Luma([MASK_ON])
        } else {
            Luma([0])
        }
    })
}

fn distance_to_segment(x: f32, y: f32, from: CanvasPoint, to: CanvasPoint) -> f32 {
    let (ax, ay) = (from.x as f32, from.y as f32);
    let (dx, dy) = (to.x as f32 - ax, to.y as f32 - ay);
    let length_sq = dx * dx + dy * dy;
    let t = if length_sq == 0.0 {
        0.0
    } else {
        (((x - ax) * dx + (y - ay) * dy) / length_sq).clamp(0.0, 1.0)
    };
    (x - (ax + t * dx)).hypot(y - (ay + t * dy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::tools::{BrushStyle, Color, ToolKind};

    fn brush(style: BrushStyle, size: u8) -> BrushState {
        BrushState::new(ToolKind::Brush, style, Color::rgb(200, 0, 0), size)
    }

    fn painted(surface: &RasterSurface) -> Vec<(i32, i32)> {
        let mut points = Vec::new();
        for y in 0..surface.height() as i32 {
            for x in 0..surface.width() as i32 {
                if surface.get_pixel(x, y).unwrap() != Color::TRANSPARENT {
                    points.push((x, y));
                }
            }
        }
        points
    }

    #[test]
    fn thin_marker_diagonal_hits_only_the_diagonal() {
        let mut surface = RasterSurface::new(10, 10);
        let report = render_segment(
            &mut surface,
            CanvasPoint::new(0, 0),
            CanvasPoint::new(9, 9),
            &brush(BrushStyle::Marker, 1),
        );

        let expected = (0..10).map(|i| (i, i)).collect::<Vec<_>>();
        assert_eq!(painted(&surface), expected);
        assert_eq!(report.covered_pixels, 10);
        assert_eq!(report.changed_pixels, 10);
        for i in 0..10 {
            assert_eq!(surface.get_pixel(i, i).unwrap(), Color::rgb(200, 0, 0));
        }
    }

    #[test]
    fn zero_length_segment_paints_a_round_dot() {
        let mut surface = RasterSurface::new(11, 11);
        render_segment(
            &mut surface,
            CanvasPoint::new(5, 5),
            CanvasPoint::new(5, 5),
            &brush(BrushStyle::Marker, 5),
        );

        assert_eq!(surface.get_pixel(5, 5).unwrap(), Color::rgb(200, 0, 0));
        assert_eq!(surface.get_pixel(7, 5).unwrap(), Color::rgb(200, 0, 0));
        assert_eq!(surface.get_pixel(5, 3).unwrap(), Color::rgb(200, 0, 0));
        // corner of the bounding square lies outside the 2.5 radius
        assert_eq!(surface.get_pixel(7, 7).unwrap(), Color::TRANSPARENT);
        assert_eq!(surface.get_pixel(8, 5).unwrap(), Color::TRANSPARENT);
    }

    #[test]
    fn line_width_follows_brush_size() {
        let mut surface = RasterSurface::new(20, 20);
        render_segment(
            &mut surface,
            CanvasPoint::new(5, 10),
            CanvasPoint::new(15, 10),
            &brush(BrushStyle::Marker, 4),
        );

        let column = (0..20)
            .filter(|y| surface.get_pixel(10, *y).unwrap() != Color::TRANSPARENT)
            .collect::<Vec<_>>();
        assert_eq!(column, vec![8, 9, 10, 11, 12]);
    }

    #[test]
    fn pen_composites_at_forty_percent() {
        let mut surface = RasterSurface::new(5, 5);
        render_segment(
            &mut surface,
            CanvasPoint::new(0, 2),
            CanvasPoint::new(4, 2),
            &brush(BrushStyle::Pen, 1),
        );
        assert_eq!(surface.get_pixel(2, 2).unwrap(), Color::rgba(200, 0, 0, 102));

        render_segment(
            &mut surface,
            CanvasPoint::new(0, 2),
            CanvasPoint::new(4, 2),
            &brush(BrushStyle::Pen, 1),
        );
        let twice = surface.get_pixel(2, 2).unwrap();
        assert_eq!((twice.r, twice.g, twice.b), (200, 0, 0));
        assert_eq!(twice.a, 163);
    }

    #[test]
    fn airbrush_spreads_a_faint_glow_beyond_the_line() {
        let mut surface = RasterSurface::new(40, 40);
        render_segment(
            &mut surface,
            CanvasPoint::new(10, 20),
            CanvasPoint::new(30, 20),
            &brush(BrushStyle::Airbrush, 10),
        );

        let core = surface.get_pixel(20, 20).unwrap();
        let edge = surface.get_pixel(20, 27).unwrap();
        let outside = surface.get_pixel(20, 38).unwrap();

        assert!(core.a > edge.a, "core {core:?} should be denser than edge {edge:?}");
        assert!(edge.a > 0, "glow should reach past the line radius");
        assert!(core.a < 255 / 4, "airbrush stays soft, got {core:?}");
        assert_eq!(outside, Color::TRANSPARENT);
    }

    #[test]
    fn segment_outside_surface_is_clipped() {
        let mut surface = RasterSurface::new(8, 8);
        let report = render_segment(
            &mut surface,
            CanvasPoint::new(-20, -20),
            CanvasPoint::new(-10, -10),
            &brush(BrushStyle::Marker, 3),
        );
        assert_eq!(report, SegmentReport::default());
        assert!(painted(&surface).is_empty());

        let report = render_segment(
            &mut surface,
            CanvasPoint::new(-4, 3),
            CanvasPoint::new(20, 3),
            &brush(BrushStyle::Marker, 1),
        );
        assert_eq!(report.covered_pixels, 8);
    }

    #[test]
    fn repainting_same_opaque_color_reports_no_change() {
        let mut surface = RasterSurface::new(6, 6);
        let stroke = brush(BrushStyle::Marker, 2);
        let (a, b) = (CanvasPoint::new(1, 1), CanvasPoint::new(4, 1));
        let first = render_segment(&mut surface, a, b, &stroke);
        let second = render_segment(&mut surface, a, b, &stroke);
        assert!(first.changed_pixels > 0);
        assert_eq!(second.changed_pixels, 0);
        assert_eq!(second.covered_pixels, first.covered_pixels);
    }
}
