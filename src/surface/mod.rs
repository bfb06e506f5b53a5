//! Fixed-size RGBA pixel buffer and its snapshot codec.

mod snapshot;

use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};
use thiserror::Error;

use crate::geometry::Color;

pub use snapshot::Snapshot;

pub const DEFAULT_CANVAS_WIDTH: u32 = 800;
pub const DEFAULT_CANVAS_HEIGHT: u32 = 800;

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("pixel ({x}, {y}) is outside the {width}x{height} surface")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },
    #[error("failed to decode snapshot")]
    Decode(#[source] image::ImageError),
    #[error("failed to encode snapshot")]
    Encode(#[source] image::ImageError),
    #[error("snapshot is {actual:?} but the surface is {expected:?}")]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
}

pub type SurfaceResult<T> = std::result::Result<T, SurfaceError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterSurface {
    pixels: RgbaImage,
}

impl Default for RasterSurface {
    fn default() -> Self {
        Self::new(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT)
    }
}

impl RasterSurface {
    /// Creates a fully transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.checked_index(x, y).is_some()
    }

    fn checked_index(&self, x: i32, y: i32) -> Option<(u32, u32)> {
        let x = u32::try_from(x).ok()?;
        let y = u32::try_from(y).ok()?;
        (x < self.width() && y < self.height()).then_some((x, y))
    }

    fn out_of_bounds(&self, x: i32, y: i32) -> SurfaceError {
        SurfaceError::OutOfBounds {
            x,
            y,
            width: self.width(),
            height: self.height(),
        }
    }

    pub fn get_pixel(&self, x: i32, y: i32) -> SurfaceResult<Color> {
        let (px, py) = self
            .checked_index(x, y)
            .ok_or_else(|| self.out_of_bounds(x, y))?;
        Ok(Color::from_array(self.pixels.get_pixel(px, py).0))
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) -> SurfaceResult<()> {
        let (px, py) = self
            .checked_index(x, y)
            .ok_or_else(|| self.out_of_bounds(x, y))?;
        self.pixels.put_pixel(px, py, Rgba(color.to_array()));
        Ok(())
    }

    /// Composites `color` over the pixel with the given extra opacity.
    /// Coordinates outside the surface are ignored. Returns whether the pixel changed.
    pub(crate) fn blend_pixel(&mut self, x: i32, y: i32, color: Color, opacity: f32) -> bool {
        let Some((px, py)) = self.checked_index(x, y) else {
            return false;
        };
        let pixel = self.pixels.get_pixel_mut(px, py);
        let blended = composite_over(pixel.0, color, opacity);
        if blended == pixel.0 {
            return false;
        }
        pixel.0 = blended;
        true
    }

    pub fn clear(&mut self) {
        for pixel in self.pixels.pixels_mut() {
            *pixel = Rgba(Color::TRANSPARENT.to_array());
        }
    }

    /// Row-major RGBA8 bytes, for handing the buffer to a display layer.
    pub fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn encode_snapshot(&self) -> SurfaceResult<Snapshot> {
        let mut bytes = Vec::new();
        self.pixels
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(SurfaceError::Encode)?;
        Ok(Snapshot::from_bytes(bytes))
    }

    /// Replaces the whole buffer. On any error the buffer is left untouched.
    pub fn decode_snapshot(&mut self, snapshot: &Snapshot) -> SurfaceResult<()> {
        let decoded = image::load_from_memory_with_format(snapshot.as_bytes(), ImageFormat::Png)
            .map_err(SurfaceError::Decode)?
            .into_rgba8();

        if decoded.dimensions() != self.pixels.dimensions() {
            return Err(SurfaceError::DimensionMismatch {
                expected: self.pixels.dimensions(),
                actual: decoded.dimensions(),
            });
        }

        self.pixels = decoded;
        Ok(())
    }
}

/// Source-over compositing on straight alpha.
pub(crate) fn composite_over(dst: [u8; 4], src: Color, opacity: f32) -> [u8; 4] {
    let src_alpha = f32::from(src.a) / 255.0 * opacity.clamp(0.0, 1.0);
    if src_alpha <= 0.0 {
        return dst;
    }
    if src_alpha >= 1.0 {
        return [src.r, src.g, src.b, 255];
    }

    let dst_alpha = f32::from(dst[3]) / 255.0;
    let dst_weight = dst_alpha * (1.0 - src_alpha);
    let out_alpha = src_alpha + dst_weight;

    let channel = |s: u8, d: u8| -> u8 {
        let value = (f32::from(s) * src_alpha + f32::from(d) * dst_weight) / out_alpha;
        value.round().clamp(0.0, 255.0) as u8
    };

    [
        channel(src.r, dst[0]),
        channel(src.g, dst[1]),
        channel(src.b, dst[2]),
        (out_alpha * 255.0).round().clamp(0.0, 255.0) as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkerboard(width: u32, height: u32) -> RasterSurface {
        let mut surface = RasterSurface::new(width, height);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                let shade = ((x + y) % 2 * 255) as u8;
                surface
                    .set_pixel(x, y, Color::rgba(shade, 40, 255 - shade, (x * 7 % 256) as u8))
                    .unwrap();
            }
        }
        surface
    }

    #[test]
    fn new_surface_is_transparent() {
        let surface = RasterSurface::new(4, 3);
        assert_eq!(surface.width(), 4);
        assert_eq!(surface.height(), 3);
        assert!(surface.as_raw().iter().all(|byte| *byte == 0));
    }

    #[test]
    fn default_surface_uses_canvas_dimensions() {
        let surface = RasterSurface::default();
        assert_eq!(
            (surface.width(), surface.height()),
            (DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT)
        );
    }

    #[test]
    fn set_then_get_pixel() {
        let mut surface = RasterSurface::new(5, 5);
        surface.set_pixel(2, 3, Color::rgb(1, 2, 3)).unwrap();
        assert_eq!(surface.get_pixel(2, 3).unwrap(), Color::rgb(1, 2, 3));
        assert_eq!(surface.get_pixel(3, 2).unwrap(), Color::TRANSPARENT);
    }

    #[test]
    fn pixel_access_outside_surface_is_out_of_bounds() {
        let mut surface = RasterSurface::new(5, 5);
        for (x, y) in [(-1, 0), (0, -1), (5, 0), (0, 5)] {
            assert!(matches!(
                surface.get_pixel(x, y),
                Err(SurfaceError::OutOfBounds { width: 5, height: 5, .. })
            ));
            assert!(surface.set_pixel(x, y, Color::BLACK).is_err());
        }
    }

    #[test]
    fn clear_resets_every_pixel() {
        let mut surface = checkerboard(6, 6);
        surface.clear();
        assert_eq!(surface, RasterSurface::new(6, 6));
    }

    #[test]
    fn snapshot_round_trip_is_lossless() {
        let original = checkerboard(9, 7);
        let snapshot = original.encode_snapshot().unwrap();

        let mut restored = RasterSurface::new(9, 7);
        restored.decode_snapshot(&snapshot).unwrap();
        assert_eq!(restored.as_raw(), original.as_raw());
    }

    #[test]
    fn malformed_snapshot_leaves_buffer_untouched() {
        let mut surface = checkerboard(4, 4);
        let before = surface.clone();

        let err = surface
            .decode_snapshot(&Snapshot::from_bytes(b"not a png".to_vec()))
            .unwrap_err();
        assert!(matches!(err, SurfaceError::Decode(_)));
        assert_eq!(surface, before);
    }

    #[test]
    fn snapshot_with_other_dimensions_is_rejected() {
        let snapshot = RasterSurface::new(3, 3).encode_snapshot().unwrap();
        let mut surface = checkerboard(4, 4);
        let before = surface.clone();

        let err = surface.decode_snapshot(&snapshot).unwrap_err();
        assert!(matches!(
            err,
            SurfaceError::DimensionMismatch {
                expected: (4, 4),
                actual: (3, 3)
            }
        ));
        assert_eq!(surface, before);
    }

    #[test]
    fn opaque_source_replaces_destination() {
        let dst = [10, 20, 30, 40];
        assert_eq!(composite_over(dst, Color::rgb(200, 100, 0), 1.0), [200, 100, 0, 255]);
    }

    #[test]
    fn zero_opacity_keeps_destination() {
        let dst = [10, 20, 30, 40];
        assert_eq!(composite_over(dst, Color::rgb(200, 100, 0), 0.0), dst);
    }

    #[test]
    fn partial_opacity_over_transparent_keeps_source_color() {
        let out = composite_over([0, 0, 0, 0], Color::rgb(255, 0, 0), 0.4);
        assert_eq!(out, [255, 0, 0, 102]);
    }

    #[test]
    fn partial_opacity_over_opaque_mixes_channels() {
        let out = composite_over([0, 0, 255, 255], Color::rgb(255, 0, 0), 0.4);
        assert_eq!(out, [102, 0, 153, 255]);
    }

    #[test]
    fn blend_pixel_clips_outside_surface() {
        let mut surface = RasterSurface::new(2, 2);
        assert!(!surface.blend_pixel(-1, 0, Color::BLACK, 1.0));
        assert!(!surface.blend_pixel(0, 2, Color::BLACK, 1.0));
        assert!(surface.blend_pixel(1, 1, Color::BLACK, 1.0));
        assert_eq!(surface.get_pixel(1, 1).unwrap(), Color::BLACK);
    }
}
