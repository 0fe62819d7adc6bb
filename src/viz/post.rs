//! Crop/scale post-process some variants applied when presenting the
//! overlay: a normalized sub-rectangle of the canvas stretched to the full
//! output.

use crate::viz::canvas::PixelCanvas;

/// Sub-rectangle of the overlay in normalized canvas coordinates
/// (x right, y down, everything in 0..=1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropScale {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl CropScale {
    /// The whole canvas, untouched.
    pub const FULL: CropScale = CropScale {
        x: 0.0,
        y: 0.0,
        w: 1.0,
        h: 1.0,
    };

    pub fn validate(&self) -> Result<(), String> {
        if !(self.w > 0.0 && self.h > 0.0) {
            return Err("crop region must be non-empty".to_string());
        }
        if self.x < 0.0 || self.y < 0.0 || self.x + self.w > 1.0 || self.y + self.h > 1.0 {
            return Err(format!(
                "crop region must lie inside the canvas, got {:?}",
                self
            ));
        }
        Ok(())
    }

    /// Offset/scale pair for the blit shader, which samples at
    /// `uv · scale + offset`.
    pub fn uv_transform(&self) -> ([f32; 2], [f32; 2]) {
        ([self.x, self.y], [self.w, self.h])
    }

    /// CPU crop-and-stretch for exported images: nearest-pixel resample of
    /// the region back up to the source size.
    pub fn apply(&self, src: &PixelCanvas) -> PixelCanvas {
        let (w, h) = (src.width(), src.height());
        let mut out = PixelCanvas::new(w, h, crate::viz::color::Rgba::BLACK);

        for y in 0..h {
            let v = (y as f32 + 0.5) / h as f32 * self.h + self.y;
            let sy = ((v * h as f32) as u32).min(h - 1);
            for x in 0..w {
                let u = (x as f32 + 0.5) / w as f32 * self.w + self.x;
                let sx = ((u * w as f32) as u32).min(w - 1);
                out.fill_rect(x as i32, y as i32, 1, 1, src.pixel(sx, sy));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viz::color::Rgba;

    const RED: Rgba = Rgba::opaque(255, 0, 0);

    #[test]
    fn test_validate() {
        assert!(CropScale::FULL.validate().is_ok());
        assert!(CropScale { x: 0.0, y: 0.75, w: 1.0, h: 0.25 }.validate().is_ok());

        let empty = CropScale { x: 0.2, y: 0.2, w: 0.0, h: 0.5 };
        assert!(empty.validate().is_err());
        let outside = CropScale { x: 0.5, y: 0.0, w: 0.6, h: 1.0 };
        assert!(outside.validate().is_err());
        let negative = CropScale { x: -0.1, y: 0.0, w: 0.5, h: 0.5 };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_full_crop_is_identity() {
        let mut canvas = PixelCanvas::new(4, 4, Rgba::BLACK);
        canvas.fill_rect(1, 2, 1, 1, RED);

        let out = CropScale::FULL.apply(&canvas);
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(out.pixel(x, y), canvas.pixel(x, y));
            }
        }
    }

    #[test]
    fn test_bottom_quarter_fills_the_frame() {
        // Bottom quarter red, rest black; the crop stretches the red band
        // over the whole output.
        let mut canvas = PixelCanvas::new(4, 8, Rgba::BLACK);
        canvas.fill_rect(0, 6, 4, 2, RED);

        let crop = CropScale { x: 0.0, y: 0.75, w: 1.0, h: 0.25 };
        let out = crop.apply(&canvas);
        assert!(out.rows().flatten().all(|p| *p == RED));
    }

    #[test]
    fn test_uv_transform_matches_the_region() {
        let crop = CropScale { x: 0.25, y: 0.5, w: 0.5, h: 0.25 };
        let (offset, scale) = crop.uv_transform();
        assert_eq!(offset, [0.25, 0.5]);
        assert_eq!(scale, [0.5, 0.25]);
    }
}
