//! Decibel-to-color arithmetic for the spectrum overlays.

use bytemuck::{Pod, Zeroable};

/// 8-bit RGBA pixel.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::opaque(0, 0, 0);

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Normalize a dB value over `[floor_db, 0]` to `0..=1`, clamping at both
/// ends. `floor_db` must be negative.
pub fn normalized_level(db: f32, floor_db: f32) -> f32 {
    ((db - floor_db) / -floor_db).clamp(0.0, 1.0)
}

/// How a bin's dB value becomes a pixel color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorMap {
    /// Red ramp: `red = -dB·2 / 100 · 255`, clamped. Silence saturates to
    /// full red; levels near 0 dB run dark.
    EmberRamp,
    /// Level as brightness over `[floor_db, 0]`, loud is bright.
    Grayscale,
    /// Constant color regardless of level.
    Solid(Rgba),
}

impl ColorMap {
    pub fn map(&self, db: f32, floor_db: f32) -> Rgba {
        match self {
            ColorMap::EmberRamp => {
                let bar = -db * 2.0;
                let red = bar / 100.0 * 255.0;
                // NaN counts as silence, like the infinities it comes from.
                // CSS rgb() rounds fractional channels to the nearest step.
                let red = if red.is_nan() { 255.0 } else { red.clamp(0.0, 255.0) };
                Rgba::opaque(red.round() as u8, 0, 0)
            }
            ColorMap::Grayscale => {
                let v = (normalized_level(db, floor_db) * 255.0) as u8;
                Rgba::opaque(v, v, v)
            }
            ColorMap::Solid(color) => *color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ember_ramp_arithmetic() {
        // -40 dB: bar = 80, red = 80/100·255 = 204.
        assert_eq!(ColorMap::EmberRamp.map(-40.0, -100.0), Rgba::opaque(204, 0, 0));
        // -50 dB and below saturate at full red.
        assert_eq!(ColorMap::EmberRamp.map(-50.0, -100.0), Rgba::opaque(255, 0, 0));
        assert_eq!(ColorMap::EmberRamp.map(-120.0, -100.0), Rgba::opaque(255, 0, 0));
    }

    #[test]
    fn test_ember_ramp_rounds_to_nearest() {
        // -40.15 dB: red = 80.3/100·255 = 204.765. Truncation would show
        // 204; the canvas showed 205.
        assert_eq!(
            ColorMap::EmberRamp.map(-40.15, -100.0),
            Rgba::opaque(205, 0, 0)
        );
    }

    #[test]
    fn test_ember_ramp_silence_saturates() {
        assert_eq!(
            ColorMap::EmberRamp.map(f32::NEG_INFINITY, -100.0),
            Rgba::opaque(255, 0, 0)
        );
        assert_eq!(ColorMap::EmberRamp.map(f32::NAN, -100.0), Rgba::opaque(255, 0, 0));
    }

    #[test]
    fn test_ember_ramp_clamps_dark_at_full_scale() {
        assert_eq!(ColorMap::EmberRamp.map(0.0, -100.0), Rgba::opaque(0, 0, 0));
        assert_eq!(ColorMap::EmberRamp.map(10.0, -100.0), Rgba::opaque(0, 0, 0));
    }

    #[test]
    fn test_grayscale_spans_floor_to_zero() {
        assert_eq!(ColorMap::Grayscale.map(0.0, -60.0), Rgba::opaque(255, 255, 255));
        assert_eq!(ColorMap::Grayscale.map(-60.0, -60.0), Rgba::opaque(0, 0, 0));
        assert_eq!(ColorMap::Grayscale.map(-30.0, -60.0), Rgba::opaque(127, 127, 127));
        assert_eq!(
            ColorMap::Grayscale.map(f32::NEG_INFINITY, -60.0),
            Rgba::opaque(0, 0, 0)
        );
    }

    #[test]
    fn test_solid_ignores_level() {
        let violet = Rgba::opaque(100, 50, 150);
        assert_eq!(ColorMap::Solid(violet).map(-10.0, -60.0), violet);
        assert_eq!(ColorMap::Solid(violet).map(f32::NEG_INFINITY, -60.0), violet);
    }
}
