//! The demo variants, expressed as data.
//!
//! All presets share the same tone graph and analyser; they differ only in
//! how the spectrum is painted and presented.

use crate::params::{Advance, DrawMode, VizConfig};
use crate::viz::color::{ColorMap, Rgba};
use crate::viz::post::CropScale;

/// A named visualization variant selectable from the command line.
#[derive(Debug, Clone)]
pub struct Preset {
    pub name: &'static str,
    pub summary: &'static str,
    pub viz: VizConfig,
    /// Crop/scale applied when presenting the overlay
    pub post: Option<CropScale>,
}

impl Preset {
    pub fn all() -> Vec<Preset> {
        vec![classic(), gated(), grayscale(), bars(), lowband(), halftime()]
    }

    pub fn by_name(name: &str) -> Option<Preset> {
        Self::all().into_iter().find(|p| p.name == name)
    }
}

impl Default for Preset {
    fn default() -> Self {
        classic()
    }
}

/// The baseline: five-second warmup, 1 px ember columns until the canvas
/// is full.
fn classic() -> Preset {
    Preset {
        name: "classic",
        summary: "ember spectrogram, 5 s warmup, stops at the right edge",
        viz: VizConfig::default(),
        post: None,
    }
}

/// The baseline with its documented threshold and band options switched on.
fn gated() -> Preset {
    Preset {
        name: "gated",
        summary: "ember spectrogram gated at -60 dB, 1 Hz..24 kHz band",
        viz: VizConfig {
            min_db: Some(-60.0),
            freq_range_hz: Some((1.0, 24_000.0)),
            ..VizConfig::default()
        },
        post: None,
    }
}

fn grayscale() -> Preset {
    Preset {
        name: "grayscale",
        summary: "grayscale spectrogram, no warmup, wraps at the right edge",
        viz: VizConfig {
            warmup_ms: 0,
            advance: Advance::Wrap,
            color_map: ColorMap::Grayscale,
            ..VizConfig::default()
        },
        post: None,
    }
}

/// The bar-graph drawing mode, in the violet the scripts reserved for it.
fn bars() -> Preset {
    Preset {
        name: "bars",
        summary: "full-frame bar graph, solid violet, gated at -60 dB",
        viz: VizConfig {
            mode: DrawMode::Bars,
            color_map: ColorMap::Solid(Rgba::opaque(100, 50, 150)),
            min_db: Some(-60.0),
            ..VizConfig::default()
        },
        post: None,
    }
}

/// The crop/scale variant: the lowest quarter of the bins (the bottom of
/// the canvas) stretched over the whole window.
fn lowband() -> Preset {
    Preset {
        name: "lowband",
        summary: "ember spectrogram cropped to the low quarter of the band",
        viz: VizConfig::default(),
        post: Some(CropScale {
            x: 0.0,
            y: 0.75,
            w: 1.0,
            h: 0.25,
        }),
    }
}

/// The timing variant: half the columns, twice as wide, scrolling.
fn halftime() -> Preset {
    Preset {
        name: "halftime",
        summary: "ember spectrogram, 2 px columns every second frame, scrolls",
        viz: VizConfig {
            frame_stride: 2,
            column_width_px: 2,
            advance: Advance::Scroll,
            ..VizConfig::default()
        },
        post: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_preset_validates() {
        for preset in Preset::all() {
            assert!(preset.viz.validate().is_ok(), "preset {}", preset.name);
            if let Some(post) = preset.post {
                assert!(post.validate().is_ok(), "preset {}", preset.name);
            }
        }
    }

    #[test]
    fn test_preset_names_are_unique() {
        let all = Preset::all();
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }

    #[test]
    fn test_by_name_resolves_every_preset() {
        for preset in Preset::all() {
            assert!(Preset::by_name(preset.name).is_some());
        }
        assert!(Preset::by_name("nope").is_none());
    }

    #[test]
    fn test_classic_is_the_baseline() {
        let preset = Preset::by_name("classic").unwrap();
        assert_eq!(preset.viz.warmup_ms, 5000);
        assert_eq!(preset.viz.frame_stride, 1);
        assert_eq!(preset.viz.column_width_px, 1);
        assert_eq!(preset.viz.advance, Advance::Stop);
        assert_eq!(preset.viz.color_map, ColorMap::EmberRamp);
        assert!(preset.viz.min_db.is_none());
        assert!(preset.viz.freq_range_hz.is_none());
        assert!(preset.post.is_none());
    }
}
