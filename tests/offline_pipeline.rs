//! Integration tests for the offline graph → analyser → painter pipeline.
//!
//! These exercise the exact code path `--headless` takes: the default
//! two-tone graph rendered sample by sample, analysed with the windowed
//! FFT, and painted column by column onto the canvas.

use sonoscope::offline::{render_spectrogram, OFFLINE_SAMPLE_RATE_HZ};
use sonoscope::params::{Advance, AnalyserConfig, GraphConfig, VizConfig};
use sonoscope::presets::Preset;
use sonoscope::viz::Rgba;

const WIDTH: u32 = 64;
/// One canvas row per analyser bin at fft_size 2048.
const HEIGHT: u32 = 1024;
const FPS: u32 = 60;

fn immediate_viz() -> VizConfig {
    VizConfig {
        warmup_ms: 0,
        ..VizConfig::default()
    }
}

/// Canvas row where a tone should land: its FFT bin, counted up from the
/// bottom row.
fn tone_row(frequency_hz: f32, fft_size: usize) -> u32 {
    let bin = (frequency_hz * fft_size as f32 / OFFLINE_SAMPLE_RATE_HZ as f32).round() as u32;
    HEIGHT - 1 - bin
}

/// The two fixed tones must come out as darker ember rows against the
/// saturated-red silence, at the rows matching 440 Hz and 660 Hz.
#[test]
fn spectrogram_lights_the_tone_rows() {
    let analyser_config = AnalyserConfig::default();
    let canvas = render_spectrogram(
        &GraphConfig::default(),
        &analyser_config,
        &immediate_viz(),
        WIDTH,
        HEIGHT,
        0.5,
        FPS,
    )
    .unwrap();

    // A late column, after the smoothing has converged.
    let x = 25;
    let row_440 = tone_row(440.0, analyser_config.fft_size);
    let row_660 = tone_row(660.0, analyser_config.fft_size);
    // A row far from both tones sees only sidelobe leakage: full red.
    let quiet_row = tone_row(4000.0, analyser_config.fft_size);

    assert_eq!(canvas.pixel(x, quiet_row), Rgba::opaque(255, 0, 0));
    assert!(
        canvas.pixel(x, row_440).r < 240,
        "440 Hz row not distinct from silence: {:?}",
        canvas.pixel(x, row_440)
    );
    assert!(
        canvas.pixel(x, row_660).r < 240,
        "660 Hz row not distinct from silence: {:?}",
        canvas.pixel(x, row_660)
    );
}

/// With the default 5000 ms warmup, a 2 s render never starts painting.
#[test]
fn warmup_gate_holds_the_canvas_at_background() {
    let canvas = render_spectrogram(
        &GraphConfig::default(),
        &AnalyserConfig::default(),
        &VizConfig::default(),
        WIDTH,
        HEIGHT,
        2.0,
        FPS,
    )
    .unwrap();

    assert!(
        canvas.rows().flatten().all(|p| *p == Rgba::BLACK),
        "columns were painted before the warmup elapsed"
    );
}

/// Past the warmup, exactly the frames after the 5-second mark paint
/// columns: a 6 s render at 60 fps yields 61 columns.
#[test]
fn warmup_gate_opens_on_the_audio_clock() {
    let canvas = render_spectrogram(
        &GraphConfig::default(),
        &AnalyserConfig::default(),
        &VizConfig::default(),
        128,
        HEIGHT,
        6.0,
        FPS,
    )
    .unwrap();

    let column_painted =
        |x: u32| (0..HEIGHT).any(|y| canvas.pixel(x, y) != Rgba::BLACK);

    assert!(column_painted(0), "first post-warmup column missing");
    assert!(column_painted(60), "last expected column missing");
    assert!(!column_painted(61), "painted more columns than frames");
}

/// A degenerate canvas is a configuration error, not a panic — including
/// under a scrolling column config, which shifts the whole image each frame.
#[test]
fn zero_size_canvas_is_rejected() {
    let scrolling = VizConfig {
        warmup_ms: 0,
        frame_stride: 2,
        column_width_px: 2,
        advance: Advance::Scroll,
        ..VizConfig::default()
    };
    assert!(render_spectrogram(
        &GraphConfig::default(),
        &AnalyserConfig::default(),
        &scrolling,
        0,
        256,
        0.1,
        30,
    )
    .is_err());

    assert!(render_spectrogram(
        &GraphConfig::default(),
        &AnalyserConfig::default(),
        &immediate_viz(),
        WIDTH,
        0,
        0.1,
        30,
    )
    .is_err());
}

/// The offline clock is sample-exact, so two renders of the same
/// configuration are byte-identical.
#[test]
fn offline_render_is_deterministic() {
    let render = || {
        render_spectrogram(
            &GraphConfig::default(),
            &AnalyserConfig::default(),
            &immediate_viz(),
            WIDTH,
            256,
            0.4,
            FPS,
        )
        .unwrap()
    };

    let first = render();
    let second = render();
    assert_eq!(first.as_bytes(), second.as_bytes());
}

/// Every shipped preset renders offline, including its crop/scale pass.
#[test]
fn all_presets_render_offline() {
    for preset in Preset::all() {
        let viz = VizConfig {
            warmup_ms: 0,
            ..preset.viz
        };
        let canvas = render_spectrogram(
            &GraphConfig::default(),
            &AnalyserConfig::default(),
            &viz,
            WIDTH,
            256,
            0.3,
            30,
        )
        .unwrap_or_else(|e| panic!("preset {} failed: {e}", preset.name));

        let finished = match preset.post {
            Some(crop) => crop.apply(&canvas),
            None => canvas,
        };
        assert_eq!(finished.as_bytes().len(), (WIDTH * 256 * 4) as usize);
    }
}
