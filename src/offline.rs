//! Headless spectrogram rendering.
//!
//! Runs the same graph → tap → analyser → painter pipeline as the live
//! window, but clocked by sample counts instead of a display: no audio
//! device, no GPU, deterministic output.

use anyhow::{anyhow, Result};

use crate::audio::analyser::{Analyser, TapBuffer};
use crate::audio::graph::ToneGraph;
use crate::params::{AnalyserConfig, GraphConfig, VizConfig};
use crate::viz::canvas::PixelCanvas;
use crate::viz::spectrogram::SpectrumPainter;

/// Sample rate used when no audio device is involved.
pub const OFFLINE_SAMPLE_RATE_HZ: u32 = 44_100;

/// Render `duration_secs` of the tone graph into a finished spectrogram
/// canvas, polling the analyser `fps` times per rendered second.
pub fn render_spectrogram(
    graph_config: &GraphConfig,
    analyser_config: &AnalyserConfig,
    viz_config: &VizConfig,
    width: u32,
    height: u32,
    duration_secs: f32,
    fps: u32,
) -> Result<PixelCanvas> {
    if fps == 0 || duration_secs <= 0.0 {
        return Err(anyhow!("duration and fps must be positive"));
    }
    if width == 0 || height == 0 {
        return Err(anyhow!("canvas must be at least 1x1, got {}x{}", width, height));
    }
    viz_config
        .validate()
        .map_err(|e| anyhow!("invalid viz config: {}", e))?;

    let sample_rate = OFFLINE_SAMPLE_RATE_HZ;
    let mut analyser = Analyser::new(*analyser_config, sample_rate as f32)
        .map_err(|e| anyhow!("invalid analyser config: {}", e))?;

    let mut graph = ToneGraph::new(graph_config, sample_rate as f32);
    let mut tap = TapBuffer::new(analyser_config.fft_size);
    let mut painter = SpectrumPainter::new(
        viz_config.clone(),
        height,
        analyser.bin_count(),
        analyser.nyquist_hz(),
    );
    let mut canvas = PixelCanvas::new(width, height, viz_config.background);

    let total_frames = (duration_secs * fps as f32).ceil() as u64;
    let mut samples_done: u64 = 0;
    let mut window = vec![0.0f32; analyser_config.fft_size];
    let mut db_bins = vec![0.0f32; analyser.bin_count()];

    for frame in 0..total_frames {
        // Cumulative sample target per frame, so a non-integer
        // samples-per-frame ratio never drifts the clock.
        let target = (frame + 1) * sample_rate as u64 / fps as u64;
        while samples_done < target {
            let (l, r) = graph.next_frame();
            // Same hard clip the live output path applies
            let mono = 0.5 * (l.clamp(-0.5, 0.5) + r.clamp(-0.5, 0.5));
            tap.push(mono);
            samples_done += 1;
        }

        let clock_ms = samples_done as f64 / sample_rate as f64 * 1000.0;
        tap.copy_latest(&mut window);
        analyser.analyse(&window);
        analyser.write_float_frequency_data(&mut db_bins);
        painter.paint(&mut canvas, &db_bins, clock_ms);
    }

    Ok(canvas)
}
