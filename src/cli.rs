//! Command-line argument parsing.

use anyhow::{Context, Result};
use clap::Parser;

use crate::params::{AnalyserConfig, RecordingConfig, RenderConfig};
use crate::presets::Preset;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "Sonoscope")]
#[command(about = "Two-tone spectrum visualizer", long_about = None)]
pub struct Args {
    /// Visualization preset (see --list-presets)
    #[arg(long, value_name = "NAME", default_value = "classic")]
    pub preset: String,

    /// List the available presets and exit
    #[arg(long)]
    pub list_presets: bool,

    /// Record the live run to PNG frames plus audio.wav (duration in seconds)
    #[arg(long, value_name = "SECONDS")]
    pub record: Option<f32>,

    /// Render a spectrogram offline, no window or audio device (duration in
    /// seconds)
    #[arg(long, value_name = "SECONDS")]
    pub headless: Option<f32>,

    /// Output directory for recordings and exports
    #[arg(long, value_name = "DIR", default_value = "recording")]
    pub output_dir: String,

    /// Window / canvas width (pixels)
    #[arg(long, value_name = "PIXELS", default_value = "1280")]
    pub width: u32,

    /// Window / canvas height (pixels)
    #[arg(long, value_name = "PIXELS", default_value = "720")]
    pub height: u32,

    /// FFT size in samples (power of two)
    #[arg(long, value_name = "SAMPLES", default_value = "2048")]
    pub fft_size: usize,

    /// Analyser smoothing-over-time constant, 0.0 ..< 1.0
    #[arg(long, value_name = "TAU", default_value = "0.8")]
    pub smoothing: f32,
}

impl Args {
    /// Resolve the preset by name, falling back to `classic` with a warning.
    pub fn resolve_preset(&self) -> Preset {
        match Preset::by_name(&self.preset.to_lowercase()) {
            Some(preset) => {
                println!("Preset: {} ({})", preset.name, preset.summary);
                preset
            }
            None => {
                eprintln!("Warning: Unknown preset '{}', using classic", self.preset);
                Preset::default()
            }
        }
    }

    pub fn analyser_config(&self) -> AnalyserConfig {
        AnalyserConfig {
            fft_size: self.fft_size,
            smoothing_time_constant: self.smoothing,
        }
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            window_width: self.width,
            window_height: self.height,
        }
    }

    /// Recording configuration for a live `--record` run, with the output
    /// directories created.
    pub fn create_recording_config(&self) -> Result<Option<RecordingConfig>> {
        match self.record {
            Some(duration) => {
                let config = self.recording_config(duration);
                std::fs::create_dir_all(config.frames_dir())
                    .context("creating frames directory")?;
                Ok(Some(config))
            }
            None => Ok(None),
        }
    }

    /// Recording configuration for a `--headless` render, with the output
    /// directory created.
    pub fn create_headless_config(&self) -> Result<Option<RecordingConfig>> {
        match self.headless {
            Some(duration) => {
                let config = self.recording_config(duration);
                std::fs::create_dir_all(&config.output_dir)
                    .context("creating output directory")?;
                Ok(Some(config))
            }
            None => Ok(None),
        }
    }

    fn recording_config(&self, duration_secs: f32) -> RecordingConfig {
        let mut config = RecordingConfig::new(duration_secs);
        config.output_dir = self.output_dir.clone();
        config
    }
}
