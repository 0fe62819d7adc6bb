//! Parameter definitions with physical units and documented semantics.
//!
//! Every knob the demo variants turned lives here: the tone graph, the
//! analyser, the per-variant visualization options, and the window /
//! recording configuration.

use crate::audio::oscillator::Waveform;
use crate::viz::color::{ColorMap, Rgba};

/// A single tone source: oscillator, level, and stereo placement.
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// Oscillator waveform
    pub waveform: Waveform,

    /// Oscillator frequency (Hz)
    pub frequency_hz: f32,

    /// Stereo position, -1.0 (hard left) ..= 1.0 (hard right)
    pub pan: f32,

    /// Per-voice amplitude before panning (1.0 = full scale)
    pub level: f32,
}

/// The tone graph: voices summed into a stereo bus under a master gain.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    /// Tone sources mixed onto the bus
    pub voices: Vec<VoiceConfig>,

    /// Master gain applied after the voice sum (1.0 = unity)
    pub master_gain: f32,
}

impl Default for GraphConfig {
    fn default() -> Self {
        // The demos' fixed pair of test tones: 440 Hz in the left speaker,
        // 660 Hz in the right, master volume pulled well down.
        Self {
            voices: vec![
                VoiceConfig {
                    waveform: Waveform::Sine,
                    frequency_hz: 440.0,
                    pan: -1.0,
                    level: 1.0,
                },
                VoiceConfig {
                    waveform: Waveform::Sine,
                    frequency_hz: 660.0,
                    pan: 1.0,
                    level: 1.0,
                },
            ],
            master_gain: 0.1,
        }
    }
}

/// Analyser configuration (FFT size and temporal smoothing).
#[derive(Debug, Clone, Copy)]
pub struct AnalyserConfig {
    /// FFT window size in samples (power of two, 32..=32768)
    pub fft_size: usize,

    /// Blend factor for smoothing-over-time, 0.0 (none) ..< 1.0.
    /// Each poll keeps this fraction of the previous magnitudes.
    pub smoothing_time_constant: f32,
}

impl Default for AnalyserConfig {
    fn default() -> Self {
        Self {
            fft_size: 2048,
            smoothing_time_constant: 0.8,
        }
    }
}

impl AnalyserConfig {
    /// Number of frequency bins the analyser reports (half the FFT size).
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Validate configuration (FFT size must be a power of two, etc.)
    pub fn validate(&self) -> Result<(), String> {
        if !self.fft_size.is_power_of_two() {
            return Err(format!(
                "FFT size must be a power of two, got {}",
                self.fft_size
            ));
        }
        if self.fft_size < 32 || self.fft_size > 32768 {
            return Err(format!(
                "FFT size must be within 32..=32768, got {}",
                self.fft_size
            ));
        }
        if !(0.0..1.0).contains(&self.smoothing_time_constant) {
            return Err(format!(
                "smoothing must be within [0, 1), got {}",
                self.smoothing_time_constant
            ));
        }
        Ok(())
    }
}

/// How the painter turns a column of dB bins into pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    /// One column per frame, time running left to right
    Spectrogram,
    /// Full-frame bar graph, frequency running left to right
    Bars,
}

/// What happens when the spectrogram cursor reaches the right edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Keep counting but draw nothing further (the scripts let the host
    /// clip columns past the edge forever)
    Stop,
    /// Jump back to column zero and overwrite
    Wrap,
    /// Shift the image left one column and paint at the right edge
    Scroll,
}

/// Per-variant visualization options. The six demo scripts differed only
/// in these values.
#[derive(Debug, Clone)]
pub struct VizConfig {
    /// Audio-clock delay before the first column is drawn (milliseconds)
    pub warmup_ms: u64,

    /// Draw every Nth frame (1 = every frame)
    pub frame_stride: u32,

    /// Horizontal pixels per drawn column
    pub column_width_px: u32,

    /// Spectrogram or bar graph
    pub mode: DrawMode,

    /// Cursor behavior at the right edge (spectrogram mode)
    pub advance: Advance,

    /// dB → color mapping
    pub color_map: ColorMap,

    /// Background / clear color
    pub background: Rgba,

    /// Bins quieter than this paint as background (dB, None = filter off)
    pub min_db: Option<f32>,

    /// Bins outside this band paint as background (Hz, None = filter off)
    pub freq_range_hz: Option<(f32, f32)>,
}

impl Default for VizConfig {
    fn default() -> Self {
        // The baseline variant: five-second warmup, one 1 px column per
        // frame, ember ramp on black, both filters wired but off.
        Self {
            warmup_ms: 5000,
            frame_stride: 1,
            column_width_px: 1,
            mode: DrawMode::Spectrogram,
            advance: Advance::Stop,
            color_map: ColorMap::EmberRamp,
            background: Rgba::BLACK,
            min_db: None,
            freq_range_hz: None,
        }
    }
}

impl VizConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.frame_stride == 0 {
            return Err("frame_stride must be at least 1".to_string());
        }
        if self.column_width_px == 0 {
            return Err("column_width_px must be at least 1".to_string());
        }
        if let Some((lo, hi)) = self.freq_range_hz {
            if lo < 0.0 || hi <= lo {
                return Err(format!(
                    "frequency range must satisfy 0 <= lo < hi, got {}..{}",
                    lo, hi
                ));
            }
        }
        Ok(())
    }
}

/// Window configuration. The overlay canvas is created at this size and
/// stretched to the surface if the window is later resized.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
        }
    }
}

/// Recording mode configuration
#[derive(Debug, Clone)]
pub struct RecordingConfig {
    /// Duration to record (seconds)
    pub duration_secs: f32,

    /// Output directory for frames, audio, and exported spectrograms
    pub output_dir: String,

    /// Frame rate (FPS)
    pub fps: u32,
}

impl RecordingConfig {
    pub fn new(duration_secs: f32) -> Self {
        Self {
            duration_secs,
            output_dir: "recording".to_string(),
            fps: 60,
        }
    }

    /// Total number of frames to capture
    pub fn total_frames(&self) -> usize {
        (self.duration_secs * self.fps as f32).ceil() as usize
    }

    /// Frame directory path
    pub fn frames_dir(&self) -> String {
        format!("{}/frames", self.output_dir)
    }

    /// Audio file path
    pub fn audio_path(&self) -> String {
        format!("{}/audio.wav", self.output_dir)
    }

    /// Exported spectrogram path (headless mode)
    pub fn spectrogram_path(&self) -> String {
        format!("{}/spectrogram.png", self.output_dir)
    }
}
