//! Frequency analyser: windowed FFT over the most recent samples, with
//! smoothing-over-time and decibel output.
//!
//! The shape matches the analyser node the demo scripts polled: half of
//! `fft_size` bins, each poll blends new magnitudes into the previous ones,
//! and `write_float_frequency_data` reports `20·log10(magnitude)`.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f32::consts::PI;
use std::sync::Arc;

use crate::params::AnalyserConfig;

/// Blackman window for FFT analysis (exactly zero at both edges, one at
/// the center).
pub fn blackman_window(index: usize, size: usize) -> f32 {
    let x = (2.0 * PI * index as f32) / (size as f32 - 1.0);
    0.42 - 0.5 * x.cos() + 0.08 * (2.0 * x).cos()
}

/// Ring buffer holding the most recent `capacity` mono samples, zero-filled
/// until the first wrap so early polls see leading silence.
pub struct TapBuffer {
    buf: Vec<f32>,
    write_pos: usize,
}

impl TapBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: vec![0.0; capacity],
            write_pos: 0,
        }
    }

    pub fn push(&mut self, sample: f32) {
        self.buf[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buf.len();
    }

    pub fn push_slice(&mut self, samples: &[f32]) {
        for &s in samples {
            self.push(s);
        }
    }

    /// Copy the ring contents in chronological order (oldest first).
    /// `out.len()` must equal the capacity.
    pub fn copy_latest(&self, out: &mut [f32]) {
        assert_eq!(out.len(), self.buf.len());
        let head = self.buf.len() - self.write_pos;
        out[..head].copy_from_slice(&self.buf[self.write_pos..]);
        out[head..].copy_from_slice(&self.buf[..self.write_pos]);
    }
}

/// Windowed-FFT analyser with smoothing-over-time.
pub struct Analyser {
    config: AnalyserConfig,
    sample_rate_hz: f32,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    fft_buf: Vec<Complex<f32>>,
    /// Smoothed linear magnitudes, one per bin
    magnitudes: Vec<f32>,
}

impl Analyser {
    pub fn new(config: AnalyserConfig, sample_rate_hz: f32) -> Result<Self, String> {
        config.validate()?;
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(config.fft_size);
        let window = (0..config.fft_size)
            .map(|i| blackman_window(i, config.fft_size))
            .collect();
        Ok(Self {
            config,
            sample_rate_hz,
            fft,
            window,
            fft_buf: vec![Complex::new(0.0, 0.0); config.fft_size],
            magnitudes: vec![0.0; config.fft_size / 2],
        })
    }

    pub fn fft_size(&self) -> usize {
        self.config.fft_size
    }

    /// Number of frequency bins reported (half the FFT size).
    pub fn bin_count(&self) -> usize {
        self.config.fft_size / 2
    }

    pub fn nyquist_hz(&self) -> f32 {
        self.sample_rate_hz / 2.0
    }

    /// Center frequency of a bin: `bin · sample_rate / fft_size`.
    pub fn bin_frequency_hz(&self, bin: usize) -> f32 {
        bin as f32 * self.sample_rate_hz / self.config.fft_size as f32
    }

    /// Run one analysis pass over exactly `fft_size` time-domain samples
    /// and blend the magnitudes into the running smoothed values.
    pub fn analyse(&mut self, samples: &[f32]) {
        assert_eq!(samples.len(), self.config.fft_size);

        for (i, &s) in samples.iter().enumerate() {
            self.fft_buf[i] = Complex::new(s * self.window[i], 0.0);
        }
        self.fft.process(&mut self.fft_buf);

        // Normalize by 1/N, then smooth: keep tau of the old magnitudes.
        let norm = 1.0 / self.config.fft_size as f32;
        let tau = self.config.smoothing_time_constant;
        for (k, mag) in self.magnitudes.iter_mut().enumerate() {
            let new = self.fft_buf[k].norm() * norm;
            *mag = tau * *mag + (1.0 - tau) * new;
        }
    }

    /// Write the current spectrum as decibels, one value per bin. Exact
    /// silence reports negative infinity; callers clamp at their floor.
    pub fn write_float_frequency_data(&self, out: &mut [f32]) {
        for (o, &m) in out.iter_mut().zip(self.magnitudes.iter()) {
            *o = 20.0 * m.log10();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(frequency_hz: f32, amplitude: f32, sample_rate_hz: f32, n: usize) -> Vec<f32> {
        (0..n)
            .map(|i| {
                let t = i as f32 / sample_rate_hz;
                amplitude * (2.0 * PI * frequency_hz * t).sin()
            })
            .collect()
    }

    fn unsmoothed(fft_size: usize) -> AnalyserConfig {
        AnalyserConfig {
            fft_size,
            smoothing_time_constant: 0.0,
        }
    }

    #[test]
    fn test_blackman_window() {
        let size = 2048;

        // Blackman is 0 at the edges and 1 at the center.
        assert!(blackman_window(0, size).abs() < 1e-5);
        assert!(blackman_window(size - 1, size).abs() < 1e-5);
        assert!((blackman_window(size / 2, size) - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_config_validation() {
        assert!(AnalyserConfig::default().validate().is_ok());

        let bad_size = AnalyserConfig {
            fft_size: 1000,
            ..AnalyserConfig::default()
        };
        assert!(bad_size.validate().is_err());

        let too_small = AnalyserConfig {
            fft_size: 16,
            ..AnalyserConfig::default()
        };
        assert!(too_small.validate().is_err());

        let bad_smoothing = AnalyserConfig {
            smoothing_time_constant: 1.0,
            ..AnalyserConfig::default()
        };
        assert!(bad_smoothing.validate().is_err());
    }

    #[test]
    fn test_tap_is_zero_padded_until_full() {
        let mut tap = TapBuffer::new(8);
        tap.push_slice(&[1.0, 2.0, 3.0]);

        let mut out = [f32::NAN; 8];
        tap.copy_latest(&mut out);
        assert_eq!(out, [0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_tap_keeps_only_the_latest() {
        let mut tap = TapBuffer::new(4);
        let samples: Vec<f32> = (0..10).map(|i| i as f32).collect();
        tap.push_slice(&samples);

        let mut out = [0.0; 4];
        tap.copy_latest(&mut out);
        assert_eq!(out, [6.0, 7.0, 8.0, 9.0]);
    }

    #[test]
    fn test_sine_peaks_in_the_right_bin() {
        let sr = 44_100.0;
        let mut analyser = Analyser::new(unsmoothed(2048), sr).unwrap();
        analyser.analyse(&sine(440.0, 1.0, sr, 2048));

        let mut db = vec![0.0; analyser.bin_count()];
        analyser.write_float_frequency_data(&mut db);

        let peak = db
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();

        // 440 Hz falls between bins; the peak must land within one bin
        // width of it.
        let bin_width = sr / 2048.0;
        assert!((analyser.bin_frequency_hz(peak) - 440.0).abs() <= bin_width);
    }

    #[test]
    fn test_silence_reports_negative_infinity() {
        let mut analyser = Analyser::new(unsmoothed(1024), 44_100.0).unwrap();
        analyser.analyse(&vec![0.0; 1024]);

        let mut db = vec![0.0; analyser.bin_count()];
        analyser.write_float_frequency_data(&mut db);
        assert!(db.iter().all(|v| *v == f32::NEG_INFINITY));
    }

    #[test]
    fn test_quiet_signal_stays_below_zero_db() {
        let sr = 44_100.0;
        let mut analyser = Analyser::new(unsmoothed(2048), sr).unwrap();
        analyser.analyse(&sine(440.0, 0.05, sr, 2048));

        let mut db = vec![0.0; analyser.bin_count()];
        analyser.write_float_frequency_data(&mut db);
        assert!(db.iter().all(|v| *v < 0.0));
    }

    #[test]
    fn test_smoothing_converges_to_the_unsmoothed_value() {
        let sr = 44_100.0;
        let input = sine(440.0, 0.5, sr, 2048);

        let mut direct = Analyser::new(unsmoothed(2048), sr).unwrap();
        direct.analyse(&input);

        let smoothed_config = AnalyserConfig {
            fft_size: 2048,
            smoothing_time_constant: 0.8,
        };
        let mut smoothed = Analyser::new(smoothed_config, sr).unwrap();
        for _ in 0..100 {
            smoothed.analyse(&input);
        }

        let mut db_direct = vec![0.0; 1024];
        let mut db_smoothed = vec![0.0; 1024];
        direct.write_float_frequency_data(&mut db_direct);
        smoothed.write_float_frequency_data(&mut db_smoothed);

        // Compare at the tone's bin; 0.8^100 of the start-up transient is
        // far below the comparison tolerance.
        let bin = (440.0 * 2048.0 / sr).round() as usize;
        assert!((db_direct[bin] - db_smoothed[bin]).abs() < 0.05);
    }

    #[test]
    fn test_bin_frequency_spans_to_nyquist() {
        let analyser = Analyser::new(unsmoothed(2048), 48_000.0).unwrap();
        assert_eq!(analyser.bin_frequency_hz(0), 0.0);
        assert!((analyser.bin_frequency_hz(analyser.bin_count()) - 24_000.0).abs() < 1e-3);
    }
}
