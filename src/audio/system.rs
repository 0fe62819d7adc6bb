//! Audio system: owns the output stream, the tone graph, and the shared
//! sample tap the analyser reads from.

use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use super::analyser::TapBuffer;
use super::graph::ToneGraph;
use crate::params::{AnalyserConfig, GraphConfig, RecordingConfig};

type WavWriterHandle = Arc<Mutex<hound::WavWriter<std::io::BufWriter<std::fs::File>>>>;

/// Write one rendered frame into the device's channel layout and return the
/// mono mix fed to the analyser tap.
fn fan_out(frame: &mut [f32], left: f32, right: f32) -> f32 {
    let mono = 0.5 * (left + right);
    if frame.len() == 1 {
        frame[0] = mono;
    } else {
        frame[0] = left;
        frame[1] = right;
        for extra in &mut frame[2..] {
            *extra = 0.0;
        }
    }
    mono
}

/// Playback clock in milliseconds, derived from frames delivered to the
/// device rather than wall time.
fn elapsed_ms(frames: u64, sample_rate_hz: u32) -> f64 {
    frames as f64 / sample_rate_hz as f64 * 1000.0
}

/// Audio system managing synthesis, the analyser tap, and optional recording.
pub struct AudioSystem {
    /// Most recent mono samples, shared with the render thread
    tap: Arc<Mutex<TapBuffer>>,

    /// Stereo frames delivered to the device so far
    samples_played: Arc<AtomicU64>,

    sample_rate_hz: u32,
    suspended: bool,

    /// Output stream; dropped early by `finish_recording`
    stream: Option<cpal::Stream>,

    /// WAV recording sink, if recording
    wav_writer: Option<WavWriterHandle>,
}

impl AudioSystem {
    /// Open the default output device and start rendering the tone graph.
    pub fn start(
        graph_config: &GraphConfig,
        analyser_config: &AnalyserConfig,
        recording_config: Option<&RecordingConfig>,
    ) -> Result<Self> {
        analyser_config
            .validate()
            .map_err(|e| anyhow!("invalid analyser config: {}", e))?;

        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow!("no audio output device found"))?;
        let config = device
            .default_output_config()
            .context("querying default output config")?;

        let sample_rate_hz = config.sample_rate().0;
        let channels = config.channels() as usize;
        log::info!(
            "Audio: {} @ {}Hz, {} channels",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            sample_rate_hz,
            channels
        );

        let wav_writer = match recording_config {
            Some(rec) => {
                let spec = hound::WavSpec {
                    channels: 2,
                    sample_rate: sample_rate_hz,
                    bits_per_sample: 32,
                    sample_format: hound::SampleFormat::Float,
                };
                let writer = hound::WavWriter::create(rec.audio_path(), spec)
                    .context("creating WAV recording file")?;
                Some(Arc::new(Mutex::new(writer)))
            }
            None => None,
        };
        let wav_writer_cb = wav_writer.clone();

        let graph = Arc::new(Mutex::new(ToneGraph::new(graph_config, sample_rate_hz as f32)));
        let graph_cb = Arc::clone(&graph);

        let tap = Arc::new(Mutex::new(TapBuffer::new(analyser_config.fft_size)));
        let tap_cb = Arc::clone(&tap);

        let samples_played = Arc::new(AtomicU64::new(0));
        let samples_cb = Arc::clone(&samples_played);

        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let mut graph = graph_cb.lock().unwrap();
                    let mut tap = tap_cb.lock().unwrap();

                    for frame in data.chunks_mut(channels) {
                        let (l, r) = graph.next_frame();

                        // Safety limiter: hard clip to ±0.5
                        let left = l.clamp(-0.5, 0.5);
                        let right = r.clamp(-0.5, 0.5);

                        let mono = fan_out(frame, left, right);
                        tap.push(mono);

                        if let Some(ref writer) = wav_writer_cb {
                            if let Ok(mut w) = writer.lock() {
                                let _ = w.write_sample(left);
                                let _ = w.write_sample(right);
                            }
                        }
                    }
                    samples_cb.fetch_add((data.len() / channels) as u64, Ordering::Relaxed);
                },
                |err| log::error!("audio stream error: {}", err),
                None,
            )
            .context("building audio output stream")?;

        stream.play().context("starting audio output stream")?;

        Ok(Self {
            tap,
            samples_played,
            sample_rate_hz,
            suspended: false,
            stream: Some(stream),
            wav_writer,
        })
    }

    pub fn sample_rate_hz(&self) -> u32 {
        self.sample_rate_hz
    }

    /// Milliseconds of audio delivered so far. Freezes while suspended,
    /// which keeps the visualization clock in step with what is audible.
    pub fn clock_ms(&self) -> f64 {
        elapsed_ms(self.samples_played.load(Ordering::Relaxed), self.sample_rate_hz)
    }

    /// Pause or resume playback, returning the new suspended state.
    pub fn toggle_suspended(&mut self) -> Result<bool> {
        let stream = self
            .stream
            .as_ref()
            .ok_or_else(|| anyhow!("audio stream already closed"))?;
        if self.suspended {
            stream.play().context("resuming audio output stream")?;
        } else {
            stream.pause().context("pausing audio output stream")?;
        }
        self.suspended = !self.suspended;
        Ok(self.suspended)
    }

    /// Copy the most recent `fft_size` mono samples into `out`.
    pub fn copy_latest_samples(&self, out: &mut [f32]) {
        self.tap.lock().unwrap().copy_latest(out);
    }

    /// Stop the stream and finalize the WAV file, if one was recording.
    pub fn finish_recording(&mut self) -> Result<()> {
        // Drop the stream first so the callback stops writing samples.
        self.stream = None;

        if let Some(writer) = self.wav_writer.take() {
            let writer = Arc::try_unwrap(writer)
                .map_err(|_| anyhow!("audio callback still holds the WAV writer"))?;
            let writer = writer
                .into_inner()
                .map_err(|_| anyhow!("WAV writer mutex poisoned"))?;
            writer.finalize().context("finalizing WAV recording")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fan_out_stereo() {
        let mut frame = [0.0; 2];
        let mono = fan_out(&mut frame, 0.4, -0.2);
        assert_eq!(frame, [0.4, -0.2]);
        assert!((mono - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_fan_out_mono_device_gets_the_mix() {
        let mut frame = [0.0; 1];
        fan_out(&mut frame, 0.4, -0.2);
        assert!((frame[0] - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_fan_out_zeroes_extra_channels() {
        let mut frame = [9.0; 6];
        fan_out(&mut frame, 0.4, -0.2);
        assert_eq!(&frame[2..], &[0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_elapsed_ms_tracks_the_sample_clock() {
        assert_eq!(elapsed_ms(0, 44_100), 0.0);
        assert!((elapsed_ms(44_100, 44_100) - 1000.0).abs() < 1e-9);
        assert!((elapsed_ms(22_050, 44_100) - 500.0).abs() < 1e-9);
    }
}
