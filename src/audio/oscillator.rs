//! Tone oscillators: the periodic waveform set with a wrapping phase
//! accumulator.

use std::f32::consts::PI;

/// Periodic waveform shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Saw,
    Triangle,
}

impl Waveform {
    /// Evaluate the waveform at a phase in [0, 1), returning a sample in
    /// [-1, 1].
    pub fn sample(&self, phase_01: f32) -> f32 {
        match self {
            Waveform::Sine => (2.0 * PI * phase_01).sin(),
            Waveform::Square => {
                if phase_01 < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Saw => 2.0 * phase_01 - 1.0,
            Waveform::Triangle => {
                if phase_01 < 0.25 {
                    4.0 * phase_01
                } else if phase_01 < 0.75 {
                    2.0 - 4.0 * phase_01
                } else {
                    -4.0 + 4.0 * phase_01
                }
            }
        }
    }
}

/// A single oscillator voice: waveform + frequency + running phase.
#[derive(Debug, Clone)]
pub struct Oscillator {
    waveform: Waveform,
    frequency_hz: f32,
    phase_01: f32,
}

impl Oscillator {
    /// Create an oscillator starting at phase zero.
    pub fn new(waveform: Waveform, frequency_hz: f32) -> Self {
        Self {
            waveform,
            frequency_hz,
            phase_01: 0.0,
        }
    }

    /// Produce the sample at the current phase, then advance the phase by
    /// one step of `frequency / sample_rate`, wrapping into [0, 1).
    pub fn next_sample(&mut self, sample_rate_hz: f32) -> f32 {
        let sample = self.waveform.sample(self.phase_01);
        let step = self.frequency_hz / sample_rate_hz;
        self.phase_01 = (self.phase_01 + step).rem_euclid(1.0);
        sample
    }
}
