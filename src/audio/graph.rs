//! The tone graph: oscillator voices placed in the stereo field and summed
//! under a master gain.

use std::f32::consts::FRAC_PI_2;

use crate::audio::oscillator::Oscillator;
use crate::params::GraphConfig;

/// Equal-power pan law. `pan` is clamped to [-1, 1]; the returned pair is
/// (left gain, right gain) with l² + r² = 1.
pub fn pan_gains(pan: f32) -> (f32, f32) {
    let x = (pan.clamp(-1.0, 1.0) + 1.0) * 0.5;
    let theta = x * FRAC_PI_2;
    (theta.cos(), theta.sin())
}

struct Voice {
    osc: Oscillator,
    level: f32,
    gain_l: f32,
    gain_r: f32,
}

/// Voices summed onto a stereo bus. Sampled one frame at a time by the
/// output callback and the offline driver.
pub struct ToneGraph {
    voices: Vec<Voice>,
    master_gain: f32,
    sample_rate_hz: f32,
}

impl ToneGraph {
    pub fn new(config: &GraphConfig, sample_rate_hz: f32) -> Self {
        let voices = config
            .voices
            .iter()
            .map(|v| {
                let (gain_l, gain_r) = pan_gains(v.pan);
                Voice {
                    osc: Oscillator::new(v.waveform, v.frequency_hz),
                    level: v.level,
                    gain_l,
                    gain_r,
                }
            })
            .collect();
        Self {
            voices,
            master_gain: config.master_gain,
            sample_rate_hz,
        }
    }

    /// Produce one stereo frame (left, right).
    pub fn next_frame(&mut self) -> (f32, f32) {
        let mut left = 0.0;
        let mut right = 0.0;
        for voice in &mut self.voices {
            let s = voice.osc.next_sample(self.sample_rate_hz) * voice.level;
            left += s * voice.gain_l;
            right += s * voice.gain_r;
        }
        (left * self.master_gain, right * self.master_gain)
    }

    /// Fill an interleaved stereo buffer. `interleaved.len()` must be even.
    pub fn render(&mut self, interleaved: &mut [f32]) {
        for frame in interleaved.chunks_exact_mut(2) {
            let (l, r) = self.next_frame();
            frame[0] = l;
            frame[1] = r;
        }
    }
}
