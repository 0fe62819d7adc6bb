//! Audio synthesis and analysis.
//!
//! A small stereo tone graph rendered in the output callback, tapped into a
//! ring buffer, and analysed on demand with a windowed FFT.

pub mod analyser;
pub mod graph;
pub mod oscillator;
pub mod system;

pub use analyser::{Analyser, TapBuffer};
pub use graph::ToneGraph;
pub use oscillator::{Oscillator, Waveform};
pub use system::AudioSystem;
