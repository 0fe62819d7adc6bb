//! Sonoscope library - a two-tone test signal analysed and painted as a
//! spectrogram.

pub mod audio;
pub mod cli;
pub mod offline;
pub mod params;
pub mod presets;
pub mod rendering;
pub mod viz;
