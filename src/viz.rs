//! Spectrum visualization: a CPU pixel canvas, the dB color maps, the
//! per-frame painter, and the crop/scale post-process.

pub mod canvas;
pub mod color;
pub mod post;
pub mod spectrogram;

pub use canvas::PixelCanvas;
pub use color::{ColorMap, Rgba};
pub use post::CropScale;
pub use spectrogram::SpectrumPainter;
