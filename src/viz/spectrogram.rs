//! The per-frame spectrum painter.
//!
//! This is the mapping the demos ran every animation frame: a slice of dB
//! bins becomes one vertical column of pixels (bin 0 on the bottom row), the
//! column lands at a cursor that advances with time, and nothing at all
//! happens until the audio clock clears the warmup gate.

use crate::params::{Advance, DrawMode, VizConfig};
use crate::viz::canvas::PixelCanvas;
use crate::viz::color::{normalized_level, Rgba};

/// Visual floor for level normalization when no `min_db` gate is set.
const DEFAULT_FLOOR_DB: f32 = -100.0;

pub struct SpectrumPainter {
    config: VizConfig,
    /// Canvas row per bin, bottom-up; bins past the top row are dropped
    bin_rows: Vec<u32>,
    /// Center frequency per bin: `bin / bin_count · nyquist`
    bin_freqs: Vec<f32>,
    floor_db: f32,
    cursor_px: u32,
    frames_seen: u64,
}

impl SpectrumPainter {
    pub fn new(config: VizConfig, canvas_height: u32, bin_count: usize, nyquist_hz: f32) -> Self {
        let visible = bin_count.min(canvas_height as usize);
        let bin_rows = (0..visible).map(|i| canvas_height - 1 - i as u32).collect();
        let bin_freqs = (0..bin_count)
            .map(|i| i as f32 / bin_count as f32 * nyquist_hz)
            .collect();
        let floor_db = config.min_db.unwrap_or(DEFAULT_FLOOR_DB);
        Self {
            config,
            bin_rows,
            bin_freqs,
            floor_db,
            cursor_px: 0,
            frames_seen: 0,
        }
    }

    pub fn cursor_px(&self) -> u32 {
        self.cursor_px
    }

    /// Back to the left edge (preset switch or a fresh run).
    pub fn reset(&mut self) {
        self.cursor_px = 0;
        self.frames_seen = 0;
    }

    /// Paint one frame of spectrum data. Returns whether anything was drawn.
    ///
    /// Frames before the warmup gate opens draw nothing and do not count
    /// toward the frame stride.
    pub fn paint(&mut self, canvas: &mut PixelCanvas, db_bins: &[f32], clock_ms: f64) -> bool {
        assert_eq!(db_bins.len(), self.bin_freqs.len());

        if clock_ms < self.config.warmup_ms as f64 {
            return false;
        }

        let due = self.frames_seen % self.config.frame_stride as u64 == 0;
        self.frames_seen += 1;
        if !due {
            return false;
        }

        match self.config.mode {
            DrawMode::Spectrogram => self.paint_column(canvas, db_bins),
            DrawMode::Bars => {
                self.paint_bars(canvas, db_bins);
                true
            }
        }
    }

    /// One `column_width_px`-wide column at the cursor, one row per bin.
    fn paint_column(&mut self, canvas: &mut PixelCanvas, db_bins: &[f32]) -> bool {
        let width = self.config.column_width_px;

        let x = match self.config.advance {
            Advance::Stop => {
                if self.cursor_px >= canvas.width() {
                    return false;
                }
                let x = self.cursor_px;
                self.cursor_px += width;
                x
            }
            Advance::Wrap => {
                if self.cursor_px + width > canvas.width() {
                    self.cursor_px = 0;
                }
                let x = self.cursor_px;
                self.cursor_px += width;
                x
            }
            Advance::Scroll => {
                canvas.shift_left(width, self.config.background);
                canvas.width().saturating_sub(width)
            }
        };

        for (bin, &row) in self.bin_rows.iter().enumerate() {
            let color = self.bin_color(bin, db_bins[bin]);
            canvas.fill_rect(x as i32, row as i32, width, 1, color);
        }
        true
    }

    /// Full-frame bar graph: one vertical bar per horizontal pixel slot,
    /// bar height from the level over `[floor, 0]` dB.
    fn paint_bars(&mut self, canvas: &mut PixelCanvas, db_bins: &[f32]) {
        canvas.fill(self.config.background);
        let height = canvas.height();

        for x in 0..canvas.width() {
            let bin = (x as usize * db_bins.len()) / canvas.width() as usize;
            let db = db_bins[bin];
            if !self.bin_passes(bin, db) {
                continue;
            }

            let bar_h = (normalized_level(db, self.floor_db) * height as f32).round() as u32;
            if bar_h == 0 {
                continue;
            }
            let color = self.config.color_map.map(db, self.floor_db);
            canvas.fill_rect(x as i32, (height - bar_h) as i32, 1, bar_h, color);
        }
    }

    fn bin_passes(&self, bin: usize, db: f32) -> bool {
        if let Some((lo, hi)) = self.config.freq_range_hz {
            let f = self.bin_freqs[bin];
            if f < lo || f > hi {
                return false;
            }
        }
        if let Some(min_db) = self.config.min_db {
            if db < min_db {
                return false;
            }
        }
        true
    }

    fn bin_color(&self, bin: usize, db: f32) -> Rgba {
        if self.bin_passes(bin, db) {
            self.config.color_map.map(db, self.floor_db)
        } else {
            self.config.background
        }
    }
}
