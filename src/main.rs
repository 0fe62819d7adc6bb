//! Sonoscope - a fixed two-tone test signal drawn as a scrolling spectrum.
//!
//! Two sine voices (440 Hz hard left, 660 Hz hard right) play under a low
//! master gain while an FFT analyser taps the mix; every frame one column
//! of decibel values becomes pixels on an overlay canvas blitted to the
//! window.

mod audio;
mod cli;
mod offline;
mod params;
mod presets;
mod rendering;
mod viz;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use audio::{Analyser, AudioSystem};
use cli::Args;
use params::{AnalyserConfig, GraphConfig, RecordingConfig, RenderConfig};
use presets::Preset;
use rendering::RenderSystem;
use viz::{CropScale, PixelCanvas, SpectrumPainter};

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,

    // Audio and analysis
    audio: Option<AudioSystem>,
    analyser: Option<Analyser>,

    // Painting
    painter: Option<SpectrumPainter>,
    canvas: PixelCanvas,

    // Configuration
    preset: Preset,
    graph_config: GraphConfig,
    analyser_config: AnalyserConfig,
    render_config: RenderConfig,
    recording_config: Option<RecordingConfig>,

    // Reused per-frame buffers
    sample_window: Vec<f32>,
    db_bins: Vec<f32>,

    frame_index: usize,
}

impl App {
    fn new(
        preset: Preset,
        analyser_config: AnalyserConfig,
        render_config: RenderConfig,
        recording_config: Option<RecordingConfig>,
    ) -> Self {
        let canvas = PixelCanvas::new(
            render_config.window_width,
            render_config.window_height,
            preset.viz.background,
        );

        Self {
            window: None,
            render_system: None,
            audio: None,
            analyser: None,
            painter: None,
            canvas,
            preset,
            graph_config: GraphConfig::default(),
            analyser_config,
            render_config,
            recording_config,
            sample_window: Vec::new(),
            db_bins: Vec::new(),
            frame_index: 0,
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &winit::event_loop::ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        let window_attributes = Window::default_attributes()
            .with_title("Sonoscope")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = Arc::new(event_loop.create_window(window_attributes).unwrap());

        let crop = self.preset.post.unwrap_or(CropScale::FULL);
        let render_system = pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            self.canvas.width(),
            self.canvas.height(),
            crop,
            self.recording_config.clone(),
        ))
        .unwrap();

        let audio = match AudioSystem::start(
            &self.graph_config,
            &self.analyser_config,
            self.recording_config.as_ref(),
        ) {
            Ok(audio) => audio,
            Err(e) => {
                log::error!("audio init failed: {:#} (try --headless)", e);
                event_loop.exit();
                return;
            }
        };

        let analyser = match Analyser::new(self.analyser_config, audio.sample_rate_hz() as f32) {
            Ok(analyser) => analyser,
            Err(e) => {
                log::error!("analyser init failed: {}", e);
                event_loop.exit();
                return;
            }
        };

        self.sample_window = vec![0.0; analyser.fft_size()];
        self.db_bins = vec![0.0; analyser.bin_count()];
        self.painter = Some(SpectrumPainter::new(
            self.preset.viz.clone(),
            self.canvas.height(),
            analyser.bin_count(),
            analyser.nyquist_hz(),
        ));

        println!("\nSonoscope is running!");
        println!("Press ESC to quit, Space or click to suspend/resume audio\n");

        self.window = Some(window);
        self.render_system = Some(render_system);
        self.audio = Some(audio);
        self.analyser = Some(analyser);
    }

    fn window_event(
        &mut self,
        event_loop: &winit::event_loop::ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => self.finish(event_loop),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => self.finish(event_loop),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Space),
                        ..
                    },
                ..
            } => self.toggle_audio(),
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => self.toggle_audio(),
            WindowEvent::Resized(size) => {
                if let Some(render_system) = &mut self.render_system {
                    render_system.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                self.render_frame(event_loop);
            }
            _ => {}
        }
    }
}

impl App {
    /// Suspend or resume playback, mirroring the demos' click-to-toggle.
    fn toggle_audio(&mut self) {
        if let Some(audio) = &mut self.audio {
            match audio.toggle_suspended() {
                Ok(true) => log::info!("audio suspended"),
                Ok(false) => log::info!("audio resumed"),
                Err(e) => log::error!("toggling audio failed: {:#}", e),
            }
        }
    }

    /// Poll the analyser, paint one frame, and present it.
    fn render_frame(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
        let Some(ref render_system) = self.render_system else {
            return;
        };
        let Some(ref audio) = self.audio else {
            return;
        };
        let (Some(analyser), Some(painter)) = (self.analyser.as_mut(), self.painter.as_mut())
        else {
            return;
        };

        // The audio clock, not wall time: it freezes while suspended.
        let clock_ms = audio.clock_ms();

        audio.copy_latest_samples(&mut self.sample_window);
        analyser.analyse(&self.sample_window);
        analyser.write_float_frequency_data(&mut self.db_bins);
        painter.paint(&mut self.canvas, &self.db_bins, clock_ms);

        render_system.upload_overlay(&self.canvas);
        if let Err(e) = render_system.render(self.frame_index) {
            log::error!("render error: {:?}", e);
        }
        self.frame_index += 1;

        if let Some(ref config) = self.recording_config {
            if self.frame_index >= config.total_frames() {
                println!("Recording complete: {} frames", self.frame_index);
                self.finish(event_loop);
            }
        }
    }

    /// Finalize any recording and leave the event loop.
    fn finish(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
        if let Some(audio) = &mut self.audio {
            if let Err(e) = audio.finish_recording() {
                log::error!("finalizing recording failed: {:#}", e);
            }
        }
        event_loop.exit();
    }
}

/// Render the spectrogram offline and save it as a PNG.
fn run_headless(args: &Args, preset: &Preset, config: &RecordingConfig) -> Result<()> {
    log::info!(
        "Rendering {}s offline at {} fps",
        config.duration_secs,
        config.fps
    );

    let canvas = offline::render_spectrogram(
        &GraphConfig::default(),
        &args.analyser_config(),
        &preset.viz,
        args.width,
        args.height,
        config.duration_secs,
        config.fps,
    )?;

    let canvas = match preset.post {
        Some(crop) => crop.apply(&canvas),
        None => canvas,
    };

    let path = config.spectrogram_path();
    image::save_buffer(
        &path,
        canvas.as_bytes(),
        canvas.width(),
        canvas.height(),
        image::ColorType::Rgba8,
    )
    .with_context(|| format!("saving {}", path))?;

    println!("Wrote {}", path);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if args.list_presets {
        println!("Available presets:");
        for preset in Preset::all() {
            println!("  {:10} {}", preset.name, preset.summary);
        }
        return Ok(());
    }

    if args.record.is_some() && args.headless.is_some() {
        anyhow::bail!("--record and --headless are mutually exclusive");
    }

    let preset = args.resolve_preset();

    if let Some(config) = args.create_headless_config()? {
        return run_headless(&args, &preset, &config);
    }

    let recording_config = args.create_recording_config()?;

    let mut app = App::new(
        preset,
        args.analyser_config(),
        args.render_config(),
        recording_config,
    );
    let event_loop = EventLoop::new().context("creating event loop")?;
    event_loop.run_app(&mut app).context("running event loop")?;

    Ok(())
}
