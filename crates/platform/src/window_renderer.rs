//! Window-backed [`SceneRenderer`]: the wgpu scene plus the egui overlay.

use std::sync::Arc;
use std::time::Instant;

use renderer::{GpuState, RendererError};
use viewer::{Frame, SceneRenderer};
use winit::{event::WindowEvent, window::Window};

use crate::overlay::Overlay;

/// Frames-per-second over a sliding half-second window.
struct FpsCounter {
    window_start: Instant,
    frames: u32,
    fps: f32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            window_start: Instant::now(),
            frames: 0,
            fps: 0.0,
        }
    }

    fn tick(&mut self) -> f32 {
        self.frames += 1;
        let elapsed = self.window_start.elapsed().as_secs_f32();
        if elapsed >= 0.5 {
            self.fps = self.frames as f32 / elapsed;
            self.frames = 0;
            self.window_start = Instant::now();
        }
        self.fps
    }
}

pub struct WindowRenderer {
    window: Arc<Window>,
    gpu: GpuState,
    overlay: Overlay,
    fps: Option<FpsCounter>,
}

impl WindowRenderer {
    pub fn new(window: Arc<Window>, backends: wgpu::Backends, show_fps: bool) -> Result<Self, RendererError> {
        let gpu = pollster::block_on(GpuState::new(window.clone(), backends))?;
        let overlay = Overlay::new(&window, gpu.device(), gpu.surface_format());
        Ok(Self {
            window,
            gpu,
            overlay,
            fps: show_fps.then(FpsCounter::new),
        })
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    pub fn on_window_event(&mut self, event: &WindowEvent) -> bool {
        self.overlay.on_window_event(&self.window, event)
    }

    pub fn recreate_surface(&mut self) {
        self.gpu.recreate_surface();
    }
}

impl SceneRenderer for WindowRenderer {
    type Error = wgpu::SurfaceError;

    fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
    }

    fn render(&mut self, frame: Frame<'_>) -> Result<(), Self::Error> {
        let fps = self.fps.as_mut().map(FpsCounter::tick);
        let window = &self.window;
        let overlay = &mut self.overlay;
        self.gpu.render(frame.scene, frame.camera, |target| {
            overlay.draw(window, target, frame.status, fps)
        })
    }
}
