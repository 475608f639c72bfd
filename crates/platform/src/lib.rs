//! Platform layer: window, event loop and the glue between winit events
//! and the [`Viewer`].

mod overlay;
mod window_renderer;

use std::sync::Arc;

use anyhow::Result;
use asset::GltfLoader;
use renderer::GpuState;
use viewer::{PointerButton, RunLoop, Viewer, ViewerConfig, Viewport};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

pub use window_renderer::WindowRenderer;

const WINDOW_TITLE: &str = "Modelview";

/// Pixel deltas per wheel notch on touchpads.
const PIXELS_PER_NOTCH: f64 = 50.0;

#[derive(Clone, Debug)]
pub struct RunOptions {
    pub backends: wgpu::Backends,
    pub show_fps: bool,
    pub width: u32,
    pub height: u32,
    pub config: ViewerConfig,
}

enum AppState {
    /// Before `resumed` created the window.
    Uninitialized,
    Running { viewer: Viewer<WindowRenderer> },
}

struct ViewerApp {
    options: RunOptions,
    state: AppState,
    run_loop: RunLoop,
    error: Option<anyhow::Error>,
}

impl ViewerApp {
    fn new(options: RunOptions) -> Self {
        Self {
            options,
            state: AppState::Uninitialized,
            run_loop: RunLoop::new(),
            error: None,
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = WindowAttributes::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size(PhysicalSize::new(self.options.width, self.options.height));
        let window: Arc<Window> = Arc::new(event_loop.create_window(attrs)?);
        let size = window.inner_size();
        log::info!(
            "Window created: {}x{} (scale {:.2})",
            size.width,
            size.height,
            window.scale_factor()
        );

        let renderer = WindowRenderer::new(window.clone(), self.options.backends, self.options.show_fps)?;
        let viewport = Viewport::new(size.width, size.height, window.scale_factor());
        let config = self.options.config.clone();
        let loader = GltfLoader::new(config.decoder_path.clone());

        let mut viewer = Viewer::initialize(config, renderer, viewport);
        viewer.load(loader)?;

        self.run_loop.start();
        window.request_redraw();
        self.state = AppState::Running { viewer };
        Ok(())
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if !matches!(self.state, AppState::Uninitialized) {
            return;
        }
        if let Err(err) = self.start(event_loop) {
            log::error!("Failed to start viewer: {err:#}");
            self.error = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let AppState::Running { viewer } = &mut self.state else {
            return;
        };

        let egui_consumed = viewer.renderer_mut().on_window_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested. Exiting event loop.");
                self.run_loop.stop();
                event_loop.exit();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                log::info!("Escape pressed. Exiting event loop.");
                self.run_loop.stop();
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                viewer.on_resize(new_size.width, new_size.height);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                log::info!("Scale factor changed: {scale_factor:.3}");
                viewer.on_scale_factor_changed(scale_factor);
            }
            WindowEvent::CursorMoved { position, .. } => {
                viewer.on_pointer_moved(position.x, position.y);
            }
            WindowEvent::MouseInput { state, button, .. } if !egui_consumed => {
                let button = match button {
                    MouseButton::Left => PointerButton::Primary,
                    MouseButton::Right => PointerButton::Secondary,
                    MouseButton::Middle => PointerButton::Middle,
                    _ => return,
                };
                viewer.on_pointer_button(button, state == ElementState::Pressed);
            }
            WindowEvent::MouseWheel { delta, .. } if !egui_consumed => {
                let steps = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => (p.y / PIXELS_PER_NOTCH) as f32,
                };
                viewer.on_scroll(steps);
            }
            WindowEvent::RedrawRequested => match self.run_loop.tick(viewer) {
                Ok(_) => {}
                Err(err) if GpuState::is_surface_lost(&err) => {
                    log::warn!("Surface {err:?}, reconfiguring...");
                    viewer.renderer_mut().recreate_surface();
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of GPU memory!");
                    self.run_loop.stop();
                    event_loop.exit();
                }
                Err(err) => log::warn!("Surface error: {err:?}"),
            },
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let AppState::Running { viewer } = &self.state else {
            event_loop.set_control_flow(ControlFlow::Wait);
            return;
        };
        // Vsync paces presentation, so asking for a redraw every turn
        // yields one frame per display refresh.
        if self.run_loop.is_running() {
            viewer.renderer().window().request_redraw();
        }
    }
}

/// Open the window and run until it is closed.
pub fn run(options: RunOptions) -> Result<()> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = ViewerApp::new(options);
    event_loop.run_app(&mut app)?;

    if let Some(err) = app.error.take() {
        return Err(err);
    }
    log::info!("Event loop finished after {} frames", app.run_loop.frames());
    Ok(())
}
