//! The viewer context: scene, camera, renderer, interaction and status,
//! owned together and driven by platform events.

use asset::{AssetLoadError, AssetLoader, LoadProgress, ModelData};
use corelib::{
    Vec3,
    camera::Camera,
    controls::{DragMode, OrbitControls, Parallax},
    framing::frame_model,
    scene::{Model, Scene},
};

use crate::{
    config::{InteractionMode, StatusPolicy, ViewerConfig},
    load::{LoadEvent, LoadHandle, spawn_load},
    render::{Frame, SceneRenderer},
    status::StatusPanel,
};

/// Output size in physical pixels plus the device scale factor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub scale_factor: f64,
}

impl Viewport {
    pub fn new(width: u32, height: u32, scale_factor: f64) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            scale_factor: if scale_factor > 0.0 { scale_factor } else { 1.0 },
        }
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Size in logical pixels.
    pub fn logical_size(&self) -> (f32, f32) {
        let s = self.scale_factor as f32;
        (self.width as f32 / s, self.height as f32 / s)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

enum Controls {
    Parallax(Parallax),
    Orbit(OrbitControls),
}

pub struct Viewer<R: SceneRenderer> {
    config: ViewerConfig,
    scene: Scene,
    camera: Camera,
    renderer: R,
    controls: Controls,
    status: StatusPanel,
    viewport: Viewport,
    pending: Option<LoadHandle>,
}

impl<R: SceneRenderer> Viewer<R> {
    /// Build the scene, camera and interaction state and size the renderer.
    pub fn initialize(config: ViewerConfig, mut renderer: R, viewport: Viewport) -> Self {
        let scene = Scene::with_default_lighting();
        let camera = Camera::new_perspective(
            config.fov_y_deg.to_radians(),
            viewport.aspect(),
            config.z_near,
            config.z_far,
        );
        renderer.resize(viewport.width, viewport.height);

        let controls = match config.interaction {
            InteractionMode::Parallax => Controls::Parallax(Parallax::with_factor(config.smoothing)),
            InteractionMode::Orbit => {
                let mut orbit = OrbitControls::new(&camera);
                orbit.enable_damping = true;
                orbit.damping_factor = config.smoothing;
                Controls::Orbit(orbit)
            }
        };

        log::info!(
            "Viewer initialized: {}x{} @{:.2}, mode={}",
            viewport.width,
            viewport.height,
            viewport.scale_factor,
            config.interaction
        );

        Self {
            config,
            scene,
            camera,
            renderer,
            controls,
            status: StatusPanel::default(),
            viewport,
            pending: None,
        }
    }

    /// Start loading the configured model in the background. Ignored when a
    /// load is already in flight or a model is present.
    pub fn load<L>(&mut self, loader: L) -> std::io::Result<()>
    where
        L: AssetLoader + Send + 'static,
    {
        if self.pending.is_some() || self.scene.has_model() {
            log::warn!("Model load already started; ignoring second request");
            return Ok(());
        }
        log::info!("Loading {}", self.config.model_path.display());
        self.pending = Some(spawn_load(loader, self.config.model_path.clone())?);
        Ok(())
    }

    /// Load on the calling thread, applying progress and the result in order.
    pub fn load_blocking(&mut self, loader: &dyn AssetLoader) {
        let policy = &self.config.status;
        let status = &mut self.status;
        let result = loader.load(&self.config.model_path, &mut |p| {
            apply_progress(status, policy, p)
        });
        self.finish_load(result);
    }

    /// Drain pending load events. Called at the start of every frame.
    pub fn poll_load(&mut self) {
        while let Some(event) = self.pending.as_ref().and_then(LoadHandle::try_next) {
            match event {
                LoadEvent::Progress(p) => apply_progress(&mut self.status, &self.config.status, p),
                LoadEvent::Finished(result) => {
                    self.pending = None;
                    self.finish_load(result);
                }
            }
        }
    }

    #[inline]
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn finish_load(&mut self, result: Result<ModelData, AssetLoadError>) {
        match result {
            Ok(data) => self.on_model_loaded(data),
            Err(err) => self.on_load_failed(&err),
        }
    }

    fn on_model_loaded(&mut self, data: ModelData) {
        let model = match self.scene.set_model(Model::new(data)) {
            Ok(model) => model,
            Err(err) => {
                log::warn!("Discarding loaded model: {err}");
                return;
            }
        };

        match frame_model(model, &mut self.camera, self.config.framing) {
            Ok(f) => log::info!(
                "Model framed: center={:?} diagonal={:.4} scale={:.4} camera_z={:.4}",
                f.center,
                f.diagonal,
                f.scale,
                self.camera.position.z
            ),
            Err(err) => log::warn!("Model left unframed: {err}"),
        }

        if let Controls::Orbit(orbit) = &mut self.controls {
            orbit.sync_from_camera(&self.camera);
            orbit.update(&mut self.camera);
        }
        self.status.loaded(self.config.status.show_info_on_load);
    }

    fn on_load_failed(&mut self, err: &AssetLoadError) {
        log::error!("Error loading model: {err}");
        self.status
            .failed(&self.config.status.error_message, self.config.status.error_color);
    }

    /// Keep camera aspect and renderer output in step with the window.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::new(width, height, self.viewport.scale_factor);
        self.camera.set_viewport(self.viewport.width, self.viewport.height);
        self.renderer.resize(self.viewport.width, self.viewport.height);
        log::debug!("Resized: {}x{}", self.viewport.width, self.viewport.height);
    }

    pub fn on_scale_factor_changed(&mut self, scale_factor: f64) {
        self.viewport = Viewport::new(self.viewport.width, self.viewport.height, scale_factor);
    }

    /// Cursor position in physical pixels.
    pub fn on_pointer_moved(&mut self, x: f64, y: f64) {
        let s = self.viewport.scale_factor;
        let (lx, ly) = ((x / s) as f32, (y / s) as f32);
        let (w, h) = self.viewport.logical_size();
        match &mut self.controls {
            Controls::Parallax(parallax) => parallax.pointer_moved(lx, ly, w * 0.5, h * 0.5),
            Controls::Orbit(orbit) => orbit.pointer_moved(lx, ly, &self.camera, h),
        }
    }

    pub fn on_pointer_button(&mut self, button: PointerButton, pressed: bool) {
        let Controls::Orbit(orbit) = &mut self.controls else {
            return;
        };
        let mode = match button {
            PointerButton::Primary => DragMode::Rotate,
            PointerButton::Secondary | PointerButton::Middle => DragMode::Pan,
        };
        if pressed {
            orbit.begin_drag(mode);
        } else if orbit.dragging() == Some(mode) {
            orbit.end_drag();
        }
    }

    /// Wheel notches; positive zooms in.
    pub fn on_scroll(&mut self, steps: f32) {
        if let Controls::Orbit(orbit) = &mut self.controls {
            orbit.scroll(steps);
        }
    }

    /// One display refresh: apply load events, update the camera, render once.
    pub fn on_frame(&mut self) -> Result<(), R::Error> {
        self.poll_load();

        match &mut self.controls {
            Controls::Parallax(parallax) => {
                if self.scene.has_model() {
                    parallax.update(&mut self.camera, Vec3::ZERO);
                }
            }
            Controls::Orbit(orbit) => orbit.update(&mut self.camera),
        }

        self.renderer.render(Frame {
            scene: &self.scene,
            camera: &self.camera,
            status: &self.status,
        })
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn status(&self) -> &StatusPanel {
        &self.status
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}

fn apply_progress(status: &mut StatusPanel, policy: &StatusPolicy, progress: LoadProgress) {
    if !policy.report_progress {
        return;
    }
    if let Some(percent) = progress.percent() {
        log::debug!("Loading: {percent:.1}%");
        status.set_progress(percent);
    }
}
