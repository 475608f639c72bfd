use corelib::{camera::Camera, scene::Scene};

use crate::status::StatusPanel;

/// Everything a renderer needs for one frame.
#[derive(Clone, Copy)]
pub struct Frame<'a> {
    pub scene: &'a Scene,
    pub camera: &'a Camera,
    pub status: &'a StatusPanel,
}

/// Output surface the viewer draws into.
pub trait SceneRenderer {
    type Error;

    /// Resize the output to `width` x `height` physical pixels.
    fn resize(&mut self, width: u32, height: u32);

    fn render(&mut self, frame: Frame<'_>) -> Result<(), Self::Error>;
}
