//! Explicit frame loop. The platform calls [`RunLoop::tick`] once per
//! display refresh; tests call it directly to step frames.

use crate::{render::SceneRenderer, viewer::Viewer};

#[derive(Debug, Default)]
pub struct RunLoop {
    running: bool,
    frames: u64,
}

impl RunLoop {
    /// A stopped loop.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        if !self.running {
            log::debug!("Run loop started");
        }
        self.running = true;
    }

    pub fn stop(&mut self) {
        if self.running {
            log::debug!("Run loop stopped after {} frames", self.frames);
        }
        self.running = false;
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Frames executed since creation.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run one frame if started. Returns whether a frame ran.
    pub fn tick<R: SceneRenderer>(&mut self, viewer: &mut Viewer<R>) -> Result<bool, R::Error> {
        if !self.running {
            return Ok(false);
        }
        self.frames += 1;
        viewer.on_frame()?;
        Ok(true)
    }
}
