//! Viewer bootstrap: owns the scene, camera, renderer and interaction state
//! and turns platform events into frames.

pub mod config;
pub mod load;
pub mod render;
pub mod run_loop;
pub mod status;
pub mod viewer;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{DEFAULT_MODEL_PATH, InteractionMode, ViewerConfig};
pub use render::{Frame, SceneRenderer};
pub use run_loop::RunLoop;
pub use status::StatusPanel;
pub use viewer::{PointerButton, Viewer, Viewport};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeRenderer;

    #[test]
    fn run_loop_ticks_only_while_running() {
        let mut viewer = Viewer::initialize(
            ViewerConfig::default(),
            FakeRenderer::default(),
            Viewport::new(640, 480, 1.0),
        );
        let mut run_loop = RunLoop::new();

        assert_eq!(run_loop.tick(&mut viewer), Ok(false));
        assert_eq!(viewer.renderer().renders, 0);

        run_loop.start();
        for _ in 0..5 {
            assert_eq!(run_loop.tick(&mut viewer), Ok(true));
        }
        run_loop.stop();
        assert_eq!(run_loop.tick(&mut viewer), Ok(false));

        assert_eq!(run_loop.frames(), 5);
        assert_eq!(viewer.renderer().renders, 5);
        assert!(!run_loop.is_running());
    }
}
