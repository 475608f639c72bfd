//! Viewer configuration and the two interaction presets.

use std::{fmt, path::PathBuf, str::FromStr};

use corelib::{framing::FramingPolicy, scene::Rgb};

pub const DEFAULT_MODEL_PATH: &str = "models/hand14.glb";
pub const DEFAULT_DECODER_PATH: &str =
    "https://cdn.jsdelivr.net/npm/three@0.132.2/examples/js/libs/draco/";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionMode {
    /// Camera follows the cursor.
    Parallax,
    /// Drag to rotate, wheel to zoom, right-drag to pan.
    Orbit,
}

impl FromStr for InteractionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "parallax" => Ok(Self::Parallax),
            "orbit" => Ok(Self::Orbit),
            other => Err(format!("unknown interaction mode '{other}'")),
        }
    }
}

impl fmt::Display for InteractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Parallax => "parallax",
            Self::Orbit => "orbit",
        })
    }
}

/// What the loading indicator and info panel do during a load.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusPolicy {
    pub report_progress: bool,
    pub show_info_on_load: bool,
    pub error_message: String,
    /// Recolor the indicator on failure.
    pub error_color: Option<Rgb>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ViewerConfig {
    pub model_path: PathBuf,
    pub decoder_path: String,
    pub interaction: InteractionMode,
    pub framing: FramingPolicy,
    pub status: StatusPolicy,
    pub fov_y_deg: f32,
    pub z_near: f32,
    pub z_far: f32,
    /// Parallax follow factor, or orbit damping factor.
    pub smoothing: f32,
}

impl ViewerConfig {
    /// Cursor parallax, model kept at its own size.
    pub fn parallax() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            decoder_path: DEFAULT_DECODER_PATH.to_string(),
            interaction: InteractionMode::Parallax,
            framing: FramingPolicy::FIT_DEPTH,
            status: StatusPolicy {
                report_progress: false,
                show_info_on_load: false,
                error_message: "Error loading model".to_string(),
                error_color: None,
            },
            fov_y_deg: 75.0,
            z_near: 0.1,
            z_far: 1000.0,
            smoothing: 0.05,
        }
    }

    /// Orbit controls, model normalized to a diagonal of 2.
    pub fn orbit() -> Self {
        Self {
            interaction: InteractionMode::Orbit,
            framing: FramingPolicy::NORMALIZE,
            status: StatusPolicy {
                report_progress: true,
                show_info_on_load: true,
                error_message: "Error loading model. Please check console for details.".to_string(),
                error_color: Some([1.0, 0.0, 0.0]),
            },
            ..Self::parallax()
        }
    }

    pub fn for_mode(mode: InteractionMode) -> Self {
        match mode {
            InteractionMode::Parallax => Self::parallax(),
            InteractionMode::Orbit => Self::orbit(),
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self::parallax()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_differ_only_where_expected() {
        let a = ViewerConfig::parallax();
        let b = ViewerConfig::orbit();
        assert_eq!(a.model_path, b.model_path);
        assert_eq!(a.fov_y_deg, 75.0);
        assert_eq!((b.z_near, b.z_far), (0.1, 1000.0));
        assert_eq!(a.framing, FramingPolicy::FitDepth { factor: 0.5 });
        assert_eq!(b.framing, FramingPolicy::Normalize { size: 2.0, camera_depth: 2.0 });
        assert!(!a.status.report_progress && b.status.report_progress);
        assert_eq!(ViewerConfig::default(), a);
    }

    #[test]
    fn parse_mode() {
        assert_eq!("Orbit".parse::<InteractionMode>(), Ok(InteractionMode::Orbit));
        assert_eq!("parallax".parse::<InteractionMode>(), Ok(InteractionMode::Parallax));
        assert!("fly".parse::<InteractionMode>().is_err());
    }
}
