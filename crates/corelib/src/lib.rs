//! Core types: math re-exports, camera, scene, bounds and camera controls.

pub use glam::{Mat4, Quat, Vec3, vec3};

pub mod bounds;
pub mod camera;
pub mod controls;
pub mod error;
pub mod framing;
pub mod scene;
pub mod transform;

pub use error::{CoreError, CoreResult};
