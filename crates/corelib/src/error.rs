//! Core errors (renderer-agnostic).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("a model is already loaded into this scene")]
    ModelAlreadyLoaded,
    #[error("model has no geometry to frame")]
    EmptyBounds,
}

pub type CoreResult<T> = Result<T, CoreError>;
