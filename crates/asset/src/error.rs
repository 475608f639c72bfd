use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while fetching and decoding a model.
#[derive(Debug, Error)]
pub enum AssetLoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },
    #[error(
        "{} requires {extension}; no decoder available (decoder path: {decoder_path})",
        path.display()
    )]
    UnsupportedCompression {
        path: PathBuf,
        extension: String,
        decoder_path: String,
    },
    #[error("{} contains no triangle meshes", path.display())]
    Empty { path: PathBuf },
    #[error("loader for {} stopped before finishing", path.display())]
    Interrupted { path: PathBuf },
}

impl AssetLoadError {
    pub fn decode(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Decode {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
