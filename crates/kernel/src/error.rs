use burner_common::{Viewport, WorldId};

/// Construction-time configuration failures. These are fatal: nothing is
/// created when one is returned.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid viewport {width}x{height}: dimensions must be finite and non-negative")]
    InvalidViewport { width: f32, height: f32 },
    #[error("invalid world size {width}x{height}: dimensions must be finite and non-negative")]
    InvalidWorldSize { width: f32, height: f32 },
}

impl ConfigError {
    pub(crate) fn viewport(v: Viewport) -> Self {
        Self::InvalidViewport {
            width: v.width,
            height: v.height,
        }
    }
}

/// Errors from registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("no item kind registered under {0:?}")]
    UnknownKind(String),
    #[error("world {0} not found")]
    UnknownWorld(WorldId),
    #[error("registry has no world to own new items")]
    NoWorld,
    #[error(transparent)]
    Config(#[from] ConfigError),
}
