use std::path::PathBuf;

use engine::scene::{NodeId, SceneError};
use thiserror::Error;

use crate::controller::ControllerId;

/// Contract violations only. A ray that hits nothing, or a release with
/// nothing held, is ordinary input and never produces one of these.
#[derive(Debug, Error)]
pub enum InteractionError {
    #[error("{0} is not configured")]
    UnknownController(ControllerId),

    #[error("expected {node} to be parented to {expected}, found {actual:?}")]
    UnexpectedParent {
        node: NodeId,
        expected: NodeId,
        actual: Option<NodeId>,
    },

    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error("failed to read config file {}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config")]
    ConfigParse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
