use std::path::PathBuf;

use thiserror::Error;

/// Fatal configuration errors raised while building a fleet.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("no POIs loaded for province '{province}'")]
    NoPois { province: String },
    #[error("no provinces could be loaded from '{}'", dir.display())]
    NoProvincesLoaded { dir: PathBuf },
    #[error("no vehicles were created; check the province configuration against the loaded POIs")]
    EmptyFleet,
}

/// Failure reported by a [`crate::publisher::Publisher`].
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("message rejected by transport: {0}")]
    Rejected(String),
    #[error("failed to serialize vehicle state")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write message")]
    Io(#[from] std::io::Error),
}
