//! Error types
//!
//! Collaborator failures (platform media API, external stage SDK) are mapped
//! into a single [`Error`] at the controller boundary.

use thiserror::Error;

use crate::device::PlatformError;
use crate::media::MediaKind;
use crate::stage::StageError;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Controller-level error
#[derive(Debug, Error)]
pub enum Error {
    /// Capture permission was refused or devices could not be enumerated
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// The chosen device could not be opened
    #[error("Device unavailable ({kind}, {}): {reason}", .device_id.as_deref().unwrap_or("default"))]
    DeviceUnavailable {
        kind: MediaKind,
        device_id: Option<String>,
        reason: String,
    },

    /// The external stage rejected the join
    #[error("Join failed: {0}")]
    JoinFailed(String),

    /// Operation is not valid in the current controller state
    #[error("Invalid operation: {0}")]
    InvalidOperation(&'static str),

    /// Any other failure reported by the external stage
    #[error("Stage error: {0}")]
    Stage(#[from] StageError),
}

impl Error {
    /// Whether controller state was left untouched and the caller may simply retry or ignore
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::InvalidOperation(_)
                | Error::PermissionDenied(_)
                | Error::DeviceUnavailable { .. }
        )
    }

    pub(crate) fn from_platform(
        err: PlatformError,
        kind: MediaKind,
        device_id: Option<&str>,
    ) -> Self {
        match err {
            PlatformError::PermissionDenied(msg) => Error::PermissionDenied(msg),
            other => Error::DeviceUnavailable {
                kind,
                device_id: device_id.map(str::to_owned),
                reason: other.to_string(),
            },
        }
    }
}
