//! Platform media API
//!
//! The capture side of the platform (permission prompts, device enumeration,
//! stream acquisition) is injected through [`MediaPlatform`].

use async_trait::async_trait;
use thiserror::Error;

use crate::media::{MediaKind, MediaTrack};

use super::descriptor::DeviceDescriptor;

/// Which device to open for one media kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceConstraint {
    /// Platform default device
    Default,
    /// Exactly this device id
    Exact(String),
}

impl DeviceConstraint {
    fn from_device_id(device_id: Option<&str>) -> Self {
        match device_id {
            Some(id) => DeviceConstraint::Exact(id.to_owned()),
            None => DeviceConstraint::Default,
        }
    }
}

/// Capture request; a `None` kind is not requested at all
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaConstraints {
    pub video: Option<DeviceConstraint>,
    pub audio: Option<DeviceConstraint>,
}

impl MediaConstraints {
    /// Both kinds from their default devices (used for the permission prompt)
    pub fn all() -> Self {
        Self {
            video: Some(DeviceConstraint::Default),
            audio: Some(DeviceConstraint::Default),
        }
    }

    /// Only one kind, scoped to a device if given
    pub fn only(kind: MediaKind, device_id: Option<&str>) -> Self {
        let constraint = Some(DeviceConstraint::from_device_id(device_id));
        match kind {
            MediaKind::Camera => Self {
                video: constraint,
                audio: None,
            },
            MediaKind::Microphone => Self {
                video: None,
                audio: constraint,
            },
        }
    }

    /// Constraint for a kind, if requested
    pub fn get(&self, kind: MediaKind) -> Option<&DeviceConstraint> {
        match kind {
            MediaKind::Camera => self.video.as_ref(),
            MediaKind::Microphone => self.audio.as_ref(),
        }
    }
}

/// Tracks returned by one capture request
#[derive(Debug, Clone, Default)]
pub struct MediaStream {
    pub tracks: Vec<MediaTrack>,
}

impl MediaStream {
    pub fn new(tracks: Vec<MediaTrack>) -> Self {
        Self { tracks }
    }

    /// First track of a kind
    pub fn first_track(&self, kind: MediaKind) -> Option<&MediaTrack> {
        self.tracks.iter().find(|t| t.kind == kind)
    }

    /// Take the first track of a kind, leaving the rest
    pub fn take_track(&mut self, kind: MediaKind) -> Option<MediaTrack> {
        let index = self.tracks.iter().position(|t| t.kind == kind)?;
        Some(self.tracks.remove(index))
    }
}

/// Errors reported by the platform media API
#[derive(Debug, Clone, Error)]
pub enum PlatformError {
    /// User or policy refused capture
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    /// No device matches the constraints
    #[error("device not found")]
    NotFound,
    /// Device exists but could not be opened (e.g. in use)
    #[error("device not readable: {0}")]
    NotReadable(String),
    /// Anything else
    #[error("{0}")]
    Other(String),
}

/// Platform capture API
#[async_trait]
pub trait MediaPlatform: Send + Sync {
    /// Enumerate all media devices, inputs and outputs
    async fn enumerate_devices(&self) -> Result<Vec<DeviceDescriptor>, PlatformError>;

    /// Open capture tracks matching the constraints
    async fn get_user_media(
        &self,
        constraints: &MediaConstraints,
    ) -> Result<MediaStream, PlatformError>;

    /// Stop a capture track and free the device
    fn stop_track(&self, track: &MediaTrack);

    /// Obtain a capture permission grant.
    ///
    /// Some platforms leave device labels blank until a grant exists. The
    /// default implementation opens the requested devices and stops the
    /// resulting tracks right away.
    async fn request_permission(&self, constraints: &MediaConstraints) -> Result<(), PlatformError> {
        let stream = self.get_user_media(constraints).await?;
        for track in &stream.tracks {
            self.stop_track(track);
        }
        Ok(())
    }
}
