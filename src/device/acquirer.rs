//! Media acquisition for a chosen device

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::media::{MediaKind, MediaTrack, StageStream};

use super::platform::{MediaConstraints, MediaPlatform, PlatformError};

/// Opens capture tracks and releases them again
#[derive(Clone)]
pub struct MediaAcquirer {
    platform: Arc<dyn MediaPlatform>,
}

impl MediaAcquirer {
    /// Create an acquirer over a platform
    pub fn new(platform: Arc<dyn MediaPlatform>) -> Self {
        Self { platform }
    }

    /// Open one track of `kind`.
    ///
    /// Only `kind` is requested so the platform does not prompt for the
    /// other. `None` uses the platform default device.
    pub async fn acquire(&self, device_id: Option<&str>, kind: MediaKind) -> Result<MediaTrack> {
        let constraints = MediaConstraints::only(kind, device_id);

        let mut stream = self
            .platform
            .get_user_media(&constraints)
            .await
            .map_err(|e| {
                tracing::warn!(kind = %kind, device_id = ?device_id, error = %e, "Media acquisition failed");
                Error::from_platform(e, kind, device_id)
            })?;

        let track = stream.take_track(kind).ok_or_else(|| {
            Error::from_platform(PlatformError::NotFound, kind, device_id)
        })?;

        // Anything else the platform handed back is not ours to keep
        for extra in &stream.tracks {
            self.platform.stop_track(extra);
        }

        tracing::debug!(kind = %kind, track = %track.id, device_id = ?track.device_id, "Track acquired");
        Ok(track)
    }

    /// Open a track and wrap it as a local stage stream
    pub async fn acquire_stream(
        &self,
        device_id: Option<&str>,
        kind: MediaKind,
    ) -> Result<StageStream> {
        self.acquire(device_id, kind).await.map(StageStream::local)
    }

    /// Stop the capture track behind a local stream.
    ///
    /// Safe to call more than once; only the first call reaches the platform.
    pub fn release(&self, stream: &StageStream) {
        if stream.is_local() && stream.mark_released() {
            self.platform.stop_track(stream.track());
            tracing::debug!(kind = %stream.kind(), track = %stream.id(), "Track released");
        }
    }
}
