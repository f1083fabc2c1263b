//! Device enumeration

use std::sync::Arc;

use crate::error::{Error, Result};

use super::descriptor::DeviceList;
use super::platform::{MediaConstraints, MediaPlatform, PlatformError};

/// Lists capture devices through the platform
pub struct DeviceEnumerator {
    platform: Arc<dyn MediaPlatform>,
}

impl DeviceEnumerator {
    /// Create an enumerator over a platform
    pub fn new(platform: Arc<dyn MediaPlatform>) -> Self {
        Self { platform }
    }

    /// List cameras and microphones.
    ///
    /// Requests a capture grant for both kinds first so that labels are
    /// populated. A missing kind is logged and yields an empty list for that
    /// kind; only a refused permission or a failed enumeration is an error.
    pub async fn list_devices(&self) -> Result<DeviceList> {
        match self.platform.request_permission(&MediaConstraints::all()).await {
            Ok(()) => {}
            Err(PlatformError::PermissionDenied(msg)) => {
                return Err(Error::PermissionDenied(msg));
            }
            Err(e) => {
                // Usually a missing device of one kind; enumeration still works
                tracing::warn!(error = %e, "Capture permission request failed, labels may be blank");
            }
        }

        let devices = self
            .platform
            .enumerate_devices()
            .await
            .map_err(|e| Error::PermissionDenied(e.to_string()))?;

        let list = DeviceList::from_devices(devices);

        if list.video_devices.is_empty() {
            tracing::error!("No video devices found");
        }
        if list.audio_devices.is_empty() {
            tracing::error!("No audio devices found");
        }

        tracing::debug!(
            video = list.video_devices.len(),
            audio = list.audio_devices.len(),
            "Devices enumerated"
        );

        Ok(list)
    }

    /// List devices, degrading to empty lists on any failure
    pub async fn list_devices_or_empty(&self) -> DeviceList {
        match self.list_devices().await {
            Ok(list) => list,
            Err(e) => {
                tracing::error!(error = %e, "An error occurred during device update");
                DeviceList::default()
            }
        }
    }
}
