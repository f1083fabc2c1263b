//! Device descriptors, device lists and the current selection

use crate::media::MediaKind;

/// Kind reported by the platform for an enumerated device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    /// Camera
    VideoInput,
    /// Microphone
    AudioInput,
    /// Speaker/headphones, never used for capture
    AudioOutput,
}

impl DeviceKind {
    /// Capture kind for input devices
    pub fn media_kind(self) -> Option<MediaKind> {
        match self {
            DeviceKind::VideoInput => Some(MediaKind::Camera),
            DeviceKind::AudioInput => Some(MediaKind::Microphone),
            DeviceKind::AudioOutput => None,
        }
    }
}

/// One enumerated device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescriptor {
    /// Opaque platform identifier
    pub device_id: String,
    /// Human-readable label (may be empty before permission is granted)
    pub label: String,
    /// Device kind
    pub kind: DeviceKind,
}

impl DeviceDescriptor {
    /// Create a new descriptor
    pub fn new(device_id: impl Into<String>, label: impl Into<String>, kind: DeviceKind) -> Self {
        Self {
            device_id: device_id.into(),
            label: label.into(),
            kind,
        }
    }
}

/// Capture devices partitioned by kind, in platform order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceList {
    pub video_devices: Vec<DeviceDescriptor>,
    pub audio_devices: Vec<DeviceDescriptor>,
}

impl DeviceList {
    /// Partition raw platform devices; output devices are dropped
    pub fn from_devices(devices: impl IntoIterator<Item = DeviceDescriptor>) -> Self {
        let mut list = Self::default();
        for device in devices {
            match device.kind.media_kind() {
                Some(MediaKind::Camera) => list.video_devices.push(device),
                Some(MediaKind::Microphone) => list.audio_devices.push(device),
                None => {}
            }
        }
        list
    }

    /// Devices of one kind
    pub fn of_kind(&self, kind: MediaKind) -> &[DeviceDescriptor] {
        match kind {
            MediaKind::Camera => &self.video_devices,
            MediaKind::Microphone => &self.audio_devices,
        }
    }

    /// First device of a kind (the default selection)
    pub fn first(&self, kind: MediaKind) -> Option<&DeviceDescriptor> {
        self.of_kind(kind).first()
    }

    /// Whether a device id is present for a kind
    pub fn contains(&self, kind: MediaKind, device_id: &str) -> bool {
        self.of_kind(kind).iter().any(|d| d.device_id == device_id)
    }

    pub fn is_empty(&self) -> bool {
        self.video_devices.is_empty() && self.audio_devices.is_empty()
    }
}

/// Currently selected capture devices
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceSelection {
    pub camera: Option<String>,
    pub microphone: Option<String>,
}

impl DeviceSelection {
    /// Selected device for a kind
    pub fn get(&self, kind: MediaKind) -> Option<&str> {
        match kind {
            MediaKind::Camera => self.camera.as_deref(),
            MediaKind::Microphone => self.microphone.as_deref(),
        }
    }

    /// Replace the selection for a kind
    pub fn set(&mut self, kind: MediaKind, device_id: Option<String>) {
        match kind {
            MediaKind::Camera => self.camera = device_id,
            MediaKind::Microphone => self.microphone = device_id,
        }
    }

    /// Reconcile against a fresh device list.
    ///
    /// A selection that is still present is kept; otherwise the first device
    /// of that kind is chosen (or none). Returns `true` if anything changed.
    pub fn reconcile(&mut self, devices: &DeviceList) -> bool {
        let mut changed = false;
        for kind in [MediaKind::Camera, MediaKind::Microphone] {
            let keep = self
                .get(kind)
                .is_some_and(|id| devices.contains(kind, id));
            if !keep {
                let fallback = devices.first(kind).map(|d| d.device_id.clone());
                if self.get(kind) != fallback.as_deref() {
                    self.set(kind, fallback);
                    changed = true;
                }
            }
        }
        changed
    }
}
