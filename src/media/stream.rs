//! Track and stream handles
//!
//! A [`MediaTrack`] is the raw capture track handed out by the platform.
//! A [`StageStream`] wraps a track for use on a stage. Clones of a
//! `StageStream` share the same mute and release state, so the publish
//! strategy, the participant registry and the UI all see one handle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::kind::MediaKind;

/// Raw capture track returned by the platform media API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaTrack {
    /// Platform track identifier
    pub id: String,
    /// Kind of media this track carries
    pub kind: MediaKind,
    /// Device the track was captured from, if known
    pub device_id: Option<String>,
    /// Human-readable label
    pub label: String,
}

impl MediaTrack {
    /// Create a new track description
    pub fn new(id: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            id: id.into(),
            kind,
            device_id: None,
            label: String::new(),
        }
    }

    /// Set the source device
    pub fn with_device(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    /// Set the label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

struct StreamInner {
    track: MediaTrack,
    local: bool,
    muted: AtomicBool,
    released: AtomicBool,
}

/// Shared handle to a single audio or video stream on a stage
#[derive(Clone)]
pub struct StageStream {
    inner: Arc<StreamInner>,
}

impl StageStream {
    /// Wrap a locally captured track for publishing
    pub fn local(track: MediaTrack) -> Self {
        Self::build(track, true)
    }

    /// Wrap a track received from a remote participant
    pub fn remote(track: MediaTrack) -> Self {
        Self::build(track, false)
    }

    fn build(track: MediaTrack, local: bool) -> Self {
        Self {
            inner: Arc::new(StreamInner {
                track,
                local,
                muted: AtomicBool::new(false),
                released: AtomicBool::new(false),
            }),
        }
    }

    /// Track identifier
    pub fn id(&self) -> &str {
        &self.inner.track.id
    }

    /// Media kind
    pub fn kind(&self) -> MediaKind {
        self.inner.track.kind
    }

    /// Underlying capture track
    pub fn track(&self) -> &MediaTrack {
        &self.inner.track
    }

    /// Source device, if known
    pub fn device_id(&self) -> Option<&str> {
        self.inner.track.device_id.as_deref()
    }

    /// Whether this stream is outbound
    pub fn is_local(&self) -> bool {
        self.inner.local
    }

    /// Current mute flag
    pub fn is_muted(&self) -> bool {
        self.inner.muted.load(Ordering::Acquire)
    }

    /// Set the mute flag, returning the previous value
    pub fn set_muted(&self, muted: bool) -> bool {
        self.inner.muted.swap(muted, Ordering::AcqRel)
    }

    /// Whether the capture track has been stopped
    pub fn is_released(&self) -> bool {
        self.inner.released.load(Ordering::Acquire)
    }

    /// Mark the stream released.
    ///
    /// Returns `true` only for the first call, so the platform track is
    /// stopped exactly once.
    pub(crate) fn mark_released(&self) -> bool {
        !self.inner.released.swap(true, Ordering::AcqRel)
    }

    /// Whether two handles refer to the same stream
    pub fn same_handle(&self, other: &StageStream) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for StageStream {
    fn eq(&self, other: &Self) -> bool {
        self.same_handle(other)
    }
}

impl Eq for StageStream {}

impl std::fmt::Debug for StageStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageStream")
            .field("id", &self.inner.track.id)
            .field("kind", &self.inner.track.kind)
            .field("local", &self.inner.local)
            .field("muted", &self.is_muted())
            .field("released", &self.is_released())
            .finish()
    }
}
