//! Publish/subscribe strategy
//!
//! The stage consults a [`StageStrategy`] to decide what to send and what to
//! receive. [`PublishStrategy`] publishes the local camera and microphone
//! unconditionally and subscribes to every remote participant.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::media::{MediaKind, StageStream};
use crate::stage::ParticipantInfo;

/// What to receive from a remote participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubscribeType {
    /// Receive nothing
    None,
    /// Audio only
    AudioOnly,
    /// Audio and video
    #[default]
    AudioVideo,
}

/// Policy queried by the stage
pub trait StageStrategy: Send + Sync {
    /// Local streams to publish
    fn stage_streams_to_publish(&self) -> Vec<StageStream>;

    /// Whether a local participant should publish at all
    fn should_publish_participant(&self, participant: &ParticipantInfo) -> bool;

    /// Subscription mode for a remote participant
    fn should_subscribe_to_participant(&self, participant: &ParticipantInfo) -> SubscribeType;
}

#[derive(Default)]
struct Tracks {
    audio: Option<StageStream>,
    video: Option<StageStream>,
}

/// Strategy holding the current local tracks
pub struct PublishStrategy {
    tracks: Mutex<Tracks>,
    subscribe_type: SubscribeType,
}

impl PublishStrategy {
    /// Create an empty strategy subscribing with `subscribe_type`
    pub fn new(subscribe_type: SubscribeType) -> Self {
        Self {
            tracks: Mutex::new(Tracks::default()),
            subscribe_type,
        }
    }

    /// Create a strategy already holding tracks
    pub fn with_tracks(
        subscribe_type: SubscribeType,
        audio: Option<StageStream>,
        video: Option<StageStream>,
    ) -> Self {
        let strategy = Self::new(subscribe_type);
        strategy.update_tracks(audio, video);
        strategy
    }

    fn lock(&self) -> MutexGuard<'_, Tracks> {
        self.tracks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Swap both held tracks.
    ///
    /// The previous tracks are dropped from the strategy, not released;
    /// the caller stops them first.
    pub fn update_tracks(&self, audio: Option<StageStream>, video: Option<StageStream>) {
        let mut tracks = self.lock();
        tracks.audio = audio;
        tracks.video = video;
    }

    /// Swap the track of one kind, returning the previous one
    pub fn replace_track(&self, kind: MediaKind, stream: Option<StageStream>) -> Option<StageStream> {
        let mut tracks = self.lock();
        let slot = match kind {
            MediaKind::Camera => &mut tracks.video,
            MediaKind::Microphone => &mut tracks.audio,
        };
        std::mem::replace(slot, stream)
    }

    /// Current microphone stream
    pub fn audio_track(&self) -> Option<StageStream> {
        self.lock().audio.clone()
    }

    /// Current camera stream
    pub fn video_track(&self) -> Option<StageStream> {
        self.lock().video.clone()
    }

    /// Current stream of a kind
    pub fn track(&self, kind: MediaKind) -> Option<StageStream> {
        match kind {
            MediaKind::Camera => self.video_track(),
            MediaKind::Microphone => self.audio_track(),
        }
    }

    /// Remove and return all held tracks
    pub fn take_tracks(&self) -> Vec<StageStream> {
        let mut tracks = self.lock();
        tracks.audio.take().into_iter().chain(tracks.video.take()).collect()
    }
}

impl Default for PublishStrategy {
    fn default() -> Self {
        Self::new(SubscribeType::default())
    }
}

impl StageStrategy for PublishStrategy {
    fn stage_streams_to_publish(&self) -> Vec<StageStream> {
        let tracks = self.lock();
        tracks
            .audio
            .iter()
            .chain(tracks.video.iter())
            .cloned()
            .collect()
    }

    fn should_publish_participant(&self, _participant: &ParticipantInfo) -> bool {
        true
    }

    fn should_subscribe_to_participant(&self, _participant: &ParticipantInfo) -> SubscribeType {
        self.subscribe_type
    }
}
