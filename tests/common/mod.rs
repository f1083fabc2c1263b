//! In-memory collaborators for controller tests
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use tokio::sync::Notify;

use stage_rs::device::{
    DeviceConstraint, DeviceDescriptor, DeviceKind, MediaConstraints, MediaPlatform, MediaStream,
    PlatformError,
};
use stage_rs::media::{MediaKind, MediaTrack, StageStream};
use stage_rs::stage::{
    ParticipantInfo, ParticipantToken, Stage, StageConnector, StageError, StageEventSink,
};
use stage_rs::strategy::StageStrategy;
use stage_rs::{StageConfig, StageController, StageEvent};

static TRACING: Once = Once::new();

/// Route controller logs to the test output, filtered by `RUST_LOG`
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::from_default_env()
                    .add_directive("stage_rs=debug".parse().expect("valid directive")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Platform with a fixed device list that hands out uniquely numbered tracks
pub struct MockPlatform {
    devices: Mutex<Vec<DeviceDescriptor>>,
    unavailable: Mutex<HashSet<String>>,
    deny_permission: Mutex<bool>,
    next_track: AtomicUsize,
    stopped: Mutex<Vec<String>>,
    requests: Mutex<Vec<MediaConstraints>>,
    hold_next: Mutex<Option<Arc<Notify>>>,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self::with_devices(vec![
            DeviceDescriptor::new("cam-1", "Front Camera", DeviceKind::VideoInput),
            DeviceDescriptor::new("cam-2", "USB Camera", DeviceKind::VideoInput),
            DeviceDescriptor::new("mic-1", "Built-in Mic", DeviceKind::AudioInput),
            DeviceDescriptor::new("mic-2", "Headset", DeviceKind::AudioInput),
            DeviceDescriptor::new("spk-1", "Speakers", DeviceKind::AudioOutput),
        ])
    }

    pub fn with_devices(devices: Vec<DeviceDescriptor>) -> Self {
        Self {
            devices: Mutex::new(devices),
            unavailable: Mutex::new(HashSet::new()),
            deny_permission: Mutex::new(false),
            next_track: AtomicUsize::new(1),
            stopped: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
            hold_next: Mutex::new(None),
        }
    }

    pub fn set_devices(&self, devices: Vec<DeviceDescriptor>) {
        *self.devices.lock().unwrap() = devices;
    }

    pub fn make_unavailable(&self, device_id: &str) {
        self.unavailable.lock().unwrap().insert(device_id.to_string());
    }

    pub fn deny_permission(&self) {
        *self.deny_permission.lock().unwrap() = true;
    }

    /// Park the next `get_user_media` call until the returned notifier fires
    pub fn hold_next_request(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.hold_next.lock().unwrap() = Some(Arc::clone(&notify));
        notify
    }

    pub fn stopped(&self) -> Vec<String> {
        self.stopped.lock().unwrap().clone()
    }

    pub fn requests(&self) -> Vec<MediaConstraints> {
        self.requests.lock().unwrap().clone()
    }

    fn open(&self, kind: MediaKind, constraint: &DeviceConstraint) -> Result<MediaTrack, PlatformError> {
        let device_id = match constraint {
            DeviceConstraint::Exact(id) => id.clone(),
            DeviceConstraint::Default => match kind {
                MediaKind::Camera => "default-camera".to_string(),
                MediaKind::Microphone => "default-microphone".to_string(),
            },
        };
        if self.unavailable.lock().unwrap().contains(&device_id) {
            return Err(PlatformError::NotReadable(format!("{} is busy", device_id)));
        }
        let n = self.next_track.fetch_add(1, Ordering::Relaxed);
        Ok(MediaTrack::new(format!("{}-track-{}", kind, n), kind).with_device(device_id))
    }
}

#[async_trait]
impl MediaPlatform for MockPlatform {
    async fn enumerate_devices(&self) -> Result<Vec<DeviceDescriptor>, PlatformError> {
        Ok(self.devices.lock().unwrap().clone())
    }

    async fn get_user_media(
        &self,
        constraints: &MediaConstraints,
    ) -> Result<MediaStream, PlatformError> {
        self.requests.lock().unwrap().push(constraints.clone());
        let hold = self.hold_next.lock().unwrap().take();
        if let Some(hold) = hold {
            hold.notified().await;
        }
        if *self.deny_permission.lock().unwrap() {
            return Err(PlatformError::PermissionDenied("user dismissed prompt".into()));
        }

        let mut tracks = Vec::new();
        if let Some(c) = &constraints.video {
            tracks.push(self.open(MediaKind::Camera, c)?);
        }
        if let Some(c) = &constraints.audio {
            tracks.push(self.open(MediaKind::Microphone, c)?);
        }
        Ok(MediaStream::new(tracks))
    }

    fn stop_track(&self, track: &MediaTrack) {
        self.stopped.lock().unwrap().push(track.id.clone());
    }
}

/// What the controller handed to one created stage, plus call counters
pub struct StageProbe {
    pub token: String,
    pub strategy: Arc<dyn StageStrategy>,
    pub events: Arc<dyn StageEventSink>,
    pub joins: AtomicUsize,
    pub leaves: AtomicUsize,
    pub refreshes: AtomicUsize,
    join_error: Option<StageError>,
    leave_error: Option<StageError>,
    hold_join: Option<Arc<Notify>>,
}

impl StageProbe {
    pub async fn connection(&self, state: stage_rs::stage::ConnectionState) {
        self.events.on_connection_state_changed(state).await;
    }

    pub async fn add(&self, participant: ParticipantInfo, streams: Vec<StageStream>) {
        self.events.on_participant_streams_added(participant, streams).await;
    }

    pub async fn add_local_published(&self, participant: ParticipantInfo) {
        let streams = self.strategy.stage_streams_to_publish();
        self.add(participant, streams).await;
    }

    pub async fn left(&self, participant: ParticipantInfo) {
        self.events.on_participant_left(participant).await;
    }
}

struct MockStage {
    probe: Arc<StageProbe>,
}

#[async_trait]
impl Stage for MockStage {
    async fn join(&self) -> Result<(), StageError> {
        self.probe.joins.fetch_add(1, Ordering::SeqCst);
        if let Some(hold) = &self.probe.hold_join {
            hold.notified().await;
        }
        match &self.probe.join_error {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    async fn leave(&self) -> Result<(), StageError> {
        self.probe.leaves.fetch_add(1, Ordering::SeqCst);
        match &self.probe.leave_error {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    async fn refresh_strategy(&self) -> Result<(), StageError> {
        self.probe.refreshes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Connector that records every stage it creates
#[derive(Default)]
pub struct MockConnector {
    stages: Mutex<Vec<Arc<StageProbe>>>,
    join_error: Mutex<Option<StageError>>,
    leave_error: Mutex<Option<StageError>>,
    hold_join: Mutex<Option<Arc<Notify>>>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next created stages reject `join()`
    pub fn reject_joins(&self, error: StageError) {
        *self.join_error.lock().unwrap() = Some(error);
    }

    /// Make the next created stages report an error from `leave()`
    pub fn fail_leaves(&self, error: StageError) {
        *self.leave_error.lock().unwrap() = Some(error);
    }

    pub fn accept_joins(&self) {
        *self.join_error.lock().unwrap() = None;
    }

    /// Make `join()` wait until the returned notifier fires
    pub fn hold_joins(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.hold_join.lock().unwrap() = Some(Arc::clone(&notify));
        notify
    }

    pub fn stage_count(&self) -> usize {
        self.stages.lock().unwrap().len()
    }

    pub fn last_stage(&self) -> Arc<StageProbe> {
        Arc::clone(self.stages.lock().unwrap().last().expect("no stage created"))
    }
}

impl StageConnector for MockConnector {
    fn create(
        &self,
        token: &ParticipantToken,
        strategy: Arc<dyn StageStrategy>,
        events: Arc<dyn StageEventSink>,
    ) -> Box<dyn Stage> {
        let probe = Arc::new(StageProbe {
            token: token.expose().to_string(),
            strategy,
            events,
            joins: AtomicUsize::new(0),
            leaves: AtomicUsize::new(0),
            refreshes: AtomicUsize::new(0),
            join_error: self.join_error.lock().unwrap().clone(),
            leave_error: self.leave_error.lock().unwrap().clone(),
            hold_join: self.hold_join.lock().unwrap().clone(),
        });
        self.stages.lock().unwrap().push(Arc::clone(&probe));
        Box::new(MockStage { probe })
    }
}

pub struct Harness {
    pub controller: StageController,
    pub events: tokio::sync::mpsc::Receiver<StageEvent>,
    pub platform: Arc<MockPlatform>,
    pub connector: Arc<MockConnector>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(StageConfig::default())
    }

    pub fn with_config(config: StageConfig) -> Self {
        init_tracing();
        let platform = Arc::new(MockPlatform::new());
        let connector = Arc::new(MockConnector::new());
        let (controller, events) = StageController::new(config, platform.clone(), connector.clone());
        Self {
            controller,
            events,
            platform,
            connector,
        }
    }

    /// Drain every queued UI event
    pub fn drain_events(&mut self) -> Vec<StageEvent> {
        let mut out = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            out.push(event);
        }
        out
    }
}

pub fn remote_stream(id: &str, kind: MediaKind) -> StageStream {
    StageStream::remote(MediaTrack::new(id, kind))
}

pub fn remote_streams(participant: &str) -> Vec<StageStream> {
    vec![
        remote_stream(&format!("{}-video", participant), MediaKind::Camera),
        remote_stream(&format!("{}-audio", participant), MediaKind::Microphone),
    ]
}
