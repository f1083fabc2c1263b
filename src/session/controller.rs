//! Stage session lifecycle controller
//!
//! Owns the join/leave lifecycle against the external stage, the publish
//! strategy for the current session, and device switching.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use tokio::sync::mpsc;

use crate::device::{DeviceEnumerator, DeviceList, MediaAcquirer, MediaPlatform};
use crate::error::{Error, Result};
use crate::media::{MediaKind, StageStream};
use crate::registry::{ParticipantEntry, ParticipantRegistry, ParticipantView, RegistryError};
use crate::stage::{ConnectionState, ParticipantToken, StageConnector};
use crate::stats::{StageStats, StatsTracker};
use crate::strategy::{PublishStrategy, StageStrategy};

use super::config::StageConfig;
use super::events::StageEvent;
use super::handler::SessionHandler;
use super::state::{ControllerPhase, ControllerState, Session, SessionId};

/// State shared between the controller and its session handlers
pub(crate) struct Shared {
    pub config: StageConfig,
    pub registry: ParticipantRegistry,
    pub stats: StatsTracker,
    state: Mutex<ControllerState>,
    devices: Mutex<DeviceList>,
    event_tx: mpsc::Sender<StageEvent>,
}

impl Shared {
    pub fn state(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn devices(&self) -> MutexGuard<'_, DeviceList> {
        self.devices.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue an event for the UI without blocking the caller
    pub fn emit(&self, event: StageEvent) {
        match self.event_tx.try_send(event) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(event)) => {
                tracing::warn!(?event, "UI event channel full, dropping event");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {}
        }
    }
}

/// Controller for one participant's presence on a stage
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use stage_rs::{MediaKind, StageConfig, StageController};
/// # use stage_rs::device::MediaPlatform;
/// # use stage_rs::stage::StageConnector;
///
/// # async fn example(
/// #     platform: Arc<dyn MediaPlatform>,
/// #     connector: Arc<dyn StageConnector>,
/// # ) -> stage_rs::error::Result<()> {
/// let (controller, mut events) = StageController::new(StageConfig::default(), platform, connector);
///
/// tokio::spawn(async move {
///     while let Some(event) = events.recv().await {
///         println!("Event: {:?}", event);
///     }
/// });
///
/// controller.refresh_devices().await;
/// controller.join("participant-token").await?;
/// controller.switch_device(MediaKind::Camera, "usb-camera").await?;
/// controller.leave().await?;
/// # Ok(())
/// # }
/// ```
pub struct StageController {
    shared: Arc<Shared>,
    connector: Arc<dyn StageConnector>,
    enumerator: DeviceEnumerator,
    acquirer: MediaAcquirer,
    /// Live session; the lock also serializes join/leave/switch/toggle
    session: tokio::sync::Mutex<Option<Session>>,
    next_session_id: AtomicU64,
}

impl StageController {
    /// Create a controller.
    ///
    /// Returns the controller and a receiver for UI events.
    pub fn new(
        config: StageConfig,
        platform: Arc<dyn MediaPlatform>,
        connector: Arc<dyn StageConnector>,
    ) -> (Self, mpsc::Receiver<StageEvent>) {
        let (tx, rx) = mpsc::channel(config.event_channel_capacity.max(1));

        let shared = Arc::new(Shared {
            config,
            registry: ParticipantRegistry::new(),
            stats: StatsTracker::new(),
            state: Mutex::new(ControllerState::new()),
            devices: Mutex::new(DeviceList::default()),
            event_tx: tx,
        });

        let controller = Self {
            shared,
            connector,
            enumerator: DeviceEnumerator::new(Arc::clone(&platform)),
            acquirer: MediaAcquirer::new(platform),
            session: tokio::sync::Mutex::new(None),
            next_session_id: AtomicU64::new(1),
        };

        (controller, rx)
    }

    /// Enumerate devices and reconcile the selection.
    ///
    /// Call once at startup and again whenever the platform reports a
    /// device change. Failures are logged and yield empty lists.
    pub async fn refresh_devices(&self) -> DeviceList {
        let list = self.enumerator.list_devices_or_empty().await;

        let changed = {
            let mut state = self.shared.state();
            state.selection.reconcile(&list)
        };
        *self.shared.devices() = list.clone();

        tracing::debug!(selection_changed = changed, "Device list refreshed");
        self.shared.emit(StageEvent::DevicesChanged(list.clone()));
        list
    }

    /// Join a stage.
    ///
    /// Opens local tracks for the selected devices, hands a publish
    /// strategy and this controller's event handler to the stage, then
    /// joins. A device that cannot be opened is left out of the session; a
    /// refused permission fails the join. On failure every acquired track
    /// is released and the controller returns to `Idle`.
    pub async fn join(&self, token: impl Into<ParticipantToken>) -> Result<SessionId> {
        let token = token.into();

        let Ok(mut slot) = self.session.try_lock() else {
            tracing::warn!("Join rejected: another stage operation is in progress");
            return Err(Error::InvalidOperation("stage operation already in progress"));
        };

        let session_id = self.next_session_id.fetch_add(1, Ordering::Relaxed);
        let selection = {
            let mut state = self.shared.state();
            if !state.begin_join(session_id) {
                tracing::warn!(phase = ?state.phase, "Join rejected: session already active");
                return Err(Error::InvalidOperation("session already active"));
            }
            state.selection.clone()
        };

        self.shared.stats.join_attempted();
        self.shared.registry.reset(session_id).await;

        tracing::info!(session_id = session_id, "Joining stage");

        let camera = match self
            .acquire_optional(selection.camera.as_deref(), MediaKind::Camera)
            .await
        {
            Ok(stream) => stream,
            Err(e) => return Err(self.abort_join(session_id, Vec::new(), e).await),
        };

        let microphone = match self
            .acquire_optional(selection.microphone.as_deref(), MediaKind::Microphone)
            .await
        {
            Ok(stream) => stream,
            Err(e) => {
                let acquired = camera.into_iter().collect();
                return Err(self.abort_join(session_id, acquired, e).await);
            }
        };

        // Join with the microphone muted
        if let Some(microphone) = &microphone {
            microphone.set_muted(true);
        }

        let strategy = Arc::new(PublishStrategy::with_tracks(
            self.shared.config.subscribe_type,
            microphone,
            camera,
        ));

        let handler = Arc::new(SessionHandler::new(
            session_id,
            Arc::clone(&strategy),
            Arc::downgrade(&self.shared),
        ));

        let stage = self.connector.create(&token, strategy.clone(), handler);

        if let Err(e) = stage.join().await {
            let err = Error::JoinFailed(e.to_string());
            return Err(self.abort_join(session_id, strategy.take_tracks(), err).await);
        }

        self.shared.state().complete_join();
        self.shared.stats.join_succeeded();

        *slot = Some(Session {
            id: session_id,
            stage,
            strategy,
            joined_at: Instant::now(),
        });

        tracing::info!(session_id = session_id, "Joined stage");
        Ok(session_id)
    }

    /// Open a local stream, or `None` when the device cannot be opened.
    ///
    /// A refused permission still fails the join.
    async fn acquire_optional(
        &self,
        device_id: Option<&str>,
        kind: MediaKind,
    ) -> Result<Option<StageStream>> {
        match self.acquirer.acquire_stream(device_id, kind).await {
            Ok(stream) => Ok(Some(stream)),
            Err(e @ Error::DeviceUnavailable { .. }) => {
                tracing::warn!(kind = %kind, error = %e, "Joining without local stream");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Undo a partial join and hand back the error to report
    async fn abort_join(&self, session_id: SessionId, streams: Vec<StageStream>, err: Error) -> Error {
        for stream in &streams {
            self.acquirer.release(stream);
        }

        self.shared.state().reset();
        self.shared.stats.set_connected(false);
        self.shared.registry.clear().await;
        self.shared.stats.join_failed();

        tracing::error!(session_id = session_id, error = %err, "Join failed");
        self.shared.emit(StageEvent::JoinFailed(err.to_string()));
        err
    }

    /// Leave the current stage.
    ///
    /// Without a session this is a recoverable `InvalidOperation` and the
    /// connection flag stays `false`. Local state is torn down even if the
    /// stage reports an error while leaving.
    pub async fn leave(&self) -> Result<()> {
        let mut slot = self.session.lock().await;

        let Some(session) = slot.take() else {
            tracing::warn!("Leave requested with no active session");
            return Err(Error::InvalidOperation("no active session"));
        };

        let result = session.stage.leave().await;

        self.shared.state().reset();
        self.shared.stats.set_connected(false);

        for stream in session.strategy.take_tracks() {
            self.acquirer.release(&stream);
        }
        self.shared.registry.clear().await;
        self.shared.stats.left();

        tracing::info!(
            session_id = session.id,
            duration_ms = session.joined_at.elapsed().as_millis() as u64,
            "Left stage"
        );
        self.shared.emit(StageEvent::Left(session.id));

        result.map_err(|e| {
            tracing::warn!(session_id = session.id, error = %e, "Stage reported an error while leaving");
            Error::Stage(e)
        })
    }

    /// Switch the capture device for one kind.
    ///
    /// The selection is recorded under the operation gate, so overlapping
    /// switches apply in order. With no session that is all that happens.
    /// Otherwise the new track replaces the old one in the strategy and in
    /// the local participant entry, the old track is released, and the stage
    /// is asked to re-read the strategy. Runs after any in-flight join.
    pub async fn switch_device(&self, kind: MediaKind, device_id: impl Into<String>) -> Result<()> {
        let device_id = device_id.into();

        let slot = self.session.lock().await;

        let previous_selection = {
            let mut state = self.shared.state();
            let previous = state.selection.get(kind).map(str::to_owned);
            state.selection.set(kind, Some(device_id.clone()));
            previous
        };

        let Some(session) = slot.as_ref() else {
            tracing::debug!(kind = %kind, device_id = %device_id, "No session, device selection recorded");
            return Ok(());
        };

        let stream = match self.acquirer.acquire_stream(Some(&device_id), kind).await {
            Ok(stream) => stream,
            Err(e) => {
                self.shared.state().selection.set(kind, previous_selection);
                return Err(e);
            }
        };

        match session.strategy.track(kind) {
            Some(previous) => {
                stream.set_muted(previous.is_muted());
                self.acquirer.release(&previous);
            }
            None => {
                let state = self.shared.state();
                stream.set_muted(match kind {
                    MediaKind::Microphone => state.mic_muted,
                    MediaKind::Camera => state.camera_hidden,
                });
            }
        }

        let (audio, video) = match kind {
            MediaKind::Camera => (session.strategy.audio_track(), Some(stream.clone())),
            MediaKind::Microphone => (Some(stream.clone()), session.strategy.video_track()),
        };
        session.strategy.update_tracks(audio, video);

        match self.shared.registry.replace_local_stream(stream).await {
            Ok(_) => {}
            Err(RegistryError::NoLocalParticipant) => {
                tracing::debug!(session_id = session.id, "Local participant not registered yet");
            }
            Err(e) => tracing::warn!(session_id = session.id, error = %e, "Local entry update failed"),
        }

        session.stage.refresh_strategy().await?;

        self.shared.stats.device_switched();
        tracing::info!(session_id = session.id, kind = %kind, device_id = %device_id, "Device switched");
        self.shared.emit(StageEvent::DeviceSwitched { kind, device_id });
        Ok(())
    }

    /// Flip the local microphone mute state, returning the new state
    pub async fn toggle_microphone(&self) -> Result<bool> {
        self.toggle(MediaKind::Microphone).await
    }

    /// Flip the local camera visibility, returning whether it is now hidden
    pub async fn toggle_camera(&self) -> Result<bool> {
        self.toggle(MediaKind::Camera).await
    }

    async fn toggle(&self, kind: MediaKind) -> Result<bool> {
        let slot = self.session.lock().await;
        let session = slot
            .as_ref()
            .ok_or(Error::InvalidOperation("no active session"))?;
        let stream = session
            .strategy
            .track(kind)
            .ok_or(Error::InvalidOperation("no local stream of that kind"))?;

        let muted = !stream.is_muted();
        stream.set_muted(muted);

        {
            let mut state = self.shared.state();
            match kind {
                MediaKind::Microphone => state.mic_muted = muted,
                MediaKind::Camera => state.camera_hidden = muted,
            }
        }

        tracing::debug!(session_id = session.id, kind = %kind, muted = muted, "Local media toggled");
        self.shared.emit(match kind {
            MediaKind::Microphone => StageEvent::MicrophoneMuted(muted),
            MediaKind::Camera => StageEvent::CameraHidden(muted),
        });
        Ok(muted)
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> ControllerPhase {
        self.shared.state().phase
    }

    /// Whether the stage reports the session as connected
    pub fn is_connected(&self) -> bool {
        self.shared.state().is_connected
    }

    /// Last connection state the stage reported for the current session
    pub fn connection_state(&self) -> ConnectionState {
        self.shared.state().connection
    }

    pub fn is_microphone_muted(&self) -> bool {
        self.shared.state().mic_muted
    }

    pub fn is_camera_hidden(&self) -> bool {
        self.shared.state().camera_hidden
    }

    /// Last enumerated devices
    pub fn devices(&self) -> DeviceList {
        self.shared.devices().clone()
    }

    /// Currently selected device for a kind
    pub fn selected_device(&self, kind: MediaKind) -> Option<String> {
        self.shared.state().selection.get(kind).map(str::to_owned)
    }

    /// Local streams the strategy currently publishes
    pub async fn published_streams(&self) -> Vec<StageStream> {
        self.session
            .lock()
            .await
            .as_ref()
            .map(|s| s.strategy.stage_streams_to_publish())
            .unwrap_or_default()
    }

    /// Participant registry
    pub fn registry(&self) -> &ParticipantRegistry {
        &self.shared.registry
    }

    /// Local participant entry, once the stage has reported it
    pub async fn local_participant(&self) -> Option<ParticipantEntry> {
        self.shared.registry.local().await
    }

    /// Tiles to render, in display order
    pub async fn participants(&self) -> Vec<ParticipantView> {
        self.shared
            .registry
            .views(&self.shared.config.display_name_attribute)
            .await
    }

    /// Statistics snapshot
    pub fn stats(&self) -> StageStats {
        self.shared.stats.snapshot()
    }
}
