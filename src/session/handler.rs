//! Stage event handler
//!
//! One [`SessionHandler`] is created per join attempt and handed to the
//! stage at construction. It only applies events while its session is the
//! controller's current one; anything arriving after leave or a failed
//! join is dropped.

use std::sync::{Arc, Weak};

use async_trait::async_trait;

use crate::media::StageStream;
use crate::registry::Upsert;
use crate::stage::{ConnectionState, ParticipantInfo, StageEventSink};
use crate::strategy::PublishStrategy;

use super::controller::Shared;
use super::events::StageEvent;
use super::state::SessionId;

/// Event sink bound to one session
pub(crate) struct SessionHandler {
    session_id: SessionId,
    strategy: Arc<PublishStrategy>,
    shared: Weak<Shared>,
}

impl SessionHandler {
    pub fn new(session_id: SessionId, strategy: Arc<PublishStrategy>, shared: Weak<Shared>) -> Self {
        Self {
            session_id,
            strategy,
            shared,
        }
    }
}

#[async_trait]
impl StageEventSink for SessionHandler {
    async fn on_connection_state_changed(&self, state: ConnectionState) {
        let Some(shared) = self.shared.upgrade() else {
            return;
        };
        let mute = shared.config.mute_microphone_on_state_change;
        let connected = state.is_connected();

        {
            let mut controller = shared.state();
            if !controller.accepts(self.session_id) {
                tracing::warn!(session_id = self.session_id, state = %state, "Stale connection event ignored");
                return;
            }
            controller.connection = state;
            controller.is_connected = connected;
            if mute {
                controller.mic_muted = true;
            }
        }

        // Every transition re-mutes the microphone, not only the first connect
        if mute {
            if let Some(microphone) = self.strategy.audio_track() {
                microphone.set_muted(true);
            }
        }

        shared.stats.set_connected(connected);

        tracing::info!(
            session_id = self.session_id,
            state = %state,
            connected = connected,
            "Stage connection state changed"
        );

        shared.emit(StageEvent::ConnectionChanged {
            session_id: self.session_id,
            state,
            connected,
        });
        if mute {
            shared.emit(StageEvent::MicrophoneMuted(true));
        }
    }

    async fn on_participant_streams_added(
        &self,
        participant: ParticipantInfo,
        streams: Vec<StageStream>,
    ) {
        let Some(shared) = self.shared.upgrade() else {
            return;
        };
        let id = participant.id.clone();

        tracing::debug!(
            session_id = self.session_id,
            participant = %id,
            streams = streams.len(),
            "Participant media added"
        );

        match shared
            .registry
            .upsert_for(self.session_id, participant, streams)
            .await
        {
            Some(Upsert::Inserted) => {
                shared.stats.participant_added();
                shared.emit(StageEvent::ParticipantJoined(id));
            }
            Some(Upsert::Updated) => shared.emit(StageEvent::ParticipantUpdated(id)),
            Some(Upsert::Unchanged) => {}
            None => {
                tracing::warn!(session_id = self.session_id, participant = %id, "Stale participant event ignored");
            }
        }
    }

    async fn on_participant_left(&self, participant: ParticipantInfo) {
        let Some(shared) = self.shared.upgrade() else {
            return;
        };

        tracing::debug!(session_id = self.session_id, participant = %participant.id, "Participant left");

        if shared
            .registry
            .remove_for(self.session_id, &participant.id)
            .await
            .is_some()
        {
            shared.stats.participant_left();
            shared.emit(StageEvent::ParticipantLeft(participant.id));
        }
    }
}
