//! Events delivered to the UI shell

use crate::device::DeviceList;
use crate::media::MediaKind;
use crate::stage::{ConnectionState, ParticipantId};

use super::state::SessionId;

/// Events from the stage controller
#[derive(Debug, Clone)]
pub enum StageEvent {
    /// Connection state of the current session changed
    ConnectionChanged {
        session_id: SessionId,
        state: ConnectionState,
        connected: bool,
    },

    /// A participant entry was created
    ParticipantJoined(ParticipantId),

    /// A participant entry gained streams or changed attributes
    ParticipantUpdated(ParticipantId),

    /// A participant entry was removed
    ParticipantLeft(ParticipantId),

    /// Local microphone mute state changed
    MicrophoneMuted(bool),

    /// Local camera visibility changed
    CameraHidden(bool),

    /// A local capture device was switched on the live session
    DeviceSwitched {
        kind: MediaKind,
        device_id: String,
    },

    /// Device list was refreshed
    DevicesChanged(DeviceList),

    /// Join attempt was discarded
    JoinFailed(String),

    /// Session ended by `leave()`
    Left(SessionId),
}
