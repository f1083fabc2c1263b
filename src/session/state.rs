//! Controller state machine
//!
//! ```text
//!   Idle ──join()──► Joining ──ok──► Connected ──leave()──► Idle
//!                       │
//!                       └──failure──► Idle
//! ```

use std::sync::Arc;
use std::time::Instant;

use crate::device::DeviceSelection;
use crate::stage::{ConnectionState, Stage};
use crate::strategy::PublishStrategy;

/// Identifier of one joined session
pub type SessionId = u64;

/// Controller lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerPhase {
    /// No session
    Idle,
    /// Join in progress
    Joining,
    /// Session joined
    Connected,
}

/// A live session
pub(crate) struct Session {
    pub id: SessionId,
    pub stage: Box<dyn Stage>,
    pub strategy: Arc<PublishStrategy>,
    pub joined_at: Instant,
}

/// Mutable controller state
pub(crate) struct ControllerState {
    pub phase: ControllerPhase,

    /// Session currently receiving events (set while joining as well)
    pub current_session: Option<SessionId>,

    /// Last connection state reported for the current session
    pub connection: ConnectionState,

    pub is_connected: bool,
    /// Sessions start with the microphone muted
    pub mic_muted: bool,
    pub camera_hidden: bool,

    pub selection: DeviceSelection,
}

impl ControllerState {
    pub fn new() -> Self {
        Self {
            phase: ControllerPhase::Idle,
            current_session: None,
            connection: ConnectionState::Disconnected,
            is_connected: false,
            mic_muted: true,
            camera_hidden: false,
            selection: DeviceSelection::default(),
        }
    }

    /// Enter `Joining` for a new session id
    pub fn begin_join(&mut self, session_id: SessionId) -> bool {
        if self.phase != ControllerPhase::Idle {
            return false;
        }
        self.phase = ControllerPhase::Joining;
        self.current_session = Some(session_id);
        self.mic_muted = true;
        self.camera_hidden = false;
        true
    }

    /// `Joining` → `Connected`
    pub fn complete_join(&mut self) {
        if self.phase == ControllerPhase::Joining {
            self.phase = ControllerPhase::Connected;
        }
    }

    /// Back to `Idle` from any phase
    pub fn reset(&mut self) {
        self.phase = ControllerPhase::Idle;
        self.current_session = None;
        self.connection = ConnectionState::Disconnected;
        self.is_connected = false;
        self.mic_muted = true;
        self.camera_hidden = false;
    }

    /// Whether events tagged with `session_id` should be applied
    pub fn accepts(&self, session_id: SessionId) -> bool {
        self.current_session == Some(session_id)
    }
}
