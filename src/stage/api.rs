//! External stage SDK interface
//!
//! The broadcast SDK owns connection negotiation and media transport. This
//! crate only drives it through [`StageConnector`] and [`Stage`], and hears
//! back through [`StageEventSink`].
//!
//! The sink is handed over when the stage is created, so it is in place
//! before any event for that stage can be delivered.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::media::StageStream;
use crate::strategy::StageStrategy;

use super::participant::{ParticipantInfo, ParticipantToken};

/// Stage connection state as reported by the SDK
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Errored,
}

impl ConnectionState {
    pub fn is_connected(self) -> bool {
        self == ConnectionState::Connected
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Errored => "errored",
        };
        f.write_str(s)
    }
}

/// Errors reported by the stage SDK
#[derive(Debug, Clone, Error)]
pub enum StageError {
    /// Token rejected (expired, malformed, wrong stage)
    #[error("token rejected: {0}")]
    TokenRejected(String),
    /// Could not reach or negotiate with the stage
    #[error("connection failed: {0}")]
    Connection(String),
    /// Anything else
    #[error("{0}")]
    Other(String),
}

/// A joined or joinable stage
#[async_trait]
pub trait Stage: Send + Sync {
    /// Connect and start publishing per the strategy
    async fn join(&self) -> Result<(), StageError>;

    /// Disconnect
    async fn leave(&self) -> Result<(), StageError>;

    /// Re-query the strategy and update what is published
    async fn refresh_strategy(&self) -> Result<(), StageError>;
}

/// Creates stage handles
pub trait StageConnector: Send + Sync {
    /// Build a stage for a token. Events for it go to `events`.
    fn create(
        &self,
        token: &ParticipantToken,
        strategy: Arc<dyn StageStrategy>,
        events: Arc<dyn StageEventSink>,
    ) -> Box<dyn Stage>;
}

/// Receives stage events
#[async_trait]
pub trait StageEventSink: Send + Sync {
    /// Connection state transitioned
    async fn on_connection_state_changed(&self, state: ConnectionState);

    /// A participant's streams became available
    async fn on_participant_streams_added(
        &self,
        participant: ParticipantInfo,
        streams: Vec<StageStream>,
    );

    /// A participant left the stage
    async fn on_participant_left(&self, participant: ParticipantInfo);
}
