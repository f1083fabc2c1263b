//! External stage collaborator
//!
//! Trait definitions for the broadcast SDK plus the participant identity
//! and token types it exchanges with this crate.

pub mod api;
pub mod participant;

pub use api::{ConnectionState, Stage, StageConnector, StageError, StageEventSink};
pub use participant::{ParticipantId, ParticipantInfo, ParticipantToken};
