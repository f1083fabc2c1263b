//! Registry error types

use thiserror::Error;

use crate::stage::ParticipantId;

/// Error type for registry operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No entry for this participant
    #[error("Participant not found: {0}")]
    ParticipantNotFound(ParticipantId),
    /// No local participant has been registered yet
    #[error("No local participant registered")]
    NoLocalParticipant,
}
