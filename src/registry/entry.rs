//! Participant entry
//!
//! Per-participant state stored in the registry.

use std::time::Instant;

use crate::media::{MediaKind, StageStream};
use crate::stage::{ParticipantId, ParticipantInfo};

/// Result of an upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    /// New entry appended
    Inserted,
    /// Existing entry changed
    Updated,
    /// Existing entry already held the same streams
    Unchanged,
}

/// Entry for a single participant in the registry
#[derive(Debug, Clone)]
pub struct ParticipantEntry {
    /// Participant identity
    pub participant: ParticipantInfo,

    /// Streams in the order they were added
    pub streams: Vec<StageStream>,

    /// Bumped on every mutation, starting at 0
    pub revision: u64,

    /// When the entry was created
    pub joined_at: Instant,
}

impl ParticipantEntry {
    pub(super) fn new(participant: ParticipantInfo, streams: Vec<StageStream>) -> Self {
        let mut entry = Self {
            participant,
            streams: Vec::with_capacity(streams.len()),
            revision: 0,
            joined_at: Instant::now(),
        };
        entry.merge_streams(streams);
        entry
    }

    /// Participant id
    pub fn id(&self) -> &ParticipantId {
        &self.participant.id
    }

    /// Whether this is the local participant
    pub fn is_local(&self) -> bool {
        self.participant.is_local
    }

    /// First stream of a kind
    pub fn stream(&self, kind: MediaKind) -> Option<&StageStream> {
        self.streams.iter().find(|s| s.kind() == kind)
    }

    /// Merge streams by handle identity.
    ///
    /// Streams already present are left in place; new ones are appended.
    /// Returns whether anything was appended.
    pub(super) fn merge_streams(&mut self, streams: Vec<StageStream>) -> bool {
        let mut changed = false;
        for stream in streams {
            if !self.streams.iter().any(|s| s.same_handle(&stream) || s.id() == stream.id()) {
                self.streams.push(stream);
                changed = true;
            }
        }
        changed
    }

    /// Replace the stream of a kind in place, or append if there is none.
    ///
    /// Returns the stream that was replaced.
    pub(super) fn replace_stream(&mut self, stream: StageStream) -> Option<StageStream> {
        let kind = stream.kind();
        match self.streams.iter_mut().find(|s| s.kind() == kind) {
            Some(slot) => Some(std::mem::replace(slot, stream)),
            None => {
                self.streams.push(stream);
                None
            }
        }
    }

    pub(super) fn touch(&mut self) {
        self.revision += 1;
    }
}
