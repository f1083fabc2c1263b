//! Participant registry implementation
//!
//! Holds one entry per participant identity, in first-seen order.

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::media::StageStream;
use crate::stage::{ParticipantId, ParticipantInfo};

use super::entry::{ParticipantEntry, Upsert};
use super::error::RegistryError;
use super::view::ParticipantView;

#[derive(Default)]
struct Inner {
    entries: HashMap<ParticipantId, ParticipantEntry>,
    /// Display order
    order: Vec<ParticipantId>,
    /// Id of the local participant, if registered
    local: Option<ParticipantId>,
    /// Session whose events may write here; 0 when none
    generation: u64,
}

/// Registry of participants on the current stage
///
/// Every mutation is a single critical section under the write lock, so a
/// read-modify-write of one entry never interleaves with another writer.
#[derive(Default)]
pub struct ParticipantRegistry {
    inner: RwLock<Inner>,
}

impl ParticipantRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a participant, or merge streams into its existing entry.
    ///
    /// Never creates a second entry for an identity.
    pub async fn upsert(&self, participant: ParticipantInfo, streams: Vec<StageStream>) -> Upsert {
        let mut inner = self.inner.write().await;
        Self::upsert_locked(&mut inner, participant, streams)
    }

    /// Like [`upsert`](Self::upsert), but only while `generation` is current.
    ///
    /// Returns `None` when the registry has moved on to another session.
    pub async fn upsert_for(
        &self,
        generation: u64,
        participant: ParticipantInfo,
        streams: Vec<StageStream>,
    ) -> Option<Upsert> {
        let mut inner = self.inner.write().await;
        if inner.generation != generation {
            return None;
        }
        Some(Self::upsert_locked(&mut inner, participant, streams))
    }

    fn upsert_locked(
        inner: &mut Inner,
        participant: ParticipantInfo,
        streams: Vec<StageStream>,
    ) -> Upsert {
        let id = participant.id.clone();

        if participant.is_local {
            inner.local = Some(id.clone());
        }

        if let Some(entry) = inner.entries.get_mut(&id) {
            let info_changed = entry.participant != participant;
            entry.participant = participant;
            let streams_changed = entry.merge_streams(streams);

            if info_changed || streams_changed {
                entry.touch();
                tracing::debug!(participant = %id, revision = entry.revision, "Participant updated");
                Upsert::Updated
            } else {
                tracing::debug!(participant = %id, "Duplicate participant add ignored");
                Upsert::Unchanged
            }
        } else {
            let entry = ParticipantEntry::new(participant, streams);
            tracing::info!(
                participant = %id,
                local = entry.is_local(),
                streams = entry.streams.len(),
                "Participant added"
            );
            inner.entries.insert(id.clone(), entry);
            inner.order.push(id);
            Upsert::Inserted
        }
    }

    /// Remove a participant; `None` if it was not registered
    pub async fn remove(&self, id: &ParticipantId) -> Option<ParticipantEntry> {
        let mut inner = self.inner.write().await;
        Self::remove_locked(&mut inner, id)
    }

    /// Like [`remove`](Self::remove), but only while `generation` is current
    pub async fn remove_for(&self, generation: u64, id: &ParticipantId) -> Option<ParticipantEntry> {
        let mut inner = self.inner.write().await;
        if inner.generation != generation {
            return None;
        }
        Self::remove_locked(&mut inner, id)
    }

    fn remove_locked(inner: &mut Inner, id: &ParticipantId) -> Option<ParticipantEntry> {
        let entry = inner.entries.remove(id)?;
        inner.order.retain(|existing| existing != id);
        if inner.local.as_ref() == Some(id) {
            inner.local = None;
        }

        tracing::info!(participant = %id, "Participant removed");
        Some(entry)
    }

    /// Snapshot of one entry
    pub async fn get(&self, id: &ParticipantId) -> Option<ParticipantEntry> {
        self.inner.read().await.entries.get(id).cloned()
    }

    /// Snapshot of all entries in display order
    pub async fn list(&self) -> Vec<ParticipantEntry> {
        let inner = self.inner.read().await;
        inner
            .order
            .iter()
            .filter_map(|id| inner.entries.get(id).cloned())
            .collect()
    }

    /// Snapshot of the local participant's entry
    pub async fn local(&self) -> Option<ParticipantEntry> {
        let inner = self.inner.read().await;
        inner
            .local
            .as_ref()
            .and_then(|id| inner.entries.get(id))
            .cloned()
    }

    /// Replace one stream of the local participant, keyed by its kind.
    ///
    /// Returns the replaced stream, if any.
    pub async fn replace_local_stream(
        &self,
        stream: StageStream,
    ) -> Result<Option<StageStream>, RegistryError> {
        let mut inner = self.inner.write().await;
        let Inner { entries, local, .. } = &mut *inner;

        let id = local.as_ref().ok_or(RegistryError::NoLocalParticipant)?;
        let entry = entries
            .get_mut(id)
            .ok_or_else(|| RegistryError::ParticipantNotFound(id.clone()))?;

        let replaced = entry.replace_stream(stream);
        entry.touch();

        tracing::debug!(participant = %id, revision = entry.revision, "Local stream replaced");
        Ok(replaced)
    }

    /// Apply `f` to an entry's streams under the write lock
    pub async fn update_streams<F>(&self, id: &ParticipantId, f: F) -> Result<u64, RegistryError>
    where
        F: FnOnce(&mut Vec<StageStream>),
    {
        let mut inner = self.inner.write().await;
        let entry = inner
            .entries
            .get_mut(id)
            .ok_or_else(|| RegistryError::ParticipantNotFound(id.clone()))?;

        f(&mut entry.streams);
        entry.touch();
        Ok(entry.revision)
    }

    /// Render snapshots in display order
    pub async fn views(&self, name_attribute: &str) -> Vec<ParticipantView> {
        let inner = self.inner.read().await;
        inner
            .order
            .iter()
            .filter_map(|id| inner.entries.get(id))
            .enumerate()
            .map(|(index, entry)| ParticipantView::from_entry(entry, index + 1, name_attribute))
            .collect()
    }

    /// Remove every entry
    pub async fn clear(&self) {
        self.reset(0).await;
    }

    /// Remove every entry and accept `*_for` writes only from `generation`
    pub async fn reset(&self, generation: u64) {
        let mut inner = self.inner.write().await;
        inner.entries.clear();
        inner.order.clear();
        inner.local = None;
        inner.generation = generation;
    }

    /// Generation currently accepted by `*_for` writes
    pub async fn generation(&self) -> u64 {
        self.inner.read().await.generation
    }

    /// Number of participants
    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
