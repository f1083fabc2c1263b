//! Render snapshots of registry entries

use crate::media::StageStream;
use crate::stage::ParticipantId;

use super::entry::ParticipantEntry;

/// What the UI needs to draw one participant tile
#[derive(Debug, Clone)]
pub struct ParticipantView {
    pub id: ParticipantId,
    /// Display name, or `user-<slot>` when the participant has none
    pub display_name: String,
    /// 1-based tile position in display order
    pub slot: usize,
    pub is_local: bool,
    /// Streams to attach to the tile. Local tiles carry video only so the
    /// user does not hear their own microphone.
    pub streams: Vec<StageStream>,
}

impl ParticipantView {
    pub(super) fn from_entry(entry: &ParticipantEntry, slot: usize, name_attribute: &str) -> Self {
        let display_name = entry
            .participant
            .attribute(name_attribute)
            .map(str::to_owned)
            .unwrap_or_else(|| format!("user-{}", slot));

        let streams = if entry.is_local() {
            entry
                .streams
                .iter()
                .filter(|s| s.kind().is_video())
                .cloned()
                .collect()
        } else {
            entry.streams.clone()
        };

        Self {
            id: entry.id().clone(),
            display_name,
            slot,
            is_local: entry.is_local(),
            streams,
        }
    }
}
