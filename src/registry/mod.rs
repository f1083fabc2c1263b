//! Participant registry
//!
//! The registry holds one entry per participant on the current stage and
//! is the source the rendering layer reads tiles from.
//!
//! # Writers
//!
//! ```text
//!   StageEventSink ──► upsert() / remove()   (stream-added, participant-left)
//!                            │
//!   switch_device() ──► replace_local_stream()
//!                            │
//!                            ▼
//!              RwLock<{ entries, order, local }>
//!                            │
//!                            ▼
//!                 list() / views() ──► UI
//! ```
//!
//! Each writer completes its read-modify-write inside one write-lock
//! critical section, so the two local-entry writers cannot interleave.

pub mod entry;
pub mod error;
pub mod store;
pub mod view;

pub use entry::{ParticipantEntry, Upsert};
pub use error::RegistryError;
pub use store::ParticipantRegistry;
pub use view::ParticipantView;
