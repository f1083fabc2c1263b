//! # stage-rs
//!
//! Participant and device session controller for real-time audio/video
//! stages.
//!
//! The broadcast SDK that actually negotiates and transports media is an
//! external collaborator, injected through [`stage::StageConnector`]. The
//! platform capture API is injected through [`device::MediaPlatform`]. This
//! crate owns what sits between them and a UI:
//!
//! - device enumeration and selection
//! - local track acquisition and release
//! - the publish/subscribe strategy handed to the stage
//! - the join/leave lifecycle and device switching
//! - the participant registry the UI renders tiles from
//!
//! ```text
//!  MediaPlatform ──► DeviceEnumerator ──► selection
//!        │                                   │
//!        └────────► MediaAcquirer ◄──────────┘
//!                        │ local StageStreams
//!                        ▼
//!                 PublishStrategy ──► Stage (external SDK)
//!                                        │ StageEventSink
//!                                        ▼
//!  StageController ──────────────► ParticipantRegistry ──► views / StageEvent ──► UI
//! ```

pub mod device;
pub mod error;
pub mod media;
pub mod registry;
pub mod session;
pub mod stage;
pub mod stats;
pub mod strategy;

pub use error::{Error, Result};
pub use media::{MediaKind, StageStream};
pub use session::{ControllerPhase, StageConfig, StageController, StageEvent};
