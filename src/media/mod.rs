//! Media primitives shared by the device layer, the strategy and the registry
//!
//! This module provides:
//! - [`MediaKind`] for camera vs. microphone
//! - [`MediaTrack`], a raw platform capture track
//! - [`StageStream`], the shared handle published to or received from a stage

pub mod kind;
pub mod stream;

pub use kind::MediaKind;
pub use stream::{MediaTrack, StageStream};
