//! Capture devices
//!
//! - [`DeviceEnumerator`] lists cameras and microphones
//! - [`MediaAcquirer`] opens a track for a chosen device
//! - [`MediaPlatform`] is the injected platform capture API

pub mod acquirer;
pub mod descriptor;
pub mod enumerator;
pub mod platform;

pub use acquirer::MediaAcquirer;
pub use descriptor::{DeviceDescriptor, DeviceKind, DeviceList, DeviceSelection};
pub use enumerator::DeviceEnumerator;
pub use platform::{DeviceConstraint, MediaConstraints, MediaPlatform, MediaStream, PlatformError};
