//! Session lifecycle
//!
//! [`StageController`] drives joins, leaves and device switches against an
//! injected stage connector. Events from the stage are applied through a
//! per-session handler; the UI hears about changes over a [`StageEvent`]
//! channel.

pub mod config;
pub mod controller;
pub mod events;
mod handler;
pub mod state;

pub use config::StageConfig;
pub use controller::StageController;
pub use events::StageEvent;
pub use state::{ControllerPhase, SessionId};
