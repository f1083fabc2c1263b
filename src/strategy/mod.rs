//! Publish/subscribe strategy handed to the stage

pub mod publish;

pub use publish::{PublishStrategy, StageStrategy, SubscribeType};
