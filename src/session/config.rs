//! Controller configuration

use crate::strategy::SubscribeType;

/// Stage controller configuration options
#[derive(Debug, Clone)]
pub struct StageConfig {
    /// Capacity of the UI event channel
    pub event_channel_capacity: usize,

    /// Mute the local microphone on every connection-state change
    pub mute_microphone_on_state_change: bool,

    /// Subscription mode for remote participants
    pub subscribe_type: SubscribeType,

    /// Participant attribute holding the display name
    pub display_name_attribute: String,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            event_channel_capacity: 256,
            mute_microphone_on_state_change: true,
            subscribe_type: SubscribeType::AudioVideo,
            display_name_attribute: "username".to_string(),
        }
    }
}

impl StageConfig {
    /// Set the UI event channel capacity (at least 1)
    pub fn event_channel_capacity(mut self, capacity: usize) -> Self {
        self.event_channel_capacity = capacity.max(1);
        self
    }

    /// Keep the microphone state across connection-state changes
    pub fn keep_microphone_on_state_change(mut self) -> Self {
        self.mute_microphone_on_state_change = false;
        self
    }

    /// Set the remote subscription mode
    pub fn subscribe_type(mut self, subscribe_type: SubscribeType) -> Self {
        self.subscribe_type = subscribe_type;
        self
    }

    /// Set the display-name attribute
    pub fn display_name_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.display_name_attribute = attribute.into();
        self
    }
}
