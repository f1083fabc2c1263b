//! Participant identity and join token

use std::collections::HashMap;

use secrecy::{ExposeSecret, SecretString};

/// Stable participant identifier assigned by the stage
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A participant as reported by the stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantInfo {
    /// Stable identifier
    pub id: ParticipantId,
    /// Whether this is the caller's own participant
    pub is_local: bool,
    /// Free-form attributes carried in the join token
    pub attributes: HashMap<String, String>,
}

impl ParticipantInfo {
    /// A remote participant with no attributes
    pub fn remote(id: impl Into<String>) -> Self {
        Self {
            id: ParticipantId::new(id),
            is_local: false,
            attributes: HashMap::new(),
        }
    }

    /// The local participant with no attributes
    pub fn local(id: impl Into<String>) -> Self {
        Self {
            is_local: true,
            ..Self::remote(id)
        }
    }

    /// Add an attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Non-empty attribute value
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

/// Participant token used to join a stage.
///
/// Opaque to this crate; validation is the stage's job. `Debug` never
/// prints the value.
#[derive(Debug)]
pub struct ParticipantToken(SecretString);

impl ParticipantToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// Raw token, for handing to the stage SDK
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    pub fn is_empty(&self) -> bool {
        self.expose().is_empty()
    }
}

impl From<&str> for ParticipantToken {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for ParticipantToken {
    fn from(token: String) -> Self {
        Self::new(token)
    }
}
