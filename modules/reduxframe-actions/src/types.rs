//! The action record routed by tag. Domain-agnostic.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A tagged payload. The tag is the wire-level discriminant; the payload is
/// whatever the creator's transform produced.
///
/// On the wire this is `{"type": "<tag>", "payload": <payload>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action<P = serde_json::Value> {
    #[serde(rename = "type")]
    pub tag: String,
    pub payload: P,
}

impl<P> Action<P> {
    /// Build an action by hand. Hosts normally get these from a creator.
    pub fn new(tag: impl Into<String>, payload: P) -> Self {
        Self {
            tag: tag.into(),
            payload,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    pub fn into_parts(self) -> (String, P) {
        (self.tag, self.payload)
    }
}

impl<P: Serialize> Action<P> {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .with_context(|| format!("Failed to serialize action {}", self.tag))
    }
}

impl<P: DeserializeOwned> Action<P> {
    /// Parse a `{"type": ..., "payload": ...}` record.
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("Failed to parse action record")
    }
}

impl Action<serde_json::Value> {
    /// Decode an untyped payload into a concrete type.
    pub fn decode_payload<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.payload.clone())
            .with_context(|| format!("Payload of {} has unexpected shape", self.tag))
    }
}
