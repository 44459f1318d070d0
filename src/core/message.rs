use crate::traits::error::{ChatSocketError, Result};
use serde::Serialize;
use serde_json::Value;

/// Decoded inbound frame
///
/// Every frame classifies as exactly one of these: `Structured` when it
/// parses as JSON, `Raw` otherwise. The fallback means no inbound frame is
/// ever dropped for being malformed; classification is never an error.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    /// The frame parsed as JSON
    Structured(Value),
    /// The frame did not parse; original text preserved verbatim
    Raw(String),
}

impl InboundMessage {
    /// Classify one raw text frame
    pub fn classify(text: String) -> Self {
        match serde_json::from_str::<Value>(&text) {
            Ok(value) => InboundMessage::Structured(value),
            Err(_) => InboundMessage::Raw(text),
        }
    }

    /// The structured payload, if this frame parsed as JSON
    pub fn as_structured(&self) -> Option<&Value> {
        match self {
            InboundMessage::Structured(value) => Some(value),
            InboundMessage::Raw(_) => None,
        }
    }

    /// The raw text, if this frame did not parse
    pub fn as_raw(&self) -> Option<&str> {
        match self {
            InboundMessage::Structured(_) => None,
            InboundMessage::Raw(text) => Some(text),
        }
    }
}

/// Outbound chat frame, always structured-encoded before transmission
#[derive(Debug, Clone, Serialize)]
pub struct OutboundMessage<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub conversation_id: &'a str,
    pub content: &'a str,
}

impl<'a> OutboundMessage<'a> {
    /// Build a chat message frame for the given conversation
    pub fn chat(conversation_id: &'a str, content: &'a str) -> Self {
        Self {
            kind: "message",
            conversation_id,
            content,
        }
    }

    /// Serialize to the wire representation
    pub fn to_wire(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| ChatSocketError::Serialization(e.to_string()))
    }
}
