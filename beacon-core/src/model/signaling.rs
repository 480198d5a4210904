use crate::model::room::RoomKey;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("frame is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("frame is not a JSON object")]
    NotObject,
}

/// Messages the relay itself originates, tagged with `type` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Role assignment, sent at join time: the receiving peer learns
    /// whether it is expected to initiate the negotiation.
    #[serde(rename = "ready")]
    Ready {
        #[serde(rename = "isInitiator")]
        is_initiator: bool,
        room: RoomKey,
    },
}

/// One client signaling payload: an arbitrary JSON object. The relay
/// forwards it untouched except for the `room` field, which it stamps
/// before fan-out.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalFrame(Map<String, Value>);

impl SignalFrame {
    /// Decode one inbound text frame. Anything that is not a JSON object
    /// is malformed.
    pub fn parse(text: &str) -> Result<Self, FrameError> {
        match serde_json::from_str::<Value>(text)? {
            Value::Object(fields) => Ok(Self(fields)),
            _ => Err(FrameError::NotObject),
        }
    }

    /// The `type` discriminator, if the peers supplied one. Logging only;
    /// the relay never interprets it.
    pub fn tag(&self) -> Option<&str> {
        self.0.get("type").and_then(Value::as_str)
    }

    pub fn room(&self) -> Option<&str> {
        self.0.get("room").and_then(Value::as_str)
    }

    /// Insert or overwrite the `room` field.
    pub fn set_room(&mut self, room: &RoomKey) {
        self.0
            .insert("room".to_string(), Value::String(room.as_str().to_string()));
    }

    pub fn to_text(&self) -> Result<String, FrameError> {
        Ok(serde_json::to_string(&self.0)?)
    }
}
