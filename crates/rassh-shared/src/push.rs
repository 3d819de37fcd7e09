//! Events the honeypot pushes over its real-time channel.

use crate::activity::ActivityRecord;
use crate::error::RasshError;
use crate::mood::MoodId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event name for persona changes
pub const FACE_UPDATE_EVENT: &str = "face_update";

/// Event name for newly observed attacker actions
pub const ACTIVITY_UPDATE_EVENT: &str = "activity_update";

/// Persona change as pushed by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceUpdate {
    /// Glyph to draw; the mood's canonical glyph is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face: Option<String>,
    pub mood: MoodId,
    /// Honeypot event that caused the change (e.g. "login_attempt")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
}

impl FaceUpdate {
    pub fn new(face: impl Into<String>, mood: MoodId) -> Self {
        Self {
            face: Some(face.into()),
            mood,
            event: None,
        }
    }

    pub fn with_event(mut self, event: impl Into<String>) -> Self {
        self.event = Some(event.into());
        self
    }

    /// Glyph to display for this update
    pub fn glyph(&self) -> String {
        self.face
            .clone()
            .unwrap_or_else(|| self.mood.canonical_glyph().to_string())
    }
}

/// A push event this dashboard understands
#[derive(Debug, Clone, PartialEq)]
pub enum PushEvent {
    Face(FaceUpdate),
    Activity(ActivityRecord),
}

impl PushEvent {
    /// Decode a named Socket.IO event.
    ///
    /// Returns `Ok(None)` for event names the dashboard does not consume.
    pub fn from_event(name: &str, payload: Value) -> Result<Option<Self>, RasshError> {
        match name {
            FACE_UPDATE_EVENT => serde_json::from_value(payload)
                .map(|u| Some(PushEvent::Face(u)))
                .map_err(|e| RasshError::Malformed(format!("{}: {}", name, e))),
            ACTIVITY_UPDATE_EVENT => serde_json::from_value(payload)
                .map(|r| Some(PushEvent::Activity(r)))
                .map_err(|e| RasshError::Malformed(format!("{}: {}", name, e))),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_face_update_without_glyph_uses_canonical() {
        let event = PushEvent::from_event(
            FACE_UPDATE_EVENT,
            json!({"mood": "angry", "event": "brute_force"}),
        )
        .unwrap()
        .unwrap();
        let PushEvent::Face(update) = event else {
            panic!("expected face update");
        };
        assert_eq!(update.glyph(), "[>_<]");
        assert_eq!(update.event.as_deref(), Some("brute_force"));
    }

    #[test]
    fn test_unconsumed_event_is_ignored() {
        let event = PushEvent::from_event("session_started", json!({})).unwrap();
        assert!(event.is_none());
    }

    #[test]
    fn test_malformed_activity_is_error() {
        let err = PushEvent::from_event(ACTIVITY_UPDATE_EVENT, json!({"command": "ls"}));
        assert!(matches!(err, Err(RasshError::Malformed(_))));
    }
}
