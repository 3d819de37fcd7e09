//! Attacker activity records as reported by the honeypot.
//!
//! One record per interpreted command: who sent it, what it was, which
//! response action the honeypot chose and the reward the policy assigned.

use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Response action the honeypot took for a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActionKind {
    Allow,
    Delay,
    Fake,
    Insult,
    Block,
    /// Any label outside the known set; the honeypot sends "UNKNOWN"
    #[serde(other)]
    Unknown,
}

impl ActionKind {
    /// Wire label, also used as the display label
    pub fn label(self) -> &'static str {
        match self {
            ActionKind::Allow => "ALLOW",
            ActionKind::Delay => "DELAY",
            ActionKind::Fake => "FAKE",
            ActionKind::Insult => "INSULT",
            ActionKind::Block => "BLOCK",
            ActionKind::Unknown => "UNKNOWN",
        }
    }

    /// Fixed display color as RGB
    pub fn color(self) -> (u8, u8, u8) {
        match self {
            ActionKind::Allow => (0x00, 0xff, 0x00),
            ActionKind::Delay => (0xff, 0xff, 0x00),
            ActionKind::Fake => (0xff, 0x66, 0x00),
            ActionKind::Insult => (0xff, 0x00, 0x66),
            ActionKind::Block => (0xff, 0x00, 0x00),
            ActionKind::Unknown => (0xff, 0xff, 0xff),
        }
    }

    /// Fixed display color as `#rrggbb`
    pub fn color_hex(self) -> String {
        let (r, g, b) = self.color();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }
}

/// A single observed attacker action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// When the command was observed (local wall-clock time)
    #[serde(
        deserialize_with = "deserialize_timestamp",
        serialize_with = "serialize_timestamp"
    )]
    pub timestamp: NaiveDateTime,
    /// Source address of the attacker
    #[serde(rename = "client_ip")]
    pub client_address: String,
    /// Command line as typed
    pub command: String,
    /// Action the honeypot chose
    pub action: ActionKind,
    /// Reward assigned by the response policy
    pub reward: f64,
}

impl ActivityRecord {
    /// Time of day shown in the feed
    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }
}

/// Parse an ISO-8601 timestamp with or without offset.
///
/// Offset timestamps are converted to local time; naive ones are kept as is,
/// which is what the honeypot emits (`datetime.isoformat()` without tz).
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{}'", raw)))
}

fn serialize_timestamp<S>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&ts.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_colors_are_fixed() {
        assert_eq!(ActionKind::Allow.color_hex(), "#00ff00");
        assert_eq!(ActionKind::Delay.color_hex(), "#ffff00");
        assert_eq!(ActionKind::Fake.color_hex(), "#ff6600");
        assert_eq!(ActionKind::Insult.color_hex(), "#ff0066");
        assert_eq!(ActionKind::Block.color_hex(), "#ff0000");
        assert_eq!(ActionKind::Unknown.color_hex(), "#ffffff");
    }

    #[test]
    fn test_record_from_wire() {
        let json = r#"{
            "timestamp": "2024-03-01T12:34:56.789",
            "command": "cat /etc/passwd",
            "client_ip": "203.0.113.9",
            "action": "FAKE",
            "reward": 1.5
        }"#;
        let record: ActivityRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.client_address, "203.0.113.9");
        assert_eq!(record.action, ActionKind::Fake);
        assert_eq!(record.time_label(), "12:34:56");
    }

    #[test]
    fn test_unknown_action_is_kept() {
        for label in ["UNKNOWN", "TARPIT"] {
            let json = format!(
                r#"{{"timestamp":"2024-03-01T12:00:00","command":"ls",
                "client_ip":"10.0.0.1","action":"{}","reward":0}}"#,
                label
            );
            let record: ActivityRecord = serde_json::from_str(&json).unwrap();
            assert_eq!(record.action, ActionKind::Unknown);
            assert_eq!(record.action.label(), "UNKNOWN");
        }
    }

    #[test]
    fn test_bad_timestamp_is_rejected() {
        let json = r#"{"timestamp":"yesterday","command":"ls",
            "client_ip":"10.0.0.1","action":"ALLOW","reward":0}"#;
        assert!(serde_json::from_str::<ActivityRecord>(json).is_err());
    }

    #[test]
    fn test_parse_timestamp_accepts_space_separator() {
        assert!(parse_timestamp("2024-03-01 08:00:00").is_some());
        assert!(parse_timestamp("2024-03-01T08:00:00+00:00").is_some());
    }
}
