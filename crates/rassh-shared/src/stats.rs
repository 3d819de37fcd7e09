//! Aggregate honeypot statistics served by the stats endpoint.

use crate::mood::MoodId;
use serde::{Deserialize, Serialize};

/// Aggregate counters and the offender leaderboard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Sessions ever recorded
    pub total_sessions: u64,
    /// Sessions without an end time
    pub active_sessions: u64,
    /// Commands seen in the last 24 hours
    #[serde(rename = "recent_commands")]
    pub commands_today: u64,
    /// Commands ever recorded
    pub total_commands: u64,
    /// Offending source addresses, highest rank first
    #[serde(rename = "top_ips")]
    pub top_addresses: Vec<String>,
}

impl StatsSnapshot {
    /// Leaderboard lines as displayed, e.g. `"1. 203.0.113.9"`
    pub fn leaderboard(&self) -> Vec<String> {
        self.top_addresses
            .iter()
            .enumerate()
            .map(|(i, addr)| format!("{}. {}", i + 1, addr))
            .collect()
    }
}

/// Body of `GET /api/stats`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsResponse {
    #[serde(default)]
    pub stats: Option<StatsSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<MoodId>,
    /// Server-side time of the last face change (ISO-8601)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<String>,
}

impl StatsResponse {
    /// Face and mood, only when both are present
    pub fn face_update(&self) -> Option<(&str, &MoodId)> {
        match (&self.face, &self.mood) {
            (Some(face), Some(mood)) => Some((face.as_str(), mood)),
            _ => None,
        }
    }
}
