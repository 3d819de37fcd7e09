//! Render surface values and the patches that update them.
//!
//! The reconciler never draws anything. It emits a [`RenderPatch`] naming the
//! parts of the surface that changed; the runtime folds it into a
//! [`ViewModel`] which a presenter then draws.

use crate::connection::StatusIndicator;
use crate::feed::ActivityFeedBuffer;
use rassh_shared::{ActionKind, ActivityRecord, EffectCategory, MoodId, StatsSnapshot};

/// Placeholder shown when the feed is empty
pub const FEED_PLACEHOLDER: &str = "No recent activity";

/// Placeholder shown when no offending address is known
pub const LEADERBOARD_PLACEHOLDER: &str = "No data yet";

/// Face animation scale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceScale {
    Normal,
    /// Shrink phase before the glyph swap
    Shrunk,
    /// Grow-back bounce after the swap
    Bounce,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FaceView {
    pub glyph: String,
    pub mood: MoodId,
    pub description: &'static str,
    pub scale: FaceScale,
    /// "Last activity: HH:MM:SS"
    pub last_update: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub total_sessions: u64,
    pub active_sessions: u64,
    pub commands_today: u64,
    pub total_commands: u64,
}

impl From<&StatsSnapshot> for Counters {
    fn from(stats: &StatsSnapshot) -> Self {
        Self {
            total_sessions: stats.total_sessions,
            active_sessions: stats.active_sessions,
            commands_today: stats.commands_today,
            total_commands: stats.total_commands,
        }
    }
}

/// One rendered feed line
#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    pub time: String,
    pub address: String,
    pub command: String,
    pub action: ActionKind,
    pub action_label: &'static str,
    pub action_color: (u8, u8, u8),
    pub reward: f64,
}

impl From<&ActivityRecord> for FeedEntry {
    fn from(record: &ActivityRecord) -> Self {
        Self {
            time: record.time_label(),
            address: record.client_address.clone(),
            command: record.command.clone(),
            action: record.action,
            action_label: record.action.label(),
            action_color: record.action.color(),
            reward: record.reward,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeedItem {
    Placeholder,
    Entry(FeedEntry),
}

impl FeedItem {
    /// Feed lines for a buffer, with the placeholder when it is empty
    pub fn list(buffer: &ActivityFeedBuffer) -> Vec<FeedItem> {
        if buffer.is_empty() {
            return vec![FeedItem::Placeholder];
        }
        buffer
            .iter()
            .map(|r| FeedItem::Entry(FeedEntry::from(r)))
            .collect()
    }
}

/// Leaderboard lines, with the placeholder when there are none
pub fn leaderboard_lines(stats: Option<&StatsSnapshot>) -> Vec<String> {
    match stats {
        Some(stats) if !stats.top_addresses.is_empty() => stats.leaderboard(),
        _ => vec![LEADERBOARD_PLACEHOLDER.to_string()],
    }
}

/// Changed parts of the render surface; `None` means unchanged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderPatch {
    pub status: Option<StatusIndicator>,
    pub face: Option<FaceView>,
    pub counters: Option<Counters>,
    pub leaderboard: Option<Vec<String>>,
    pub feed: Option<Vec<FeedItem>>,
    /// `Some(EffectCategory::None)` clears the active pulse
    pub effect: Option<EffectCategory>,
}

impl RenderPatch {
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.face.is_none()
            && self.counters.is_none()
            && self.leaderboard.is_none()
            && self.feed.is_none()
            && self.effect.is_none()
    }

    /// Names of the changed parts, for log lines
    pub fn changed(&self) -> Vec<&'static str> {
        let mut parts = Vec::new();
        if self.status.is_some() {
            parts.push("status");
        }
        if self.face.is_some() {
            parts.push("face");
        }
        if self.counters.is_some() {
            parts.push("counters");
        }
        if self.leaderboard.is_some() {
            parts.push("leaderboard");
        }
        if self.feed.is_some() {
            parts.push("feed");
        }
        if self.effect.is_some() {
            parts.push("effect");
        }
        parts
    }
}

/// Everything the presentation layer draws
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    pub status: StatusIndicator,
    pub face: FaceView,
    pub counters: Counters,
    pub leaderboard: Vec<String>,
    pub feed: Vec<FeedItem>,
    pub effect: EffectCategory,
}

impl ViewModel {
    /// Fold a patch into the current values
    pub fn apply(&mut self, patch: &RenderPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(face) = &patch.face {
            self.face = face.clone();
        }
        if let Some(counters) = patch.counters {
            self.counters = counters;
        }
        if let Some(lines) = &patch.leaderboard {
            self.leaderboard = lines.clone();
        }
        if let Some(feed) = &patch.feed {
            self.feed = feed.clone();
        }
        if let Some(effect) = patch.effect {
            self.effect = effect;
        }
    }
}
