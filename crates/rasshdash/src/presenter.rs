//! Presentation layer seam.
//!
//! The runtime hands every presenter the full view model after each applied
//! patch; the presenter decides how (and whether) to draw it.

use crate::view::{FeedItem, RenderPatch, ViewModel};
use anyhow::Result;
use tracing::info;

pub trait Presenter {
    /// Draw the current view; `patch` names what just changed
    fn present(&mut self, view: &ViewModel, patch: &RenderPatch) -> Result<()>;

    /// Release whatever the presenter holds (terminal modes, etc.)
    fn teardown(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Headless presenter: one structured log line per change
#[derive(Debug, Default)]
pub struct LogPresenter;

impl Presenter for LogPresenter {
    fn present(&mut self, view: &ViewModel, patch: &RenderPatch) -> Result<()> {
        if let Some(status) = &patch.status {
            info!(status = status.text, "Connection status");
        }
        if let Some(face) = &patch.face {
            info!(
                glyph = %face.glyph,
                mood = %face.mood,
                scale = ?face.scale,
                "{}",
                face.description
            );
        }
        if let Some(c) = &patch.counters {
            info!(
                total_sessions = c.total_sessions,
                active_sessions = c.active_sessions,
                commands_today = c.commands_today,
                total_commands = c.total_commands,
                "Counters"
            );
        }
        if let Some(lines) = &patch.leaderboard {
            info!(top = %lines.join(", "), "Top offenders");
        }
        if patch.feed.is_some() {
            match view.feed.first() {
                Some(FeedItem::Entry(entry)) => info!(
                    entries = view.feed.len(),
                    latest_address = %entry.address,
                    latest_command = %entry.command,
                    latest_action = entry.action_label,
                    "Activity feed"
                ),
                _ => info!("Activity feed empty"),
            }
        }
        if let Some(effect) = patch.effect {
            info!(effect = ?effect, "Effect pulse");
        }
        Ok(())
    }
}
