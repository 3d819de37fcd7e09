//! Normalized update events consumed by the view reconciler.
//!
//! Both the snapshot poller and the push listener translate what they receive
//! into these values and post them on the single controller queue.

use rassh_shared::{ActivityRecord, FaceUpdate, StatsResponse};
use std::time::Duration;

/// Transport lifecycle signal from the push channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportSignal {
    Established,
    Lost,
}

/// Deferred callback fired back into the queue by the runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Shrink phase finished, swap the glyph
    ShrinkDone { step: u64 },
    /// Grow-back finished
    SettleDone { step: u64 },
    /// Effect pulse elapsed
    EffectExpired { pulse: u64 },
}

/// Request to deliver `timer` after `after`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deferred {
    pub after: Duration,
    pub timer: TimerEvent,
}

/// Everything the reconciler reacts to, in arrival order
#[derive(Debug, Clone, PartialEq)]
pub enum DashEvent {
    Transport(TransportSignal),
    /// Persona change, pushed or taken from a stats pull
    Face(FaceUpdate),
    /// Single pushed activity record
    Activity(ActivityRecord),
    /// Stats endpoint response
    StatsPolled(StatsResponse),
    /// Full recent-activity list from the activity endpoint
    ActivityPolled(Vec<ActivityRecord>),
    Timer(TimerEvent),
    Shutdown,
}

impl DashEvent {
    /// Short name for log lines
    pub fn kind(&self) -> &'static str {
        match self {
            DashEvent::Transport(_) => "transport",
            DashEvent::Face(_) => "face",
            DashEvent::Activity(_) => "activity",
            DashEvent::StatsPolled(_) => "stats_poll",
            DashEvent::ActivityPolled(_) => "activity_poll",
            DashEvent::Timer(_) => "timer",
            DashEvent::Shutdown => "shutdown",
        }
    }
}
