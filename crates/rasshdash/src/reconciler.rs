//! View reconciler - the single consumer of normalized dashboard events.
//!
//! Owns the activity feed, the face animation state machine, the effect
//! pulse and the latest stats snapshot. Each applied event yields a
//! [`RenderPatch`] plus any deferred timers the runtime must schedule.
//!
//! Face animation:
//!
//! ```text
//! Idle --update--> Transitioning --shrink done--> Settling --settle done--> Idle
//!                        ^                             |
//!                        +------ pending target -------+
//! ```
//!
//! Updates arriving mid-animation replace the pending target instead of
//! starting a second chain, so the last update received is the one finally
//! displayed.

use crate::config::AnimationConfig;
use crate::connection::{ConnectionMonitor, ConnectionState};
use crate::event::{DashEvent, Deferred, TimerEvent};
use crate::feed::ActivityFeedBuffer;
use crate::view::{
    leaderboard_lines, Counters, FaceScale, FaceView, FeedItem, RenderPatch, ViewModel,
};
use chrono::{DateTime, Local};
use rassh_shared::mood::DEFAULT_GLYPH;
use rassh_shared::{EffectCategory, FaceUpdate, MoodId, StatsResponse, StatsSnapshot};
use std::time::Duration;
use tracing::debug;

/// Persona as displayed
#[derive(Debug, Clone, PartialEq)]
pub struct FaceState {
    pub glyph: String,
    pub mood: MoodId,
    pub last_updated_at: DateTime<Local>,
}

impl FaceState {
    /// Face shown before the server has said anything
    pub fn initial(now: DateTime<Local>) -> Self {
        Self {
            glyph: DEFAULT_GLYPH.to_string(),
            mood: MoodId::Sleeping,
            last_updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationPhase {
    Idle,
    Transitioning,
    Settling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationTimings {
    pub shrink: Duration,
    pub settle: Duration,
    pub effect: Duration,
}

impl Default for AnimationTimings {
    fn default() -> Self {
        AnimationConfig::default().into()
    }
}

impl From<AnimationConfig> for AnimationTimings {
    fn from(config: AnimationConfig) -> Self {
        Self {
            shrink: Duration::from_millis(config.shrink_ms),
            settle: Duration::from_millis(config.settle_ms),
            effect: Duration::from_millis(config.effect_ms),
        }
    }
}

/// Result of applying one event
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outcome {
    pub patch: RenderPatch,
    pub deferred: Vec<Deferred>,
    pub shutdown: bool,
}

pub struct ViewReconciler {
    timings: AnimationTimings,
    connection: ConnectionMonitor,
    feed: ActivityFeedBuffer,
    stats: Option<StatsSnapshot>,
    /// Glyph currently drawn
    displayed: FaceState,
    /// Most recent update; mood text follows it immediately
    latest: FaceState,
    /// Target waiting for the next glyph swap
    pending: Option<FaceState>,
    phase: AnimationPhase,
    /// Only the face timer carrying this step is honored
    step: u64,
    effect: EffectCategory,
    pulse: u64,
}

impl ViewReconciler {
    pub fn new(timings: AnimationTimings, now: DateTime<Local>) -> Self {
        let face = FaceState::initial(now);
        Self {
            timings,
            connection: ConnectionMonitor::new(),
            feed: ActivityFeedBuffer::new(),
            stats: None,
            displayed: face.clone(),
            latest: face,
            pending: None,
            phase: AnimationPhase::Idle,
            step: 0,
            effect: EffectCategory::None,
            pulse: 0,
        }
    }

    pub fn phase(&self) -> AnimationPhase {
        self.phase
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.connection.state()
    }

    pub fn displayed_face(&self) -> &FaceState {
        &self.displayed
    }

    pub fn feed(&self) -> &ActivityFeedBuffer {
        &self.feed
    }

    pub fn effect(&self) -> EffectCategory {
        self.effect
    }

    /// Full render of the current state
    pub fn view(&self) -> ViewModel {
        ViewModel {
            status: self.connection.indicator(),
            face: self.face_view(),
            counters: self.stats.as_ref().map(Counters::from).unwrap_or_default(),
            leaderboard: leaderboard_lines(self.stats.as_ref()),
            feed: FeedItem::list(&self.feed),
            effect: self.effect,
        }
    }

    /// Apply one event in arrival order
    pub fn apply(&mut self, event: DashEvent, now: DateTime<Local>) -> Outcome {
        let mut out = Outcome::default();
        debug!(kind = event.kind(), phase = ?self.phase, "Applying event");

        match event {
            DashEvent::Transport(signal) => {
                out.patch.status = Some(self.connection.observe(signal));
            }
            DashEvent::Face(update) => self.on_face(update, now, &mut out),
            DashEvent::Activity(record) => {
                self.feed.insert(record);
                out.patch.feed = Some(FeedItem::list(&self.feed));
            }
            DashEvent::StatsPolled(response) => self.on_stats(response, now, &mut out),
            DashEvent::ActivityPolled(records) => {
                self.feed.replace_all(records);
                out.patch.feed = Some(FeedItem::list(&self.feed));
            }
            DashEvent::Timer(timer) => self.on_timer(timer, &mut out),
            DashEvent::Shutdown => out.shutdown = true,
        }

        out
    }

    fn on_stats(&mut self, response: StatsResponse, now: DateTime<Local>, out: &mut Outcome) {
        if let Some(stats) = &response.stats {
            out.patch.counters = Some(Counters::from(stats));
            out.patch.leaderboard = Some(leaderboard_lines(Some(stats)));
            self.stats = Some(stats.clone());
        }

        // Polled faces never carry an event tag, so they never pulse
        if let Some((face, mood)) = response.face_update() {
            let update = FaceUpdate::new(face, mood.clone());
            self.on_face(update, now, out);
        }
    }

    fn on_face(&mut self, update: FaceUpdate, now: DateTime<Local>, out: &mut Outcome) {
        let target = FaceState {
            glyph: update.glyph(),
            mood: update.mood.clone(),
            last_updated_at: now,
        };

        if let Some(tag) = &update.event {
            let category = update.mood.effect();
            debug!(event = %tag, mood = %update.mood, ?category, "Tagged face update");
            self.start_pulse(category, out);
        }

        self.latest = target.clone();
        self.pending = Some(target);

        if self.phase == AnimationPhase::Idle {
            self.phase = AnimationPhase::Transitioning;
            self.schedule_shrink(out);
        }

        out.patch.face = Some(self.face_view());
    }

    fn start_pulse(&mut self, category: EffectCategory, out: &mut Outcome) {
        self.pulse += 1;
        self.effect = category;
        out.patch.effect = Some(category);

        if category.is_visible() {
            out.deferred.push(Deferred {
                after: self.timings.effect,
                timer: TimerEvent::EffectExpired { pulse: self.pulse },
            });
        }
    }

    /// Schedule the glyph swap, superseding any earlier face timer
    fn schedule_shrink(&mut self, out: &mut Outcome) {
        self.step += 1;
        out.deferred.push(Deferred {
            after: self.timings.shrink,
            timer: TimerEvent::ShrinkDone { step: self.step },
        });
    }

    /// Schedule the end of the grow-back phase
    fn schedule_settle(&mut self, out: &mut Outcome) {
        self.step += 1;
        out.deferred.push(Deferred {
            after: self.timings.settle,
            timer: TimerEvent::SettleDone { step: self.step },
        });
    }

    fn on_timer(&mut self, timer: TimerEvent, out: &mut Outcome) {
        match timer {
            TimerEvent::ShrinkDone { step } => {
                if step != self.step || self.phase != AnimationPhase::Transitioning {
                    debug!(step, current = self.step, "Ignoring stale shrink timer");
                    return;
                }
                if let Some(target) = self.pending.take() {
                    self.displayed = target;
                }
                self.phase = AnimationPhase::Settling;
                self.schedule_settle(out);
                out.patch.face = Some(self.face_view());
            }
            TimerEvent::SettleDone { step } => {
                if step != self.step || self.phase != AnimationPhase::Settling {
                    debug!(step, current = self.step, "Ignoring stale settle timer");
                    return;
                }
                if self.pending.is_some() {
                    // Superseded while settling: run one more swap
                    self.phase = AnimationPhase::Transitioning;
                    self.schedule_shrink(out);
                } else {
                    self.phase = AnimationPhase::Idle;
                }
                out.patch.face = Some(self.face_view());
            }
            TimerEvent::EffectExpired { pulse } => {
                if pulse != self.pulse || !self.effect.is_visible() {
                    return;
                }
                self.effect = EffectCategory::None;
                out.patch.effect = Some(EffectCategory::None);
            }
        }
    }

    fn face_view(&self) -> FaceView {
        let scale = match self.phase {
            AnimationPhase::Idle => FaceScale::Normal,
            AnimationPhase::Transitioning => FaceScale::Shrunk,
            AnimationPhase::Settling => FaceScale::Bounce,
        };
        FaceView {
            glyph: self.displayed.glyph.clone(),
            mood: self.latest.mood.clone(),
            description: self.latest.mood.description(),
            scale,
            last_update: format!(
                "Last activity: {}",
                self.latest.last_updated_at.format("%H:%M:%S")
            ),
        }
    }
}
