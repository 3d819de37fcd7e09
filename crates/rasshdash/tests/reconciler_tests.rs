//! View reconciler scenarios driven on a virtual clock

use chrono::{Local, NaiveDate};
use rassh_shared::mood::DEFAULT_GLYPH;
use rassh_shared::{
    ActionKind, ActivityRecord, EffectCategory, FaceUpdate, MoodId, StatsResponse, StatsSnapshot,
};
use rasshdash::connection::ConnectionState;
use rasshdash::event::{DashEvent, TimerEvent, TransportSignal};
use rasshdash::reconciler::{AnimationPhase, AnimationTimings, ViewReconciler};
use rasshdash::view::{Counters, FaceScale, FeedItem, ViewModel, LEADERBOARD_PLACEHOLDER};
use std::time::Duration;

/// Reconciler plus the timers it asked for, fired by `advance`
struct Harness {
    reconciler: ViewReconciler,
    view: ViewModel,
    now: Duration,
    timers: Vec<(Duration, TimerEvent)>,
    pulses_started: Vec<EffectCategory>,
}

impl Harness {
    fn new() -> Self {
        let reconciler = ViewReconciler::new(AnimationTimings::default(), Local::now());
        let view = reconciler.view();
        Self {
            reconciler,
            view,
            now: Duration::ZERO,
            timers: Vec::new(),
            pulses_started: Vec::new(),
        }
    }

    fn send(&mut self, event: DashEvent) {
        let outcome = self.reconciler.apply(event, Local::now());
        if let Some(effect) = outcome.patch.effect {
            if effect.is_visible() {
                self.pulses_started.push(effect);
            }
        }
        self.view.apply(&outcome.patch);
        for deferred in outcome.deferred {
            self.timers.push((self.now + deferred.after, deferred.timer));
        }
    }

    fn advance(&mut self, by: Duration) {
        let until = self.now + by;
        loop {
            let next = self
                .timers
                .iter()
                .enumerate()
                .filter(|(_, (due, _))| *due <= until)
                .min_by_key(|(_, (due, _))| *due)
                .map(|(i, _)| i);
            let Some(i) = next else { break };
            let (due, timer) = self.timers.remove(i);
            self.now = due;
            self.send(DashEvent::Timer(timer));
        }
        self.now = until;
    }

    fn settle(&mut self) {
        self.advance(Duration::from_secs(10));
    }
}

fn face(glyph: &str, mood: MoodId) -> DashEvent {
    DashEvent::Face(FaceUpdate::new(glyph, mood))
}

fn record(command: &str) -> ActivityRecord {
    ActivityRecord {
        timestamp: NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(12, 34, 56)
            .unwrap(),
        client_address: "203.0.113.9".to_string(),
        command: command.to_string(),
        action: ActionKind::Insult,
        reward: 1.5,
    }
}

fn stats_response() -> StatsResponse {
    StatsResponse {
        stats: Some(StatsSnapshot {
            total_sessions: 42,
            active_sessions: 2,
            commands_today: 7,
            total_commands: 900,
            top_addresses: vec!["1.2.3.4".to_string(), "5.6.7.8".to_string()],
        }),
        ..Default::default()
    }
}

#[test]
fn test_initial_view_before_any_contact() {
    let h = Harness::new();
    assert_eq!(h.view.status.state, ConnectionState::Offline);
    assert_eq!(h.view.status.text, "Offline");
    assert_eq!(h.view.feed, vec![FeedItem::Placeholder]);
    assert_eq!(h.view.counters, Counters::default());
    assert_eq!(h.view.leaderboard, vec![LEADERBOARD_PLACEHOLDER]);
    assert_eq!(h.view.face.glyph, DEFAULT_GLYPH);
    assert_eq!(h.view.effect, EffectCategory::None);
}

#[test]
fn test_mischievous_push_has_no_pulse() {
    let mut h = Harness::new();
    h.send(DashEvent::Face(
        FaceUpdate::new("😈", MoodId::Mischievous).with_event("login_attempt"),
    ));
    assert_eq!(h.view.face.description, "Mischievous - Time to mess with them...");
    h.settle();

    assert_eq!(h.view.face.glyph, "😈");
    assert_eq!(h.view.face.mood, MoodId::Mischievous);
    assert_eq!(h.view.face.scale, FaceScale::Normal);
    assert!(h.pulses_started.is_empty());
    assert_eq!(h.view.effect, EffectCategory::None);
}

#[test]
fn test_angry_pulse_fires_and_clears() {
    let mut h = Harness::new();
    let update = FaceUpdate {
        face: None,
        mood: MoodId::Angry,
        event: Some("brute_force".to_string()),
    };
    h.send(DashEvent::Face(update));

    assert_eq!(h.view.effect, EffectCategory::Angry);
    assert_eq!(h.view.face.description, "Angry - Under heavy attack!");

    h.advance(Duration::from_millis(999));
    assert_eq!(h.view.effect, EffectCategory::Angry);
    h.advance(Duration::from_millis(1));
    assert_eq!(h.view.effect, EffectCategory::None);

    h.settle();
    assert_eq!(h.view.face.glyph, MoodId::Angry.canonical_glyph());
}

#[test]
fn test_effect_partition_for_tagged_updates() {
    let cases = [
        (MoodId::Happy, EffectCategory::Excited),
        (MoodId::Suspicious, EffectCategory::Alert),
        (MoodId::Annoyed, EffectCategory::Angry),
        (MoodId::Bored, EffectCategory::None),
    ];
    for (mood, expected) in cases {
        let mut h = Harness::new();
        h.send(DashEvent::Face(FaceUpdate::new("[x]", mood).with_event("command")));
        assert_eq!(h.view.effect, expected);
    }
}

#[test]
fn test_second_pulse_outlives_first_timer() {
    let mut h = Harness::new();
    h.send(DashEvent::Face(
        FaceUpdate::new("[>_<]", MoodId::Angry).with_event("brute_force"),
    ));
    h.advance(Duration::from_millis(600));
    h.send(DashEvent::Face(
        FaceUpdate::new("[o_o]", MoodId::Alert).with_event("scan"),
    ));

    // The first pulse's expiry must not clear the second one
    h.advance(Duration::from_millis(500));
    assert_eq!(h.view.effect, EffectCategory::Alert);
    h.advance(Duration::from_millis(500));
    assert_eq!(h.view.effect, EffectCategory::None);
}

#[test]
fn test_stats_poll_updates_counters_and_leaderboard() {
    let mut h = Harness::new();
    h.send(DashEvent::StatsPolled(stats_response()));

    assert_eq!(
        h.view.counters,
        Counters {
            total_sessions: 42,
            active_sessions: 2,
            commands_today: 7,
            total_commands: 900,
        }
    );
    assert_eq!(h.view.leaderboard, vec!["1. 1.2.3.4", "2. 5.6.7.8"]);
}

#[test]
fn test_empty_leaderboard_shows_placeholder() {
    let mut h = Harness::new();
    let mut response = stats_response();
    if let Some(stats) = response.stats.as_mut() {
        stats.top_addresses.clear();
    }
    h.send(DashEvent::StatsPolled(response));
    assert_eq!(h.view.leaderboard, vec![LEADERBOARD_PLACEHOLDER]);
}

#[test]
fn test_repeated_snapshot_is_idempotent() {
    let mut h = Harness::new();
    let mut response = stats_response();
    response.face = Some("[-_-]".to_string());
    response.mood = Some(MoodId::Focused);

    h.send(DashEvent::StatsPolled(response.clone()));
    h.send(DashEvent::ActivityPolled(vec![record("ls"), record("id")]));
    h.settle();
    let first = h.view.clone();

    h.send(DashEvent::StatsPolled(response));
    h.send(DashEvent::ActivityPolled(vec![record("ls"), record("id")]));
    h.settle();

    assert_eq!(h.view.counters, first.counters);
    assert_eq!(h.view.leaderboard, first.leaderboard);
    assert_eq!(h.view.feed, first.feed);
    assert_eq!(h.view.face.glyph, first.face.glyph);
    assert_eq!(h.view.face.mood, first.face.mood);
    assert_eq!(h.reconciler.feed().len(), 2);
}

#[test]
fn test_polled_face_never_pulses() {
    let mut h = Harness::new();
    let mut response = stats_response();
    response.face = Some("[>_<]".to_string());
    response.mood = Some(MoodId::Angry);

    h.send(DashEvent::StatsPolled(response));
    h.settle();

    assert!(h.pulses_started.is_empty());
    assert_eq!(h.view.face.glyph, "[>_<]");
    assert_eq!(h.view.face.mood, MoodId::Angry);
}

#[test]
fn test_empty_activity_poll_shows_placeholder_only() {
    let mut h = Harness::new();
    h.send(DashEvent::Activity(record("whoami")));
    h.send(DashEvent::ActivityPolled(Vec::new()));
    assert_eq!(h.view.feed, vec![FeedItem::Placeholder]);
}

#[test]
fn test_pushed_activity_is_prepended() {
    let mut h = Harness::new();
    h.send(DashEvent::ActivityPolled(vec![record("uname -a")]));
    h.send(DashEvent::Activity(record("wget http://x")));

    let commands: Vec<_> = h
        .view
        .feed
        .iter()
        .filter_map(|item| match item {
            FeedItem::Entry(entry) => Some(entry.command.as_str()),
            FeedItem::Placeholder => None,
        })
        .collect();
    assert_eq!(commands, vec!["wget http://x", "uname -a"]);

    let FeedItem::Entry(entry) = &h.view.feed[0] else {
        panic!("expected an entry");
    };
    assert_eq!(entry.time, "12:34:56");
    assert_eq!(entry.action_label, "INSULT");
    assert_eq!(entry.action_color, (0xff, 0x00, 0x66));
}

#[test]
fn test_last_write_wins_during_shrink() {
    let mut h = Harness::new();
    h.send(face("[o_o]", MoodId::Alert));
    h.advance(Duration::from_millis(50));
    h.send(face("[-_-]", MoodId::Bored));
    h.settle();

    assert_eq!(h.view.face.glyph, "[-_-]");
    assert_eq!(h.view.face.mood, MoodId::Bored);
    assert_eq!(h.reconciler.phase(), AnimationPhase::Idle);
}

#[test]
fn test_last_write_wins_during_settle() {
    let mut h = Harness::new();
    h.send(face("[o_o]", MoodId::Alert));
    h.advance(Duration::from_millis(200));
    assert_eq!(h.view.face.glyph, "[o_o]");
    assert_eq!(h.view.face.scale, FaceScale::Bounce);

    h.send(face("[-_-]", MoodId::Bored));
    h.settle();

    assert_eq!(h.view.face.glyph, "[-_-]");
    assert_eq!(h.view.face.mood, MoodId::Bored);
    assert_eq!(h.view.face.scale, FaceScale::Normal);
}

#[test]
fn test_many_updates_leave_at_most_one_face_timer() {
    let mut h = Harness::new();
    for glyph in ["[a]", "[b]", "[c]", "[d]"] {
        h.send(face(glyph, MoodId::Thinking));
    }
    let face_timers = h
        .timers
        .iter()
        .filter(|(_, t)| !matches!(t, TimerEvent::EffectExpired { .. }))
        .count();
    assert_eq!(face_timers, 1);

    h.settle();
    assert_eq!(h.view.face.glyph, "[d]");
}

#[test]
fn test_unknown_mood_uses_fallback_description() {
    let mut h = Harness::new();
    h.send(face("[?]", MoodId::parse("ecstatic")));
    assert_eq!(h.view.face.description, "Unknown mood");
}

#[test]
fn test_connection_signals_toggle_status() {
    let mut h = Harness::new();
    h.send(DashEvent::Transport(TransportSignal::Established));
    assert_eq!(h.view.status.text, "Online");
    h.send(DashEvent::Transport(TransportSignal::Lost));
    assert_eq!(h.view.status.text, "Offline");
    assert_eq!(h.reconciler.connection_state(), ConnectionState::Offline);
}
