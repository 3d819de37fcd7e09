//! Shared types for RASSH dashboard components.
//!
//! Wire shapes of the honeypot's pull endpoints and push events, the mood
//! catalog and the Socket.IO frame codec used by the push listener.

pub mod activity;
pub mod error;
pub mod mood;
pub mod push;
pub mod socketio;
pub mod stats;

pub use activity::{ActionKind, ActivityRecord};
pub use error::RasshError;
pub use mood::{EffectCategory, MoodId};
pub use push::{FaceUpdate, PushEvent};
pub use stats::{StatsResponse, StatsSnapshot};

/// Default honeypot dashboard endpoint
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";

/// Stats snapshot endpoint path
pub const STATS_PATH: &str = "/api/stats";

/// Recent activity endpoint path
pub const ACTIVITY_PATH: &str = "/api/recent_activity";

/// Socket.IO endpoint path
pub const SOCKET_PATH: &str = "/socket.io/";
