//! Connection monitor for the push channel.
//!
//! Reflects transport lifecycle signals; reconnecting is the transport's job.

use crate::event::TransportSignal;
use tracing::{info, warn};

/// Push channel availability
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionState {
    Online,
    /// Also the state before any signal has arrived
    #[default]
    Offline,
}

/// Status dot color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DotColor {
    Green,
    Red,
}

/// Status indicator as rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusIndicator {
    pub state: ConnectionState,
    pub dot: DotColor,
    pub text: &'static str,
}

impl From<ConnectionState> for StatusIndicator {
    fn from(state: ConnectionState) -> Self {
        match state {
            ConnectionState::Online => Self {
                state,
                dot: DotColor::Green,
                text: "Online",
            },
            ConnectionState::Offline => Self {
                state,
                dot: DotColor::Red,
                text: "Offline",
            },
        }
    }
}

#[derive(Debug, Default)]
pub struct ConnectionMonitor {
    state: ConnectionState,
}

impl ConnectionMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn indicator(&self) -> StatusIndicator {
        self.state.into()
    }

    /// Record a lifecycle signal and return the updated indicator
    pub fn observe(&mut self, signal: TransportSignal) -> StatusIndicator {
        let next = match signal {
            TransportSignal::Established => ConnectionState::Online,
            TransportSignal::Lost => ConnectionState::Offline,
        };
        if next != self.state {
            match next {
                ConnectionState::Online => info!("Connected to honeypot"),
                ConnectionState::Offline => warn!("Disconnected from honeypot"),
            }
        }
        self.state = next;
        self.indicator()
    }
}
